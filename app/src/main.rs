use anyhow::{Context, Result};
use clap::Parser;
use signbeat_core::{
    export_report, Event, GameOverCause, GameSession, SessionConfig, SessionPorts, SessionSong,
};
use signbeat_domain_song::{format_clock, load_catalog_path, Timeline};
use signbeat_infra_audio_virtual::VirtualPlayback;
use signbeat_infra_capture_fs::DirectoryCapture;
use signbeat_infra_recognition_http::HttpRecognizer;
use signbeat_infra_storage_fs::FsStorage;
use signbeat_ports::leaderboard::LeaderboardPort;
use signbeat_ports::storage::{GameSettings, StoragePort};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LEADERBOARD_SIZE: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "signbeat")]
#[command(about = "Sign along to a song and get scored on timing")]
#[command(version)]
struct Args {
    /// Song catalog JSON file
    #[arg(long, env = "SIGNBEAT_CATALOG")]
    catalog: PathBuf,

    /// Index of the song to play
    #[arg(long, default_value_t = 0)]
    song: usize,

    /// Directory of camera frames to replay
    #[arg(long, env = "SIGNBEAT_FRAMES")]
    frames: PathBuf,

    /// Gesture recognizer endpoint
    #[arg(long, env = "SIGNBEAT_RECOGNIZER_URL")]
    recognizer_url: Option<String>,

    /// Player name for the leaderboard
    #[arg(long)]
    player: Option<String>,

    /// Clock polling interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Write a post-game report to this directory
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Settings and leaderboard directory
    #[arg(long, env = "SIGNBEAT_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

impl Args {
    fn apply_to(&self, settings: &mut GameSettings) {
        if let Some(url) = &self.recognizer_url {
            settings.recognizer_url = url.clone();
        }
        if let Some(tick_ms) = self.tick_ms {
            settings.tick_interval_ms = tick_ms;
        }
        if let Some(player) = &self.player {
            settings.last_player_name = Some(player.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signbeat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let storage = Arc::new(match &args.config_dir {
        Some(dir) => FsStorage::new(dir.clone()),
        None => FsStorage::default(),
    });
    let mut settings = storage.load_settings().context("Failed to load settings")?;
    args.apply_to(&mut settings);

    let catalog = load_catalog_path(&args.catalog)
        .with_context(|| format!("Failed to load catalog {}", args.catalog.display()))?;
    let song = catalog.song(args.song).context("Failed to select song")?;
    let session_song = SessionSong::from_song(song)
        .with_context(|| format!("Song '{}' has an unusable timeline", song.title))?;
    info!(
        title = %song.title,
        author = %song.author,
        events = session_song.timeline.len(),
        "song loaded"
    );

    let capture = DirectoryCapture::open(&args.frames).context("Failed to open frame directory")?;
    let recognizer = HttpRecognizer::new(
        settings.recognizer_url.clone(),
        Duration::from_millis(settings.recognizer_timeout_ms),
    )
    .context("Failed to build recognizer client")?;
    info!(endpoint = recognizer.endpoint(), frames = capture.frame_count(), "adapters ready");

    let timeline = session_song.timeline.clone();
    let ports = SessionPorts {
        audio: Arc::new(VirtualPlayback::new()),
        capture: Arc::new(capture),
        recognizer: Arc::new(recognizer),
        leaderboard: storage.clone(),
    };
    let mut session = GameSession::new(ports, session_song, SessionConfig::from(&settings));

    let shutdown = CancellationToken::new();
    tokio::spawn(stop_on_ctrl_c(shutdown.clone()));

    println!("Now playing: {} by {}", song.title, song.author);
    let summary = session
        .run(shutdown, |event| print_event(&timeline, &event))
        .await
        .context("Session failed")?;

    if let Some(player) = &args.player {
        session
            .submit_score(player)
            .context("Failed to submit score")?;
        storage
            .save_settings(&settings)
            .context("Failed to save settings")?;

        println!("Leaderboard:");
        let top = storage
            .top(LEADERBOARD_SIZE)
            .context("Failed to read leaderboard")?;
        for (rank, entry) in top.iter().enumerate() {
            println!("{:>2}. {:<16} {:>6}", rank + 1, entry.name, entry.score);
        }
    }

    if let Some(dir) = &args.report_dir {
        export_report(dir, &settings, &summary)
            .with_context(|| format!("Failed to write report to {}", dir.display()))?;
        info!(dir = %dir.display(), "report written");
    }

    Ok(())
}

fn print_event(timeline: &Timeline, event: &Event) {
    match event {
        Event::FocusChanged {
            event_id: Some(event_id),
        } => {
            if let Some(prompt) = timeline.get(*event_id) {
                println!(
                    "[{}] sign {:<8} {} {}",
                    format_clock(prompt.target_ms),
                    prompt.expected_label,
                    prompt.prompt,
                    prompt.lyric
                );
            }
        }
        Event::Feedback { label, points, .. } => println!("  {} (+{})", label, points),
        Event::GameOver { final_score, cause } => {
            let reason = match cause {
                GameOverCause::EndOfTrack | GameOverCause::PlaybackFinished => "song finished",
                GameOverCause::Stopped => "stopped",
            };
            println!("Game over ({}). Final score: {}", reason, final_score);
        }
        _ => {}
    }
}

async fn stop_on_ctrl_c(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, stopping session");
            shutdown.cancel();
        }
        Err(err) => tracing::warn!(error = %err, "failed to install Ctrl+C handler"),
    }
}
