use crate::clock::{ClockPoller, ClockSample};
use crate::ipc::{Command, Event, GameOverCause, HudFrame, SessionPhase};
use crate::pipeline::{CapturePipeline, CaptureRequest, WindowOutcome};
use signbeat_domain_eval::{Grade, ScoreBoard, Verdict, WindowAction, WindowScheduler};
use signbeat_domain_song::{build_timeline, Song, Timeline, TimelineError};
use signbeat_ports::audio::{AudioError, AudioPlaybackPort, PlaybackHandle, TrackRequest};
use signbeat_ports::capture::CapturePort;
use signbeat_ports::leaderboard::{LeaderboardEntry, LeaderboardPort};
use signbeat_ports::recognition::RecognitionPort;
use signbeat_ports::storage::{GameSettings, StorageError};
use signbeat_ports::types::{EventId, Millis, WindowConfig};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("audio unavailable: {0}")]
    AudioUnavailable(#[from] AudioError),
    #[error("invalid phase: expected {expected:?}, found {actual:?}")]
    InvalidPhase {
        expected: SessionPhase,
        actual: SessionPhase,
    },
    #[error("player name is empty")]
    EmptyPlayerName,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("timeline error: {0}")]
    Timeline(#[from] TimelineError),
}

#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    pub tick_interval: Duration,
    pub end_slack_ms: Millis,
    pub feedback_display: Duration,
    pub windows: WindowConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&GameSettings::default())
    }
}

impl From<&GameSettings> for SessionConfig {
    fn from(settings: &GameSettings) -> Self {
        Self {
            tick_interval: Duration::from_millis(settings.tick_interval_ms.max(1)),
            end_slack_ms: settings.end_slack_ms,
            feedback_display: Duration::from_millis(settings.feedback_display_ms),
            windows: settings.windows,
        }
    }
}

pub struct SessionPorts {
    pub audio: Arc<dyn AudioPlaybackPort>,
    pub capture: Arc<dyn CapturePort>,
    pub recognizer: Arc<dyn RecognitionPort>,
    pub leaderboard: Arc<dyn LeaderboardPort>,
}

/// What a session plays: the track to start and the prompts to score.
#[derive(Clone, Debug)]
pub struct SessionSong {
    pub title: String,
    pub track: TrackRequest,
    pub timeline: Timeline,
}

impl SessionSong {
    pub fn from_song(song: &Song) -> Result<Self, TimelineError> {
        Ok(Self {
            title: song.title.clone(),
            track: song.track_request(),
            timeline: build_timeline(&song.entries)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: EventId,
    pub expected_label: String,
    pub target_ms: Millis,
    pub grade: Grade,
    pub finalized: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub song_title: String,
    pub phase: SessionPhase,
    pub final_score: i64,
    pub events: Vec<EventSummary>,
}

/// One playthrough: `Idle -> Playing -> GameOver`. A finished session is not
/// reusable; build a new one for the next run.
pub struct GameSession {
    audio: Arc<dyn AudioPlaybackPort>,
    leaderboard: Arc<dyn LeaderboardPort>,
    pipeline: CapturePipeline,
    config: SessionConfig,
    song: SessionSong,
    board: Arc<ScoreBoard>,
    scheduler: WindowScheduler,
    poller: ClockPoller,
    phase: SessionPhase,
    playback: Option<PlaybackHandle>,
    cancel: CancellationToken,
    focus: Option<EventId>,
    clock_ms: Millis,
    feedback: Option<(String, Instant)>,
    events: VecDeque<Event>,
}

impl GameSession {
    pub fn new(ports: SessionPorts, song: SessionSong, config: SessionConfig) -> Self {
        let board = Arc::new(ScoreBoard::new(song.timeline.len()));
        let pipeline = CapturePipeline::new(ports.capture, ports.recognizer, board.clone());
        let poller = ClockPoller::new(song.timeline.total_duration_ms, config.end_slack_ms);

        Self {
            audio: ports.audio,
            leaderboard: ports.leaderboard,
            pipeline,
            config,
            song,
            board,
            scheduler: WindowScheduler::new(config.windows),
            poller,
            phase: SessionPhase::Idle,
            playback: None,
            cancel: CancellationToken::new(),
            focus: None,
            clock_ms: 0,
            feedback: None,
            events: VecDeque::new(),
        }
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), SessionError> {
        match cmd {
            Command::Start => self.start()?,
            Command::Stop => self.stop()?,
            Command::PlaybackFinished => self.on_playback_finished(),
            Command::SubmitScore { player_name } => self.submit_score(&player_name)?,
        }
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::Idle)?;

        let handle = self.audio.start(&self.song.track)?;
        self.playback = Some(handle);

        self.cancel = CancellationToken::new();
        self.board.reset();
        self.poller = ClockPoller::new(
            self.song.timeline.total_duration_ms,
            self.config.end_slack_ms,
        );
        for action in self.scheduler.load_timeline(&self.song.timeline) {
            self.apply_action(action);
        }
        self.clock_ms = 0;
        self.feedback = None;
        self.phase = SessionPhase::Playing;

        tracing::info!(
            song = %self.song.title,
            events = self.song.timeline.len(),
            total_duration_ms = self.song.timeline.total_duration_ms,
            "session started"
        );
        self.events.push_back(Event::PhaseChanged {
            phase: self.phase,
        });
        Ok(())
    }

    /// Explicit stop or exit. Stopping an already finished session is a no-op.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Idle => Err(SessionError::InvalidPhase {
                expected: SessionPhase::Playing,
                actual: self.phase,
            }),
            SessionPhase::Playing => {
                self.enter_game_over(GameOverCause::Stopped);
                Ok(())
            }
            SessionPhase::GameOver => Ok(()),
        }
    }

    /// Native "playback finished" notification from the audio side.
    pub fn on_playback_finished(&mut self) {
        if self.phase == SessionPhase::Playing && self.poller.mark_ended() {
            self.enter_game_over(GameOverCause::PlaybackFinished);
        }
    }

    /// One clock sample: poll playback, advance windows, dispatch captures.
    pub fn tick(&mut self) {
        self.pipeline.reap();
        if self.phase != SessionPhase::Playing {
            return;
        }
        let Some(handle) = self.playback else {
            return;
        };

        match self.poller.on_status(self.audio.status(handle)) {
            ClockSample::Skipped => {}
            ClockSample::EndOfTrack(position_ms) => {
                self.clock_ms = position_ms;
                self.enter_game_over(GameOverCause::EndOfTrack);
            }
            ClockSample::Position(position_ms) => {
                self.clock_ms = position_ms;
                for action in self.scheduler.advance_to(position_ms) {
                    self.apply_action(action);
                }
                let frame = self.hud_frame();
                self.events.push_back(Event::HudUpdated { frame });
            }
        }
    }

    /// Drives the session at a fixed cadence until it ends or `shutdown`
    /// fires, handing every emitted event to `on_event`.
    pub async fn run<F>(
        &mut self,
        shutdown: CancellationToken,
        mut on_event: F,
    ) -> Result<SessionSummary, SessionError>
    where
        F: FnMut(Event),
    {
        if self.phase == SessionPhase::Idle {
            self.start()?;
        }

        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while self.phase == SessionPhase::Playing {
            tokio::select! {
                _ = interval.tick() => self.tick(),
                _ = shutdown.cancelled() => self.enter_game_over(GameOverCause::Stopped),
            }
            for event in self.drain_events() {
                on_event(event);
            }
        }

        self.settle().await;
        for event in self.drain_events() {
            on_event(event);
        }
        Ok(self.summary())
    }

    /// Waits for in-flight window evaluations.
    pub async fn settle(&mut self) -> Vec<WindowOutcome> {
        self.pipeline.settle().await
    }

    pub fn submit_score(&mut self, player_name: &str) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::GameOver)?;
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(SessionError::EmptyPlayerName);
        }

        let score = self.board.score();
        self.leaderboard.submit(LeaderboardEntry {
            name: player_name.to_string(),
            score,
        })?;
        tracing::info!(player = player_name, score, "score submitted");
        self.events.push_back(Event::ScoreSubmitted {
            player_name: player_name.to_string(),
            score,
        });
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> i64 {
        self.board.score()
    }

    pub fn clock_ms(&self) -> Millis {
        self.clock_ms
    }

    pub fn in_flight(&self) -> usize {
        self.pipeline.in_flight()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.song.timeline
    }

    pub fn hud_frame(&mut self) -> HudFrame {
        if let Some((_, until)) = self.feedback.as_ref() {
            if Instant::now() >= *until {
                self.feedback = None;
            }
        }
        HudFrame {
            active_event: self.focus,
            feedback: self.feedback.as_ref().map(|(label, _)| label.clone()),
            score: self.board.score(),
            clock_ms: self.clock_ms,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let events = self
            .song
            .timeline
            .events
            .iter()
            .zip(self.board.results())
            .map(|(event, result)| EventSummary {
                id: event.id,
                expected_label: event.expected_label.clone(),
                target_ms: event.target_ms,
                grade: result.grade,
                finalized: result.finalized,
            })
            .collect();

        SessionSummary {
            song_title: self.song.title.clone(),
            phase: self.phase,
            final_score: self.board.score(),
            events,
        }
    }

    fn apply_action(&mut self, action: WindowAction) {
        match action {
            WindowAction::Fire { event_id, window } => {
                let Some(event) = self.song.timeline.get(event_id) else {
                    return;
                };
                let request = CaptureRequest {
                    event_id,
                    window,
                    expected_label: event.expected_label.clone(),
                };
                tracing::trace!(event_id, %window, clock_ms = self.clock_ms, "window fired");
                self.pipeline.dispatch(request, self.cancel.clone());
            }
            WindowAction::Finalize { event_id } => {
                if let Some(verdict) = self.board.finalize(event_id) {
                    self.show_feedback(verdict);
                }
            }
            WindowAction::FocusChanged { event_id } => {
                self.focus = event_id;
                self.events.push_back(Event::FocusChanged { event_id });
            }
        }
    }

    fn show_feedback(&mut self, verdict: Verdict) {
        tracing::debug!(
            event_id = verdict.event_id,
            grade = ?verdict.grade,
            points = verdict.points,
            score = self.board.score(),
            "event finalized"
        );
        self.feedback = Some((
            verdict.label.to_string(),
            Instant::now() + self.config.feedback_display,
        ));
        self.events.push_back(Event::Feedback {
            event_id: verdict.event_id,
            grade: verdict.grade,
            label: verdict.label.to_string(),
            points: verdict.points,
        });
    }

    /// Single exit from `Playing`. The cancel token and board are shut before
    /// anything else so late completions cannot touch the score.
    fn enter_game_over(&mut self, cause: GameOverCause) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.cancel.cancel();
        self.board.close();
        self.poller.mark_ended();
        self.phase = SessionPhase::GameOver;

        if let Some(handle) = self.playback.take() {
            if let Err(err) = self.audio.stop(handle) {
                tracing::warn!(error = %err, "failed to stop playback");
            }
        }

        let final_score = self.board.score();
        tracing::info!(
            ?cause,
            final_score,
            clock_ms = self.clock_ms,
            pending = self.pipeline.in_flight(),
            "game over"
        );
        self.events.push_back(Event::PhaseChanged {
            phase: self.phase,
        });
        self.events.push_back(Event::GameOver { final_score, cause });
    }

    fn expect_phase(&self, expected: SessionPhase) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(SessionError::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }
}
