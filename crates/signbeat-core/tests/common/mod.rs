#![allow(dead_code)]

use futures::future::BoxFuture;
use parking_lot::Mutex;
use signbeat_core::{GameSession, SessionConfig, SessionPorts, SessionSong};
use signbeat_domain_song::{build_timeline, RawEntry, Timeline};
use signbeat_ports::audio::{AudioError, AudioPlaybackPort, PlaybackHandle, PlaybackStatus, TrackRequest};
use signbeat_ports::capture::{CaptureError, CapturePort};
use signbeat_ports::leaderboard::{LeaderboardEntry, LeaderboardPort};
use signbeat_ports::recognition::{RecognitionError, RecognitionPort};
use signbeat_ports::storage::StorageError;
use signbeat_ports::types::{Frame, Millis};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub const NO_HAND: &str = "No hand";

pub fn song(entries: &[(&str, &str)]) -> SessionSong {
    let raw: Vec<RawEntry> = entries
        .iter()
        .map(|(timestamp, label)| RawEntry {
            timestamp: timestamp.to_string(),
            label: label.to_string(),
            prompt: String::new(),
            lyric: String::new(),
        })
        .collect();
    SessionSong {
        title: "Test Song".to_string(),
        track: TrackRequest {
            key: "test_song".to_string(),
            duration_ms: None,
        },
        timeline: build_timeline(&raw).expect("test timeline should build"),
    }
}

/// Playback whose position is whatever the shared clock holds. With a
/// non-zero step the clock advances on every status read.
pub struct FakePlayback {
    clock: Arc<AtomicI64>,
    step_ms: Millis,
    pub loaded: AtomicBool,
    pub finished: AtomicBool,
    pub fail_status: AtomicBool,
    fail_start: bool,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl FakePlayback {
    pub fn new(clock: Arc<AtomicI64>) -> Self {
        Self {
            clock,
            step_ms: 0,
            loaded: AtomicBool::new(true),
            finished: AtomicBool::new(false),
            fail_status: AtomicBool::new(false),
            fail_start: false,
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    pub fn stepping(clock: Arc<AtomicI64>, step_ms: Millis) -> Self {
        Self {
            step_ms,
            ..Self::new(clock)
        }
    }

    pub fn unavailable(clock: Arc<AtomicI64>) -> Self {
        Self {
            fail_start: true,
            ..Self::new(clock)
        }
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl AudioPlaybackPort for FakePlayback {
    fn start(&self, _track: &TrackRequest) -> Result<PlaybackHandle, AudioError> {
        if self.fail_start {
            return Err(AudioError::Unavailable("no output device".to_string()));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(PlaybackHandle(1))
    }

    fn status(&self, _handle: PlaybackHandle) -> Result<PlaybackStatus, AudioError> {
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(AudioError::Backend("status read failed".to_string()));
        }
        let position_ms = self.clock.fetch_add(self.step_ms, Ordering::SeqCst) + self.step_ms;
        Ok(PlaybackStatus {
            position_ms,
            is_loaded: self.loaded.load(Ordering::SeqCst),
            did_finish: self.finished.load(Ordering::SeqCst),
        })
    }

    fn stop(&self, _handle: PlaybackHandle) -> Result<(), AudioError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Camera whose frame encodes the playback clock at the moment of capture.
pub struct ClockCamera {
    clock: Arc<AtomicI64>,
    captures: AtomicUsize,
}

impl ClockCamera {
    pub fn new(clock: Arc<AtomicI64>) -> Self {
        Self {
            clock,
            captures: AtomicUsize::new(0),
        }
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

impl CapturePort for ClockCamera {
    fn capture_frame(&self) -> BoxFuture<'_, Result<Frame, CaptureError>> {
        Box::pin(async move {
            self.captures.fetch_add(1, Ordering::SeqCst);
            let now = self.clock.load(Ordering::SeqCst);
            Ok(Frame(now.to_le_bytes().to_vec()))
        })
    }
}

/// A player who only shows the sign inside the perfect window.
pub struct PerfectOnlySigner {
    targets: Vec<(Millis, String)>,
}

impl PerfectOnlySigner {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            targets: timeline
                .events
                .iter()
                .map(|e| (e.target_ms, e.expected_label.clone()))
                .collect(),
        }
    }
}

impl RecognitionPort for PerfectOnlySigner {
    fn recognize(&self, frame: Frame) -> BoxFuture<'_, Result<String, RecognitionError>> {
        Box::pin(async move {
            let Ok(bytes) = <[u8; 8]>::try_from(frame.as_bytes()) else {
                return Err(RecognitionError::Parse("bad frame".to_string()));
            };
            let at = i64::from_le_bytes(bytes);
            let label = self
                .targets
                .iter()
                .find(|(target, _)| (0..150).contains(&(at - target)))
                .map(|(_, label)| label.clone())
                .unwrap_or_else(|| NO_HAND.to_string());
            Ok(label)
        })
    }
}

/// Camera that blocks until the test opens the gate.
pub struct GatedCamera {
    pub gate: Arc<Notify>,
    started: AtomicUsize,
}

impl GatedCamera {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            started: AtomicUsize::new(0),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl CapturePort for GatedCamera {
    fn capture_frame(&self) -> BoxFuture<'_, Result<Frame, CaptureError>> {
        Box::pin(async move {
            self.started.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(Frame(vec![0xff, 0xd8]))
        })
    }
}

pub struct FailingCamera;

impl CapturePort for FailingCamera {
    fn capture_frame(&self) -> BoxFuture<'_, Result<Frame, CaptureError>> {
        Box::pin(async { Err(CaptureError::DeviceUnavailable("lens cap".to_string())) })
    }
}

pub struct StillCamera;

impl CapturePort for StillCamera {
    fn capture_frame(&self) -> BoxFuture<'_, Result<Frame, CaptureError>> {
        Box::pin(async { Ok(Frame(vec![0xff, 0xd8, 0xff])) })
    }
}

/// Recognizer that always answers with the same label, optionally waiting
/// for a gate first.
pub struct FixedRecognizer {
    label: Option<String>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl FixedRecognizer {
    pub fn answering(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            label: None,
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(label: &str, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::answering(label)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecognitionPort for FixedRecognizer {
    fn recognize(&self, _frame: Frame) -> BoxFuture<'_, Result<String, RecognitionError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.gate.as_ref() {
                gate.notified().await;
            }
            self.label
                .clone()
                .ok_or_else(|| RecognitionError::Network("connection refused".to_string()))
        })
    }
}

#[derive(Default)]
pub struct MemoryLeaderboard {
    entries: Mutex<Vec<LeaderboardEntry>>,
}

impl MemoryLeaderboard {
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.entries.lock().clone()
    }
}

impl LeaderboardPort for MemoryLeaderboard {
    fn submit(&self, entry: LeaderboardEntry) -> Result<(), StorageError> {
        self.entries.lock().push(entry);
        Ok(())
    }

    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let mut entries = self.entries.lock().clone();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }
}

pub fn session_with(
    audio: Arc<dyn AudioPlaybackPort>,
    capture: Arc<dyn CapturePort>,
    recognizer: Arc<dyn RecognitionPort>,
    leaderboard: Arc<dyn LeaderboardPort>,
    song: SessionSong,
) -> GameSession {
    GameSession::new(
        SessionPorts {
            audio,
            capture,
            recognizer,
            leaderboard,
        },
        song,
        SessionConfig::default(),
    )
}
