use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("audio unavailable: {0}")]
    Unavailable(String),
    #[error("unknown playback handle: {0}")]
    UnknownHandle(u64),
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRequest {
    pub key: String,
    pub duration_ms: Option<Millis>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub position_ms: Millis,
    pub is_loaded: bool,
    pub did_finish: bool,
}

/// Playback is polled; the core never decodes or mixes audio.
pub trait AudioPlaybackPort: Send + Sync {
    /// Returns once playback has begun.
    fn start(&self, track: &TrackRequest) -> Result<PlaybackHandle, AudioError>;
    fn status(&self, handle: PlaybackHandle) -> Result<PlaybackStatus, AudioError>;
    fn stop(&self, handle: PlaybackHandle) -> Result<(), AudioError>;
}
