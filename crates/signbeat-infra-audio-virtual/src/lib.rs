use parking_lot::Mutex;
use signbeat_ports::audio::{AudioError, AudioPlaybackPort, PlaybackHandle, PlaybackStatus, TrackRequest};
use signbeat_ports::types::Millis;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

struct Track {
    key: String,
    started_at: Instant,
    duration_ms: Option<Millis>,
    stopped_at_ms: Option<Millis>,
}

impl Track {
    fn position_ms(&self) -> Millis {
        match self.stopped_at_ms {
            Some(position_ms) => position_ms,
            None => self.started_at.elapsed().as_millis() as Millis,
        }
    }
}

/// Silent playback driven by the wall clock. Stands in for a real audio
/// device so a session can run headless.
pub struct VirtualPlayback {
    tracks: Mutex<HashMap<u64, Track>>,
    next_handle: AtomicU64,
}

impl VirtualPlayback {
    pub fn new() -> Self {
        Self {
            tracks: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn active_tracks(&self) -> usize {
        self.tracks
            .lock()
            .values()
            .filter(|t| t.stopped_at_ms.is_none())
            .count()
    }
}

impl Default for VirtualPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlaybackPort for VirtualPlayback {
    fn start(&self, track: &TrackRequest) -> Result<PlaybackHandle, AudioError> {
        if track.key.trim().is_empty() {
            return Err(AudioError::Unavailable("track key is empty".to_string()));
        }
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.tracks.lock().insert(
            id,
            Track {
                key: track.key.clone(),
                started_at: Instant::now(),
                duration_ms: track.duration_ms,
                stopped_at_ms: None,
            },
        );
        tracing::debug!(handle = id, key = %track.key, duration_ms = ?track.duration_ms, "virtual playback started");
        Ok(PlaybackHandle(id))
    }

    fn status(&self, handle: PlaybackHandle) -> Result<PlaybackStatus, AudioError> {
        let tracks = self.tracks.lock();
        let track = tracks
            .get(&handle.0)
            .ok_or(AudioError::UnknownHandle(handle.0))?;
        let position_ms = track.position_ms();
        Ok(PlaybackStatus {
            position_ms,
            is_loaded: true,
            did_finish: track.duration_ms.is_some_and(|d| position_ms >= d),
        })
    }

    fn stop(&self, handle: PlaybackHandle) -> Result<(), AudioError> {
        let mut tracks = self.tracks.lock();
        let track = tracks
            .get_mut(&handle.0)
            .ok_or(AudioError::UnknownHandle(handle.0))?;
        if track.stopped_at_ms.is_none() {
            let position_ms = track.position_ms();
            track.stopped_at_ms = Some(position_ms);
            tracing::debug!(handle = handle.0, key = %track.key, position_ms, "virtual playback stopped");
        }
        Ok(())
    }
}
