use serde::{Deserialize, Serialize};
use std::fmt;

pub type Millis = i64; // playback position, monotonic while playing
pub type EventId = usize; // index into the ordered timeline

/// Encoded still image as delivered by the capture device.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame(pub Vec<u8>);

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({} bytes)", self.0.len())
    }
}

/// Offsets are relative to an event's target time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub early_offset_ms: Millis,
    pub perfect_offset_ms: Millis,
    pub late_offset_ms: Millis,
    pub window_width_ms: Millis,
    pub finalize_grace_ms: Millis,
    pub focus_radius_ms: Millis,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            early_offset_ms: -450,
            perfect_offset_ms: 0,
            late_offset_ms: 450,
            window_width_ms: 150,
            finalize_grace_ms: 200,
            focus_radius_ms: 1000,
        }
    }
}
