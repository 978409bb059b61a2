use signbeat_ports::audio::TrackRequest;
use signbeat_ports::types::{EventId, Millis};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub songs: Vec<Song>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Track length in seconds, as listed in the catalog.
    #[serde(default)]
    pub song_duration: Option<f64>,
    pub var_name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub entries: Vec<RawEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    /// `M:SS` or `M:SS.sss`
    pub timestamp: String,
    #[serde(rename = "asl")]
    pub label: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub lyric: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: EventId,
    pub target_ms: Millis,
    pub expected_label: String,
    pub prompt: String,
    pub lyric: String,
}

/// Ordered prompts of one song. Insertion order is chronological order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
    pub total_duration_ms: Millis,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&TimelineEvent> {
        self.events.get(id)
    }
}

impl Song {
    pub fn track_request(&self) -> TrackRequest {
        TrackRequest {
            key: self.var_name.clone(),
            duration_ms: self
                .song_duration
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .map(|secs| (secs * 1000.0).round() as Millis),
        }
    }
}
