use signbeat_domain_eval::Grade;
use signbeat_ports::types::{EventId, Millis};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    Start,
    Stop,
    PlaybackFinished,
    SubmitScore { player_name: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    EndOfTrack,
    PlaybackFinished,
    Stopped,
}

/// Read-only projection of the session handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudFrame {
    pub active_event: Option<EventId>,
    pub feedback: Option<String>,
    pub score: i64,
    pub clock_ms: Millis,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    PhaseChanged { phase: SessionPhase },
    FocusChanged { event_id: Option<EventId> },
    Feedback {
        event_id: EventId,
        grade: Grade,
        label: String,
        points: i64,
    },
    HudUpdated { frame: HudFrame },
    GameOver { final_score: i64, cause: GameOverCause },
    ScoreSubmitted { player_name: String, score: i64 },
}
