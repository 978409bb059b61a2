use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Early,
    Perfect,
    Late,
}

impl WindowKind {
    pub const ALL: [WindowKind; 3] = [WindowKind::Early, WindowKind::Perfect, WindowKind::Late];

    pub fn as_str(self) -> &'static str {
        match self {
            WindowKind::Early => "early",
            WindowKind::Perfect => "perfect",
            WindowKind::Late => "late",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best result recorded for an event. Ordered `None < Great < Perfect`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[default]
    None,
    Great,
    Perfect,
}

impl Grade {
    /// Grade after one window resolved. Never moves downward.
    pub fn upgrade(self, window: WindowKind, label_matched: bool) -> Grade {
        if !label_matched {
            return self;
        }
        match window {
            WindowKind::Perfect => Grade::Perfect,
            WindowKind::Early | WindowKind::Late if self != Grade::Perfect => Grade::Great,
            _ => self,
        }
    }

    pub fn points(self) -> i64 {
        match self {
            Grade::Perfect => 100,
            Grade::Great => 50,
            Grade::None => 0,
        }
    }

    pub fn feedback_label(self) -> &'static str {
        match self {
            Grade::Perfect => "PERFECT!!",
            Grade::Great => "GREAT!",
            Grade::None => "MISS",
        }
    }
}
