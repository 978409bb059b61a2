use crate::grade::{Grade, WindowKind};
use parking_lot::{Mutex, RwLock};
use signbeat_ports::types::EventId;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub event_id: EventId,
    pub grade: Grade,
    pub points: i64,
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Upgraded(Grade),
    Unchanged(Grade),
    /// The board is closed; the session is over.
    Closed,
    /// The event already locked its grade.
    Finalized,
    UnknownEvent,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResult {
    pub grade: Grade,
    pub finalized: bool,
}

/// Per-event grades plus the running score.
///
/// Grade upgrades arrive from independent capture completions, finalization
/// from the ticking thread. Each event sits behind its own lock; every write
/// also holds the shared gate, which [`ScoreBoard::close`] takes exclusively,
/// so nothing can change once the board is closed.
pub struct ScoreBoard {
    slots: Vec<Mutex<EventResult>>,
    open: RwLock<bool>,
    score: AtomicI64,
}

impl ScoreBoard {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| Mutex::new(EventResult::default())).collect(),
            open: RwLock::new(true),
            score: AtomicI64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Records the outcome of one window.
    pub fn apply(&self, event_id: EventId, window: WindowKind, label_matched: bool) -> ApplyOutcome {
        let open = self.open.read();
        if !*open {
            return ApplyOutcome::Closed;
        }
        let Some(slot) = self.slots.get(event_id) else {
            return ApplyOutcome::UnknownEvent;
        };

        let mut slot = slot.lock();
        if slot.finalized {
            return ApplyOutcome::Finalized;
        }
        let next = slot.grade.upgrade(window, label_matched);
        if next == slot.grade {
            return ApplyOutcome::Unchanged(next);
        }
        slot.grade = next;
        ApplyOutcome::Upgraded(next)
    }

    /// Locks the event's grade and adds its points. Applies at most once;
    /// returns `None` when already finalized or the board is closed.
    pub fn finalize(&self, event_id: EventId) -> Option<Verdict> {
        let open = self.open.read();
        if !*open {
            return None;
        }

        let mut slot = self.slots.get(event_id)?.lock();
        if slot.finalized {
            return None;
        }
        slot.finalized = true;

        let grade = slot.grade;
        let points = grade.points();
        self.score.fetch_add(points, Ordering::SeqCst);

        Some(Verdict {
            event_id,
            grade,
            points,
            label: grade.feedback_label(),
        })
    }

    /// Freezes the board. Returns true only for the call that closed it.
    pub fn close(&self) -> bool {
        let mut open = self.open.write();
        std::mem::replace(&mut *open, false)
    }

    pub fn is_open(&self) -> bool {
        *self.open.read()
    }

    /// Clears grades and score and reopens the board.
    pub fn reset(&self) {
        let mut open = self.open.write();
        for slot in &self.slots {
            *slot.lock() = EventResult::default();
        }
        self.score.store(0, Ordering::SeqCst);
        *open = true;
    }

    pub fn score(&self) -> i64 {
        self.score.load(Ordering::SeqCst)
    }

    pub fn result(&self, event_id: EventId) -> Option<EventResult> {
        self.slots.get(event_id).map(|slot| *slot.lock())
    }

    pub fn results(&self) -> Vec<EventResult> {
        self.slots.iter().map(|slot| *slot.lock()).collect()
    }
}
