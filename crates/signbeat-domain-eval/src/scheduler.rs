use crate::grade::WindowKind;
use signbeat_domain_song::Timeline;
use signbeat_ports::types::{EventId, Millis, WindowConfig};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowsFired {
    pub early: bool,
    pub perfect: bool,
    pub late: bool,
}

impl WindowsFired {
    fn slot(&mut self, window: WindowKind) -> &mut bool {
        match window {
            WindowKind::Early => &mut self.early,
            WindowKind::Perfect => &mut self.perfect,
            WindowKind::Late => &mut self.late,
        }
    }

    /// Marks the window fired; false if it had already fired.
    fn claim(&mut self, window: WindowKind) -> bool {
        let slot = self.slot(window);
        if *slot {
            return false;
        }
        *slot = true;
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowAction {
    Fire { event_id: EventId, window: WindowKind },
    Finalize { event_id: EventId },
    FocusChanged { event_id: Option<EventId> },
}

#[derive(Debug, Default)]
struct EventProgress {
    fired: WindowsFired,
    retired: bool,
}

/// Decides, per clock sample, which capture windows open and which events lock.
///
/// Window flags are owned here and only touched by the ticking thread, so a
/// window cannot fire twice even while its evaluation is still in flight.
pub struct WindowScheduler {
    cfg: WindowConfig,
    targets: Vec<Millis>,
    progress: Vec<EventProgress>,
    focus: Option<EventId>,
}

impl WindowScheduler {
    pub fn new(cfg: WindowConfig) -> Self {
        Self {
            cfg,
            targets: Vec::new(),
            progress: Vec::new(),
            focus: None,
        }
    }

    pub fn load_timeline(&mut self, timeline: &Timeline) -> Vec<WindowAction> {
        self.targets = timeline.events.iter().map(|e| e.target_ms).collect();
        self.progress = self.targets.iter().map(|_| EventProgress::default()).collect();
        self.focus = None;
        vec![WindowAction::FocusChanged { event_id: None }]
    }

    pub fn config(&self) -> WindowConfig {
        self.cfg
    }

    pub fn advance_to(&mut self, clock_ms: Millis) -> Vec<WindowAction> {
        let cfg = self.cfg;
        let mut actions = Vec::new();
        let mut focus = self.focus;

        for (event_id, (&target, progress)) in
            self.targets.iter().zip(self.progress.iter_mut()).enumerate()
        {
            // A zero target marks a malformed entry; it never scores.
            if progress.retired || target == 0 {
                continue;
            }
            let diff = clock_ms - target;

            if within(diff, cfg.early_offset_ms, cfg.window_width_ms)
                && progress.fired.claim(WindowKind::Early)
            {
                actions.push(WindowAction::Fire {
                    event_id,
                    window: WindowKind::Early,
                });
            }

            if within(diff, cfg.perfect_offset_ms, cfg.window_width_ms)
                && progress.fired.claim(WindowKind::Perfect)
            {
                actions.push(WindowAction::Fire {
                    event_id,
                    window: WindowKind::Perfect,
                });
            }

            if diff >= cfg.late_offset_ms {
                if progress.fired.claim(WindowKind::Late) {
                    actions.push(WindowAction::Fire {
                        event_id,
                        window: WindowKind::Late,
                    });
                }
                if diff > cfg.late_offset_ms + cfg.finalize_grace_ms {
                    progress.retired = true;
                    actions.push(WindowAction::Finalize { event_id });
                }
            }

            if diff.abs() < cfg.focus_radius_ms {
                focus = Some(event_id);
            }
        }

        if focus != self.focus {
            self.focus = focus;
            actions.push(WindowAction::FocusChanged { event_id: focus });
        }

        actions
    }

    pub fn current_focus(&self) -> Option<EventId> {
        self.focus
    }

    pub fn fired(&self, event_id: EventId) -> Option<WindowsFired> {
        self.progress.get(event_id).map(|p| p.fired)
    }

    pub fn is_retired(&self, event_id: EventId) -> bool {
        self.progress.get(event_id).is_some_and(|p| p.retired)
    }
}

fn within(diff: Millis, offset: Millis, width: Millis) -> bool {
    diff >= offset && diff < offset + width
}
