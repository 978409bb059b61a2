use pretty_assertions::assert_eq;
use signbeat_domain_eval::{WindowAction, WindowKind, WindowScheduler, WindowsFired};
use signbeat_domain_song::{Timeline, TimelineEvent};
use signbeat_ports::types::WindowConfig;

fn timeline(targets: &[i64]) -> Timeline {
    let events = targets
        .iter()
        .enumerate()
        .map(|(id, &target_ms)| TimelineEvent {
            id,
            target_ms,
            expected_label: "A".to_string(),
            prompt: String::new(),
            lyric: String::new(),
        })
        .collect::<Vec<_>>();
    let total_duration_ms = targets.last().copied().unwrap_or(0) + 5_000;
    Timeline {
        events,
        total_duration_ms,
    }
}

fn scheduler_for(targets: &[i64]) -> WindowScheduler {
    let mut scheduler = WindowScheduler::new(WindowConfig::default());
    scheduler.load_timeline(&timeline(targets));
    scheduler
}

fn fires(actions: &[WindowAction]) -> Vec<(usize, WindowKind)> {
    actions
        .iter()
        .filter_map(|action| match action {
            WindowAction::Fire { event_id, window } => Some((*event_id, *window)),
            _ => None,
        })
        .collect()
}

fn finalizes(actions: &[WindowAction]) -> Vec<usize> {
    actions
        .iter()
        .filter_map(|action| match action {
            WindowAction::Finalize { event_id } => Some(*event_id),
            _ => None,
        })
        .collect()
}

#[test]
fn each_window_fires_once_across_a_sampled_sweep() {
    let mut scheduler = scheduler_for(&[1_000]);
    let mut fired = Vec::new();
    let mut finalized_at = Vec::new();

    for clock in (0..=3_000).step_by(50) {
        let actions = scheduler.advance_to(clock);
        fired.extend(fires(&actions).into_iter().map(|(_, w)| (clock, w)));
        if !finalizes(&actions).is_empty() {
            finalized_at.push(clock);
        }
    }

    assert_eq!(
        fired,
        vec![
            (550, WindowKind::Early),
            (1_000, WindowKind::Perfect),
            (1_450, WindowKind::Late),
        ]
    );
    assert_eq!(finalized_at, vec![1_700]);
}

#[test]
fn window_bounds_are_half_open() {
    let mut scheduler = scheduler_for(&[1_000]);
    assert!(fires(&scheduler.advance_to(1_000 - 451)).is_empty());
    assert!(fires(&scheduler.advance_to(1_000 + 150)).is_empty());
    assert_eq!(
        scheduler.fired(0),
        Some(WindowsFired {
            early: false,
            perfect: false,
            late: false,
        })
    );

    let mut scheduler = scheduler_for(&[1_000]);
    assert_eq!(fires(&scheduler.advance_to(1_000 - 301)), vec![(0, WindowKind::Early)]);
    assert_eq!(fires(&scheduler.advance_to(1_149)), vec![(0, WindowKind::Perfect)]);
}

#[test]
fn coarse_clock_jump_fires_late_and_finalizes_in_one_tick() {
    let mut scheduler = scheduler_for(&[1_000]);
    let actions = scheduler.advance_to(2_000);

    assert_eq!(fires(&actions), vec![(0, WindowKind::Late)]);
    assert_eq!(finalizes(&actions), vec![0]);
    assert!(scheduler.is_retired(0));
    assert!(scheduler.advance_to(2_050).is_empty());
}

#[test]
fn finalize_waits_for_grace_after_late_window() {
    let mut scheduler = scheduler_for(&[1_000]);
    scheduler.advance_to(1_450);
    assert!(finalizes(&scheduler.advance_to(1_650)).is_empty());
    assert_eq!(finalizes(&scheduler.advance_to(1_651)), vec![0]);
}

#[test]
fn zero_target_events_are_skipped() {
    let mut scheduler = scheduler_for(&[0, 1_000]);
    let mut events_seen = Vec::new();
    for clock in (0..=3_000).step_by(50) {
        let actions = scheduler.advance_to(clock);
        events_seen.extend(fires(&actions).into_iter().map(|(id, _)| id));
        events_seen.extend(finalizes(&actions));
    }
    assert!(events_seen.iter().all(|&id| id == 1));
    assert!(!scheduler.is_retired(0));
}

#[test]
fn focus_follows_the_last_event_within_radius() {
    let mut scheduler = scheduler_for(&[1_000, 1_500, 5_000]);

    let actions = scheduler.advance_to(100);
    assert!(actions.contains(&WindowAction::FocusChanged { event_id: Some(0) }));

    // Both 0 and 1 are within a second; iteration order lets the later one win.
    let actions = scheduler.advance_to(800);
    assert!(actions.contains(&WindowAction::FocusChanged { event_id: Some(1) }));

    // Nothing nearby: focus stays where it was.
    let actions = scheduler.advance_to(3_000);
    assert!(!actions
        .iter()
        .any(|a| matches!(a, WindowAction::FocusChanged { .. })));
    assert_eq!(scheduler.current_focus(), Some(1));
}

#[test]
fn custom_offsets_shift_windows() {
    let cfg = WindowConfig {
        early_offset_ms: -550,
        perfect_offset_ms: 50,
        late_offset_ms: 550,
        ..WindowConfig::default()
    };
    let mut scheduler = WindowScheduler::new(cfg);
    scheduler.load_timeline(&timeline(&[2_000]));

    assert_eq!(fires(&scheduler.advance_to(1_450)), vec![(0, WindowKind::Early)]);
    assert!(fires(&scheduler.advance_to(2_000)).is_empty());
    assert_eq!(fires(&scheduler.advance_to(2_050)), vec![(0, WindowKind::Perfect)]);
    assert_eq!(fires(&scheduler.advance_to(2_550)), vec![(0, WindowKind::Late)]);
}
