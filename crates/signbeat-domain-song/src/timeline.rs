use crate::model::{RawEntry, Timeline, TimelineEvent};
use signbeat_ports::types::Millis;

/// Keeps the session from ending exactly on the last prompt.
pub const TRAILING_BUFFER_MS: Millis = 5_000;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TimelineError {
    #[error("malformed timestamp at entry {index}: {value:?}")]
    MalformedTimestamp { index: usize, value: String },
    #[error("timeline has no entries")]
    EmptyTimeline,
}

/// Parses `M:SS[.sss]` into whole milliseconds.
///
/// Fractional seconds are kept; anything finer than a millisecond is rounded.
pub fn parse_timestamp(value: &str) -> Option<Millis> {
    let (minutes, seconds) = value.trim().split_once(':')?;
    if seconds.contains(':') {
        return None;
    }

    let minutes: u32 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let second_ms = (seconds * 1000.0).round();
    if second_ms >= Millis::MAX as f64 {
        return None;
    }
    Millis::from(minutes)
        .checked_mul(60_000)?
        .checked_add(second_ms as Millis)
}

pub fn build_timeline(entries: &[RawEntry]) -> Result<Timeline, TimelineError> {
    let mut events = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let target_ms =
            parse_timestamp(&entry.timestamp).ok_or_else(|| TimelineError::MalformedTimestamp {
                index,
                value: entry.timestamp.clone(),
            })?;
        events.push(TimelineEvent {
            id: index,
            target_ms,
            expected_label: entry.label.clone(),
            prompt: entry.prompt.clone(),
            lyric: entry.lyric.clone(),
        });
    }

    let last = events.last().ok_or(TimelineError::EmptyTimeline)?;
    let total_duration_ms = last.target_ms.checked_add(TRAILING_BUFFER_MS).ok_or_else(|| {
        TimelineError::MalformedTimestamp {
            index: last.id,
            value: entries[last.id].timestamp.clone(),
        }
    })?;

    Ok(Timeline {
        events,
        total_duration_ms,
    })
}

/// `M:SS` display clock; negative positions show as `0:00`.
pub fn format_clock(ms: Millis) -> String {
    if ms < 0 {
        return "0:00".to_string();
    }
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
