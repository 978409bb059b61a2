use signbeat_ports::audio::{AudioError, PlaybackStatus};
use signbeat_ports::types::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockSample {
    /// Nothing usable this tick: not loaded, read failure, or already ended.
    Skipped,
    Position(Millis),
    EndOfTrack(Millis),
}

/// Turns coarse playback-position reads into a sample stream and detects the
/// end of the track, either reported natively or by nearing the song length.
#[derive(Clone, Debug)]
pub struct ClockPoller {
    total_duration_ms: Millis,
    end_slack_ms: Millis,
    position_ms: Millis,
    ended: bool,
}

impl ClockPoller {
    pub fn new(total_duration_ms: Millis, end_slack_ms: Millis) -> Self {
        Self {
            total_duration_ms,
            end_slack_ms,
            position_ms: 0,
            ended: false,
        }
    }

    pub fn on_status(&mut self, status: Result<PlaybackStatus, AudioError>) -> ClockSample {
        if self.ended {
            return ClockSample::Skipped;
        }

        let status = match status {
            Ok(status) => status,
            Err(err) => {
                tracing::debug!(error = %err, "playback position unavailable this tick");
                return ClockSample::Skipped;
            }
        };
        if !status.is_loaded {
            return ClockSample::Skipped;
        }

        self.position_ms = status.position_ms;
        if status.did_finish || self.is_past_end(status.position_ms) {
            self.ended = true;
            return ClockSample::EndOfTrack(status.position_ms);
        }

        ClockSample::Position(status.position_ms)
    }

    /// Records an end-of-track notification from outside the poll loop.
    /// Returns true only the first time the track is seen to end.
    pub fn mark_ended(&mut self) -> bool {
        !std::mem::replace(&mut self.ended, true)
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn position_ms(&self) -> Millis {
        self.position_ms
    }

    pub fn total_duration_ms(&self) -> Millis {
        self.total_duration_ms
    }

    fn is_past_end(&self, position_ms: Millis) -> bool {
        position_ms >= self.total_duration_ms - self.end_slack_ms
    }
}
