use signbeat_domain_eval::{ApplyOutcome, ScoreBoard, WindowKind};
use signbeat_ports::capture::CapturePort;
use signbeat_ports::recognition::RecognitionPort;
use signbeat_ports::types::EventId;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureRequest {
    pub event_id: EventId,
    pub window: WindowKind,
    pub expected_label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowOutcome {
    Applied(ApplyOutcome),
    Cancelled,
    CaptureFailed,
    RecognitionFailed,
}

/// Runs one capture + recognize attempt and records the result on the board.
///
/// Failures are absorbed: a failed window looks exactly like a missed one.
/// The cancel token is checked before touching the camera and after each
/// suspension point.
pub async fn evaluate_window(
    capture: &dyn CapturePort,
    recognizer: &dyn RecognitionPort,
    board: &ScoreBoard,
    request: &CaptureRequest,
    cancel: &CancellationToken,
) -> WindowOutcome {
    if cancel.is_cancelled() {
        return WindowOutcome::Cancelled;
    }

    let frame = match capture.capture_frame().await {
        Ok(frame) => frame,
        Err(err) => {
            tracing::debug!(
                event_id = request.event_id,
                window = %request.window,
                error = %err,
                "capture failed"
            );
            return WindowOutcome::CaptureFailed;
        }
    };
    if cancel.is_cancelled() {
        return WindowOutcome::Cancelled;
    }

    let label = match recognizer.recognize(frame).await {
        Ok(label) => label,
        Err(err) => {
            tracing::debug!(
                event_id = request.event_id,
                window = %request.window,
                error = %err,
                "recognition failed"
            );
            return WindowOutcome::RecognitionFailed;
        }
    };
    if cancel.is_cancelled() {
        return WindowOutcome::Cancelled;
    }

    let matched = label == request.expected_label;
    let outcome = board.apply(request.event_id, request.window, matched);
    tracing::debug!(
        event_id = request.event_id,
        window = %request.window,
        label = %label,
        matched,
        ?outcome,
        "window resolved"
    );
    WindowOutcome::Applied(outcome)
}

/// Fire-and-forget dispatcher for window evaluations.
pub struct CapturePipeline {
    capture: Arc<dyn CapturePort>,
    recognizer: Arc<dyn RecognitionPort>,
    board: Arc<ScoreBoard>,
    in_flight: JoinSet<WindowOutcome>,
}

impl CapturePipeline {
    pub fn new(
        capture: Arc<dyn CapturePort>,
        recognizer: Arc<dyn RecognitionPort>,
        board: Arc<ScoreBoard>,
    ) -> Self {
        Self {
            capture,
            recognizer,
            board,
            in_flight: JoinSet::new(),
        }
    }

    /// Spawns an evaluation without waiting on it. Must be called from within
    /// a tokio runtime. Returns false if the token was already cancelled.
    pub fn dispatch(&mut self, request: CaptureRequest, cancel: CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }

        let capture = self.capture.clone();
        let recognizer = self.recognizer.clone();
        let board = self.board.clone();
        self.in_flight.spawn(async move {
            evaluate_window(
                capture.as_ref(),
                recognizer.as_ref(),
                board.as_ref(),
                &request,
                &cancel,
            )
            .await
        });
        true
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Collects evaluations that already finished, without blocking.
    pub fn reap(&mut self) -> Vec<WindowOutcome> {
        let mut done = Vec::new();
        while let Some(joined) = self.in_flight.try_join_next() {
            if let Some(outcome) = Self::joined(joined) {
                done.push(outcome);
            }
        }
        done
    }

    /// Waits for every pending evaluation.
    pub async fn settle(&mut self) -> Vec<WindowOutcome> {
        let mut done = Vec::new();
        while let Some(joined) = self.in_flight.join_next().await {
            if let Some(outcome) = Self::joined(joined) {
                done.push(outcome);
            }
        }
        done
    }

    fn joined(joined: Result<WindowOutcome, tokio::task::JoinError>) -> Option<WindowOutcome> {
        match joined {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                tracing::warn!(error = %err, "window evaluation task failed");
                None
            }
        }
    }
}
