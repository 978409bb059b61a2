use crate::types::Frame;
use futures::future::BoxFuture;

#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("capture device busy")]
    Busy,
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// The device is exclusive; a second acquisition while one is pending should
/// fail fast with [`CaptureError::Busy`] instead of queueing.
pub trait CapturePort: Send + Sync {
    fn capture_frame(&self) -> BoxFuture<'_, Result<Frame, CaptureError>>;
}
