use crate::types::Frame;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum RecognitionError {
    #[error("network error: {0}")]
    Network(String),
    #[error("recognizer returned {0}: {1}")]
    Status(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecognitionRequest {
    pub base64_image: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResponse {
    pub gesture: String,
}

pub trait RecognitionPort: Send + Sync {
    fn recognize(&self, frame: Frame) -> BoxFuture<'_, Result<String, RecognitionError>>;
}
