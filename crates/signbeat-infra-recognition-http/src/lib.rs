//! Gesture recognition over HTTP.
//!
//! The recognizer service takes one still frame per request and answers with
//! the label it sees. A frame with no hand in it is still a successful answer
//! (`"No hand"`), which simply never matches an expected sign.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::BoxFuture;
use signbeat_ports::recognition::{
    RecognitionError, RecognitionPort, RecognitionRequest, RecognitionResponse,
};
use signbeat_ports::types::Frame;
use std::time::Duration;

pub const NO_HAND_LABEL: &str = "No hand";

pub struct HttpRecognizer {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpRecognizer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RecognitionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("signbeat/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request body for one frame.
    pub fn request_for(frame: &Frame) -> RecognitionRequest {
        RecognitionRequest {
            base64_image: STANDARD.encode(frame.as_bytes()),
        }
    }

    async fn post_frame(&self, frame: Frame) -> Result<String, RecognitionError> {
        let body = Self::request_for(&frame);

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Status(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;
        let parsed: RecognitionResponse =
            serde_json::from_slice(&bytes).map_err(|e| RecognitionError::Parse(e.to_string()))?;

        tracing::trace!(gesture = %parsed.gesture, frame = ?frame, "frame recognized");
        Ok(parsed.gesture)
    }
}

impl RecognitionPort for HttpRecognizer {
    fn recognize(&self, frame: Frame) -> BoxFuture<'_, Result<String, RecognitionError>> {
        Box::pin(self.post_frame(frame))
    }
}
