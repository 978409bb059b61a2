use crate::types::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_recognizer_url() -> String {
    "http://127.0.0.1:8000/process-image".to_string()
}

fn default_recognizer_timeout_ms() -> u64 {
    5_000
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_end_slack_ms() -> Millis {
    500
}

fn default_feedback_display_ms() -> u64 {
    1_000
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    #[serde(default = "default_recognizer_url")]
    pub recognizer_url: String,
    #[serde(default = "default_recognizer_timeout_ms")]
    pub recognizer_timeout_ms: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_end_slack_ms")]
    pub end_slack_ms: Millis,
    #[serde(default = "default_feedback_display_ms")]
    pub feedback_display_ms: u64,
    pub windows: WindowConfig,
    pub last_player_name: Option<String>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            recognizer_url: default_recognizer_url(),
            recognizer_timeout_ms: default_recognizer_timeout_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            end_slack_ms: default_end_slack_ms(),
            feedback_display_ms: default_feedback_display_ms(),
            windows: WindowConfig::default(),
            last_player_name: None,
        }
    }
}

pub trait StoragePort: Send + Sync {
    fn load_settings(&self) -> Result<GameSettings, StorageError>;
    fn save_settings(&self, s: &GameSettings) -> Result<(), StorageError>;
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let data = fs::read(path).map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))?;
    serde_json::from_slice(&data).map_err(|e| StorageError::Serde(e.to_string()))
}

/// Pretty-printed JSON; missing parent directories are created.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
    }
    let data = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serde(e.to_string()))?;
    fs::write(path, data).map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))
}
