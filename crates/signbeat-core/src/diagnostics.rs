use crate::session::SessionSummary;
use serde_json::json;
use signbeat_ports::storage::{write_json_file, GameSettings, StorageError};
use std::path::Path;

/// Writes a post-game report directory: version, platform, settings and the
/// per-event session summary.
pub fn export_report(
    dir: &Path,
    settings: &GameSettings,
    summary: &SessionSummary,
) -> Result<(), StorageError> {
    write_json_file(
        &dir.join("app_version.json"),
        &json!({ "name": "signbeat", "version": env!("CARGO_PKG_VERSION") }),
    )?;
    write_json_file(
        &dir.join("platform.json"),
        &json!({ "os": std::env::consts::OS, "arch": std::env::consts::ARCH }),
    )?;
    write_json_file(&dir.join("settings.json"), settings)?;
    write_json_file(&dir.join("session_summary.json"), summary)?;

    tracing::debug!(dir = %dir.display(), events = summary.events.len(), "session report written");
    Ok(())
}
