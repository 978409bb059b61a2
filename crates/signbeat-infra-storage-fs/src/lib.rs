use parking_lot::Mutex;
use signbeat_ports::leaderboard::{LeaderboardEntry, LeaderboardPort};
use signbeat_ports::storage::{
    read_json_file, write_json_file, GameSettings, StorageError, StoragePort,
};
use std::path::{Path, PathBuf};

/// Settings and leaderboard as pretty JSON files under one base directory.
pub struct FsStorage {
    base_dir: PathBuf,
    // Serializes leaderboard read-modify-write cycles.
    leaderboard_lock: Mutex<()>,
}

impl FsStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            leaderboard_lock: Mutex::new(()),
        }
    }

    pub fn default_base_dir() -> Result<PathBuf, StorageError> {
        let base = dirs_next::config_dir()
            .ok_or_else(|| StorageError::Io("config dir not found".to_string()))?;
        Ok(base.join("signbeat"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn settings_path(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    fn leaderboard_path(&self) -> PathBuf {
        self.base_dir.join("leaderboard.json")
    }

    fn load_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let path = self.leaderboard_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json_file(&path)
    }
}

impl Default for FsStorage {
    fn default() -> Self {
        let base_dir = Self::default_base_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(base_dir)
    }
}

impl StoragePort for FsStorage {
    fn load_settings(&self) -> Result<GameSettings, StorageError> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(GameSettings::default());
        }
        read_json_file(&path)
    }

    fn save_settings(&self, s: &GameSettings) -> Result<(), StorageError> {
        let path = self.settings_path();
        write_json_file(&path, s)
    }
}

impl LeaderboardPort for FsStorage {
    fn submit(&self, entry: LeaderboardEntry) -> Result<(), StorageError> {
        let _guard = self.leaderboard_lock.lock();
        let mut entries = self.load_entries()?;
        entries.push(entry);
        // Stable: earlier submissions win ties.
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        write_json_file(&self.leaderboard_path(), &entries)?;
        tracing::debug!(entries = entries.len(), "leaderboard saved");
        Ok(())
    }

    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let _guard = self.leaderboard_lock.lock();
        let mut entries = self.load_entries()?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }
}
