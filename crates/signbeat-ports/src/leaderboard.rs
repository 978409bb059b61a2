use crate::storage::StorageError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}

pub trait LeaderboardPort: Send + Sync {
    fn submit(&self, entry: LeaderboardEntry) -> Result<(), StorageError>;
    /// Best `limit` entries, highest score first.
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StorageError>;
}
