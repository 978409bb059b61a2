use crate::model::{Catalog, Song, Timeline};
use crate::timeline::{build_timeline, TimelineError};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("song {0} not found in catalog")]
    SongNotFound(usize),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

pub fn load_catalog_path(path: &Path) -> Result<Catalog, CatalogError> {
    let data = std::fs::read(path).map_err(|e| CatalogError::Io(e.to_string()))?;
    load_catalog_bytes(&data)
}

pub fn load_catalog_bytes(data: &[u8]) -> Result<Catalog, CatalogError> {
    serde_json::from_slice(data).map_err(|e| CatalogError::Parse(e.to_string()))
}

impl Catalog {
    pub fn song(&self, index: usize) -> Result<&Song, CatalogError> {
        self.songs.get(index).ok_or(CatalogError::SongNotFound(index))
    }

    /// Looks up a song and builds its timeline in one step.
    pub fn timeline_for(&self, index: usize) -> Result<(&Song, Timeline), CatalogError> {
        let song = self.song(index)?;
        let timeline = build_timeline(&song.entries)?;
        Ok((song, timeline))
    }
}
