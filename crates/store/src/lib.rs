//! High score persistence.
//!
//! The game only ever stores one integer, under a fixed key. [`JsonFileStore`]
//! keeps it in a small JSON object on disk so other keys written by future
//! versions survive a save; [`MemoryStore`] is the in-process stand-in used by
//! tests and by runs with persistence disabled.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

/// Key under which the high score is stored.
pub const HIGH_SCORE_KEY: &str = "shrinktris.high_score";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value persistence for the high score.
pub trait HighScoreStore {
    /// Stored high score, 0 when nothing has been stored yet.
    fn load(&self) -> u32;

    /// Persist `score` if it beats the stored value.
    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

/// High score kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u32,
}

impl MemoryStore {
    pub fn new(high_score: u32) -> Self {
        Self { high_score }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.high_score
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        self.high_score = self.high_score.max(score);
        Ok(())
    }
}

/// High score stored in a JSON object file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, serde_json::Value>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> u32 {
        match self.read_entries() {
            Ok(entries) => entries
                .get(HIGH_SCORE_KEY)
                .and_then(|v| v.as_u64())
                .map(|v| v.min(u32::MAX as u64) as u32)
                .unwrap_or(0),
            Err(e) => {
                warn!("ignoring unreadable high score file {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking every future save.
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StoreError::Json(e)) => {
                warn!("replacing corrupt high score file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        let stored = entries
            .get(HIGH_SCORE_KEY)
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        if u64::from(score) <= stored {
            return Ok(());
        }

        entries.insert(HIGH_SCORE_KEY.to_string(), score.into());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, text)?;

        debug!("saved high score {} to {}", score, self.path.display());
        Ok(())
    }
}
