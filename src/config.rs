//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const HIGHSCORE_FILE: &str = "highscore.json";

/// Settings for one run of the game binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Piece sequence seed; `None` means derive one from the clock.
    pub seed: Option<u32>,
    pub highscore_path: PathBuf,
    pub log_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = non_empty("SHRINKTRIS_SEED").and_then(|s| s.parse().ok());

        let highscore_path = non_empty("SHRINKTRIS_HIGHSCORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_highscore_path(&non_empty));

        let log_path = non_empty("SHRINKTRIS_LOG_PATH").map(PathBuf::from);

        Self {
            seed,
            highscore_path,
            log_path,
        }
    }

    /// Configured seed, or one taken from the system clock.
    pub fn seed_or_clock(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u32 ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }
}

fn default_highscore_path(var: &impl Fn(&str) -> Option<String>) -> PathBuf {
    let data_dir = var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".local").join("share")));

    match data_dir {
        Some(dir) => dir.join("shrinktris").join(HIGHSCORE_FILE),
        None => PathBuf::from(HIGHSCORE_FILE),
    }
}
