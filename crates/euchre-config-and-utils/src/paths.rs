//! File system paths for the application.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Directory name under the home directory.
const BASE_DIR_NAME: &str = ".euchre-stats";
/// Local store filename. Also the default remote object key.
const DATABASE_FILE_NAME: &str = "euchre_stats.sqlite";

/// Manages file system paths.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory (~/.euchre-stats)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.euchre-stats`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.euchre-stats).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.euchre-stats/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the local store path (~/.euchre-stats/euchre_stats.sqlite).
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join(DATABASE_FILE_NAME)
    }

    /// Ensure the base directory exists.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}
