//! Configuration management.

use crate::{CoreError, CoreResult, LogFormat, Paths};
use euchre_scoring::{FinishPolicy, DEFAULT_TARGET_SCORE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default object key for the remote snapshot.
pub const DEFAULT_OBJECT_KEY: &str = "euchre_stats.sqlite";

/// Default timeout for remote mirror requests.
pub const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 10;

/// Remote mirror settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Bucket holding the snapshot.
    pub bucket: String,
    /// Object key of the snapshot within the bucket.
    #[serde(default = "default_object_key")]
    pub object_key: String,
    /// Service-account key file. Falls back to ambient credentials when unset.
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
    /// Request timeout in seconds.
    #[serde(default = "default_sync_timeout_secs")]
    pub timeout_secs: u64,
}

impl SyncConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            object_key: default_object_key(),
            credentials_file: None,
            timeout_secs: DEFAULT_SYNC_TIMEOUT_SECS,
        }
    }
}

fn default_object_key() -> String {
    DEFAULT_OBJECT_KEY.to_string()
}

fn default_sync_timeout_secs() -> u64 {
    DEFAULT_SYNC_TIMEOUT_SECS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_target_score() -> i64 {
    DEFAULT_TARGET_SCORE
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
    /// Override for the local store location.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Target score used when a new game does not name one.
    #[serde(default = "default_target_score")]
    pub default_target_score: i64,
    /// Settlement rule when both teams finish on the same hand.
    #[serde(default)]
    pub finish_policy: FinishPolicy,
    /// Remote mirror; `None` keeps everything local.
    #[serde(default)]
    pub sync: Option<SyncConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::default(),
            database_path: None,
            default_target_score: DEFAULT_TARGET_SCORE,
            finish_policy: FinishPolicy::default(),
            sync: None,
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    ///
    /// `EUCHRE_GCS_BUCKET` enables the mirror even without a config file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).and_then(non_empty);

        if let Some(level) = lookup("EUCHRE_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(path) = lookup("EUCHRE_DATABASE_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(bucket) = lookup("EUCHRE_GCS_BUCKET") {
            match self.sync.as_mut() {
                Some(sync) => sync.bucket = bucket,
                None => self.sync = Some(SyncConfig::new(bucket)),
            }
        }
        if let Some(sync) = self.sync.as_mut() {
            if let Some(key) = lookup("EUCHRE_GCS_OBJECT") {
                sync.object_key = key;
            }
            if sync.credentials_file.is_none() {
                sync.credentials_file =
                    lookup("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from);
            }
        }
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.default_target_score <= 0 {
            return Err(CoreError::Config(format!(
                "default_target_score must be positive, got {}",
                self.default_target_score
            )));
        }
        if let Some(sync) = &self.sync {
            if sync.bucket.trim().is_empty() {
                return Err(CoreError::Config("sync.bucket must not be empty".to_string()));
            }
            if sync.object_key.trim().is_empty() {
                return Err(CoreError::Config(
                    "sync.object_key must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Local store location, honouring the override.
    pub fn database_file(&self, paths: &Paths) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| paths.database_file())
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
