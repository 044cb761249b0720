//! Configuration, paths, and logging shared by the Euchre Stats crates.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, SyncConfig, DEFAULT_LOG_LEVEL, DEFAULT_OBJECT_KEY, DEFAULT_SYNC_TIMEOUT_SECS,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level, LogFormat};
pub use paths::Paths;
