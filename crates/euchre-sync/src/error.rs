//! Sync error types.
//!
//! None of these ever reach a caller of a store write; they are logged as
//! warnings and surfaced through [`crate::SyncOutcome`].

use thiserror::Error;

/// Remote mirror error type.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Transport failure (DNS, connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the object store
    #[error("Remote returned {status}: {body}")]
    Status { status: u16, body: String },

    /// No usable credentials, or a malformed key
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Token signing error
    #[error("Token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Mirror configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Downloaded snapshot is not a usable store
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Local store error while taking a snapshot
    #[error("Database error: {0}")]
    Database(#[from] euchre_database::DatabaseError),

    /// SQLite error while validating a snapshot
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using SyncError.
pub type SyncResult<T> = Result<T, SyncError>;
