//! Database error types.

use euchre_scoring::ScoringError;
use thiserror::Error;

/// Database error type.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad user input, reported with the offending field
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Scoring precondition violated
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ScoringError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data error
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl DatabaseError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by what the user entered rather than by storage.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidInput(_) | Self::NotFound(_)
        )
    }
}

/// Result type alias using DatabaseError.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
