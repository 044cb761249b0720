//! Scoring error types.

use thiserror::Error;

/// Precondition violations raised by the scoring engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// The caller team matches neither configured team.
    #[error("Unknown caller team: {0}")]
    UnknownTeam(String),

    /// Points scored must not be negative.
    #[error("Points scored must be non-negative, got {0}")]
    NegativePoints(i64),

    /// Euchre points must not be negative.
    #[error("Euchre points must be non-negative, got {0}")]
    NegativeEuchrePoints(i64),

    /// Euchre points were given for a hand that was not euchred.
    #[error("Euchre points are only allowed on euchred hands")]
    UnexpectedEuchrePoints,

    /// The game already reached its target score.
    #[error("Game is already completed")]
    GameCompleted,
}

/// Result type alias using ScoringError.
pub type ScoringResult<T> = Result<T, ScoringError>;
