//! Scoring rules for Euchre games.
//!
//! Everything in this crate is pure: functions take a [`GameState`] and a
//! [`HandInput`] and return the next state. Persistence is the caller's job.
//!
//! ```ignore
//! let state = GameState::new("Hearts", "Spades", 32);
//! let outcome = apply_hand(&state, &input, FinishPolicy::default())?;
//! assert_eq!(outcome.state.scores, [4, 0]);
//! ```

mod engine;
mod error;
mod types;

pub use engine::{apply_hand, replay, settle, FinishPolicy, HandInput, HandOutcome};
pub use error::{ScoringError, ScoringResult};
pub use types::{CallValue, GameState, GameStatus, Team, DEFAULT_TARGET_SCORE};
