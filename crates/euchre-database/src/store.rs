//! Store trait definitions.

use crate::{DatabaseResult, Game, Hand, NewGame, NewHand};
use euchre_scoring::GameStatus;

/// The game/hand store every caller is handed explicitly.
///
/// Implemented by [`crate::Database`] and by wrappers that add behaviour
/// around writes (such as remote mirroring).
pub trait ScoreStore {
    /// Create a game and return the stored record.
    fn create_game(&self, game: &NewGame) -> DatabaseResult<Game>;

    /// Score and append a hand. The hand and the updated game totals are
    /// written together or not at all.
    fn append_hand(&self, game_id: &str, hand: &NewHand) -> DatabaseResult<Hand>;

    /// Remove the most recent hand and restore the previous totals.
    /// Returns the removed hand, or `None` if the game had no hands.
    fn undo_last_hand(&self, game_id: &str) -> DatabaseResult<Option<Hand>>;

    /// Delete a game and all of its hands.
    fn delete_game(&self, game_id: &str) -> DatabaseResult<bool>;

    /// Get a game by ID.
    fn get_game(&self, game_id: &str) -> DatabaseResult<Option<Game>>;

    /// List games newest first, optionally filtered by status.
    fn list_games(&self, status: Option<GameStatus>) -> DatabaseResult<Vec<Game>>;

    /// List a game's hands in sequence order.
    fn list_hands(&self, game_id: &str) -> DatabaseResult<Vec<Hand>>;

    /// List every hand across all games, oldest game first.
    fn list_all_hands(&self) -> DatabaseResult<Vec<Hand>>;

    /// Serialized copy of the whole store.
    fn snapshot(&self) -> DatabaseResult<Vec<u8>>;

    /// Get a game, failing with `NotFound` if it does not exist.
    fn require_game(&self, game_id: &str) -> DatabaseResult<Game> {
        self.get_game(game_id)?
            .ok_or_else(|| crate::DatabaseError::NotFound(format!("game {}", game_id)))
    }
}
