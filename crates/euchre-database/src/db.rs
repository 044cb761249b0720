//! Database connection and store operations.

use crate::{
    migrations, queries, DatabaseError, DatabaseResult, Game, Hand, NewGame, NewHand, ScoreStore,
};
use chrono::Utc;
use euchre_scoring::{apply_hand, settle, CallValue, FinishPolicy, GameStatus};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// SQLite-backed [`ScoreStore`] holding a single connection.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
    finish_policy: FinishPolicy,
}

impl Database {
    /// Open a database at the given path, running migrations if needed.
    pub fn open(path: &Path) -> DatabaseResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        migrations::run_migrations(&conn)?;

        info!(path = %path.display(), "Database opened");

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            finish_policy: FinishPolicy::default(),
        })
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            path: None,
            finish_policy: FinishPolicy::default(),
        })
    }

    /// Use `policy` to settle hands after which both teams reached the target.
    pub fn with_finish_policy(mut self, policy: FinishPolicy) -> Self {
        self.finish_policy = policy;
        self
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// File backing this database; `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn validate_hand(game: &Game, hand: &NewHand, caller: euchre_scoring::Team) -> DatabaseResult<()> {
        if let CallValue::Custom(text) = &hand.call_value {
            if text.trim().is_empty() {
                return Err(DatabaseError::validation("call_value", "must not be empty"));
            }
        }

        let Some(name) = clean_text(&hand.caller_name) else {
            return Ok(());
        };
        if game.all_players().is_empty() {
            return Ok(());
        }
        match game.player_team(&name) {
            Some(team) if team == caller => Ok(()),
            Some(team) => Err(DatabaseError::validation(
                "caller_name",
                format!("{} plays for {}", name, game.team_name(team)),
            )),
            None => Err(DatabaseError::validation(
                "caller_name",
                format!("{} is not a player in this game", name),
            )),
        }
    }
}

impl ScoreStore for Database {
    fn create_game(&self, game: &NewGame) -> DatabaseResult<Game> {
        let input = game.validated()?;
        let record = Game {
            id: Uuid::new_v4().to_string(),
            team1_name: input.team1_name,
            team2_name: input.team2_name,
            team1_players: input.team1_players,
            team2_players: input.team2_players,
            team1_score: 0,
            team2_score: 0,
            target_score: input.target_score.unwrap_or(euchre_scoring::DEFAULT_TARGET_SCORE),
            status: GameStatus::Active,
            winner: None,
            created_at: Utc::now(),
            finished_at: None,
        };

        queries::insert_game(&self.conn, &record)?;

        info!(
            game_id = %record.id,
            team1 = %record.team1_name,
            team2 = %record.team2_name,
            target_score = record.target_score,
            "Game created"
        );
        Ok(record)
    }

    fn append_hand(&self, game_id: &str, hand: &NewHand) -> DatabaseResult<Hand> {
        let tx = self.conn.unchecked_transaction()?;

        let game = queries::get_game(&tx, game_id)?
            .ok_or_else(|| DatabaseError::NotFound(format!("game {}", game_id)))?;
        if !game.is_active() {
            return Err(DatabaseError::validation(
                "game_id",
                format!("game {} is already completed", game_id),
            ));
        }

        let outcome = apply_hand(&game.state(), &hand.input(), self.finish_policy)?;
        Self::validate_hand(&game, hand, outcome.caller)?;

        let record = Hand {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            hand_number: queries::next_hand_number(&tx, game_id)?,
            caller_name: clean_text(&hand.caller_name),
            caller_team: outcome.caller,
            call_value: hand.call_value.normalized(),
            points_scored: hand.points_scored,
            euchred: hand.euchred,
            euchre_points: outcome.euchre_points,
            team1_delta: outcome.deltas[0],
            team2_delta: outcome.deltas[1],
            team1_cumulative: outcome.state.scores[0],
            team2_cumulative: outcome.state.scores[1],
            notes: clean_text(&hand.notes),
            created_at: Utc::now(),
        };

        queries::insert_hand(&tx, &record)?;
        queries::update_game_state(&tx, game_id, &outcome.state)?;
        tx.commit()?;

        debug!(
            game_id,
            hand_number = record.hand_number,
            team1 = record.team1_cumulative,
            team2 = record.team2_cumulative,
            "Hand appended"
        );
        if outcome.state.is_completed() {
            info!(
                game_id,
                winner = outcome.state.winner.map(|t| game.team_name(t).to_string()),
                team1 = record.team1_cumulative,
                team2 = record.team2_cumulative,
                "Game completed"
            );
        }

        Ok(record)
    }

    fn undo_last_hand(&self, game_id: &str) -> DatabaseResult<Option<Hand>> {
        let tx = self.conn.unchecked_transaction()?;

        let game = queries::get_game(&tx, game_id)?
            .ok_or_else(|| DatabaseError::NotFound(format!("game {}", game_id)))?;
        let latest = queries::latest_hands(&tx, game_id, 2)?;
        let Some(last) = latest.first().cloned() else {
            return Ok(None);
        };

        let mut state = game.state();
        state.scores = latest
            .get(1)
            .map(|prev| [prev.team1_cumulative, prev.team2_cumulative])
            .unwrap_or([0, 0]);
        settle(&mut state, self.finish_policy);

        queries::delete_hand(&tx, &last.id)?;
        queries::update_game_state(&tx, game_id, &state)?;
        tx.commit()?;

        info!(
            game_id,
            hand_number = last.hand_number,
            reopened = !game.is_active() && state.status == GameStatus::Active,
            "Last hand undone"
        );
        Ok(Some(last))
    }

    fn delete_game(&self, game_id: &str) -> DatabaseResult<bool> {
        let deleted = queries::delete_game(&self.conn, game_id)?;
        if deleted {
            info!(game_id, "Game deleted");
        }
        Ok(deleted)
    }

    fn get_game(&self, game_id: &str) -> DatabaseResult<Option<Game>> {
        queries::get_game(&self.conn, game_id)
    }

    fn list_games(&self, status: Option<GameStatus>) -> DatabaseResult<Vec<Game>> {
        queries::list_games(&self.conn, status)
    }

    fn list_hands(&self, game_id: &str) -> DatabaseResult<Vec<Hand>> {
        queries::list_hands(&self.conn, game_id)
    }

    fn list_all_hands(&self) -> DatabaseResult<Vec<Hand>> {
        queries::list_all_hands(&self.conn)
    }

    fn snapshot(&self) -> DatabaseResult<Vec<u8>> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("snapshot.sqlite");
        self.conn.execute(
            "VACUUM INTO ?1",
            params![target.to_string_lossy().into_owned()],
        )?;
        let bytes = std::fs::read(&target)?;
        debug!(bytes = bytes.len(), "Snapshot taken");
        Ok(bytes)
    }
}

fn clean_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
