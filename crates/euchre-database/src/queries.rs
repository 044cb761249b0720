//! Standalone query functions that work with any Connection.
//!
//! Each function takes a `&Connection` as its first parameter, so they run
//! unchanged inside a `Transaction`.

use crate::{DatabaseError, DatabaseResult, Game, Hand};
use chrono::{DateTime, SecondsFormat, Utc};
use euchre_scoring::{CallValue, GameState, GameStatus, Team};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

const GAME_COLUMNS: &str = "id, team1_name, team2_name, team1_players, team2_players, team1_score, team2_score, target_score, status, winner, created_at, finished_at";

const HAND_COLUMNS: &str = "id, game_id, hand_number, caller_name, caller_team, call_value, points_scored, euchred, euchre_points, team1_delta, team2_delta, team1_cumulative, team2_cumulative, notes, created_at";

// ==========================================
// Games
// ==========================================

/// Insert a game row.
pub fn insert_game(conn: &Connection, game: &Game) -> DatabaseResult<()> {
    conn.execute(
        "INSERT INTO games (id, team1_name, team2_name, team1_players, team2_players, team1_score, team2_score, target_score, status, winner, created_at, finished_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            game.id,
            game.team1_name,
            game.team2_name,
            serde_json::to_string(&game.team1_players)?,
            serde_json::to_string(&game.team2_players)?,
            game.team1_score,
            game.team2_score,
            game.target_score,
            game.status.as_str(),
            game.winner.map(|t| t.as_str()),
            format_datetime(&game.created_at),
            game.finished_at.as_ref().map(format_datetime),
        ],
    )?;
    Ok(())
}

/// Get a game by ID.
pub fn get_game(conn: &Connection, id: &str) -> DatabaseResult<Option<Game>> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {} FROM games WHERE id = ?1", GAME_COLUMNS))?;
    let game = stmt.query_row(params![id], game_from_row).optional()?;
    Ok(game)
}

/// List games, newest first, optionally filtered by status.
pub fn list_games(conn: &Connection, status: Option<GameStatus>) -> DatabaseResult<Vec<Game>> {
    let games = match status {
        Some(status) => {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {} FROM games WHERE status = ?1 ORDER BY created_at DESC, rowid DESC",
                GAME_COLUMNS
            ))?;
            let rows = stmt.query_map(params![status.as_str()], game_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {} FROM games ORDER BY created_at DESC, rowid DESC",
                GAME_COLUMNS
            ))?;
            let rows = stmt.query_map([], game_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(games)
}

/// Write scores, status and winner from `state`.
///
/// `finished_at` is stamped when the game completes and cleared when it is
/// reopened. Returns false when the game does not exist.
pub fn update_game_state(conn: &Connection, id: &str, state: &GameState) -> DatabaseResult<bool> {
    let finished_at = match state.status {
        GameStatus::Completed => Some(format_datetime(&Utc::now())),
        GameStatus::Active => None,
    };
    let count = conn.execute(
        "UPDATE games SET team1_score = ?1, team2_score = ?2, status = ?3, winner = ?4,
             finished_at = CASE WHEN ?3 = 'completed' THEN COALESCE(finished_at, ?5) ELSE NULL END
         WHERE id = ?6",
        params![
            state.scores[0],
            state.scores[1],
            state.status.as_str(),
            state.winner.map(|t| t.as_str()),
            finished_at,
            id,
        ],
    )?;
    Ok(count > 0)
}

/// Delete a game. Hands go with it through the foreign key.
pub fn delete_game(conn: &Connection, id: &str) -> DatabaseResult<bool> {
    let count = conn.execute("DELETE FROM games WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ==========================================
// Hands
// ==========================================

/// Insert a hand row.
pub fn insert_hand(conn: &Connection, hand: &Hand) -> DatabaseResult<()> {
    conn.execute(
        "INSERT INTO hands (id, game_id, hand_number, caller_name, caller_team, call_value, points_scored, euchred, euchre_points, team1_delta, team2_delta, team1_cumulative, team2_cumulative, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            hand.id,
            hand.game_id,
            hand.hand_number,
            hand.caller_name,
            hand.caller_team.as_str(),
            hand.call_value.to_string(),
            hand.points_scored,
            hand.euchred,
            hand.euchre_points,
            hand.team1_delta,
            hand.team2_delta,
            hand.team1_cumulative,
            hand.team2_cumulative,
            hand.notes,
            format_datetime(&hand.created_at),
        ],
    )?;
    Ok(())
}

/// Next sequence number for a game (1 for the first hand).
pub fn next_hand_number(conn: &Connection, game_id: &str) -> DatabaseResult<i64> {
    let max: i64 = conn.query_row(
        "SELECT COALESCE(MAX(hand_number), 0) FROM hands WHERE game_id = ?1",
        params![game_id],
        |row| row.get(0),
    )?;
    Ok(max + 1)
}

/// List hands for a game ordered by sequence number.
pub fn list_hands(conn: &Connection, game_id: &str) -> DatabaseResult<Vec<Hand>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM hands WHERE game_id = ?1 ORDER BY hand_number ASC",
        HAND_COLUMNS
    ))?;
    let hands = stmt
        .query_map(params![game_id], hand_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(hands)
}

/// List every hand, games in creation order, each game's hands in sequence order.
pub fn list_all_hands(conn: &Connection) -> DatabaseResult<Vec<Hand>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM hands
         ORDER BY (SELECT g.created_at FROM games g WHERE g.id = hands.game_id) ASC,
                  (SELECT g.rowid FROM games g WHERE g.id = hands.game_id) ASC,
                  hand_number ASC",
        HAND_COLUMNS
    ))?;
    let hands = stmt
        .query_map([], hand_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(hands)
}

/// The most recent `limit` hands of a game, newest first.
pub fn latest_hands(conn: &Connection, game_id: &str, limit: usize) -> DatabaseResult<Vec<Hand>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM hands WHERE game_id = ?1 ORDER BY hand_number DESC LIMIT ?2",
        HAND_COLUMNS
    ))?;
    let hands = stmt
        .query_map(params![game_id, limit as i64], hand_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(hands)
}

/// Delete a single hand by ID.
pub fn delete_hand(conn: &Connection, id: &str) -> DatabaseResult<bool> {
    let count = conn.execute("DELETE FROM hands WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ==========================================
// Row mapping
// ==========================================

fn game_from_row(row: &Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        team1_name: row.get(1)?,
        team2_name: row.get(2)?,
        team1_players: parse_players(3, row.get(3)?)?,
        team2_players: parse_players(4, row.get(4)?)?,
        team1_score: row.get(5)?,
        team2_score: row.get(6)?,
        target_score: row.get(7)?,
        status: GameStatus::from_str(&row.get::<_, String>(8)?),
        winner: row
            .get::<_, Option<String>>(9)?
            .map(|key| parse_team(9, &key))
            .transpose()?,
        created_at: parse_datetime(10, row.get(10)?)?,
        finished_at: row
            .get::<_, Option<String>>(11)?
            .map(|s| parse_datetime(11, s))
            .transpose()?,
    })
}

fn hand_from_row(row: &Row<'_>) -> rusqlite::Result<Hand> {
    Ok(Hand {
        id: row.get(0)?,
        game_id: row.get(1)?,
        hand_number: row.get(2)?,
        caller_name: row.get(3)?,
        caller_team: parse_team(4, &row.get::<_, String>(4)?)?,
        call_value: CallValue::parse(&row.get::<_, String>(5)?),
        points_scored: row.get(6)?,
        euchred: row.get(7)?,
        euchre_points: row.get(8)?,
        team1_delta: row.get(9)?,
        team2_delta: row.get(10)?,
        team1_cumulative: row.get(11)?,
        team2_cumulative: row.get(12)?,
        notes: row.get(13)?,
        created_at: parse_datetime(14, row.get(14)?)?,
    })
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_players(idx: usize, raw: String) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn parse_team(idx: usize, key: &str) -> rusqlite::Result<Team> {
    Team::from_key(key)
        .ok_or_else(|| conversion_error(idx, DatabaseError::InvalidData(format!("unknown team '{}'", key))))
}

/// Fixed-width RFC 3339 so stored timestamps sort lexically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_datetime(idx: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}
