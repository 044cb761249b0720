//! Database migrations.
//!
//! Migrations are run in order and tracked in the `migrations` table.

use crate::DatabaseResult;
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> DatabaseResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM migrations",
        [],
        |row| row.get(0),
    )?;

    if current_version >= CURRENT_VERSION {
        debug!(current_version, "Schema up to date");
        return Ok(());
    }

    info!(current_version, target_version = CURRENT_VERSION, "Running migrations");

    if current_version < 1 {
        migrate_v1_initial_schema(conn)?;
    }
    if current_version < 2 {
        migrate_v2_hand_sequence_unique(conn)?;
    }

    info!("Migrations complete");
    Ok(())
}

fn record_migration(conn: &Connection, version: i32, name: &str) -> DatabaseResult<()> {
    conn.execute(
        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
        rusqlite::params![version, name],
    )?;
    debug!(version, name, "Migration applied");
    Ok(())
}

/// V1: games and hands.
fn migrate_v1_initial_schema(conn: &Connection) -> DatabaseResult<()> {
    info!("Applying migration v1: initial schema");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS games (
            id TEXT PRIMARY KEY,
            team1_name TEXT NOT NULL,
            team2_name TEXT NOT NULL,
            team1_players TEXT NOT NULL DEFAULT '[]',
            team2_players TEXT NOT NULL DEFAULT '[]',
            team1_score INTEGER NOT NULL DEFAULT 0,
            team2_score INTEGER NOT NULL DEFAULT 0,
            target_score INTEGER NOT NULL DEFAULT 32,
            status TEXT NOT NULL DEFAULT 'active',
            winner TEXT,
            created_at TEXT NOT NULL,
            finished_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_games_status
            ON games(status);
        CREATE INDEX IF NOT EXISTS idx_games_created_at
            ON games(created_at);
        ",
    )?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS hands (
            id TEXT PRIMARY KEY,
            game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
            hand_number INTEGER NOT NULL,
            caller_name TEXT,
            caller_team TEXT NOT NULL,
            call_value TEXT NOT NULL,
            points_scored INTEGER NOT NULL,
            euchred INTEGER NOT NULL DEFAULT 0,
            euchre_points INTEGER,
            team1_delta INTEGER NOT NULL,
            team2_delta INTEGER NOT NULL,
            team1_cumulative INTEGER NOT NULL,
            team2_cumulative INTEGER NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_hands_game_id
            ON hands(game_id);
        ",
    )?;

    record_migration(conn, 1, "initial_schema")?;
    Ok(())
}

/// V2: one hand per sequence number within a game.
fn migrate_v2_hand_sequence_unique(conn: &Connection) -> DatabaseResult<()> {
    info!("Applying migration v2: unique hand sequence");

    conn.execute_batch(
        "
        DROP INDEX IF EXISTS idx_hands_game_id;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_hands_game_seq
            ON hands(game_id, hand_number);
        ",
    )?;

    record_migration(conn, 2, "hand_sequence_unique")?;
    Ok(())
}
