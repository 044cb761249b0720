//! SQLite persistence for Euchre games and hands.
//!
//! This crate provides:
//! - The [`ScoreStore`] trait, the store interface every caller goes through
//! - [`Database`], a single-connection SQLite implementation
//! - Schema migrations
//! - Model types for both tables
//! - Query helpers usable inside a transaction
//!
//! ```ignore
//! let db = Database::open(&paths.database_file())?;
//! let game = db.create_game(&NewGame::new("Hearts", "Spades"))?;
//! let hand = db.append_hand(&game.id, &NewHand::new("Hearts", CallValue::Tricks(4), 4))?;
//! ```
//!
//! Writes that touch more than one row run in a single transaction; a failed
//! write leaves the store unchanged.

mod db;
mod error;
mod migrations;
mod models;
pub mod queries;
mod store;

pub use db::Database;
pub use error::{DatabaseError, DatabaseResult};
pub use migrations::{run_migrations, CURRENT_VERSION};
pub use models::*;
pub use store::ScoreStore;
