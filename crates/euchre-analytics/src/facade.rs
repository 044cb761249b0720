//! Store-backed reports.

use crate::{
    call_breakdown, call_frequency, caller_stats, euchre_ratio, hand_log, most_common_callers,
    player_records, score_progression, summary, team_records, CallStats, CallerStats, HandRow,
    PlayerRecord, ScorePoint, Summary, TeamCaller, TeamRecord,
};
use euchre_database::{DatabaseResult, Game, ScoreStore};
use serde::Serialize;
use tracing::debug;

/// Everything shown for a single game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameReport {
    pub game: Game,
    pub progression: Vec<ScorePoint>,
    pub calls: Vec<CallStats>,
    pub euchre_ratio: f64,
    pub hands: Vec<HandRow>,
}

/// Everything shown across all games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueReport {
    pub summary: Summary,
    pub teams: Vec<TeamRecord>,
    pub players: Vec<PlayerRecord>,
    pub calls: Vec<CallStats>,
    pub callers: Vec<CallerStats>,
    pub most_common_callers: Vec<TeamCaller>,
}

/// Reads records from a store and computes reports over them.
pub struct Analytics<'a, S: ScoreStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ScoreStore + ?Sized> Analytics<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Report for one game. `NotFound` if the game does not exist.
    pub fn game_report(&self, game_id: &str) -> DatabaseResult<GameReport> {
        let game = self.store.require_game(game_id)?;
        let hands = self.store.list_hands(game_id)?;
        debug!(game_id, hands = hands.len(), "Computing game report");

        Ok(GameReport {
            progression: score_progression(&game, &hands),
            calls: call_breakdown(&hands),
            euchre_ratio: euchre_ratio(&hands),
            hands: hand_log(&game, &hands),
            game,
        })
    }

    /// Report across every stored game.
    pub fn league_report(&self) -> DatabaseResult<LeagueReport> {
        let games = self.store.list_games(None)?;
        let hands = self.store.list_all_hands()?;
        debug!(games = games.len(), hands = hands.len(), "Computing league report");

        Ok(LeagueReport {
            summary: summary(&games, &hands),
            teams: team_records(&games),
            players: player_records(&games),
            calls: call_frequency(&hands),
            callers: caller_stats(&hands),
            most_common_callers: most_common_callers(&games, &hands),
        })
    }
}
