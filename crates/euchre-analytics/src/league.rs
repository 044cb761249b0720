//! Cross-game records: players, teams, callers, and overall totals.
//!
//! Win/loss records only count completed games. A completed game without a
//! winner is a tie and counts as neither.

use crate::{call_frequency, mean, ratio};
use euchre_database::{Game, Hand};
use euchre_scoring::{CallValue, GameStatus, Team};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Loss,
    Tie,
}

fn result_for(game: &Game, team: Team) -> Outcome {
    match game.winner {
        Some(winner) if winner == team => Outcome::Win,
        Some(_) => Outcome::Loss,
        None => Outcome::Tie,
    }
}

fn completed(games: &[Game]) -> impl Iterator<Item = &Game> {
    games.iter().filter(|g| g.status == GameStatus::Completed)
}

#[derive(Debug, Default)]
struct Record {
    games: usize,
    wins: usize,
    losses: usize,
    ties: usize,
    points_for: i64,
    points_against: i64,
}

impl Record {
    fn add(&mut self, game: &Game, team: Team) {
        self.games += 1;
        match result_for(game, team) {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
        self.points_for += game.score(team);
        self.points_against += game.score(team.other());
    }

    fn margin_total(&self) -> i64 {
        self.points_for - self.points_against
    }
}

/// A player's results over completed games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub player: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    /// Mean of (own team score - opponent score).
    pub average_margin: f64,
}

/// Per-player records, most wins first, then by name.
pub fn player_records(games: &[Game]) -> Vec<PlayerRecord> {
    let mut records: BTreeMap<&str, Record> = BTreeMap::new();
    for game in completed(games) {
        for team in Team::ALL {
            for player in game.players(team) {
                records.entry(player.as_str()).or_default().add(game, team);
            }
        }
    }

    let mut out: Vec<PlayerRecord> = records
        .into_iter()
        .map(|(player, r)| PlayerRecord {
            player: player.to_string(),
            games: r.games,
            wins: r.wins,
            losses: r.losses,
            ties: r.ties,
            average_margin: mean(r.margin_total(), r.games),
        })
        .collect();
    out.sort_by(|a, b| b.wins.cmp(&a.wins));
    out
}

/// A team's results over completed games, keyed by team name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecord {
    pub team: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub win_rate: f64,
    pub points_for: i64,
    pub points_against: i64,
    pub average_margin: f64,
    pub average_points: f64,
}

/// Per-team records, most wins first, then by name.
pub fn team_records(games: &[Game]) -> Vec<TeamRecord> {
    let mut records: BTreeMap<&str, Record> = BTreeMap::new();
    for game in completed(games) {
        for team in Team::ALL {
            records.entry(game.team_name(team)).or_default().add(game, team);
        }
    }

    let mut out: Vec<TeamRecord> = records
        .into_iter()
        .map(|(team, r)| TeamRecord {
            team: team.to_string(),
            games: r.games,
            wins: r.wins,
            losses: r.losses,
            ties: r.ties,
            win_rate: ratio(r.wins, r.games),
            points_for: r.points_for,
            points_against: r.points_against,
            average_margin: mean(r.margin_total(), r.games),
            average_points: mean(r.points_for, r.games),
        })
        .collect();
    out.sort_by(|a, b| b.wins.cmp(&a.wins));
    out
}

/// The player who called trump most often for a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamCaller {
    pub team: String,
    pub player: String,
    pub calls: usize,
}

/// Most frequent named caller per team name, ordered by team name.
///
/// Equal counts go to the alphabetically first player. Hands without a
/// caller name, or whose game is not in `games`, are skipped.
pub fn most_common_callers(games: &[Game], all_hands: &[Hand]) -> Vec<TeamCaller> {
    let by_id: HashMap<&str, &Game> = games.iter().map(|g| (g.id.as_str(), g)).collect();

    let mut counts: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for hand in all_hands {
        let (Some(caller), Some(game)) = (hand.caller_name.as_deref(), by_id.get(hand.game_id.as_str()))
        else {
            continue;
        };
        *counts
            .entry(game.team_name(hand.caller_team))
            .or_default()
            .entry(caller)
            .or_default() += 1;
    }

    counts
        .into_iter()
        .filter_map(|(team, players)| {
            let mut best: Option<(&str, usize)> = None;
            for (player, n) in players {
                if best.map_or(true, |(_, top)| n > top) {
                    best = Some((player, n));
                }
            }
            best.map(|(player, calls)| TeamCaller {
                team: team.to_string(),
                player: player.to_string(),
                calls,
            })
        })
        .collect()
}

/// How a player did when calling trump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallerStats {
    pub caller: String,
    pub hands_called: usize,
    pub points_scored: i64,
    pub points_lost: i64,
    pub net_points: i64,
    pub euchres: usize,
    pub euchre_rate: f64,
}

/// Per-caller statistics across all hands, best net first, then by name.
pub fn caller_stats(all_hands: &[Hand]) -> Vec<CallerStats> {
    #[derive(Default)]
    struct Tally {
        hands: usize,
        scored: i64,
        lost: i64,
        euchres: usize,
    }

    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for hand in all_hands {
        let Some(caller) = hand.caller_name.as_deref() else {
            continue;
        };
        let tally = tallies.entry(caller).or_default();
        tally.hands += 1;
        if hand.euchred {
            tally.lost += hand.points_scored;
            tally.euchres += 1;
        } else {
            tally.scored += hand.points_scored;
        }
    }

    let mut out: Vec<CallerStats> = tallies
        .into_iter()
        .map(|(caller, t)| CallerStats {
            caller: caller.to_string(),
            hands_called: t.hands,
            points_scored: t.scored,
            points_lost: t.lost,
            net_points: t.scored - t.lost,
            euchres: t.euchres,
            euchre_rate: ratio(t.euchres, t.hands),
        })
        .collect();
    out.sort_by(|a, b| b.net_points.cmp(&a.net_points));
    out
}

/// Overall totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_games: usize,
    pub active_games: usize,
    pub completed_games: usize,
    pub total_hands: usize,
    pub total_euchres: usize,
    pub most_common_call: Option<CallValue>,
}

pub fn summary(games: &[Game], all_hands: &[Hand]) -> Summary {
    Summary {
        total_games: games.len(),
        active_games: games.iter().filter(|g| g.status == GameStatus::Active).count(),
        completed_games: completed(games).count(),
        total_hands: all_hands.len(),
        total_euchres: all_hands.iter().filter(|h| h.euchred).count(),
        most_common_call: call_frequency(all_hands).into_iter().next().map(|s| s.call),
    }
}
