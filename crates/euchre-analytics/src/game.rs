//! Per-game views: score progression, euchre ratio, and the hand log.

use crate::ratio;
use euchre_database::{Game, Hand};
use euchre_scoring::CallValue;
use serde::Serialize;

/// Cumulative scores after `hand_number` hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScorePoint {
    pub hand_number: i64,
    pub team1: i64,
    pub team2: i64,
}

/// Score series for charting, starting from `(0, 0, 0)`.
///
/// Hands from other games are ignored; the rest are ordered by hand number.
pub fn score_progression(game: &Game, hands: &[Hand]) -> Vec<ScorePoint> {
    let mut own: Vec<&Hand> = hands.iter().filter(|h| h.game_id == game.id).collect();
    own.sort_by_key(|h| h.hand_number);

    std::iter::once(ScorePoint {
        hand_number: 0,
        team1: 0,
        team2: 0,
    })
    .chain(own.into_iter().map(|h| ScorePoint {
        hand_number: h.hand_number,
        team1: h.team1_cumulative,
        team2: h.team2_cumulative,
    }))
    .collect()
}

/// Fraction of hands where the caller was euchred; 0.0 with no hands.
pub fn euchre_ratio(hands: &[Hand]) -> f64 {
    ratio(hands.iter().filter(|h| h.euchred).count(), hands.len())
}

/// One display row of the hand log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandRow {
    pub hand_number: i64,
    pub caller: Option<String>,
    pub team: String,
    pub call: CallValue,
    pub result: String,
    pub team1_score: i64,
    pub team2_score: i64,
    pub notes: String,
}

/// Display rows for a game's hands, in hand order.
pub fn hand_log(game: &Game, hands: &[Hand]) -> Vec<HandRow> {
    let mut own: Vec<&Hand> = hands.iter().filter(|h| h.game_id == game.id).collect();
    own.sort_by_key(|h| h.hand_number);

    own.into_iter()
        .map(|h| {
            let defenders = game.team_name(h.caller_team.other());
            let result = if h.euchred {
                format!(
                    "Euchred! Lost {}, {} +{}",
                    h.points_scored,
                    defenders,
                    h.euchre_points.unwrap_or(0)
                )
            } else {
                format!("+{}", h.points_scored)
            };
            HandRow {
                hand_number: h.hand_number,
                caller: h.caller_name.clone(),
                team: game.team_name(h.caller_team).to_string(),
                call: h.call_value.clone(),
                result,
                team1_score: h.team1_cumulative,
                team2_score: h.team2_cumulative,
                notes: h.notes.clone().unwrap_or_default(),
            }
        })
        .collect()
}
