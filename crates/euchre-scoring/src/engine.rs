//! Hand application and replay.

use crate::{CallValue, GameState, GameStatus, ScoringError, ScoringResult, Team};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How to settle a hand after which both teams sit at or above the target.
///
/// Under the standard rules only one team gains points per hand, so this only
/// matters for games whose target was lowered below an existing score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishPolicy {
    /// The higher score wins; equal scores are a tie.
    #[default]
    HigherScoreWins,
    /// Any simultaneous finish is recorded as a tie.
    DeclareTie,
}

/// A hand as entered by the user, before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandInput {
    /// Team name or storage key (`team1` / `team2`).
    pub caller_team: String,
    pub call_value: CallValue,
    pub points_scored: i64,
    pub euchred: bool,
    /// Points awarded to the defenders; defaults to `points_scored` when euchred.
    pub euchre_points: Option<i64>,
}

/// Result of applying one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandOutcome {
    pub state: GameState,
    pub caller: Team,
    /// Score change per team, indexed by [`Team::index`].
    pub deltas: [i64; 2],
    /// Resolved defender award; `Some` only for euchred hands.
    pub euchre_points: Option<i64>,
}

/// Apply one hand to `state` and return the next state.
///
/// A normal hand adds `points_scored` to the caller. A euchre subtracts
/// `points_scored` from the caller and adds the euchre points to the other
/// team. Scores may go negative.
pub fn apply_hand(
    state: &GameState,
    input: &HandInput,
    policy: FinishPolicy,
) -> ScoringResult<HandOutcome> {
    if state.is_completed() {
        return Err(ScoringError::GameCompleted);
    }

    let caller = state
        .resolve_team(&input.caller_team)
        .ok_or_else(|| ScoringError::UnknownTeam(input.caller_team.clone()))?;

    if input.points_scored < 0 {
        return Err(ScoringError::NegativePoints(input.points_scored));
    }

    let euchre_points = match (input.euchred, input.euchre_points) {
        (true, Some(points)) if points < 0 => {
            return Err(ScoringError::NegativeEuchrePoints(points));
        }
        (true, Some(points)) => Some(points),
        (true, None) => Some(input.points_scored),
        (false, None) | (false, Some(0)) => None,
        (false, Some(_)) => return Err(ScoringError::UnexpectedEuchrePoints),
    };

    let mut deltas = [0i64; 2];
    match euchre_points {
        Some(award) => {
            deltas[caller.index()] = -input.points_scored;
            deltas[caller.other().index()] = award;
        }
        None => deltas[caller.index()] = input.points_scored,
    }

    let mut next = state.clone();
    for team in Team::ALL {
        next.scores[team.index()] += deltas[team.index()];
    }
    settle(&mut next, policy);

    debug!(
        caller = caller.as_str(),
        call = %input.call_value,
        euchred = input.euchred,
        team1 = next.scores[0],
        team2 = next.scores[1],
        status = next.status.as_str(),
        "Hand applied"
    );

    Ok(HandOutcome {
        state: next,
        caller,
        deltas,
        euchre_points,
    })
}

/// Recompute status and winner from the current scores.
pub fn settle(state: &mut GameState, policy: FinishPolicy) {
    let reached: Vec<Team> = Team::ALL
        .into_iter()
        .filter(|team| state.score(*team) >= state.target_score)
        .collect();

    let (status, winner) = match reached.as_slice() {
        [] => (GameStatus::Active, None),
        [team] => (GameStatus::Completed, Some(*team)),
        _ => {
            let winner = match policy {
                FinishPolicy::DeclareTie => None,
                FinishPolicy::HigherScoreWins => {
                    let (one, two) = (state.score(Team::One), state.score(Team::Two));
                    match one.cmp(&two) {
                        std::cmp::Ordering::Greater => Some(Team::One),
                        std::cmp::Ordering::Less => Some(Team::Two),
                        std::cmp::Ordering::Equal => None,
                    }
                }
            };
            (GameStatus::Completed, winner)
        }
    };

    state.status = status;
    state.winner = winner;
}

/// Replay a full hand log from `initial`, returning the final state.
pub fn replay<'a, I>(initial: &GameState, hands: I, policy: FinishPolicy) -> ScoringResult<GameState>
where
    I: IntoIterator<Item = &'a HandInput>,
{
    hands
        .into_iter()
        .try_fold(initial.clone(), |state, hand| {
            apply_hand(&state, hand, policy).map(|outcome| outcome.state)
        })
}
