//! Hand logging commands.

use super::{result_line, score_line};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use euchre_database::{Hand, NewHand, ScoreStore};
use euchre_scoring::CallValue;
use serde_json::json;
use tracing::info;

pub struct LogHandArgs {
    pub team: String,
    pub call: String,
    pub points: Option<i64>,
    pub euchred: bool,
    pub euchre_points: Option<i64>,
    pub caller: Option<String>,
    pub notes: Option<String>,
}

impl LogHandArgs {
    /// Points default to the call's stake; defenders' points default in the
    /// scoring engine.
    fn into_new_hand(self) -> NewHand {
        let call_value = CallValue::parse(&self.call);
        let points_scored = self.points.unwrap_or_else(|| call_value.stake());
        NewHand {
            caller_name: self.caller,
            caller_team: self.team,
            call_value,
            points_scored,
            euchred: self.euchred,
            euchre_points: if self.euchred { self.euchre_points } else { None },
            notes: self.notes,
        }
    }
}

fn describe(hand: &Hand, caller_team: &str) -> String {
    let who = hand.caller_name.as_deref().unwrap_or(caller_team);
    if hand.euchred {
        format!(
            "{} called {} and was euchred: -{}, defenders +{}",
            who,
            hand.call_value,
            hand.points_scored,
            hand.delta(hand.caller_team.other())
        )
    } else {
        format!("{} called {}: +{}", who, hand.call_value, hand.points_scored)
    }
}

/// Record a hand.
pub fn log_hand(store: &dyn ScoreStore, game_id: &str, args: LogHandArgs, format: &OutputFormat) -> Result<()> {
    let hand = store.append_hand(game_id, &args.into_new_hand())?;
    let game = store.require_game(game_id)?;
    info!(game_id, hand_number = hand.hand_number, "Hand logged");

    match format {
        OutputFormat::Text => {
            println!(
                "Hand {}: {}",
                hand.hand_number,
                describe(&hand, game.team_name(hand.caller_team))
            );
            output::print_row("Score", &score_line(&game));
            if let Some(result) = result_line(&game) {
                output::print_row("Game over", &result);
            }
        }
        OutputFormat::Json => output::print_json(&json!({ "hand": hand, "game": game }))?,
    }
    Ok(())
}

/// Remove the most recent hand.
pub fn undo(store: &dyn ScoreStore, game_id: &str, format: &OutputFormat) -> Result<()> {
    let removed = store.undo_last_hand(game_id)?;
    let game = store.require_game(game_id)?;

    match format {
        OutputFormat::Text => {
            match &removed {
                Some(hand) => println!("Removed hand {}", hand.hand_number),
                None => println!("No hands to undo"),
            }
            output::print_row("Score", &score_line(&game));
        }
        OutputFormat::Json => output::print_json(&json!({ "removed": removed, "game": game }))?,
    }
    Ok(())
}
