//! CLI command implementations.

mod games;
mod hands;
mod stats;
mod sync;

pub use games::{delete, list, new_game, show, NewGameArgs};
pub use hands::{log_hand, undo, LogHandArgs};
pub use stats::stats;
pub use sync::{sync_pull, sync_push};

use crate::output;
use euchre_database::Game;
use euchre_scoring::{GameStatus, Team};

/// One-line score, e.g. `Hearts 12 - 9 Spades`.
fn score_line(game: &Game) -> String {
    format!(
        "{} {} - {} {}",
        game.team1_name, game.team1_score, game.team2_score, game.team2_name
    )
}

/// Winner text for a completed game, `None` while active.
fn result_line(game: &Game) -> Option<String> {
    if game.status != GameStatus::Completed {
        return None;
    }
    Some(match game.winner {
        Some(team) => format!("{} wins", game.team_name(team)),
        None => "Tied".to_string(),
    })
}

fn print_game(game: &Game) {
    output::print_row("ID", &game.id);
    output::print_row("Score", &score_line(game));
    output::print_row("Target", &game.target_score.to_string());
    output::print_row("Status", game.status.as_str());
    if let Some(result) = result_line(game) {
        output::print_row("Result", &result);
    }
    for team in Team::ALL {
        let players = game.players(team);
        if !players.is_empty() {
            output::print_row(game.team_name(team), &players.join(", "));
        }
    }
    output::print_row("Created", &game.created_at.format("%Y-%m-%d %H:%M").to_string());
}

/// Ask user for confirmation.
fn confirm(prompt: &str) -> bool {
    use std::io::{self, Write};

    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
