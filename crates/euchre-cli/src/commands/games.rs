//! Game management commands.

use super::{confirm, print_game, result_line, score_line};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use euchre_analytics::hand_log;
use euchre_database::{NewGame, ScoreStore};
use euchre_scoring::GameStatus;
use serde_json::json;
use tracing::info;

pub struct NewGameArgs {
    pub team1: String,
    pub team2: String,
    pub team1_players: Vec<String>,
    pub team2_players: Vec<String>,
    pub target: i64,
}

/// Create a game.
pub fn new_game(store: &dyn ScoreStore, args: NewGameArgs, format: &OutputFormat) -> Result<()> {
    let mut input = NewGame::new(args.team1, args.team2).with_target_score(args.target);
    input.team1_players = args.team1_players;
    input.team2_players = args.team2_players;

    let game = store.create_game(&input)?;
    info!(game_id = %game.id, "Game created");

    match format {
        OutputFormat::Text => {
            output::print_success(&format!("Game created: {}", game.id), format);
            print_game(&game);
        }
        OutputFormat::Json => output::print_json(&game)?,
    }
    Ok(())
}

/// List games, newest first.
pub fn list(store: &dyn ScoreStore, status: Option<GameStatus>, format: &OutputFormat) -> Result<()> {
    let games = store.list_games(status)?;

    match format {
        OutputFormat::Text => {
            if games.is_empty() {
                println!("No games found");
                return Ok(());
            }
            println!("{:<36} {:<10} {:<17} {}", "ID", "Status", "Created", "Score");
            output::print_divider(100);
            for game in &games {
                let mut score = score_line(game);
                if let Some(result) = result_line(game) {
                    score = format!("{} ({})", score, result);
                }
                println!(
                    "{:<36} {:<10} {:<17} {}",
                    game.id,
                    game.status.as_str(),
                    game.created_at.format("%Y-%m-%d %H:%M"),
                    score
                );
            }
        }
        OutputFormat::Json => output::print_json(&games)?,
    }
    Ok(())
}

/// Show a game and its hand log.
pub fn show(store: &dyn ScoreStore, game_id: &str, format: &OutputFormat) -> Result<()> {
    let game = store.require_game(game_id)?;
    let hands = store.list_hands(game_id)?;

    match format {
        OutputFormat::Text => {
            output::print_heading(&format!("{} vs {}", game.team1_name, game.team2_name));
            print_game(&game);

            let rows = hand_log(&game, &hands);
            if rows.is_empty() {
                println!("\nNo hands logged yet");
                return Ok(());
            }
            println!();
            println!(
                "{:>4}  {:<10} {:<14} {:<13} {:>6} {:>6}  {:<32} {}",
                "Hand", "Caller", "Team", "Call", "T1", "T2", "Result", "Notes"
            );
            output::print_divider(110);
            for row in rows {
                println!(
                    "{:>4}  {:<10} {:<14} {:<13} {:>6} {:>6}  {:<32} {}",
                    row.hand_number,
                    row.caller.as_deref().unwrap_or("-"),
                    row.team,
                    row.call.to_string(),
                    row.team1_score,
                    row.team2_score,
                    row.result,
                    row.notes
                );
            }
        }
        OutputFormat::Json => output::print_json(&json!({ "game": game, "hands": hands }))?,
    }
    Ok(())
}

/// Delete a game and its hands.
pub fn delete(store: &dyn ScoreStore, game_id: &str, yes: bool, format: &OutputFormat) -> Result<()> {
    let game = store.require_game(game_id)?;

    if !yes && !confirm(&format!("Delete {} and all its hands?", score_line(&game))) {
        output::print_success("Cancelled", format);
        return Ok(());
    }

    if store.delete_game(game_id)? {
        info!(game_id, "Game deleted");
        output::print_success(&format!("Game {} deleted", game_id), format);
    } else {
        anyhow::bail!("Game {} was already gone", game_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use euchre_database::Database;

    fn args(team1: &str, team2: &str) -> NewGameArgs {
        NewGameArgs {
            team1: team1.to_string(),
            team2: team2.to_string(),
            team1_players: vec!["Ann".into(), "Bob".into()],
            team2_players: vec!["Cat".into(), "Dan".into()],
            target: 32,
        }
    }

    #[test]
    fn new_game_stores_players() {
        let db = Database::open_in_memory().unwrap();
        new_game(&db, args("Hearts", "Spades"), &OutputFormat::Json).unwrap();

        let games = db.list_games(None).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].team2_players, vec!["Cat", "Dan"]);
    }

    #[test]
    fn new_game_validation_error_surfaces() {
        let db = Database::open_in_memory().unwrap();
        let err = new_game(&db, args("Hearts", " hearts "), &OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("team2_name"));
    }

    #[test]
    fn show_and_list_run() {
        let db = Database::open_in_memory().unwrap();
        new_game(&db, args("Hearts", "Spades"), &OutputFormat::Json).unwrap();
        let id = db.list_games(None).unwrap()[0].id.clone();

        show(&db, &id, &OutputFormat::Text).unwrap();
        list(&db, Some(GameStatus::Active), &OutputFormat::Text).unwrap();
        assert!(show(&db, "missing", &OutputFormat::Text).is_err());
    }

    #[test]
    fn delete_with_yes() {
        let db = Database::open_in_memory().unwrap();
        new_game(&db, args("Hearts", "Spades"), &OutputFormat::Json).unwrap();
        let id = db.list_games(None).unwrap()[0].id.clone();

        delete(&db, &id, true, &OutputFormat::Json).unwrap();
        assert!(db.get_game(&id).unwrap().is_none());
        assert!(delete(&db, &id, true, &OutputFormat::Json).is_err());
    }
}
