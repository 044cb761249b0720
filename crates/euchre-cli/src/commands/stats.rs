//! Statistics commands.

use crate::output::{self, percent, OutputFormat};
use anyhow::Result;
use euchre_analytics::{Analytics, CallStats, GameReport, LeagueReport};
use euchre_database::ScoreStore;

/// Statistics for one game, or across all games when `game_id` is `None`.
pub fn stats(store: &dyn ScoreStore, game_id: Option<&str>, format: &OutputFormat) -> Result<()> {
    let analytics = Analytics::new(store);
    match game_id {
        Some(id) => {
            let report = analytics.game_report(id)?;
            match format {
                OutputFormat::Text => print_game_report(&report),
                OutputFormat::Json => output::print_json(&report)?,
            }
        }
        None => {
            let report = analytics.league_report()?;
            match format {
                OutputFormat::Text => print_league_report(&report),
                OutputFormat::Json => output::print_json(&report)?,
            }
        }
    }
    Ok(())
}

fn print_calls(calls: &[CallStats]) {
    if calls.is_empty() {
        println!("No hands logged yet");
        return;
    }
    println!(
        "{:<14} {:>6} {:>6} {:>8} {:>8} {:>8}",
        "Call", "Count", "Net", "Avg", "Euchres", "Rate"
    );
    output::print_divider(56);
    for call in calls {
        println!(
            "{:<14} {:>6} {:>6} {:>8.2} {:>8} {:>8}",
            call.call.to_string(),
            call.count,
            call.net_points,
            call.average_points,
            call.euchres,
            percent(call.euchre_rate)
        );
    }
}

fn print_game_report(report: &GameReport) {
    let game = &report.game;
    output::print_heading(&format!("{} vs {}", game.team1_name, game.team2_name));
    output::print_row("Hands", &report.hands.len().to_string());
    output::print_row("Euchre ratio", &percent(report.euchre_ratio));

    output::print_heading("Score progression");
    println!("{:>4} {:>14} {:>14}", "Hand", game.team1_name, game.team2_name);
    for point in &report.progression {
        println!("{:>4} {:>14} {:>14}", point.hand_number, point.team1, point.team2);
    }

    output::print_heading("Calls");
    print_calls(&report.calls);
}

fn print_league_report(report: &LeagueReport) {
    let s = &report.summary;
    output::print_heading("Summary");
    output::print_row("Games", &s.total_games.to_string());
    output::print_row("Active", &s.active_games.to_string());
    output::print_row("Completed", &s.completed_games.to_string());
    output::print_row("Hands", &s.total_hands.to_string());
    output::print_row("Euchres", &s.total_euchres.to_string());
    output::print_row(
        "Top call",
        &s.most_common_call
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string()),
    );

    output::print_heading("Teams");
    if report.teams.is_empty() {
        println!("No completed games yet");
    } else {
        println!(
            "{:<16} {:>5} {:>5} {:>5} {:>5} {:>7} {:>7} {:>7} {:>8}",
            "Team", "Games", "Wins", "Loss", "Ties", "Win %", "For", "Against", "Margin"
        );
        for team in &report.teams {
            println!(
                "{:<16} {:>5} {:>5} {:>5} {:>5} {:>7} {:>7} {:>7} {:>8.1}",
                team.team,
                team.games,
                team.wins,
                team.losses,
                team.ties,
                percent(team.win_rate),
                team.points_for,
                team.points_against,
                team.average_margin
            );
        }
    }

    output::print_heading("Players");
    if report.players.is_empty() {
        println!("No completed games with players yet");
    } else {
        println!(
            "{:<16} {:>5} {:>5} {:>5} {:>5} {:>8}",
            "Player", "Games", "Wins", "Loss", "Ties", "Margin"
        );
        for player in &report.players {
            println!(
                "{:<16} {:>5} {:>5} {:>5} {:>5} {:>8.1}",
                player.player,
                player.games,
                player.wins,
                player.losses,
                player.ties,
                player.average_margin
            );
        }
    }

    output::print_heading("Callers");
    for caller in &report.callers {
        println!(
            "{:<16} {:>4} called  {:>+5} net  {:>3} euchred ({})",
            caller.caller,
            caller.hands_called,
            caller.net_points,
            caller.euchres,
            percent(caller.euchre_rate)
        );
    }
    for top in &report.most_common_callers {
        output::print_row(&format!("{} caller", top.team), &format!("{} ({})", top.player, top.calls));
    }

    output::print_heading("Calls");
    print_calls(&report.calls);
}
