//! Euchre Stats CLI - log hands, track games, and view statistics.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use euchre_config_and_utils::{init_logging, Config, Paths};
use euchre_database::{Database, ScoreStore};
use euchre_scoring::GameStatus;
use euchre_sync::{
    pending_marker_path, restore_from_remote, FsMirror, GcsMirror, MirroredStore, RemoteMirror,
    SyncOutcome,
};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Euchre Stats CLI - Track Euchre games hand by hand.
#[derive(Parser)]
#[command(name = "euchre")]
#[command(about = "Score keeping and statistics for Euchre games")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Data directory (default: ~/.euchre-stats)
    #[arg(long, env = "EUCHRE_HOME", global = true)]
    base_dir: Option<PathBuf>,

    /// Mirror the store to this file instead of cloud storage
    #[arg(long, env = "EUCHRE_MIRROR_FILE", global = true)]
    mirror_file: Option<PathBuf>,

    /// Skip the remote mirror for this invocation
    #[arg(long, global = true)]
    no_sync: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new game
    NewGame {
        /// First team's name
        team1: String,
        /// Second team's name
        team2: String,
        /// Comma-separated players on the first team
        #[arg(long, value_delimiter = ',')]
        team1_players: Vec<String>,
        /// Comma-separated players on the second team
        #[arg(long, value_delimiter = ',')]
        team2_players: Vec<String>,
        /// Points needed to win (default from config, normally 32)
        #[arg(short, long)]
        target: Option<i64>,
    },

    /// Record a hand
    LogHand {
        /// Game ID
        game_id: String,
        /// Calling team (team name, or team1 / team2)
        #[arg(short, long)]
        team: String,
        /// What was called: 3-8, "Partner Best", "Alone", or free text
        #[arg(short, long)]
        call: String,
        /// Points at stake (default: the call's usual value)
        #[arg(short, long)]
        points: Option<i64>,
        /// The calling team was euchred
        #[arg(short, long)]
        euchred: bool,
        /// Points awarded to the defenders (default: the points at stake)
        #[arg(long, requires = "euchred")]
        euchre_points: Option<i64>,
        /// Player who called trump
        #[arg(long)]
        caller: Option<String>,
        /// Free-text notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Remove the most recent hand of a game
    Undo {
        /// Game ID
        game_id: String,
    },

    /// Show a game and its hands
    Show {
        /// Game ID
        game_id: String,
    },

    /// List games, newest first
    List {
        /// Only games with this status
        #[arg(short, long)]
        status: Option<StatusFilter>,
    },

    /// Show statistics for one game, or across all games
    Stats {
        /// Game ID (omit for all games)
        game_id: Option<String>,
    },

    /// Delete a game and its hands
    Delete {
        /// Game ID
        game_id: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Transfer the store to or from the remote mirror
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
}

#[derive(Subcommand)]
enum SyncCommands {
    /// Replace the local store with the remote copy
    Pull,
    /// Upload the local store to the remote mirror
    Push,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusFilter {
    Active,
    Completed,
}

impl From<StatusFilter> for GameStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Active => GameStatus::Active,
            StatusFilter::Completed => GameStatus::Completed,
        }
    }
}

/// Build the configured mirror. A mirror that cannot be set up is logged
/// and skipped; the local store keeps working.
fn build_mirror(cli: &Cli, config: &Config) -> Option<Box<dyn RemoteMirror>> {
    if let Some(path) = &cli.mirror_file {
        return Some(Box::new(FsMirror::new(path)));
    }
    let sync = config.sync.as_ref()?;
    match GcsMirror::from_config(sync) {
        Ok(mirror) => Some(Box::new(mirror)),
        Err(e) => {
            warn!(error = %e, "Remote mirror unavailable, continuing locally");
            None
        }
    }
}

fn dispatch(command: Commands, store: &dyn ScoreStore, config: &Config, format: &output::OutputFormat) -> Result<()> {
    match command {
        Commands::NewGame {
            team1,
            team2,
            team1_players,
            team2_players,
            target,
        } => commands::new_game(
            store,
            commands::NewGameArgs {
                team1,
                team2,
                team1_players,
                team2_players,
                target: target.unwrap_or(config.default_target_score),
            },
            format,
        ),
        Commands::LogHand {
            game_id,
            team,
            call,
            points,
            euchred,
            euchre_points,
            caller,
            notes,
        } => commands::log_hand(
            store,
            &game_id,
            commands::LogHandArgs {
                team,
                call,
                points,
                euchred,
                euchre_points,
                caller,
                notes,
            },
            format,
        ),
        Commands::Undo { game_id } => commands::undo(store, &game_id, format),
        Commands::Show { game_id } => commands::show(store, &game_id, format),
        Commands::List { status } => commands::list(store, status.map(GameStatus::from), format),
        Commands::Stats { game_id } => commands::stats(store, game_id.as_deref(), format),
        Commands::Delete { game_id, yes } => commands::delete(store, &game_id, yes, format),
        Commands::Sync { .. } => anyhow::bail!("sync is handled before the store is opened"),
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = match &cli.base_dir {
        Some(dir) => Paths::with_base_dir(dir.clone()),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_logging(&level, config.log_format);

    paths.ensure_dirs()?;
    let db_path = config.database_file(&paths);
    debug!(path = %db_path.display(), "Using local store");

    let mirror = if cli.no_sync { None } else { build_mirror(&cli, &config) };

    if let Commands::Sync { command } = &cli.command {
        let Some(mirror) = mirror else {
            anyhow::bail!(
                "No remote mirror configured. Set EUCHRE_GCS_BUCKET, add \"sync\" to {}, or pass --mirror-file",
                paths.config_file().display()
            );
        };
        return match command {
            SyncCommands::Pull => commands::sync_pull(mirror.as_ref(), &db_path, &cli.format),
            SyncCommands::Push => {
                let store = MirroredStore::new(Database::open(&db_path)?, mirror)
                    .with_pending_marker(pending_marker_path(&db_path));
                commands::sync_push(&store, &cli.format)
            }
        };
    }

    let startup = mirror.as_ref().map(|mirror| {
        let outcome = restore_from_remote(mirror.as_ref(), &db_path);
        debug!(?outcome, "Startup sync finished");
        outcome
    });

    let db = Database::open(&db_path)?.with_finish_policy(config.finish_policy);
    let format = cli.format;
    match mirror {
        Some(mirror) => {
            let store = MirroredStore::new(db, mirror).with_pending_marker(pending_marker_path(&db_path));
            if startup == Some(SyncOutcome::PendingPush) {
                store.push();
            }
            dispatch(cli.command, &store, &config, &format)
        }
        None => dispatch(cli.command, &db, &config, &format),
    }
}

fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    if let Err(e) = run(cli) {
        output::print_error(&format!("{:#}", e), &format);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_log_hand() {
        let cli = Cli::try_parse_from([
            "euchre", "log-hand", "abc", "--team", "Hearts", "--call", "Partner Best", "--euchred",
            "--euchre-points", "4", "--caller", "Ann",
        ])
        .unwrap();
        match cli.command {
            Commands::LogHand {
                game_id,
                team,
                call,
                points,
                euchred,
                euchre_points,
                caller,
                ..
            } => {
                assert_eq!(game_id, "abc");
                assert_eq!(team, "Hearts");
                assert_eq!(call, "Partner Best");
                assert_eq!(points, None);
                assert!(euchred);
                assert_eq!(euchre_points, Some(4));
                assert_eq!(caller.as_deref(), Some("Ann"));
            }
            _ => panic!("expected log-hand"),
        }
    }

    #[test]
    fn euchre_points_require_euchred() {
        let result = Cli::try_parse_from([
            "euchre", "log-hand", "abc", "--team", "A", "--call", "3", "--euchre-points", "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_player_lists_and_globals() {
        let cli = Cli::try_parse_from([
            "euchre", "new-game", "Hearts", "Spades", "--team1-players", "Ann,Bob",
            "--team2-players", "Cat,Dan", "--format", "json", "--no-sync",
        ])
        .unwrap();
        assert!(matches!(cli.format, output::OutputFormat::Json));
        assert!(cli.no_sync);
        match cli.command {
            Commands::NewGame {
                team1_players,
                team2_players,
                target,
                ..
            } => {
                assert_eq!(team1_players, vec!["Ann", "Bob"]);
                assert_eq!(team2_players, vec!["Cat", "Dan"]);
                assert_eq!(target, None);
            }
            _ => panic!("expected new-game"),
        }
    }

    #[test]
    fn parses_list_status_filter() {
        let cli = Cli::try_parse_from(["euchre", "list", "--status", "completed"]).unwrap();
        match cli.command {
            Commands::List { status } => {
                assert_eq!(status.map(GameStatus::from), Some(GameStatus::Completed))
            }
            _ => panic!("expected list"),
        }
    }
}
