//! Main entry point for the rating ledger CLI
//!
//! The command line surface is a thin presentation layer: it parses input,
//! calls the engine's narrow API and prints the outcome. Every engine error
//! is surfaced as a user-facing message with a nonzero exit code.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rating_ledger::config::AppConfig;
use rating_ledger::engine::RatingEngine;
use rating_ledger::rating::{EloCalculator, ExtendedEloConfig};
use rating_ledger::storage::JsonFileStorage;
use rating_ledger::types::GameResult;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Rating Ledger - Elo rating tracking for pairwise game results
#[derive(Parser)]
#[command(
    name = "rating-ledger",
    version,
    about = "Track Elo ratings for a pool of players",
    long_about = "Rating Ledger maintains Elo skill ratings from recorded game results. \
                 Players and games are persisted as JSON files; every recorded game \
                 updates both players' ratings and appends an immutable audit record."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, value_name = "DIR", help = "Override the data directory")]
    data_dir: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new player
    AddPlayer {
        /// Player name, unique and case-sensitive
        name: String,
        /// Initial rating (defaults to the configured initial rating)
        #[arg(long, value_name = "RATING")]
        rating: Option<f64>,
    },
    /// Record a finished game between two registered players
    RecordGame {
        /// Player with the first side
        player1: String,
        /// Player with the second side
        player2: String,
        /// Result token: 1-0, 0-1 or 1/2-1/2
        result: String,
        /// Game date (defaults to today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
    /// List all registered players
    Players,
    /// Show players ranked by rating
    Leaderboard,
    /// Show the most recent games
    History {
        /// Maximum number of games to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show a player's rating over time
    Trajectory {
        /// Player name
        name: String,
    },
    /// Show aggregate statistics
    Stats,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file/environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    Ok(config)
}

/// Construct the engine over JSON-file persistence
fn build_engine(config: &AppConfig) -> Result<RatingEngine> {
    let calculator = EloCalculator::new(ExtendedEloConfig::new(
        config.rating.k_factor,
        config.rating.initial_rating,
    ))?;
    let storage = Arc::new(JsonFileStorage::new(
        config.storage.players_path(),
        config.storage.games_path(),
    ));

    RatingEngine::new(calculator, storage)
}

fn run(engine: &RatingEngine, command: Command) -> Result<()> {
    match command {
        Command::AddPlayer { name, rating } => {
            let player = engine.register_player(&name, rating)?;
            println!(
                "Added player '{}' with rating {:.0}",
                player.name, player.rating
            );
        }
        Command::RecordGame {
            player1,
            player2,
            result,
            date,
        } => {
            let result: GameResult = result.parse()?;
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let report = engine.record_game(&player1, &player2, result, date)?;

            println!("Game recorded: {} {} {}", player1, result, player2);
            for change in [&report.player_one, &report.player_two] {
                println!(
                    "  {}: {:.0} -> {:.0} ({:+.1})",
                    change.name, change.old_rating, change.new_rating, change.delta
                );
            }
        }
        Command::Players => {
            let players = engine.list_players()?;
            if players.is_empty() {
                println!("No players registered yet.");
                return Ok(());
            }
            println!(
                "{:<20} {:>8} {:>6} {:>5} {:>7} {:>6} {:>9}",
                "Name", "Rating", "Games", "Wins", "Losses", "Draws", "Win rate"
            );
            for player in players {
                println!(
                    "{:<20} {:>8.0} {:>6} {:>5} {:>7} {:>6} {:>8.1}%",
                    player.name,
                    player.rating,
                    player.games_played,
                    player.wins,
                    player.losses,
                    player.draws,
                    player.win_rate() * 100.0
                );
            }
        }
        Command::Leaderboard => {
            let board = engine.leaderboard()?;
            if board.is_empty() {
                println!("No players registered yet.");
                return Ok(());
            }
            for (rank, player) in board.iter().enumerate() {
                println!(
                    "{:>3}. {:<20} {:.0}",
                    rank + 1,
                    player.name,
                    player.rating
                );
            }
        }
        Command::History { limit } => {
            let games = engine.recent_games(limit)?;
            if games.is_empty() {
                println!("No games recorded yet.");
                return Ok(());
            }
            for game in games {
                let headline = match game.result {
                    GameResult::WinPlayerOne => {
                        format!("{} defeated {}", game.player1, game.player2)
                    }
                    GameResult::WinPlayerTwo => {
                        format!("{} defeated {}", game.player2, game.player1)
                    }
                    GameResult::Draw => {
                        format!("{} drew with {}", game.player1, game.player2)
                    }
                };
                println!(
                    "{}  {} ({:+.1} / {:+.1})",
                    game.date, headline, game.rating_change_1, game.rating_change_2
                );
            }
        }
        Command::Trajectory { name } => {
            let trajectory = engine.rating_trajectory(&name)?;
            if trajectory.is_empty() {
                println!("No games recorded for '{}'.", name);
                return Ok(());
            }
            for (date, rating) in trajectory {
                println!("{}  {:.0}", date, rating);
            }
        }
        Command::Stats => {
            let stats = engine.aggregate_stats()?;
            match stats.average_rating {
                Some(average) => println!("Average rating:  {:.0}", average),
                None => println!("Average rating:  N/A"),
            }
            println!("Total games:     {}", stats.total_games);
            println!(
                "Most active:     {}",
                stats.most_active_player.as_deref().unwrap_or("N/A")
            );
            println!(
                "Highest rated:   {}",
                stats.highest_rated_player.as_deref().unwrap_or("N/A")
            );
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        service = %config.service.name,
        data_dir = %config.storage.data_dir.display(),
        "starting rating ledger"
    );

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to open ledger: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&engine, args.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
