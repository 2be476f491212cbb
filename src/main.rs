use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_arbiter::calculate::Elo;
use swiss_arbiter::config::AppConfig;
use swiss_arbiter::director::{NewTournament, TournamentDirector};
use swiss_arbiter::models::{Outcome, Player, PlayerId, Round, TournamentId};
use swiss_arbiter::storage::{JsonlRepository, StorageConfig};

#[derive(Parser)]
#[command(name = "swiss-arbiter")]
#[command(about = "Swiss-system chess pairing and standings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tournament
    New {
        /// Tournament name
        name: String,

        /// Start date (YYYY-MM-DD or "today")
        #[arg(long, default_value = "today")]
        date: String,

        /// Location (city, country)
        #[arg(long)]
        location: Option<String>,

        /// Number of rounds to play
        #[arg(long)]
        rounds: Option<u32>,
    },

    /// List tournaments
    List,

    /// Register a player
    AddPlayer {
        /// Tournament ID
        tournament: String,

        /// Player name
        name: String,

        /// Rating (defaults to the configured default rating)
        #[arg(long)]
        rating: Option<u32>,
    },

    /// Show the roster
    Players {
        /// Tournament ID
        tournament: String,
    },

    /// Pair the next round
    Pair {
        /// Tournament ID
        tournament: String,
    },

    /// Record a game result
    Result {
        /// Tournament ID
        tournament: String,

        /// Round number
        round: u32,

        /// Board number
        board: u32,

        /// Result: 1-0, 0-1, 1/2-1/2 or * to clear
        outcome: Outcome,
    },

    /// Show all rounds and their results
    Rounds {
        /// Tournament ID
        tournament: String,
    },

    /// Show current standings
    Standings {
        /// Tournament ID
        tournament: String,
    },

    /// Show provisional rating changes
    Ratings {
        /// Tournament ID
        tournament: String,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::debug!("Starting swiss-arbiter v{}", env!("CARGO_PKG_VERSION"));

    let repo = JsonlRepository::new(StorageConfig::new(config.data_dir.clone()));
    let director = TournamentDirector::new(Arc::new(repo))
        .with_default_rating(config.pairing.default_rating)
        .with_rating_formula(Arc::new(Elo::new(config.rating.k_factor)));

    match cli.command {
        Commands::New {
            name,
            date,
            location,
            rounds,
        } => {
            let date = swiss_arbiter::parse_date(&date)
                .with_context(|| format!("invalid date '{}' (expected YYYY-MM-DD)", date))?;
            let tournament = director.create_tournament(NewTournament {
                name,
                date,
                location,
                planned_rounds: rounds,
            })?;
            println!("Created {} ({})", tournament.name, tournament.date);
            println!("ID: {}", tournament.id);
        }
        Commands::List => {
            let tournaments = director.tournaments()?;
            if tournaments.is_empty() {
                println!("No tournaments yet.");
            }
            for t in tournaments {
                println!(
                    "{}  {}  {}{}",
                    t.id,
                    t.date,
                    t.name,
                    t.location.map(|l| format!(" ({})", l)).unwrap_or_default()
                );
            }
        }
        Commands::AddPlayer {
            tournament,
            name,
            rating,
        } => {
            let player = director.register_player(&tournament.into(), &name, rating)?;
            println!("Registered {} ({})", player.name, player.rating);
        }
        Commands::Players { tournament } => {
            let players = director.players(&tournament.into())?;
            println!("{:>3}  {:<30} {:>6}", "#", "Name", "Rating");
            for (i, p) in players.iter().enumerate() {
                println!("{:>3}  {:<30} {:>6}", i + 1, p.name, p.rating);
            }
        }
        Commands::Pair { tournament } => {
            let id = TournamentId::from(tournament);
            let round = director.pair_next_round(&id)?;
            let players = director.players(&id)?;
            print_round(&round, &names_by_id(&players));
        }
        Commands::Result {
            tournament,
            round,
            board,
            outcome,
        } => {
            director.record_result(&tournament.into(), round, board, outcome)?;
            println!("Round {} board {}: {}", round, board, outcome);
        }
        Commands::Rounds { tournament } => {
            let id = TournamentId::from(tournament);
            let rounds = director.rounds(&id)?;
            let players = director.players(&id)?;
            let names = names_by_id(&players);
            if rounds.is_empty() {
                println!("No rounds paired yet.");
            }
            for round in &rounds {
                print_round(round, &names);
                println!();
            }
        }
        Commands::Standings { tournament } => {
            let standings = director.standings(&tournament.into())?;
            println!(
                "{:>4}  {:<30} {:>6} {:>6} {:>5} {:>9}",
                "Rank", "Name", "Rating", "Score", "Games", "W-L-D"
            );
            for s in standings {
                println!(
                    "{:>4}  {:<30} {:>6} {:>6} {:>5} {:>9}",
                    s.rank,
                    s.player_name,
                    s.rating,
                    s.score.to_string(),
                    s.games_played,
                    format!("{}-{}-{}", s.record.wins, s.record.losses, s.record.draws)
                );
            }
        }
        Commands::Ratings { tournament } => {
            let changes = director.rating_changes(&tournament.into())?;
            println!(
                "{:<30} {:>6} {:>6} {:>6} {:>5}",
                "Name", "Old", "New", "Delta", "Games"
            );
            for c in changes {
                println!(
                    "{:<30} {:>6} {:>6} {:>+6} {:>5}",
                    c.player_name,
                    c.old_rating,
                    c.new_rating,
                    c.delta(),
                    c.games_rated
                );
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let state = swiss_arbiter::api::state::AppState::new(director);
            let app = swiss_arbiter::api::build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn names_by_id(players: &[Player]) -> HashMap<&PlayerId, &str> {
    players.iter().map(|p| (&p.id, p.name.as_str())).collect()
}

fn print_round(round: &Round, names: &HashMap<&PlayerId, &str>) {
    let name = |id: &PlayerId| names.get(id).copied().unwrap_or(id.as_str()).to_string();

    println!("=== Round {} ===", round.number);
    for p in &round.pairings {
        if let Some(black) = &p.black {
            println!(
                "{:>3}  {:<30} {:<30} {}",
                p.board,
                name(&p.white),
                name(black),
                p.outcome
            );
        }
    }
    if let Some(id) = round.bye_player() {
        println!("Bye: {}", name(id));
    }
}
