//! Codenames CLI - Command-line interface
//!
//! Commands:
//! - simulate: Play a batch of games between two models
//! - leaderboard: Show per-model standings from the match store
//! - serve: Start the HTTP API server

mod leaderboard;
mod server;
mod simulate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codenames")]
#[command(about = "Codenames simulated by automated agents")]
#[command(version)]
struct Cli {
    /// Random seed for reproducible boards and moves
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a batch of games and record the results
    Simulate(simulate::SimulateArgs),
    /// Print the leaderboard
    Leaderboard(leaderboard::LeaderboardArgs),
    /// Start the HTTP API server
    Serve(server::ServerArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => simulate::run(args, cli.seed),
        Commands::Leaderboard(args) => leaderboard::run(args),
        Commands::Serve(args) => server::run(args, cli.seed),
    }
}
