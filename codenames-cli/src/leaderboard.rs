//! Leaderboard command - standings from the match store

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use codenames_arena::{compute_stats, JsonFileStore, MatchStore, ModelStat};

#[derive(Args)]
pub struct LeaderboardArgs {
    /// JSON match store
    #[arg(long, value_name = "FILE", default_value = "data/matches.json")]
    pub store: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run leaderboard command
pub fn run(args: LeaderboardArgs) -> Result<()> {
    let standings = load_standings(&args.store)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&standings)?);
    } else {
        print_table(&standings);
    }

    Ok(())
}

/// Standings for the store at `path`; empty if it does not exist yet
fn load_standings(path: &Path) -> Result<Vec<ModelStat>> {
    if !path.exists() {
        tracing::warn!("No match store at {}", path.display());
        return Ok(Vec::new());
    }

    let store = JsonFileStore::open(path)
        .with_context(|| format!("Failed to open match store: {}", path.display()))?;
    let records = store
        .list_matches()
        .with_context(|| format!("Failed to read matches from {}", path.display()))?;

    tracing::debug!("Loaded {} matches from {}", records.len(), path.display());
    Ok(compute_stats(&records))
}

/// Print standings as an aligned table
pub fn print_table(standings: &[ModelStat]) {
    println!("=== Leaderboard ===");
    if standings.is_empty() {
        println!("No matches recorded.");
        return;
    }

    let width = standings
        .iter()
        .map(|s| s.model_id.len())
        .max()
        .unwrap_or(0)
        .max("Model".len());

    println!(
        "{:>4}  {:<width$}  {:>5}  {:>6}  {:>5}  {:>7}",
        "Rank", "Model", "Wins", "Losses", "Total", "Win %"
    );
    for (rank, stat) in standings.iter().enumerate() {
        println!(
            "{:>4}  {:<width$}  {:>5}  {:>6}  {:>5}  {:>6.1}%",
            rank + 1,
            stat.model_id,
            stat.wins,
            stat.losses,
            stat.total,
            stat.win_rate
        );
    }
}
