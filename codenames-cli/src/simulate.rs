//! Simulate command - play a batch of games between two models
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: open_leaderboard(), play_batch(), report_results()
//! - Level 3: build_config()
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use codenames_arena::{
    builtin_provider, run_batch, BatchReport, GameRunner, JsonFileStore, Leaderboard, ModelStat,
    ProviderFailurePolicy, Seats, SimulationConfig,
};
use codenames_core::Team;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Model id playing red
    #[arg(long, value_name = "MODEL")]
    pub red: String,

    /// Model id playing blue
    #[arg(long, value_name = "MODEL")]
    pub blue: String,

    /// Team giving the first clue in every game
    #[arg(long, default_value = "red")]
    pub starting_team: Team,

    /// JSON match store
    #[arg(long, value_name = "FILE", default_value = "data/matches.json")]
    pub store: PathBuf,

    /// Provider failure handling: abort or random
    #[arg(long, default_value = "abort")]
    pub policy: ProviderFailurePolicy,

    /// Maximum steps per game before it is aborted
    #[arg(long, default_value = "500")]
    pub max_steps: usize,

    /// Pause between steps, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// This function reads like a table of contents:
/// 1. Open the match store
/// 2. Play the batch
/// 3. Report results with the updated leaderboard
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    if args.red.trim().is_empty() || args.blue.trim().is_empty() {
        anyhow::bail!("--red and --blue must name a model");
    }

    let leaderboard = open_leaderboard(&args)?;

    tracing::info!(
        "Starting simulation: {} (red) vs {} (blue), {} games, {} opens",
        args.red,
        args.blue,
        args.games,
        args.starting_team
    );

    let report = play_batch(&args, seed, &leaderboard)?;
    let standings = leaderboard
        .leaderboard()
        .context("Failed to compute leaderboard")?;

    report_results(&report, &standings, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn open_leaderboard(args: &SimulateArgs) -> Result<Leaderboard> {
    let store = JsonFileStore::open(&args.store)
        .with_context(|| format!("Failed to open match store: {}", args.store.display()))?;
    Ok(Leaderboard::new(Arc::new(store)))
}

/// Play every game of the batch with the built-in providers
fn play_batch(args: &SimulateArgs, seed: Option<u64>, leaderboard: &Leaderboard) -> Result<BatchReport> {
    let mut runner = GameRunner::new(build_config(args, seed));
    let mut red = builtin_provider(&args.red, seed.map(|s| s.wrapping_add(1)));
    let mut blue = builtin_provider(&args.blue, seed.map(|s| s.wrapping_add(2)));
    let mut seats = Seats::new(red.as_mut(), blue.as_mut());

    run_batch(&mut runner, args.games, &mut seats, leaderboard)
        .with_context(|| format!("Simulation stopped; store {}", args.store.display()))
}

/// Report batch results
fn report_results(report: &BatchReport, standings: &[ModelStat], args: &SimulateArgs) -> Result<()> {
    if args.json {
        print_json_results(report, standings)
    } else {
        print_text_results(report, standings);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn build_config(args: &SimulateArgs, seed: Option<u64>) -> SimulationConfig {
    let mut config = SimulationConfig::new(args.starting_team)
        .with_failure_policy(args.policy)
        .with_max_steps(args.max_steps);

    if let Some(ms) = args.delay_ms {
        config = config.with_move_delay(Duration::from_millis(ms));
    }
    if let Some(s) = seed {
        config = config.with_seed(s);
    }

    config
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Print results as JSON
fn print_json_results(report: &BatchReport, standings: &[ModelStat]) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        #[serde(flatten)]
        report: &'a BatchReport,
        leaderboard: &'a [ModelStat],
    }

    let json = serde_json::to_string_pretty(&JsonOutput {
        report,
        leaderboard: standings,
    })?;
    println!("{}", json);
    Ok(())
}

/// Print results as text
fn print_text_results(report: &BatchReport, standings: &[ModelStat]) {
    let summary = &report.summary;

    println!("\n=== Session Results ===");
    println!("Games played: {}", summary.total_games);
    println!(
        "Red wins:     {} ({:.1}%)",
        summary.red_wins,
        percentage(summary.red_wins, summary.total_games)
    );
    println!(
        "Blue wins:    {} ({:.1}%)",
        summary.blue_wins,
        percentage(summary.blue_wins, summary.total_games)
    );
    println!("Avg turns:    {:.1}", summary.average_turns);

    if !report.aborted.is_empty() {
        println!("\nAborted: {}", report.aborted.len());
        for game in &report.aborted {
            println!("  Game {}: {}", game.game_number, game.reason);
        }
    }

    println!();
    crate::leaderboard::print_table(standings);
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
