//! Batch execution - sequential games between two seats
//!
//! Level 1 - Orchestration

use serde::Serialize;

use crate::error::Result;
use crate::game_runner::GameRunner;
use crate::leaderboard::Leaderboard;
use crate::provider::Seats;
use crate::record::MatchRecord;

/// Game that ended without a winner
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortedGame {
    /// 1-based position in the batch
    pub game_number: usize,
    pub reason: String,
}

/// Totals over the games of one batch
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_games: usize,
    pub red_wins: usize,
    pub blue_wins: usize,
    pub average_turns: f64,
}

impl SessionSummary {
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let total_games = records.len();
        let red_wins = records
            .iter()
            .filter(|r| r.winner == codenames_core::Team::Red)
            .count();
        let turns: u64 = records.iter().map(|r| r.turns as u64).sum();
        let average_turns = if total_games == 0 {
            0.0
        } else {
            turns as f64 / total_games as f64
        };

        Self {
            total_games,
            red_wins,
            blue_wins: total_games - red_wins,
            average_turns,
        }
    }
}

/// Everything a batch produced
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Records persisted for finished games, in play order
    pub records: Vec<MatchRecord>,
    pub aborted: Vec<AbortedGame>,
    pub summary: SessionSummary,
}

/// Play `games` games one after another, recording each finished game
///
/// A game that fails (provider error, step limit) is skipped and the batch
/// moves on. A store failure stops the batch.
pub fn run_batch(
    runner: &mut GameRunner,
    games: usize,
    seats: &mut Seats<'_>,
    leaderboard: &Leaderboard,
) -> Result<BatchReport> {
    let red_id = seats.model_id(codenames_core::Team::Red).to_string();
    let blue_id = seats.model_id(codenames_core::Team::Blue).to_string();

    tracing::info!(
        "Starting batch: {} games, {} (red) vs {} (blue)",
        games,
        red_id,
        blue_id
    );

    let mut records = Vec::with_capacity(games);
    let mut aborted = Vec::new();

    for game_number in 1..=games {
        let outcome = match runner.play_game(seats) {
            Ok(outcome) => outcome,
            Err(e) if e.is_per_game() => {
                tracing::warn!("Game {}/{} aborted: {}", game_number, games, e);
                aborted.push(AbortedGame {
                    game_number,
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let Some(draft) = outcome.to_draft(&red_id, &blue_id) else {
            aborted.push(AbortedGame {
                game_number,
                reason: "game ended without a winner".to_string(),
            });
            continue;
        };

        let record = leaderboard.record(draft)?;
        tracing::info!(
            "Game {}/{}: {} wins in {} turns",
            game_number,
            games,
            record.winner,
            record.turns
        );
        records.push(record);
    }

    let summary = SessionSummary::from_records(&records);
    tracing::info!(
        "Batch complete: {} played, {} aborted, red {} / blue {}, avg {:.1} turns",
        summary.total_games,
        aborted.len(),
        summary.red_wins,
        summary.blue_wins,
        summary.average_turns
    );

    Ok(BatchReport {
        records,
        aborted,
        summary,
    })
}
