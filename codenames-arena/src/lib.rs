//! Codenames Arena - Simulation and leaderboard
//!
//! This crate drives agent-vs-agent games end to end:
//! - Move provider boundary (clue-givers and guessers)
//! - Single-game orchestration, one step at a time
//! - Sequential batches of games between two models
//! - Match persistence and per-model leaderboard
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_batch (orchestration)
//! - Level 2: GameRunner::play_game, Leaderboard (phases)
//! - Level 3: GameRunner::step, compute_stats (steps)
//! - Level 4: configuration, stores, records

mod batch;
mod config;
mod error;
mod game_runner;
mod leaderboard;
mod provider;
mod record;
mod store;

pub use batch::{run_batch, AbortedGame, BatchReport, SessionSummary};
pub use config::{ProviderFailurePolicy, SimulationConfig};
pub use error::{ArenaError, ProviderError, Result};
pub use game_runner::{GameOutcome, GameRunner, StepOutcome};
pub use leaderboard::{compute_stats, Leaderboard, ModelStat};
pub use provider::{builtin_provider, MoveProvider, RandomProvider, Seats};
pub use record::{now_millis, MatchDraft, MatchRecord};
pub use store::{JsonFileStore, MatchStore, MemoryStore};
