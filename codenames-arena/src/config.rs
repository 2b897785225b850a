//! Configuration types for simulation runs
//!
//! Level 4 - Utilities and configuration

use std::time::Duration;

use codenames_core::Team;

/// What to do when a move provider call fails or returns garbage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderFailurePolicy {
    /// Abort the current game; a batch moves on to the next one
    AbortGame,
    /// Substitute a legal fallback move and keep playing
    RandomFallback,
}

impl Default for ProviderFailurePolicy {
    fn default() -> Self {
        ProviderFailurePolicy::AbortGame
    }
}

impl std::str::FromStr for ProviderFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "abort-game" => Ok(ProviderFailurePolicy::AbortGame),
            "random" | "random-fallback" => Ok(ProviderFailurePolicy::RandomFallback),
            other => Err(format!("unknown failure policy '{}' (expected abort or random)", other)),
        }
    }
}

/// Simulation configuration
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Team giving the first clue in every game
    pub starting_team: Team,
    /// Provider failure handling
    pub failure_policy: ProviderFailurePolicy,
    /// Maximum steps (clues, guesses and discarded guesses) per game
    pub max_steps: usize,
    /// Optional pause between steps, for playback only
    pub move_delay: Option<Duration>,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            starting_team: Team::Red,
            failure_policy: ProviderFailurePolicy::AbortGame,
            max_steps: 500,
            move_delay: None,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Config with the given starting team
    pub fn new(starting_team: Team) -> Self {
        Self {
            starting_team,
            ..Default::default()
        }
    }

    /// Set provider failure policy
    pub fn with_failure_policy(mut self, policy: ProviderFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set per-game step limit
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set pacing delay between steps
    pub fn with_move_delay(mut self, delay: Duration) -> Self {
        self.move_delay = Some(delay);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
