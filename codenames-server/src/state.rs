//! Server state management
//!
//! Shared leaderboard plus the single live game session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};

use codenames_arena::{
    builtin_provider, run_batch, BatchReport, GameRunner, Leaderboard, MatchDraft, MatchRecord,
    MemoryStore, MoveProvider, Seats, SimulationConfig, StepOutcome,
};
use codenames_core::{GameState, Team};

use crate::error::ApiError;

/// Model id used when a request names none
pub const DEFAULT_MODEL: &str = "random";

/// One live game driven step by step over HTTP
pub struct GameSession {
    runner: GameRunner,
    state: GameState,
    red: Box<dyn MoveProvider>,
    blue: Box<dyn MoveProvider>,
    record: Option<MatchRecord>,
}

impl GameSession {
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn model_id(&self, team: Team) -> &str {
        match team {
            Team::Red => self.red.model_id(),
            Team::Blue => self.blue.model_id(),
        }
    }

    /// Record stored when the game finished
    pub fn record(&self) -> Option<&MatchRecord> {
        self.record.as_ref()
    }

    /// Advance one step; the finished game is recorded exactly once.
    /// A finished game whose record failed to store is retried here
    /// before the step reports the game as over.
    pub fn step(&mut self, leaderboard: &Leaderboard) -> codenames_arena::Result<StepOutcome> {
        if self.state.is_over() {
            self.record_if_finished(leaderboard)?;
        }

        let mut seats = Seats::new(self.red.as_mut(), self.blue.as_mut());
        let outcome = self.runner.step(&mut self.state, &mut seats)?;
        self.record_if_finished(leaderboard)?;

        Ok(outcome)
    }

    fn record_if_finished(&mut self, leaderboard: &Leaderboard) -> codenames_arena::Result<()> {
        let Some(winner) = self.state.winner().filter(|_| self.record.is_none()) else {
            return Ok(());
        };

        let draft = MatchDraft::new(
            self.red.model_id(),
            self.blue.model_id(),
            winner,
            self.state.turn_number(),
        );
        let record = leaderboard.record(draft)?;
        tracing::info!(
            "Live game over: {} wins in {} turns",
            record.winner,
            record.turns
        );
        self.record = Some(record);
        Ok(())
    }
}

/// Server-wide shared state
pub struct ServerState {
    pub leaderboard: Leaderboard,
    pub session: Mutex<Option<GameSession>>,
    simulation: SimulationConfig,
    /// Games started so far; offsets the base seed per game
    started: AtomicU64,
}

impl ServerState {
    pub fn new(leaderboard: Leaderboard, simulation: SimulationConfig) -> Self {
        Self {
            leaderboard,
            session: Mutex::new(None),
            simulation,
            started: AtomicU64::new(0),
        }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(simulation: SimulationConfig) -> Self {
        Self::new(Leaderboard::new(std::sync::Arc::new(MemoryStore::new())), simulation)
    }

    pub fn lock_session(&self) -> Result<MutexGuard<'_, Option<GameSession>>, ApiError> {
        self.session
            .lock()
            .map_err(|_| ApiError::internal("game session lock poisoned"))
    }

    /// Session lock for async handlers; 503 while a step holds it
    pub fn try_lock_session(&self) -> Result<MutexGuard<'_, Option<GameSession>>, ApiError> {
        self.session.try_lock().map_err(|err| match err {
            TryLockError::WouldBlock => ApiError::unavailable("a game step is in progress"),
            TryLockError::Poisoned(_) => ApiError::internal("game session lock poisoned"),
        })
    }

    /// True when a game is unfinished or a step is running
    pub fn game_active(&self) -> bool {
        match self.session.try_lock() {
            Ok(session) => session.as_ref().is_some_and(|g| !g.state().is_over()),
            Err(TryLockError::WouldBlock) => true,
            Err(TryLockError::Poisoned(_)) => false,
        }
    }

    /// Replace the live game with a fresh one
    pub fn start_game(
        &self,
        starting_team: Option<Team>,
        red_model: &str,
        blue_model: &str,
    ) -> Result<GameState, ApiError> {
        let (mut runner, red, blue) = self.prepare(starting_team, red_model, blue_model);
        let team = runner.config().starting_team;
        let state = runner.start_game(team)?;

        tracing::info!(
            "Live game started: {} (red) vs {} (blue), {} opens",
            red_model,
            blue_model,
            state.current_team()
        );

        let mut session = self.try_lock_session()?;
        *session = Some(GameSession {
            runner,
            state: state.clone(),
            red,
            blue,
            record: None,
        });

        Ok(state)
    }

    /// Run a batch on the shared leaderboard; blocks until every game ran
    pub fn simulate(
        &self,
        games: usize,
        starting_team: Option<Team>,
        red_model: &str,
        blue_model: &str,
    ) -> Result<BatchReport, ApiError> {
        let (mut runner, mut red, mut blue) = self.prepare(starting_team, red_model, blue_model);
        let mut seats = Seats::new(red.as_mut(), blue.as_mut());
        Ok(run_batch(&mut runner, games, &mut seats, &self.leaderboard)?)
    }

    fn prepare(
        &self,
        starting_team: Option<Team>,
        red_model: &str,
        blue_model: &str,
    ) -> (GameRunner, Box<dyn MoveProvider>, Box<dyn MoveProvider>) {
        let n = self.started.fetch_add(1, Ordering::Relaxed);
        let base = self.simulation.seed.map(|s| s.wrapping_add(n.wrapping_mul(3)));

        let mut config = self.simulation.clone();
        config.seed = base;
        if let Some(team) = starting_team {
            config.starting_team = team;
        }

        (
            GameRunner::new(config),
            builtin_provider(red_model, base.map(|s| s.wrapping_add(1))),
            builtin_provider(blue_model, base.map(|s| s.wrapping_add(2))),
        )
    }
}
