//! Game runner - executes single games
//!
//! Level 2 (play_game) and Level 3 (step) implementation

use codenames_core::{
    normalize_word, Board, Clue, CoreError, GameEvent, GameState, Phase, RevealOutcome, Team,
    WordBank, WordSource, MAX_CLUE_COUNT, MIN_CLUE_COUNT,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::{ProviderFailurePolicy, SimulationConfig};
use crate::error::{ArenaError, ProviderError, Result};
use crate::provider::{fallback_clue, random_unrevealed, Seats};
use crate::record::{now_millis, MatchDraft};

/// What a single step did
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StepOutcome {
    /// Spymaster clue accepted; guessing phase begins
    ClueGiven { clue: Clue },
    /// A guess resolved to a card and was revealed
    #[serde(rename_all = "camelCase")]
    Guessed {
        word: String,
        reveal: RevealOutcome,
        turn_switched: bool,
    },
    /// Guess did not match any unrevealed card; nothing changed
    Discarded { word: String },
}

/// Final state of a game played to completion
#[derive(Clone, Debug)]
pub struct GameOutcome {
    pub state: GameState,
    /// Steps taken, discarded guesses included
    pub steps: usize,
    /// Guesses that matched no unrevealed card
    pub discarded: usize,
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Team> {
        self.state.winner()
    }

    pub fn turns(&self) -> u32 {
        self.state.turn_number()
    }

    /// Record draft for the store; None if the game never finished
    pub fn to_draft(&self, red_model_id: &str, blue_model_id: &str) -> Option<MatchDraft> {
        self.winner()
            .map(|winner| MatchDraft::new(red_model_id, blue_model_id, winner, self.turns()))
    }
}

/// Game runner that plays games between two move providers
pub struct GameRunner {
    /// Simulation configuration
    config: SimulationConfig,
    /// Board vocabulary
    words: Box<dyn WordSource + Send>,
    /// Board shuffles and fallback guesses
    rng: ChaCha8Rng,
}

impl GameRunner {
    /// Create a runner using the built-in word bank
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_words(config, Box::new(WordBank::default()))
    }

    /// Create a runner drawing boards from a custom word source
    pub fn with_words(config: SimulationConfig, words: Box<dyn WordSource + Send>) -> Self {
        let rng = match config.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { config, words, rng }
    }

    /// Get configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Fresh board and initial state for a new game
    pub fn start_game(&mut self, starting_team: Team) -> Result<GameState> {
        let board = Board::generate(starting_team, self.words.as_mut(), &mut self.rng)?;
        Ok(GameState::new(board, starting_team))
    }

    /// Advance the game by exactly one clue or one guess
    pub fn step(&mut self, state: &mut GameState, seats: &mut Seats<'_>) -> Result<StepOutcome> {
        if state.is_over() {
            return Err(CoreError::GameOver.into());
        }

        match state.current_phase() {
            Phase::Spymaster => self.clue_step(state, seats),
            Phase::Operative => self.guess_step(state, seats),
        }
    }

    /// Play one game on a fresh board until it ends
    pub fn play_game(&mut self, seats: &mut Seats<'_>) -> Result<GameOutcome> {
        let mut state = self.start_game(self.config.starting_team)?;
        let mut steps = 0;
        let mut discarded = 0;

        tracing::debug!(
            "Game start: {} (red) vs {} (blue), {} opens",
            seats.model_id(Team::Red),
            seats.model_id(Team::Blue),
            state.current_team()
        );

        while !state.is_over() {
            if steps >= self.config.max_steps {
                return Err(ArenaError::StepLimitExceeded {
                    limit: self.config.max_steps,
                });
            }

            if let StepOutcome::Discarded { .. } = self.step(&mut state, seats)? {
                discarded += 1;
            }
            steps += 1;

            if let Some(delay) = self.config.move_delay {
                std::thread::sleep(delay);
            }
        }

        Ok(GameOutcome {
            state,
            steps,
            discarded,
        })
    }

    // ========================================================================
    // STEPS
    // ========================================================================

    fn clue_step(&mut self, state: &mut GameState, seats: &mut Seats<'_>) -> Result<StepOutcome> {
        let team = state.current_team();
        let provider = seats.for_team(team);

        let requested = provider
            .request_clue(&state.spymaster_view(), team)
            .and_then(|clue| validate_clue(clue, team));

        let clue = match requested {
            Ok(clue) => clue,
            Err(e) => self.recover_clue(provider.model_id(), team, e)?,
        };

        state.apply_clue(clue.clone())?;
        state.push_event(GameEvent::ClueGiven {
            turn: state.turn_number(),
            team,
            clue: clue.clone(),
            timestamp: now_millis(),
        });

        tracing::debug!(
            "Turn {}: {} clue {} ({})",
            state.turn_number(),
            team,
            clue.word,
            clue.count
        );

        Ok(StepOutcome::ClueGiven { clue })
    }

    fn guess_step(&mut self, state: &mut GameState, seats: &mut Seats<'_>) -> Result<StepOutcome> {
        let team = state.current_team();
        let clue = state
            .current_clue()
            .cloned()
            .ok_or(CoreError::WrongPhase {
                expected: Phase::Operative,
                actual: state.current_phase(),
            })?;
        let provider = seats.for_team(team);
        let view = state.operative_view();

        let word = match provider.request_guess(&view, team, &clue) {
            Ok(word) => word,
            Err(e) => match self.config.failure_policy {
                ProviderFailurePolicy::AbortGame => {
                    return Err(provider_failure(provider.model_id(), e))
                }
                ProviderFailurePolicy::RandomFallback => {
                    let word = random_unrevealed(&view, &mut self.rng)
                        .ok_or_else(|| provider_failure(provider.model_id(), e.clone()))?;
                    tracing::warn!(
                        "Provider '{}' failed ({}); guessing random word {}",
                        provider.model_id(),
                        e,
                        word
                    );
                    word
                }
            },
        };

        let index = match state.board().find_unrevealed(&word) {
            Some(index) => index,
            None => {
                tracing::warn!(
                    "Turn {}: {} guess '{}' matches no unrevealed card, discarded",
                    state.turn_number(),
                    team,
                    word.trim()
                );
                return Ok(StepOutcome::Discarded { word });
            }
        };

        let card_type = state.board().cards()[index].card_type;
        let card_word = state.board().cards()[index].word.clone();
        let turn = state.turn_number();

        let reveal = state.reveal_card(index)?;
        state.push_event(GameEvent::GuessMade {
            turn,
            team,
            word: card_word.clone(),
            correct: card_type == team.card_type(),
            revealed_type: card_type,
            timestamp: now_millis(),
        });

        tracing::debug!("Turn {}: {} guessed {} -> {}", turn, team, card_word, card_type);

        let turn_switched = !state.is_over() && state.guesses_remaining() == 0;
        if turn_switched {
            state.switch_turn()?;
        }

        Ok(StepOutcome::Guessed {
            word: card_word,
            reveal,
            turn_switched,
        })
    }

    /// Apply the failure policy to a failed or malformed clue request
    fn recover_clue(&self, model_id: &str, team: Team, error: ProviderError) -> Result<Clue> {
        match self.config.failure_policy {
            ProviderFailurePolicy::AbortGame => Err(provider_failure(model_id, error)),
            ProviderFailurePolicy::RandomFallback => {
                tracing::warn!(
                    "Provider '{}' failed ({}); substituting fallback clue",
                    model_id,
                    error
                );
                Ok(fallback_clue(team))
            }
        }
    }
}

/// Boundary check for provider clues: one token, count in range, right team
fn validate_clue(clue: Clue, team: Team) -> std::result::Result<Clue, ProviderError> {
    let word = clue.word.trim();
    if word.is_empty() || word.split_whitespace().count() != 1 {
        return Err(ProviderError::InvalidResponse(format!(
            "clue '{}' is not a single word",
            clue.word
        )));
    }
    if !(MIN_CLUE_COUNT..=MAX_CLUE_COUNT).contains(&clue.count) {
        return Err(ProviderError::InvalidResponse(format!(
            "clue count {} outside {}..={}",
            clue.count, MIN_CLUE_COUNT, MAX_CLUE_COUNT
        )));
    }
    if clue.team != team {
        return Err(ProviderError::InvalidResponse(format!(
            "clue for {} requested, got one for {}",
            team, clue.team
        )));
    }

    Ok(Clue::new(normalize_word(word), clue.count, team))
}

fn provider_failure(model_id: &str, source: ProviderError) -> ArenaError {
    ArenaError::InvalidMoveProviderResponse {
        model_id: model_id.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MoveProvider, RandomProvider};
    use codenames_core::{CardType, OperativeView, SpymasterView};
    use std::collections::VecDeque;

    /// Replays a fixed list of clues and guesses
    struct Scripted {
        id: String,
        clues: VecDeque<std::result::Result<Clue, ProviderError>>,
        guesses: VecDeque<std::result::Result<String, ProviderError>>,
    }

    impl Scripted {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                clues: VecDeque::new(),
                guesses: VecDeque::new(),
            }
        }

        fn clue(mut self, word: &str, count: u8, team: Team) -> Self {
            self.clues.push_back(Ok(Clue::new(word, count, team)));
            self
        }

        fn guess(mut self, word: &str) -> Self {
            self.guesses.push_back(Ok(word.to_string()));
            self
        }

        fn failing_guess(mut self) -> Self {
            self.guesses
                .push_back(Err(ProviderError::Unavailable("timeout".to_string())));
            self
        }
    }

    impl MoveProvider for Scripted {
        fn model_id(&self) -> &str {
            &self.id
        }

        fn request_clue(
            &mut self,
            _view: &SpymasterView,
            _team: Team,
        ) -> std::result::Result<Clue, ProviderError> {
            self.clues
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::InvalidResponse("script exhausted".into())))
        }

        fn request_guess(
            &mut self,
            _view: &OperativeView,
            _team: Team,
            _clue: &Clue,
        ) -> std::result::Result<String, ProviderError> {
            self.guesses
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::InvalidResponse("script exhausted".into())))
        }
    }

    fn runner(policy: ProviderFailurePolicy) -> GameRunner {
        GameRunner::new(
            SimulationConfig::default()
                .with_seed(42)
                .with_failure_policy(policy),
        )
    }

    fn word_of(state: &GameState, card_type: CardType, nth: usize) -> String {
        state
            .board()
            .iter()
            .filter(|c| c.card_type == card_type)
            .nth(nth)
            .map(|c| c.word.clone())
            .unwrap()
    }

    #[test]
    fn test_start_game_fresh_board() {
        let mut runner = runner(ProviderFailurePolicy::AbortGame);
        let state = runner.start_game(Team::Blue).unwrap();
        assert_eq!(state.current_team(), Team::Blue);
        assert_eq!(state.blue_remaining(), 9);
        assert_eq!(state.red_remaining(), 8);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_clue_then_guesses_switch_turn() {
        let mut runner = runner(ProviderFailurePolicy::AbortGame);
        let mut state = runner.start_game(Team::Red).unwrap();
        let red_word = word_of(&state, CardType::Red, 0);
        let neutral_word = word_of(&state, CardType::Neutral, 0);

        let mut red = Scripted::new("red-model")
            .clue("animal", 2, Team::Red)
            .guess(&red_word.to_lowercase())
            .guess(&neutral_word);
        let mut blue = Scripted::new("blue-model");
        let mut seats = Seats::new(&mut red, &mut blue);

        let outcome = runner.step(&mut state, &mut seats).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::ClueGiven {
                clue: Clue::new("ANIMAL", 2, Team::Red)
            }
        );
        assert_eq!(state.guesses_remaining(), 3);

        let outcome = runner.step(&mut state, &mut seats).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Guessed {
                word: red_word.clone(),
                reveal: RevealOutcome::Correct,
                turn_switched: false
            }
        );
        assert_eq!(state.guesses_remaining(), 2);
        assert_eq!(state.red_remaining(), 8);

        let outcome = runner.step(&mut state, &mut seats).unwrap();
        assert!(matches!(outcome, StepOutcome::Guessed { turn_switched: true, .. }));
        assert!(!state.is_over());
        assert_eq!(state.current_team(), Team::Blue);
        assert_eq!(state.current_phase(), Phase::Spymaster);
        assert_eq!(state.turn_number(), 2);

        let history = state.history();
        assert_eq!(history.len(), 3);
        assert!(matches!(history[0], GameEvent::ClueGiven { turn: 1, .. }));
        assert!(matches!(
            &history[1],
            GameEvent::GuessMade { correct: true, revealed_type: CardType::Red, .. }
        ));
        assert!(matches!(
            &history[2],
            GameEvent::GuessMade { correct: false, revealed_type: CardType::Neutral, .. }
        ));
    }

    #[test]
    fn test_unresolvable_guess_is_discarded() {
        let mut runner = runner(ProviderFailurePolicy::AbortGame);
        let mut state = runner.start_game(Team::Red).unwrap();

        let mut red = Scripted::new("r").clue("hint", 1, Team::Red).guess("NOT-ON-BOARD");
        let mut blue = Scripted::new("b");
        let mut seats = Seats::new(&mut red, &mut blue);

        runner.step(&mut state, &mut seats).unwrap();
        let outcome = runner.step(&mut state, &mut seats).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Discarded {
                word: "NOT-ON-BOARD".to_string()
            }
        );
        assert_eq!(state.current_phase(), Phase::Operative);
        assert_eq!(state.guesses_remaining(), 2);
        assert_eq!(state.history().len(), 1);
        assert!(state.board().iter().all(|c| !c.revealed));
    }

    #[test]
    fn test_already_revealed_guess_is_discarded() {
        let mut runner = runner(ProviderFailurePolicy::AbortGame);
        let mut state = runner.start_game(Team::Red).unwrap();
        let red_word = word_of(&state, CardType::Red, 0);

        let mut red = Scripted::new("r")
            .clue("hint", 2, Team::Red)
            .guess(&red_word)
            .guess(&red_word);
        let mut blue = Scripted::new("b");
        let mut seats = Seats::new(&mut red, &mut blue);

        runner.step(&mut state, &mut seats).unwrap();
        runner.step(&mut state, &mut seats).unwrap();
        let outcome = runner.step(&mut state, &mut seats).unwrap();
        assert!(matches!(outcome, StepOutcome::Discarded { .. }));
        assert_eq!(state.guesses_remaining(), 2);
    }

    #[test]
    fn test_provider_failure_aborts_game() {
        let mut runner = runner(ProviderFailurePolicy::AbortGame);
        let mut state = runner.start_game(Team::Red).unwrap();

        let mut red = Scripted::new("flaky").clue("hint", 1, Team::Red).failing_guess();
        let mut blue = Scripted::new("b");
        let mut seats = Seats::new(&mut red, &mut blue);

        runner.step(&mut state, &mut seats).unwrap();
        let err = runner.step(&mut state, &mut seats).unwrap_err();
        match err {
            ArenaError::InvalidMoveProviderResponse { model_id, source } => {
                assert_eq!(model_id, "flaky");
                assert_eq!(source, ProviderError::Unavailable("timeout".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_clue_rejected_at_boundary() {
        let mut runner = runner(ProviderFailurePolicy::AbortGame);
        let mut state = runner.start_game(Team::Red).unwrap();

        let mut red = Scripted::new("r").clue("two words", 2, Team::Red);
        let mut blue = Scripted::new("b");
        let mut seats = Seats::new(&mut red, &mut blue);

        let err = runner.step(&mut state, &mut seats).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidMoveProviderResponse { .. }));
        assert_eq!(state.current_phase(), Phase::Spymaster);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_random_fallback_substitutes_moves() {
        let mut runner = runner(ProviderFailurePolicy::RandomFallback);
        let mut state = runner.start_game(Team::Red).unwrap();

        let mut red = Scripted::new("r").clue("", 0, Team::Red).failing_guess();
        let mut blue = Scripted::new("b");
        let mut seats = Seats::new(&mut red, &mut blue);

        let outcome = runner.step(&mut state, &mut seats).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::ClueGiven {
                clue: Clue::new("STRATEGY", 1, Team::Red)
            }
        );

        let outcome = runner.step(&mut state, &mut seats).unwrap();
        assert!(matches!(outcome, StepOutcome::Guessed { .. }));
        assert_eq!(state.board().iter().filter(|c| c.revealed).count(), 1);
    }

    #[test]
    fn test_step_after_game_over_errors() {
        let mut runner = runner(ProviderFailurePolicy::AbortGame);
        let mut state = runner.start_game(Team::Red).unwrap();
        let assassin = word_of(&state, CardType::Assassin, 0);

        let mut red = Scripted::new("r").clue("hint", 1, Team::Red).guess(&assassin);
        let mut blue = Scripted::new("b");
        let mut seats = Seats::new(&mut red, &mut blue);

        runner.step(&mut state, &mut seats).unwrap();
        let outcome = runner.step(&mut state, &mut seats).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Guessed {
                word: assassin,
                reveal: RevealOutcome::Assassin { winner: Team::Blue },
                turn_switched: false
            }
        );
        assert_eq!(state.winner(), Some(Team::Blue));
        assert!(matches!(
            runner.step(&mut state, &mut seats),
            Err(ArenaError::Core(CoreError::GameOver))
        ));
    }

    #[test]
    fn test_play_game_random_providers_finishes() {
        let mut runner = runner(ProviderFailurePolicy::AbortGame);
        let mut red = RandomProvider::new("alpha", Some(1));
        let mut blue = RandomProvider::new("beta", Some(2));
        let mut seats = Seats::new(&mut red, &mut blue);

        let outcome = runner.play_game(&mut seats).unwrap();
        assert!(outcome.state.is_over());
        assert!(outcome.winner().is_some());
        assert_eq!(outcome.discarded, 0);
        assert!(outcome.steps >= 2);

        let draft = outcome.to_draft("alpha", "beta").unwrap();
        assert_eq!(draft.turns, outcome.turns());
        assert_eq!(Some(draft.winner), outcome.winner());
    }

    #[test]
    fn test_play_game_step_limit() {
        let mut runner = GameRunner::new(SimulationConfig::default().with_seed(1).with_max_steps(3));
        let mut red = Scripted::new("r")
            .clue("hint", 1, Team::Red)
            .guess("nope")
            .guess("nope")
            .guess("nope");
        let mut blue = Scripted::new("b");
        let mut seats = Seats::new(&mut red, &mut blue);

        let err = runner.play_game(&mut seats).unwrap_err();
        assert!(matches!(err, ArenaError::StepLimitExceeded { limit: 3 }));
    }

    #[test]
    fn test_validate_clue_normalizes() {
        let clue = validate_clue(Clue::new("  ocean ", 4, Team::Blue), Team::Blue).unwrap();
        assert_eq!(clue.word, "OCEAN");
        assert!(validate_clue(Clue::new("ocean", 4, Team::Red), Team::Blue).is_err());
        assert!(validate_clue(Clue::new("ocean", 10, Team::Blue), Team::Blue).is_err());
    }

    #[test]
    fn test_validate_clue_uppercases_non_ascii() {
        let clue = validate_clue(Clue::new("éclair", 2, Team::Red), Team::Red).unwrap();
        assert_eq!(clue.word, "ÉCLAIR");
    }
}
