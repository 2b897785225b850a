//! Game state and turn/phase transitions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, CardType, Team};
use crate::error::{CoreError, Result};
use crate::view::{OperativeView, SpymasterView};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest count a clue may carry
pub const MIN_CLUE_COUNT: u8 = 1;

/// Largest count a clue may carry
pub const MAX_CLUE_COUNT: u8 = 9;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Turn phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Clue-giver sees every identity and produces a clue
    Spymaster,
    /// Guessers see revealed identities only and pick words
    Operative,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Spymaster => f.write_str("spymaster"),
            Phase::Operative => f.write_str("operative"),
        }
    }
}

/// One-word clue plus the number of related cards
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub word: String,
    pub count: u8,
    pub team: Team,
}

impl Clue {
    pub fn new(word: impl Into<String>, count: u8, team: Team) -> Self {
        Self {
            word: word.into(),
            count,
            team,
        }
    }
}

/// Append-only log entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameEvent {
    #[serde(rename_all = "camelCase")]
    ClueGiven {
        turn: u32,
        team: Team,
        clue: Clue,
        timestamp: u64,
    },
    #[serde(rename_all = "camelCase")]
    GuessMade {
        turn: u32,
        team: Team,
        word: String,
        correct: bool,
        revealed_type: CardType,
        timestamp: u64,
    },
}

impl GameEvent {
    pub fn turn(&self) -> u32 {
        match self {
            GameEvent::ClueGiven { turn, .. } | GameEvent::GuessMade { turn, .. } => *turn,
        }
    }

    pub fn team(&self) -> Team {
        match self {
            GameEvent::ClueGiven { team, .. } | GameEvent::GuessMade { team, .. } => *team,
        }
    }
}

/// What a reveal did to the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum RevealOutcome {
    /// Card was already face up or the game was over
    Unchanged,
    /// Guessing team's own card; budget decremented
    Correct,
    /// Opponent or neutral card; turn is over
    #[serde(rename_all = "camelCase")]
    Wrong { card_type: CardType },
    /// Guessing team lost instantly
    Assassin { winner: Team },
    /// A team's last card was revealed
    TeamDepleted { winner: Team },
}

impl RevealOutcome {
    pub fn ends_game(&self) -> bool {
        matches!(self, RevealOutcome::Assassin { .. } | RevealOutcome::TeamDepleted { .. })
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Full state of one game
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    board: Board,
    current_team: Team,
    current_phase: Phase,
    red_remaining: usize,
    blue_remaining: usize,
    turn_number: u32,
    current_clue: Option<Clue>,
    guesses_remaining: u8,
    game_over: bool,
    winner: Option<Team>,
    history: Vec<GameEvent>,

    /// Whether the first turn has begun; `start_turn` only advances
    /// `turn_number` after that
    #[serde(skip)]
    turn_started: bool,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game on the given board, `starting_team` to give the first clue
    pub fn new(board: Board, starting_team: Team) -> Self {
        let red_remaining = board.unrevealed_of(CardType::Red);
        let blue_remaining = board.unrevealed_of(CardType::Blue);

        Self {
            board,
            current_team: starting_team,
            current_phase: Phase::Spymaster,
            red_remaining,
            blue_remaining,
            turn_number: 1,
            current_clue: None,
            guesses_remaining: 0,
            game_over: false,
            winner: None,
            history: Vec::new(),
            turn_started: false,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_team(&self) -> Team {
        self.current_team
    }

    pub fn current_phase(&self) -> Phase {
        self.current_phase
    }

    pub fn red_remaining(&self) -> usize {
        self.red_remaining
    }

    pub fn blue_remaining(&self) -> usize {
        self.blue_remaining
    }

    /// Remaining agent cards for a team
    pub fn remaining(&self, team: Team) -> usize {
        match team {
            Team::Red => self.red_remaining,
            Team::Blue => self.blue_remaining,
        }
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn current_clue(&self) -> Option<&Clue> {
        self.current_clue.as_ref()
    }

    pub fn guesses_remaining(&self) -> u8 {
        self.guesses_remaining
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    /// Board as the clue-giver sees it
    pub fn spymaster_view(&self) -> SpymasterView {
        SpymasterView::from_state(self)
    }

    /// Board as the guessers see it
    pub fn operative_view(&self) -> OperativeView {
        OperativeView::from_state(self)
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Begin a turn for `team` in the spymaster phase
    pub fn start_turn(&mut self, team: Team) -> Result<()> {
        if self.game_over {
            return Err(CoreError::GameOver);
        }

        if self.turn_started {
            self.turn_number += 1;
        }
        self.turn_started = true;

        self.current_team = team;
        self.current_phase = Phase::Spymaster;
        self.current_clue = None;
        self.guesses_remaining = 0;
        Ok(())
    }

    /// Accept the spymaster's clue and open the guess budget (count + 1)
    ///
    /// A clue word that appears on the board is not rejected here.
    pub fn apply_clue(&mut self, clue: Clue) -> Result<()> {
        if self.game_over {
            return Err(CoreError::GameOver);
        }
        if self.current_phase != Phase::Spymaster {
            return Err(CoreError::WrongPhase {
                expected: Phase::Spymaster,
                actual: self.current_phase,
            });
        }
        if clue.team != self.current_team {
            return Err(CoreError::WrongTeam {
                expected: self.current_team,
                actual: clue.team,
            });
        }
        if !(MIN_CLUE_COUNT..=MAX_CLUE_COUNT).contains(&clue.count) {
            return Err(CoreError::InvalidClueCount(clue.count));
        }

        self.turn_started = true;
        self.guesses_remaining = clue.count + 1;
        self.current_clue = Some(clue);
        self.current_phase = Phase::Operative;
        Ok(())
    }

    /// Flip a card and resolve its effect on the game
    pub fn reveal_card(&mut self, index: usize) -> Result<RevealOutcome> {
        let card_type = match self.board.get(index) {
            Some(card) => card.card_type,
            None => {
                return Err(CoreError::CardIndexOutOfRange {
                    index,
                    len: self.board.len(),
                })
            }
        };

        if self.game_over || !self.board.reveal(index) {
            return Ok(RevealOutcome::Unchanged);
        }

        match card_type {
            CardType::Red => self.red_remaining = self.red_remaining.saturating_sub(1),
            CardType::Blue => self.blue_remaining = self.blue_remaining.saturating_sub(1),
            CardType::Neutral | CardType::Assassin => {}
        }

        if card_type == CardType::Assassin {
            let winner = self.current_team.opponent();
            self.finish(winner);
            return Ok(RevealOutcome::Assassin { winner });
        }

        if let Some(winner) = self.depleted_team() {
            self.finish(winner);
            return Ok(RevealOutcome::TeamDepleted { winner });
        }

        if card_type == self.current_team.card_type() {
            self.guesses_remaining = self.guesses_remaining.saturating_sub(1);
            Ok(RevealOutcome::Correct)
        } else {
            self.guesses_remaining = 0;
            Ok(RevealOutcome::Wrong { card_type })
        }
    }

    /// Hand the turn to the other team
    pub fn switch_turn(&mut self) -> Result<()> {
        if self.game_over {
            return Err(CoreError::GameOver);
        }

        self.turn_started = true;
        self.start_turn(self.current_team.opponent())
    }

    /// Append an event to the history
    pub fn push_event(&mut self, event: GameEvent) {
        self.history.push(event);
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn depleted_team(&self) -> Option<Team> {
        if self.red_remaining == 0 {
            Some(Team::Red)
        } else if self.blue_remaining == 0 {
            Some(Team::Blue)
        } else {
            None
        }
    }

    fn finish(&mut self, winner: Team) {
        self.game_over = true;
        self.winner = Some(winner);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Card;

    /// Red starts: cards 0..9 red, 9..17 blue, 17..24 neutral, 24 assassin
    fn fixed_board() -> Board {
        let cards = (0..25)
            .map(|i| {
                let card_type = match i {
                    0..=8 => CardType::Red,
                    9..=16 => CardType::Blue,
                    17..=23 => CardType::Neutral,
                    _ => CardType::Assassin,
                };
                Card::new(format!("WORD{}", i), card_type)
            })
            .collect();
        Board::from_cards(cards).unwrap()
    }

    fn new_game() -> GameState {
        GameState::new(fixed_board(), Team::Red)
    }

    fn clue(team: Team, count: u8) -> Clue {
        Clue::new("ANIMAL", count, team)
    }

    #[test]
    fn test_game_creation() {
        let game = new_game();
        assert_eq!(game.current_team(), Team::Red);
        assert_eq!(game.current_phase(), Phase::Spymaster);
        assert_eq!(game.red_remaining(), 9);
        assert_eq!(game.blue_remaining(), 8);
        assert_eq!(game.turn_number(), 1);
        assert_eq!(game.guesses_remaining(), 0);
        assert!(game.current_clue().is_none());
        assert!(!game.is_over());
        assert!(game.winner().is_none());
    }

    #[test]
    fn test_clue_opens_budget() {
        let mut game = new_game();
        game.apply_clue(clue(Team::Red, 2)).unwrap();
        assert_eq!(game.current_phase(), Phase::Operative);
        assert_eq!(game.guesses_remaining(), 3);
        assert_eq!(game.current_clue().unwrap().word, "ANIMAL");
    }

    #[test]
    fn test_clue_rejected_outside_spymaster_phase() {
        let mut game = new_game();
        game.apply_clue(clue(Team::Red, 1)).unwrap();
        let err = game.apply_clue(clue(Team::Red, 1)).unwrap_err();
        assert_eq!(
            err,
            CoreError::WrongPhase {
                expected: Phase::Spymaster,
                actual: Phase::Operative
            }
        );
    }

    #[test]
    fn test_clue_count_and_team_checked() {
        let mut game = new_game();
        assert_eq!(
            game.apply_clue(clue(Team::Red, 0)).unwrap_err(),
            CoreError::InvalidClueCount(0)
        );
        assert_eq!(
            game.apply_clue(clue(Team::Red, 10)).unwrap_err(),
            CoreError::InvalidClueCount(10)
        );
        assert!(matches!(
            game.apply_clue(clue(Team::Blue, 2)),
            Err(CoreError::WrongTeam { .. })
        ));
        assert_eq!(game.current_phase(), Phase::Spymaster);
    }

    #[test]
    fn test_clue_word_on_board_is_allowed() {
        let mut game = new_game();
        game.apply_clue(Clue::new("WORD3", 1, Team::Red)).unwrap();
        assert_eq!(game.current_phase(), Phase::Operative);
    }

    #[test]
    fn test_correct_then_neutral_guess() {
        let mut game = new_game();
        game.apply_clue(clue(Team::Red, 2)).unwrap();
        assert_eq!(game.guesses_remaining(), 3);

        assert_eq!(game.reveal_card(0).unwrap(), RevealOutcome::Correct);
        assert_eq!(game.guesses_remaining(), 2);
        assert_eq!(game.red_remaining(), 8);

        assert_eq!(
            game.reveal_card(17).unwrap(),
            RevealOutcome::Wrong { card_type: CardType::Neutral }
        );
        assert_eq!(game.guesses_remaining(), 0);
        assert!(!game.is_over());
    }

    #[test]
    fn test_opponent_card_counts_for_opponent() {
        let mut game = new_game();
        game.apply_clue(clue(Team::Red, 3)).unwrap();
        assert_eq!(
            game.reveal_card(9).unwrap(),
            RevealOutcome::Wrong { card_type: CardType::Blue }
        );
        assert_eq!(game.blue_remaining(), 7);
        assert_eq!(game.red_remaining(), 9);
        assert_eq!(game.guesses_remaining(), 0);
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut game = new_game();
        game.apply_clue(clue(Team::Red, 3)).unwrap();
        game.reveal_card(0).unwrap();
        let before = (game.red_remaining(), game.guesses_remaining(), game.is_over());

        assert_eq!(game.reveal_card(0).unwrap(), RevealOutcome::Unchanged);
        assert_eq!(
            (game.red_remaining(), game.guesses_remaining(), game.is_over()),
            before
        );
    }

    #[test]
    fn test_reveal_out_of_range() {
        let mut game = new_game();
        assert_eq!(
            game.reveal_card(25).unwrap_err(),
            CoreError::CardIndexOutOfRange { index: 25, len: 25 }
        );
    }

    #[test]
    fn test_assassin_loses_for_guessing_team() {
        for team in [Team::Red, Team::Blue] {
            let mut game = new_game();
            game.start_turn(team).unwrap();
            game.apply_clue(clue(team, 1)).unwrap();

            let outcome = game.reveal_card(24).unwrap();
            assert_eq!(outcome, RevealOutcome::Assassin { winner: team.opponent() });
            assert!(game.is_over());
            assert_eq!(game.winner(), Some(team.opponent()));
        }
    }

    #[test]
    fn test_assassin_beats_remaining_counts() {
        let mut game = new_game();
        game.apply_clue(clue(Team::Red, 9)).unwrap();
        for i in 0..8 {
            game.reveal_card(i).unwrap();
        }
        assert_eq!(game.red_remaining(), 1);
        game.reveal_card(24).unwrap();
        assert_eq!(game.winner(), Some(Team::Blue));
    }

    #[test]
    fn test_last_blue_card_wins_for_blue() {
        let mut game = new_game();
        game.switch_turn().unwrap();
        game.apply_clue(clue(Team::Blue, 9)).unwrap();
        for i in 9..16 {
            assert_eq!(game.reveal_card(i).unwrap(), RevealOutcome::Correct);
        }
        assert_eq!(game.blue_remaining(), 1);

        let outcome = game.reveal_card(16).unwrap();
        assert_eq!(outcome, RevealOutcome::TeamDepleted { winner: Team::Blue });
        assert_eq!(game.blue_remaining(), 0);
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Team::Blue));
    }

    #[test]
    fn test_depletion_by_opponent_guess() {
        let mut game = new_game();
        // Blue has one card left when red guesses it by mistake
        game.switch_turn().unwrap();
        game.apply_clue(clue(Team::Blue, 9)).unwrap();
        for i in 9..16 {
            game.reveal_card(i).unwrap();
        }
        game.switch_turn().unwrap();
        game.apply_clue(clue(Team::Red, 1)).unwrap();

        let outcome = game.reveal_card(16).unwrap();
        assert_eq!(outcome, RevealOutcome::TeamDepleted { winner: Team::Blue });
        // Depletion takes priority over budget bookkeeping
        assert_eq!(game.guesses_remaining(), 2);
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut game = new_game();
        game.apply_clue(clue(Team::Red, 1)).unwrap();
        game.reveal_card(24).unwrap();

        assert_eq!(game.reveal_card(0).unwrap(), RevealOutcome::Unchanged);
        assert!(!game.board().cards()[0].revealed);
        assert_eq!(game.switch_turn().unwrap_err(), CoreError::GameOver);
        assert_eq!(game.start_turn(Team::Blue).unwrap_err(), CoreError::GameOver);
        assert_eq!(game.apply_clue(clue(Team::Red, 1)).unwrap_err(), CoreError::GameOver);
    }

    #[test]
    fn test_switch_turn_resets() {
        let mut game = new_game();
        game.apply_clue(clue(Team::Red, 2)).unwrap();
        game.reveal_card(0).unwrap();
        game.switch_turn().unwrap();

        assert_eq!(game.current_team(), Team::Blue);
        assert_eq!(game.current_phase(), Phase::Spymaster);
        assert!(game.current_clue().is_none());
        assert_eq!(game.guesses_remaining(), 0);
        assert_eq!(game.turn_number(), 2);
    }

    #[test]
    fn test_first_start_turn_keeps_turn_one() {
        let mut game = new_game();
        game.start_turn(Team::Red).unwrap();
        assert_eq!(game.turn_number(), 1);
        game.start_turn(Team::Blue).unwrap();
        assert_eq!(game.turn_number(), 2);
    }

    #[test]
    fn test_history_append_and_json() {
        let mut game = new_game();
        let c = clue(Team::Red, 2);
        game.apply_clue(c.clone()).unwrap();
        game.push_event(GameEvent::ClueGiven {
            turn: 1,
            team: Team::Red,
            clue: c,
            timestamp: 10,
        });
        game.push_event(GameEvent::GuessMade {
            turn: 1,
            team: Team::Red,
            word: "WORD0".to_string(),
            correct: true,
            revealed_type: CardType::Red,
            timestamp: 11,
        });

        assert_eq!(game.history().len(), 2);
        assert_eq!(game.history()[1].turn(), 1);

        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["currentTeam"], "red");
        assert_eq!(json["currentPhase"], "operative");
        assert_eq!(json["guessesRemaining"], 3);
        assert_eq!(json["history"][0]["kind"], "clueGiven");
        assert_eq!(json["history"][1]["revealedType"], "red");
        assert!(json.get("turnStarted").is_none());
    }
}
