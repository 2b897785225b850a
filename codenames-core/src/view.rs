//! Role-specific views handed to move providers
//!
//! The spymaster view carries every identity; the operative view only
//! carries identities of cards already face up.

use serde::{Deserialize, Serialize};

use crate::board::{Card, CardType, Team};
use crate::game::{Clue, GameEvent, GameState};

/// Everything the clue-giver may see
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpymasterView {
    pub team: Team,
    pub turn_number: u32,
    pub red_remaining: usize,
    pub blue_remaining: usize,
    pub cards: Vec<Card>,
    pub history: Vec<GameEvent>,
}

impl SpymasterView {
    pub(crate) fn from_state(state: &GameState) -> Self {
        Self {
            team: state.current_team(),
            turn_number: state.turn_number(),
            red_remaining: state.red_remaining(),
            blue_remaining: state.blue_remaining(),
            cards: state.board().cards().to_vec(),
            history: state.history().to_vec(),
        }
    }

    /// Unrevealed words of the given identity
    pub fn unrevealed(&self, card_type: CardType) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|c| !c.revealed && c.card_type == card_type)
            .map(|c| c.word.as_str())
            .collect()
    }

    pub fn own_words(&self) -> Vec<&str> {
        self.unrevealed(self.team.card_type())
    }

    pub fn opponent_words(&self) -> Vec<&str> {
        self.unrevealed(self.team.opponent().card_type())
    }

    pub fn assassin_word(&self) -> Option<&str> {
        self.unrevealed(CardType::Assassin).into_iter().next()
    }

    /// All board words, revealed or not
    pub fn all_words(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.word.as_str()).collect()
    }
}

/// A card as the guessers see it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleCard {
    pub word: String,
    pub revealed_type: Option<CardType>,
}

/// Everything the guessers may see
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperativeView {
    pub team: Team,
    pub turn_number: u32,
    pub clue: Option<Clue>,
    pub guesses_remaining: u8,
    pub cards: Vec<VisibleCard>,
    pub history: Vec<GameEvent>,
}

impl OperativeView {
    pub(crate) fn from_state(state: &GameState) -> Self {
        let cards = state
            .board()
            .iter()
            .map(|c| VisibleCard {
                word: c.word.clone(),
                revealed_type: c.revealed.then_some(c.card_type),
            })
            .collect();

        Self {
            team: state.current_team(),
            turn_number: state.turn_number(),
            clue: state.current_clue().cloned(),
            guesses_remaining: state.guesses_remaining(),
            cards,
            history: state.history().to_vec(),
        }
    }

    pub fn unrevealed_words(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|c| c.revealed_type.is_none())
            .map(|c| c.word.as_str())
            .collect()
    }
}
