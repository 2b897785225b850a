//! Error types for board setup and state transitions

use crate::board::Team;
use crate::game::Phase;

/// Errors raised by the board generator and the game state machine
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("word source supplied {available} distinct words, a board needs {needed}")]
    InsufficientWords { needed: usize, available: usize },

    #[error("operation requires the {expected} phase, game is in the {actual} phase")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("clue belongs to {actual} but it is {expected}'s turn")]
    WrongTeam { expected: Team, actual: Team },

    #[error("game is already over")]
    GameOver,

    #[error("clue count {0} is outside 1..=9")]
    InvalidClueCount(u8),

    #[error("card index {index} out of range for a board of {len} cards")]
    CardIndexOutOfRange { index: usize, len: usize },

    #[error("invalid board: {0}")]
    InvalidBoard(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
