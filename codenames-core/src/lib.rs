//! Codenames Core - Board and game state machine
//!
//! This crate provides the core game logic for agent-vs-agent Codenames:
//! - Card identities and the 25-card board
//! - Board generation from a word source
//! - Turn/phase state machine with win detection
//! - Role-specific views of the board (spymaster vs operative)

pub mod board;
pub mod error;
pub mod game;
pub mod view;
pub mod words;

// Re-exports for convenient access
pub use board::{Board, Card, CardType, Team, BOARD_SIZE};
pub use error::{CoreError, Result};
pub use game::{Clue, GameEvent, GameState, Phase, RevealOutcome, MAX_CLUE_COUNT, MIN_CLUE_COUNT};
pub use view::{OperativeView, SpymasterView, VisibleCard};
pub use words::{normalize_word, WordBank, WordSource};
