//! Cards, teams and the 25-card board

use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::words::{normalize_word, WordSource};

/// Number of cards on a board
pub const BOARD_SIZE: usize = 25;

/// Agent cards for the team that moves first
pub const STARTING_TEAM_CARDS: usize = 9;

/// Agent cards for the team that moves second
pub const OTHER_TEAM_CARDS: usize = 8;

/// Bystander cards
pub const NEUTRAL_CARDS: usize = 7;

/// Assassin cards
pub const ASSASSIN_CARDS: usize = 1;

/// Team color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Card type carrying this team's color
    pub fn card_type(self) -> CardType {
        match self {
            Team::Red => CardType::Red,
            Team::Blue => CardType::Blue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            other => Err(format!("unknown team '{}' (expected red or blue)", other)),
        }
    }
}

/// Hidden identity of a card
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Red,
    Blue,
    Neutral,
    Assassin,
}

impl CardType {
    /// Team owning this card, if it is an agent card
    pub fn team(self) -> Option<Team> {
        match self {
            CardType::Red => Some(Team::Red),
            CardType::Blue => Some(Team::Blue),
            CardType::Neutral | CardType::Assassin => None,
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardType::Red => "red",
            CardType::Blue => "blue",
            CardType::Neutral => "neutral",
            CardType::Assassin => "assassin",
        };
        f.write_str(name)
    }
}

/// A card on the board. Only `revealed` changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub word: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub revealed: bool,
}

impl Card {
    pub fn new(word: impl Into<String>, card_type: CardType) -> Self {
        Self {
            word: word.into(),
            card_type,
            revealed: false,
        }
    }
}

/// Ordered sequence of exactly 25 cards with the fixed label multiset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Build a randomized board for the given starting team
    pub fn generate<W, R>(starting_team: Team, words: &mut W, rng: &mut R) -> Result<Self>
    where
        W: WordSource + ?Sized,
        R: RngCore,
    {
        let mut drawn = words.draw_words(BOARD_SIZE, rng)?;
        drawn.truncate(BOARD_SIZE);
        let distinct = count_distinct(&drawn);
        if drawn.len() < BOARD_SIZE || distinct < BOARD_SIZE {
            return Err(CoreError::InsufficientWords {
                needed: BOARD_SIZE,
                available: distinct,
            });
        }

        let mut labels = label_multiset(starting_team);
        labels.shuffle(rng);

        let cards = drawn
            .into_iter()
            .zip(labels)
            .map(|(word, card_type)| Card::new(word, card_type))
            .collect();

        Ok(Self { cards })
    }

    /// Validate an externally assembled board
    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        if cards.len() != BOARD_SIZE {
            return Err(CoreError::InvalidBoard(format!(
                "expected {} cards, got {}",
                BOARD_SIZE,
                cards.len()
            )));
        }

        let words: Vec<String> = cards.iter().map(|c| c.word.clone()).collect();
        if count_distinct(&words) != BOARD_SIZE {
            return Err(CoreError::InvalidBoard("duplicate words".to_string()));
        }

        let board = Self { cards };
        if board.starting_team().is_none() {
            return Err(CoreError::InvalidBoard(format!(
                "label counts red={} blue={} neutral={} assassin={} do not match 9/8/7/1",
                board.count_of(CardType::Red),
                board.count_of(CardType::Blue),
                board.count_of(CardType::Neutral),
                board.count_of(CardType::Assassin),
            )));
        }

        Ok(board)
    }

    /// Team holding the 9-card majority, if the label counts are valid
    pub fn starting_team(&self) -> Option<Team> {
        let red = self.count_of(CardType::Red);
        let blue = self.count_of(CardType::Blue);
        let fixed = self.count_of(CardType::Neutral) == NEUTRAL_CARDS
            && self.count_of(CardType::Assassin) == ASSASSIN_CARDS;

        match (red, blue) {
            (STARTING_TEAM_CARDS, OTHER_TEAM_CARDS) if fixed => Some(Team::Red),
            (OTHER_TEAM_CARDS, STARTING_TEAM_CARDS) if fixed => Some(Team::Blue),
            _ => None,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Number of cards with the given identity, revealed or not
    pub fn count_of(&self, card_type: CardType) -> usize {
        self.cards.iter().filter(|c| c.card_type == card_type).count()
    }

    /// Number of unrevealed cards with the given identity
    pub fn unrevealed_of(&self, card_type: CardType) -> usize {
        self.cards
            .iter()
            .filter(|c| c.card_type == card_type && !c.revealed)
            .count()
    }

    /// Index of the unrevealed card whose word matches, ignoring case
    pub fn find_unrevealed(&self, word: &str) -> Option<usize> {
        let needle = normalize_word(word);
        self.cards
            .iter()
            .position(|c| !c.revealed && normalize_word(&c.word) == needle)
    }

    pub fn unrevealed_words(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|c| !c.revealed)
            .map(|c| c.word.as_str())
            .collect()
    }

    /// Flip a card face up. Returns false if it already was.
    pub(crate) fn reveal(&mut self, index: usize) -> bool {
        match self.cards.get_mut(index) {
            Some(card) if !card.revealed => {
                card.revealed = true;
                true
            }
            _ => false,
        }
    }
}

impl TryFrom<Vec<Card>> for Board {
    type Error = CoreError;

    fn try_from(cards: Vec<Card>) -> Result<Self> {
        Board::from_cards(cards)
    }
}

impl From<Board> for Vec<Card> {
    fn from(board: Board) -> Self {
        board.cards
    }
}

/// Label multiset for a board: 9 starting, 8 other, 7 neutral, 1 assassin
fn label_multiset(starting_team: Team) -> Vec<CardType> {
    let mut labels = Vec::with_capacity(BOARD_SIZE);
    labels.extend(std::iter::repeat(starting_team.card_type()).take(STARTING_TEAM_CARDS));
    labels.extend(std::iter::repeat(starting_team.opponent().card_type()).take(OTHER_TEAM_CARDS));
    labels.extend(std::iter::repeat(CardType::Neutral).take(NEUTRAL_CARDS));
    labels.extend(std::iter::repeat(CardType::Assassin).take(ASSASSIN_CARDS));
    labels
}

fn count_distinct(words: &[String]) -> usize {
    words
        .iter()
        .map(|w| normalize_word(w))
        .collect::<HashSet<_>>()
        .len()
}
