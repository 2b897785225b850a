//! Move provider boundary
//!
//! A move provider is the external capability that plays one seat: given
//! the spymaster view it returns a clue, given the operative view it
//! returns a single guessed word. Concrete backends (language models,
//! remote services) live outside this crate.

use codenames_core::{
    normalize_word, Clue, OperativeView, SpymasterView, Team, MAX_CLUE_COUNT, MIN_CLUE_COUNT,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::ProviderError;

/// Word used when a clue has to be substituted
pub(crate) const FALLBACK_CLUE_WORD: &str = "STRATEGY";

/// Largest count the random provider will announce
const RANDOM_MAX_COUNT: usize = 3;

/// Generic hint words for random clues
const HINT_WORDS: &[&str] = &[
    "MOTION", "NATURE", "METAL", "TRAVEL", "POWER", "HISTORY", "MUSIC", "SPORT",
    "FOOD", "DANGER", "WEATHER", "MACHINE", "ROYALTY", "OCEAN", "MYTH", "CITY",
];

/// One seat's player: the clue-giver and the guessers of a team
pub trait MoveProvider: Send {
    /// Identity credited on the leaderboard
    fn model_id(&self) -> &str;

    /// Produce a clue for `team` from the full board
    fn request_clue(&mut self, view: &SpymasterView, team: Team) -> Result<Clue, ProviderError>;

    /// Produce one guessed word for `team` given the current clue
    fn request_guess(
        &mut self,
        view: &OperativeView,
        team: Team,
        clue: &Clue,
    ) -> Result<String, ProviderError>;
}

/// Both seats of a game
pub struct Seats<'a> {
    pub red: &'a mut (dyn MoveProvider + 'a),
    pub blue: &'a mut (dyn MoveProvider + 'a),
}

impl<'a> Seats<'a> {
    pub fn new(red: &'a mut (dyn MoveProvider + 'a), blue: &'a mut (dyn MoveProvider + 'a)) -> Self {
        Self { red, blue }
    }

    /// Provider playing for `team`
    pub fn for_team(&mut self, team: Team) -> &mut (dyn MoveProvider + 'a) {
        match team {
            Team::Red => &mut *self.red,
            Team::Blue => &mut *self.blue,
        }
    }

    pub fn model_id(&self, team: Team) -> &str {
        match team {
            Team::Red => self.red.model_id(),
            Team::Blue => self.blue.model_id(),
        }
    }
}

/// Plays legal but uninformed moves: random hint words and random guesses
#[derive(Clone, Debug)]
pub struct RandomProvider {
    model_id: String,
    rng: ChaCha8Rng,
}

impl RandomProvider {
    pub fn new(model_id: impl Into<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            model_id: model_id.into(),
            rng,
        }
    }
}

impl MoveProvider for RandomProvider {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn request_clue(&mut self, view: &SpymasterView, team: Team) -> Result<Clue, ProviderError> {
        let own = view.unrevealed(team.card_type()).len();
        if own == 0 {
            return Err(ProviderError::InvalidResponse(format!(
                "{} has no cards left to clue",
                team
            )));
        }

        let board_words = view.all_words();
        let candidates: Vec<&str> = HINT_WORDS
            .iter()
            .copied()
            .filter(|hint| !board_words.iter().any(|w| normalize_word(w) == *hint))
            .collect();
        let word = candidates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(FALLBACK_CLUE_WORD);

        let max = own.min(RANDOM_MAX_COUNT) as u8;
        let count = self.rng.gen_range(MIN_CLUE_COUNT..=max.clamp(MIN_CLUE_COUNT, MAX_CLUE_COUNT));

        Ok(Clue::new(word, count, team))
    }

    fn request_guess(
        &mut self,
        view: &OperativeView,
        _team: Team,
        _clue: &Clue,
    ) -> Result<String, ProviderError> {
        random_unrevealed(view, &mut self.rng)
            .ok_or_else(|| ProviderError::InvalidResponse("no unrevealed words".to_string()))
    }
}

/// Provider used for a model id when no external backend is wired in
pub fn builtin_provider(model_id: &str, seed: Option<u64>) -> Box<dyn MoveProvider> {
    Box::new(RandomProvider::new(model_id, seed))
}

/// Clue substituted under the random-fallback policy
pub(crate) fn fallback_clue(team: Team) -> Clue {
    Clue::new(FALLBACK_CLUE_WORD, MIN_CLUE_COUNT, team)
}

/// Uniformly chosen unrevealed word
pub(crate) fn random_unrevealed<R: Rng + ?Sized>(view: &OperativeView, rng: &mut R) -> Option<String> {
    view.unrevealed_words()
        .choose(rng)
        .map(|w| w.to_string())
}
