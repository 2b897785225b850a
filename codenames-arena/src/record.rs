//! Match records - the persisted summary of a finished game

use codenames_core::Team;
use rand::distributions::{Alphanumeric, DistString};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of generated record ids
const ID_LEN: usize = 8;

/// Finished game before the store assigns an id and timestamp
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDraft {
    pub red_model_id: String,
    pub blue_model_id: String,
    pub winner: Team,
    pub turns: u32,
}

impl MatchDraft {
    pub fn new(
        red_model_id: impl Into<String>,
        blue_model_id: impl Into<String>,
        winner: Team,
        turns: u32,
    ) -> Self {
        Self {
            red_model_id: red_model_id.into(),
            blue_model_id: blue_model_id.into(),
            winner,
            turns,
        }
    }
}

/// Immutable record of one completed game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub timestamp: u64,
    pub red_model_id: String,
    pub blue_model_id: String,
    pub winner: Team,
    pub turns: u32,
}

impl MatchRecord {
    /// Stamp a draft with a fresh id and the current time
    pub fn from_draft<R: Rng + ?Sized>(draft: MatchDraft, rng: &mut R) -> Self {
        Self {
            id: Alphanumeric.sample_string(rng, ID_LEN).to_ascii_lowercase(),
            timestamp: now_millis(),
            red_model_id: draft.red_model_id,
            blue_model_id: draft.blue_model_id,
            winner: draft.winner,
            turns: draft.turns,
        }
    }

    pub fn model_for(&self, team: Team) -> &str {
        match team {
            Team::Red => &self.red_model_id,
            Team::Blue => &self.blue_model_id,
        }
    }

    pub fn winner_model(&self) -> &str {
        self.model_for(self.winner)
    }

    pub fn loser_model(&self) -> &str {
        self.model_for(self.winner.opponent())
    }
}

/// Unix time in milliseconds
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
