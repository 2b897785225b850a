//! Leaderboard - per-model statistics folded from match records
//!
//! Level 2 - Phases (Leaderboard) and Level 3 - Steps (compute_stats)

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{MatchDraft, MatchRecord};
use crate::store::MatchStore;

/// Win/loss summary for one model across every seat it played
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStat {
    pub model_id: String,
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
    /// Percentage in 0..=100
    pub win_rate: f64,
}

impl ModelStat {
    fn new(model_id: &str, wins: u32, losses: u32) -> Self {
        let total = wins + losses;
        Self {
            model_id: model_id.to_string(),
            wins,
            losses,
            total,
            win_rate: win_rate(wins, total),
        }
    }
}

/// Percentage of games won; 0 when no games were played
fn win_rate(wins: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64 * 100.0
    }
}

/// Fold records into per-model stats, best first
///
/// Ordering: win rate descending, then games played descending, then
/// model id ascending.
pub fn compute_stats(records: &[MatchRecord]) -> Vec<ModelStat> {
    let mut tally: HashMap<&str, (u32, u32)> = HashMap::new();

    for record in records {
        tally.entry(record.winner_model()).or_default().0 += 1;
        tally.entry(record.loser_model()).or_default().1 += 1;
    }

    let mut stats: Vec<ModelStat> = tally
        .into_iter()
        .map(|(model_id, (wins, losses))| ModelStat::new(model_id, wins, losses))
        .collect();

    stats.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.total.cmp(&a.total))
            .then_with(|| a.model_id.cmp(&b.model_id))
    });

    stats
}

/// Result aggregator for one run, backed by an injected store
#[derive(Clone)]
pub struct Leaderboard {
    store: Arc<dyn MatchStore>,
}

impl Leaderboard {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Append a finished game to the store
    pub fn record(&self, draft: MatchDraft) -> Result<MatchRecord> {
        match self.store.append_match(draft) {
            Ok(record) => {
                tracing::debug!(
                    "Recorded match {}: {} (red) vs {} (blue), {} won in {} turns",
                    record.id,
                    record.red_model_id,
                    record.blue_model_id,
                    record.winner,
                    record.turns
                );
                Ok(record)
            }
            Err(e) => {
                tracing::error!("Match record not persisted: {}", e);
                Err(e)
            }
        }
    }

    /// Current standings, recomputed from every stored record
    pub fn leaderboard(&self) -> Result<Vec<ModelStat>> {
        let records = self.store.list_matches()?;
        Ok(compute_stats(&records))
    }

    pub fn matches(&self) -> Result<Vec<MatchRecord>> {
        self.store.list_matches()
    }

    pub fn store(&self) -> &Arc<dyn MatchStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use codenames_core::Team;

    fn record(red: &str, blue: &str, winner: Team) -> MatchRecord {
        MatchRecord {
            id: format!("{}-{}", red, blue),
            timestamp: 0,
            red_model_id: red.to_string(),
            blue_model_id: blue.to_string(),
            winner,
            turns: 8,
        }
    }

    #[test]
    fn test_empty_records() {
        assert!(compute_stats(&[]).is_empty());
    }

    #[test]
    fn test_zero_total_win_rate() {
        assert_eq!(win_rate(0, 0), 0.0);
        let stat = ModelStat::new("idle", 0, 0);
        assert_eq!(stat.win_rate, 0.0);
        assert!(!stat.win_rate.is_nan());
    }

    #[test]
    fn test_credits_by_model_not_seat() {
        let records = vec![
            record("a", "b", Team::Red),
            record("b", "a", Team::Red),
            record("b", "a", Team::Blue),
        ];
        let stats = compute_stats(&records);

        let a = stats.iter().find(|s| s.model_id == "a").unwrap();
        assert_eq!((a.wins, a.losses, a.total), (2, 1, 3));
        let b = stats.iter().find(|s| s.model_id == "b").unwrap();
        assert_eq!((b.wins, b.losses, b.total), (1, 2, 3));

        assert_eq!(stats[0].model_id, "a");
        assert!((stats[0].win_rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_play_counts_both_seats() {
        let records = vec![record("m", "m", Team::Red), record("m", "m", Team::Blue)];
        let stats = compute_stats(&records);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total, 4);
        assert_eq!(stats[0].wins, 2);
        assert_eq!(stats[0].losses, 2);
        assert_eq!(stats[0].win_rate, 50.0);
    }

    #[test]
    fn test_tie_break_total_then_id() {
        let records = vec![
            // x: 1-1, y: 1-1 over 2 games; z: 2-2 over 4 games
            record("x", "y", Team::Red),
            record("x", "y", Team::Blue),
            record("z", "w", Team::Red),
            record("z", "w", Team::Red),
            record("w", "z", Team::Red),
            record("w", "z", Team::Red),
        ];
        let stats = compute_stats(&records);
        let order: Vec<&str> = stats.iter().map(|s| s.model_id.as_str()).collect();
        assert_eq!(order, vec!["w", "z", "x", "y"]);
    }

    #[test]
    fn test_leaderboard_reads_through_store() {
        let board = Leaderboard::new(Arc::new(MemoryStore::new()));
        board.record(MatchDraft::new("gpt-4o", "grok", Team::Blue, 10)).unwrap();
        board.record(MatchDraft::new("grok", "gpt-4o", Team::Blue, 12)).unwrap();

        let stats = board.leaderboard().unwrap();
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.total == 2 && s.win_rate == 50.0));
        assert_eq!(board.matches().unwrap().len(), 2);
    }

    #[test]
    fn test_stat_json_field_names() {
        let json = serde_json::to_value(ModelStat::new("llama-3", 3, 1)).unwrap();
        assert_eq!(json["modelId"], "llama-3");
        assert_eq!(json["winRate"], 75.0);
        assert_eq!(json["total"], 4);
    }
}
