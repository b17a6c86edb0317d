//! Aggregator - statistics and rankings derived from the ledger state
//!
//! Every figure is computed on demand from a `LedgerState` snapshot, using
//! the configured `SummarySource` for per-player numbers and rankings.

mod summarize;

pub use summarize::{global_stats, summarize_events};

use crate::ledger::LedgerState;
use crate::types::{LeaderboardEntry, Summary, SummarySource};

/// Computes summaries and leaderboards over a chosen source
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    source: SummarySource,
}

impl Aggregator {
    pub fn new(source: SummarySource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> SummarySource {
        self.source
    }

    /// Summary for a player, or `None` if no ledger exists for them
    ///
    /// A known player with nothing to aggregate gets a zero-valued summary.
    pub fn summarize(&self, state: &LedgerState, player_id: &str) -> Option<Summary> {
        if !state.is_known(player_id) {
            return None;
        }

        let summary = match self.source {
            SummarySource::EventLog => {
                summarize_events(player_id, state.events.events_for(player_id))
            }
            SummarySource::RetainedHistory => {
                summarize_events(player_id, state.recent.oldest_first(player_id))
            }
        };
        Some(summary)
    }

    /// Top `limit` players by total score
    ///
    /// Descending by total, ties broken by ascending player id. Players with
    /// no games in the source are left out.
    pub fn leaderboard(&self, state: &LedgerState, limit: usize) -> Vec<LeaderboardEntry> {
        let mut rows: Vec<Summary> = state
            .player_ids()
            .iter()
            .filter_map(|player_id| self.summarize(state, player_id))
            .filter(|summary| summary.total_games > 0)
            .collect();

        rows.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.player_id.cmp(&b.player_id))
        });

        rows.into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, summary)| LeaderboardEntry {
                rank: index + 1,
                player_id: summary.player_id,
                total_score: summary.total_score,
                best_score: summary.best_score,
                games_played: summary.total_games,
                last_play: summary.last_played,
            })
            .collect()
    }
}
