//! Player ledgers - derived per-player views over the event store
//!
//! A player's ledger is the pair (recent history, victories). Ledgers are
//! created lazily on the first submission and are never the source of truth:
//! the event store is.
//!
//! # Submission path
//!
//! ```text
//! ┌────────────┐    ┌────────────────┐    ┌─────────────────┐
//! │ EventStore │───►│ RecentHistory  │───►│ VictoryLedger   │
//! │ append     │    │ push + evict   │    │ record_if_win   │
//! └────────────┘    └────────────────┘    └─────────────────┘
//! ```

mod recent;
mod victories;

pub use recent::{RecentHistory, DEFAULT_HISTORY_CAPACITY};
pub use victories::VictoryLedger;

use crate::event_store::EventStore;
use crate::types::ScoreEvent;

/// Counters reported after a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    /// Recent-history entries dropped
    pub scores_cleared: usize,
    /// Victories dropped
    pub victories_cleared: usize,
    /// Victories still recorded after the reset
    pub victories_preserved: usize,
}

/// Complete in-memory state: the event log plus every player ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    pub events: EventStore,
    pub recent: RecentHistory,
    pub victories: VictoryLedger,
}

impl LedgerState {
    /// Create an empty state with the given recent-history capacity
    pub fn new(history_capacity: usize) -> Self {
        Self {
            events: EventStore::new(),
            recent: RecentHistory::new(history_capacity),
            victories: VictoryLedger::new(),
        }
    }

    /// Append a score and update every derived view
    pub fn record(&mut self, player_id: &str, score: i64, game_type: &str) -> ScoreEvent {
        let event = self.events.append(player_id, score, game_type);
        self.recent.push(player_id, event.clone());
        self.victories.record_if_win(player_id, &event);
        event
    }

    /// Whether a ledger exists for this player
    pub fn is_known(&self, player_id: &str) -> bool {
        self.recent.contains(player_id)
    }

    /// Known player ids, ascending
    pub fn player_ids(&self) -> Vec<String> {
        self.recent.player_ids().map(str::to_string).collect()
    }

    /// Make sure both views hold an entry for the player
    pub(crate) fn ensure_player(&mut self, player_id: &str) {
        self.recent.ensure_player(player_id);
        self.victories.ensure_player(player_id);
    }

    /// Clear recent history, keep victories and the event log
    pub fn reset_scores(&mut self, player_id: &str) -> Option<ResetReport> {
        if !self.is_known(player_id) {
            return None;
        }

        let scores_cleared = self.recent.size(player_id);
        self.recent.clear(player_id);

        Some(ResetReport {
            scores_cleared,
            victories_cleared: 0,
            victories_preserved: self.victories.total_wins(player_id),
        })
    }

    /// Clear recent history and victories, keep the event log
    pub fn reset_all(&mut self, player_id: &str) -> Option<ResetReport> {
        if !self.is_known(player_id) {
            return None;
        }

        let scores_cleared = self.recent.size(player_id);
        let victories_cleared = self.victories.total_wins(player_id);
        self.recent.clear(player_id);
        self.victories.clear(player_id);

        Some(ResetReport {
            scores_cleared,
            victories_cleared,
            victories_preserved: 0,
        })
    }

    /// Delete the player's events and empty both views
    ///
    /// The ledger itself survives, empty, so the player stays known.
    pub fn purge(&mut self, player_id: &str) -> Option<usize> {
        if !self.is_known(player_id) {
            return None;
        }

        let removed = self.events.delete(player_id);
        self.recent.clear(player_id);
        self.victories.clear(player_id);
        Some(removed)
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
