//! Victory ledger
//!
//! Per-player, insertion-ordered record of winning events. Unlike the recent
//! history buffer it is unbounded and reads oldest-first.

use std::collections::BTreeMap;

use crate::types::ScoreEvent;

/// Per-player list of events meeting the win predicate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VictoryLedger {
    players: BTreeMap<String, Vec<ScoreEvent>>,
}

impl VictoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event` iff it is a win; returns whether it was recorded
    ///
    /// The player becomes known either way.
    pub fn record_if_win(&mut self, player_id: &str, event: &ScoreEvent) -> bool {
        let victories = self.players.entry(player_id.to_string()).or_default();
        if event.is_win() {
            victories.push(event.clone());
            true
        } else {
            false
        }
    }

    /// Restore a previously recorded victory without re-checking the predicate
    pub(crate) fn restore(&mut self, player_id: &str, event: ScoreEvent) {
        self.players
            .entry(player_id.to_string())
            .or_default()
            .push(event);
    }

    /// All victories, oldest first
    pub fn to_list(&self, player_id: &str) -> Vec<ScoreEvent> {
        self.players.get(player_id).cloned().unwrap_or_default()
    }

    pub fn total_wins(&self, player_id: &str) -> usize {
        self.players.get(player_id).map_or(0, Vec::len)
    }

    /// Empty a player's victories; the player stays known
    pub fn clear(&mut self, player_id: &str) {
        if let Some(victories) = self.players.get_mut(player_id) {
            victories.clear();
        }
    }

    pub fn ensure_player(&mut self, player_id: &str) {
        self.players.entry(player_id.to_string()).or_default();
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }
}
