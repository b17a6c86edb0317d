//! Bounded recent-history buffer
//!
//! Keeps, per player, the last `capacity` score events. Eviction is FIFO by
//! insertion order: pushing beyond capacity drops the oldest entries. Reads
//! are newest-first.

use std::collections::{BTreeMap, VecDeque};

use crate::types::{saturate, wide_total, ScoreEvent};

/// Default number of recent scores kept per player
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Per-player capped recency window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentHistory {
    capacity: usize,
    /// Oldest at the front, newest at the back
    players: BTreeMap<String, VecDeque<ScoreEvent>>,
}

impl RecentHistory {
    /// Create an empty buffer; a zero capacity is raised to 1
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            players: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an event, evicting the oldest entries beyond capacity
    ///
    /// Unknown players get an empty sequence first.
    pub fn push(&mut self, player_id: &str, event: ScoreEvent) {
        let capacity = self.capacity;
        let entries = self.entry(player_id);
        entries.push_back(event);
        while entries.len() > capacity {
            entries.pop_front();
        }
    }

    /// All retained events, newest first
    pub fn get_all(&self, player_id: &str) -> Vec<ScoreEvent> {
        self.players
            .get(player_id)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    /// Up to `limit` retained events, newest first
    pub fn latest(&self, player_id: &str, limit: usize) -> Vec<ScoreEvent> {
        self.players
            .get(player_id)
            .map(|entries| entries.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Retained events oldest first (persistence order)
    pub fn oldest_first(&self, player_id: &str) -> impl Iterator<Item = &ScoreEvent> {
        self.players.get(player_id).into_iter().flatten()
    }

    /// Most recent event, if any
    pub fn peek(&self, player_id: &str) -> Option<&ScoreEvent> {
        self.players.get(player_id).and_then(|entries| entries.back())
    }

    /// Empty a player's sequence; the player stays known
    pub fn clear(&mut self, player_id: &str) {
        if let Some(entries) = self.players.get_mut(player_id) {
            entries.clear();
        }
    }

    /// Current length, `0..=capacity`
    pub fn size(&self, player_id: &str) -> usize {
        self.players.get(player_id).map_or(0, VecDeque::len)
    }

    /// Sum of the retained scores ("current score"), pinned to the `i64` bounds
    pub fn total(&self, player_id: &str) -> i64 {
        saturate(wide_total(self.oldest_first(player_id)))
    }

    /// Register a player without adding events
    pub fn ensure_player(&mut self, player_id: &str) {
        self.entry(player_id);
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    /// Known player ids, ascending
    pub fn player_ids(&self) -> impl Iterator<Item = &str> {
        self.players.keys().map(String::as_str)
    }

    fn entry(&mut self, player_id: &str) -> &mut VecDeque<ScoreEvent> {
        let initial = self.capacity.min(64);
        self.players
            .entry(player_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(initial))
    }
}

impl Default for RecentHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
