//! Event Store - the authoritative log of score events
//!
//! The EventStore owns `ScoreEvent` identity: it assigns sequence numbers and
//! timestamps on append, and it is the only place events are created. Events
//! are grouped per player in append order, which makes per-player queries a
//! slice lookup instead of a scan of the whole log.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use thiserror::Error;

use crate::types::{ScoreEvent, SortOrder};

/// Hard upper bound for any query limit, regardless of configuration
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur while flushing or loading state
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Store corrupted: {0}")]
    Corrupted(String),
}

/// Clamp a caller-supplied limit to `1..=max`
pub fn clamp_limit(limit: usize, max: usize) -> usize {
    let max = max.clamp(1, MAX_QUERY_LIMIT);
    limit.clamp(1, max)
}

/// Append-only log of score events, grouped by player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStore {
    /// Events per player, each vector in append (sequence) order
    streams: BTreeMap<String, Vec<ScoreEvent>>,
    /// Next sequence number to assign
    next_sequence: u64,
}

impl EventStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            streams: BTreeMap::new(),
            next_sequence: 1,
        }
    }

    /// Rebuild a store from persisted events
    ///
    /// `events` may arrive in any order; they are regrouped per player and
    /// sorted by sequence. Fails if a sequence repeats, if `next_sequence`
    /// does not exceed every stored sequence, or if it is `u64::MAX`.
    pub fn from_events(events: Vec<ScoreEvent>, next_sequence: u64) -> PersistenceResult<Self> {
        if next_sequence == u64::MAX {
            return Err(PersistenceError::Corrupted(
                "next_sequence is out of range".to_string(),
            ));
        }

        let mut streams: BTreeMap<String, Vec<ScoreEvent>> = BTreeMap::new();
        let mut max_sequence = 0u64;

        for event in events {
            if event.sequence == 0 {
                return Err(PersistenceError::Corrupted(
                    "event with sequence 0".to_string(),
                ));
            }
            max_sequence = max_sequence.max(event.sequence);
            streams.entry(event.player_id.clone()).or_default().push(event);
        }

        if next_sequence <= max_sequence {
            return Err(PersistenceError::Corrupted(format!(
                "next_sequence {} does not exceed stored sequence {}",
                next_sequence, max_sequence
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for stream in streams.values_mut() {
            stream.sort_by_key(|e| e.sequence);
            for event in stream.iter() {
                if !seen.insert(event.sequence) {
                    return Err(PersistenceError::Corrupted(format!(
                        "duplicate event sequence {}",
                        event.sequence
                    )));
                }
            }
        }

        Ok(Self {
            streams,
            next_sequence,
        })
    }

    /// Whether one more append still leaves a store `from_events` accepts
    pub fn has_capacity(&self) -> bool {
        self.next_sequence < u64::MAX - 1
    }

    /// Append a new event for `player_id`
    ///
    /// This is the only mutator that creates events. The timestamp is taken
    /// from the wall clock and the sequence is strictly increasing. Callers
    /// check `has_capacity` first.
    pub fn append(&mut self, player_id: &str, score: i64, game_type: &str) -> ScoreEvent {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let event = ScoreEvent::new(sequence, player_id.to_string(), score, game_type.to_string());
        self.streams
            .entry(player_id.to_string())
            .or_default()
            .push(event.clone());

        event
    }

    /// Events for a player ordered by append time, clamped to `MAX_QUERY_LIMIT`
    ///
    /// An unknown player yields an empty list.
    pub fn query(&self, player_id: &str, limit: usize, order: SortOrder) -> Vec<ScoreEvent> {
        let limit = clamp_limit(limit, MAX_QUERY_LIMIT);
        let events = self.events_for(player_id);

        match order {
            SortOrder::Desc => events.iter().rev().take(limit).cloned().collect(),
            SortOrder::Asc => events.iter().take(limit).cloned().collect(),
        }
    }

    /// Remove every event for a player, returning how many were removed
    pub fn delete(&mut self, player_id: &str) -> usize {
        self.streams
            .remove(player_id)
            .map(|events| events.len())
            .unwrap_or(0)
    }

    /// Look up a single event by its sequence number
    pub fn get(&self, sequence: u64) -> Option<&ScoreEvent> {
        self.streams.values().find_map(|stream| {
            stream
                .binary_search_by_key(&sequence, |e| e.sequence)
                .ok()
                .map(|index| &stream[index])
        })
    }

    /// All events of a player in append order
    pub fn events_for(&self, player_id: &str) -> &[ScoreEvent] {
        self.streams
            .get(player_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Player ids with at least one event, ascending
    pub fn player_ids(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    /// Iterate over every event (grouped by player, not globally ordered)
    pub fn iter(&self) -> impl Iterator<Item = &ScoreEvent> {
        self.streams.values().flatten()
    }

    /// Every event ordered by sequence
    pub fn to_events(&self) -> Vec<ScoreEvent> {
        let mut events: Vec<ScoreEvent> = self.iter().cloned().collect();
        events.sort_by_key(|e| e.sequence);
        events
    }

    /// Events with a score in `range` (all when `None`), best first
    ///
    /// Ties keep append order.
    pub fn top_scores(&self, range: Option<RangeInclusive<i64>>, limit: usize) -> Vec<ScoreEvent> {
        let limit = clamp_limit(limit, MAX_QUERY_LIMIT);
        let mut events: Vec<&ScoreEvent> = self
            .iter()
            .filter(|e| range.as_ref().map_or(true, |r| r.contains(&e.score)))
            .collect();

        events.sort_by(|a, b| b.score.cmp(&a.score).then(a.sequence.cmp(&b.sequence)));
        events.into_iter().take(limit).cloned().collect()
    }

    /// Total number of stored events
    pub fn len(&self) -> usize {
        self.streams.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.values().all(Vec::is_empty)
    }

    /// Number of players with events
    pub fn player_count(&self) -> usize {
        self.streams.len()
    }

    /// Get the next sequence number (without incrementing)
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(scores: &[(&str, i64)]) -> EventStore {
        let mut store = EventStore::new();
        for (player, score) in scores {
            store.append(player, *score, "slot");
        }
        store
    }

    #[test]
    fn test_append_assigns_increasing_sequence() {
        let mut store = EventStore::new();

        let first = store.append("alice", 1500, "slot");
        let second = store.append("bob", 200, "plinko");
        let third = store.append("alice", -200, "slot");

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(third.sequence, 3);
        assert_eq!(store.next_sequence(), 4);
        assert_eq!(store.len(), 3);
        assert_eq!(store.player_count(), 2);
        assert_eq!(second.game_type, "plinko");
        assert!(first.timestamp <= third.timestamp);
    }

    #[test]
    fn test_query_orders_and_limits() {
        let store = store_with(&[("alice", 1), ("alice", 2), ("bob", 9), ("alice", 3)]);

        let newest = store.query("alice", 2, SortOrder::Desc);
        assert_eq!(newest.iter().map(|e| e.score).collect::<Vec<_>>(), vec![3, 2]);

        let oldest = store.query("alice", 10, SortOrder::Asc);
        assert_eq!(oldest.iter().map(|e| e.score).collect::<Vec<_>>(), vec![1, 2, 3]);

        assert!(store.query("nobody", 10, SortOrder::Desc).is_empty());
    }

    #[test]
    fn test_query_limit_is_clamped() {
        let mut store = EventStore::new();
        for i in 0..(MAX_QUERY_LIMIT as i64 + 5) {
            store.append("alice", i, "slot");
        }

        assert_eq!(store.query("alice", usize::MAX, SortOrder::Desc).len(), MAX_QUERY_LIMIT);
        assert_eq!(store.query("alice", 0, SortOrder::Desc).len(), 1);
    }

    #[test]
    fn test_delete_returns_count() {
        let mut store = store_with(&[("alice", 1), ("bob", 2), ("alice", 3)]);

        assert_eq!(store.delete("alice"), 2);
        assert_eq!(store.delete("alice"), 0);
        assert_eq!(store.len(), 1);
        // Sequence numbers are never reused
        assert_eq!(store.append("alice", 4, "slot").sequence, 4);
    }

    #[test]
    fn test_top_scores_with_range() {
        let store = store_with(&[("a", 1500), ("b", 2300), ("c", 1800), ("a", 2300), ("d", 3000)]);

        let top = store.top_scores(None, 3);
        assert_eq!(top.iter().map(|e| e.score).collect::<Vec<_>>(), vec![3000, 2300, 2300]);
        // Equal scores keep append order
        assert_eq!(top[1].player_id, "b");
        assert_eq!(top[2].player_id, "a");

        let ranged = store.top_scores(Some(1600..=2300), 10);
        assert_eq!(ranged.iter().map(|e| e.score).collect::<Vec<_>>(), vec![2300, 2300, 1800]);
    }

    #[test]
    fn test_from_events_round_trip() {
        let store = store_with(&[("alice", 1), ("bob", 2), ("alice", 3)]);

        let rebuilt = EventStore::from_events(store.to_events(), store.next_sequence()).unwrap();
        assert_eq!(rebuilt, store);
    }

    #[test]
    fn test_from_events_rejects_stale_next_sequence() {
        let store = store_with(&[("alice", 1), ("alice", 2)]);

        let result = EventStore::from_events(store.to_events(), 2);
        assert!(matches!(result, Err(PersistenceError::Corrupted(_))));
    }

    #[test]
    fn test_from_events_rejects_exhausted_sequence() {
        let result = EventStore::from_events(Vec::new(), u64::MAX);
        assert!(matches!(result, Err(PersistenceError::Corrupted(_))));

        let mut store = EventStore::from_events(Vec::new(), u64::MAX - 2).unwrap();
        assert!(store.has_capacity());
        assert_eq!(store.append("alice", 1, "slot").sequence, u64::MAX - 2);
        assert!(!store.has_capacity());

        // The last state reachable through append still reloads
        let reloaded = EventStore::from_events(store.to_events(), store.next_sequence()).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn test_get_by_sequence() {
        let mut store = store_with(&[("alice", 10), ("bob", 20), ("alice", 30)]);

        assert_eq!(store.get(2).map(|e| e.score), Some(20));
        assert_eq!(store.get(3).map(|e| e.player_id.as_str()), Some("alice"));
        assert!(store.get(0).is_none());
        assert!(store.get(4).is_none());

        store.delete("bob");
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_from_events_rejects_duplicate_sequence() {
        let store = store_with(&[("alice", 1)]);
        let mut events = store.to_events();
        let mut dup = events[0].clone();
        dup.player_id = "bob".to_string();
        events.push(dup);

        let result = EventStore::from_events(events, 10);
        assert!(matches!(result, Err(PersistenceError::Corrupted(_))));
    }
}
