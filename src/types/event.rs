//! Score event - the immutable record at the heart of the ledger
//!
//! Every submitted score becomes exactly one `ScoreEvent`. Events are
//! identified by their sequence number, which the Event Store assigns in
//! strictly increasing order. Every other view (recent history, victories,
//! summaries) is derived from these records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest accepted score magnitude
///
/// Keeps every per-player sum far inside `i64` for any realistic number of games.
pub const MAX_ABS_SCORE: i64 = 1_000_000_000_000;

/// Rule deciding which events count as victories
pub fn is_win(score: i64) -> bool {
    score > 0
}

/// Sum of the scores, widened so it cannot overflow
pub fn wide_total<'a, I>(events: I) -> i128
where
    I: IntoIterator<Item = &'a ScoreEvent>,
{
    events.into_iter().map(|e| i128::from(e.score)).sum()
}

/// One submitted (player, score, game type, timestamp) record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Append-order identity, unique across all players
    pub sequence: u64,
    pub player_id: String,
    pub score: i64,
    pub game_type: String,
    /// Wall-clock time at append, never supplied by the caller
    pub timestamp: DateTime<Utc>,
}

impl ScoreEvent {
    /// Create a new event stamped with the current time
    pub fn new(sequence: u64, player_id: String, score: i64, game_type: String) -> Self {
        Self::with_timestamp(sequence, player_id, score, game_type, Utc::now())
    }

    /// Create an event with an explicit timestamp (restores and tests)
    pub fn with_timestamp(
        sequence: u64,
        player_id: String,
        score: i64,
        game_type: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence,
            player_id,
            score,
            game_type,
            timestamp,
        }
    }

    /// Whether this event meets the win predicate
    pub fn is_win(&self) -> bool {
        is_win(self.score)
    }
}

/// Ordering for history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    Asc,
    /// Most recent first
    #[default]
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_predicate() {
        assert!(is_win(1));
        assert!(is_win(1500));
        assert!(!is_win(0));
        assert!(!is_win(-200));
    }

    #[test]
    fn test_wide_total_does_not_overflow() {
        let events: Vec<ScoreEvent> = (1..=3)
            .map(|seq| ScoreEvent::new(seq, "alice".to_string(), i64::MAX, "slot".to_string()))
            .collect();

        assert_eq!(wide_total(&events), 3 * i128::from(i64::MAX));
        assert_eq!(wide_total(Vec::<ScoreEvent>::new().iter()), 0);
    }

    #[test]
    fn test_event_json_shape() {
        let ts = DateTime::parse_from_rfc3339("2026-10-18T08:59:58Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = ScoreEvent::with_timestamp(7, "alice".to_string(), 1500, "slot".to_string(), ts);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["sequence"], 7);
        assert_eq!(value["player_id"], "alice");
        assert_eq!(value["score"], 1500);
        assert_eq!(value["game_type"], "slot");
        assert_eq!(value["timestamp"], "2026-10-18T08:59:58Z");
    }

    #[test]
    fn test_sort_order_parses_lowercase() {
        let order: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(order, SortOrder::Asc);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }
}
