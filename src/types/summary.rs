//! Derived statistics: player summaries, leaderboard rows, global stats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ScoreEvent;

/// Which retained view statistics and rankings are computed from
///
/// `RetainedHistory` only sees what the bounded recent-history buffer still
/// holds. Once a player exceeds the buffer capacity, the oldest scores drop out
/// of their totals, averages and leaderboard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    /// Full unbounded history from the Event Store
    #[default]
    EventLog,
    /// Only the capacity-bounded recent history
    RetainedHistory,
}

impl std::fmt::Display for SummarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarySource::EventLog => write!(f, "event_log"),
            SummarySource::RetainedHistory => write!(f, "retained_history"),
        }
    }
}

impl std::str::FromStr for SummarySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event_log" => Ok(SummarySource::EventLog),
            "retained_history" => Ok(SummarySource::RetainedHistory),
            other => Err(format!(
                "unknown summary source '{}' (expected event_log or retained_history)",
                other
            )),
        }
    }
}

/// Per-player statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub player_id: String,
    pub total_games: usize,
    pub total_score: i64,
    pub best_score: i64,
    pub worst_score: i64,
    /// Rounded to 2 decimals
    pub average_score: f64,
    pub last_game: Option<ScoreEvent>,
    pub first_game: Option<ScoreEvent>,
    pub last_played: Option<DateTime<Utc>>,
}

impl Summary {
    /// Zero-valued summary for a known player with nothing to aggregate
    pub fn empty(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            total_games: 0,
            total_score: 0,
            best_score: 0,
            worst_score: 0,
            average_score: 0.0,
            last_game: None,
            first_game: None,
            last_played: None,
        }
    }
}

/// One ranked leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player_id: String,
    pub total_score: i64,
    pub best_score: i64,
    pub games_played: usize,
    pub last_play: Option<DateTime<Utc>>,
}

/// Statistics across every player in the Event Store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_scores: usize,
    pub total_players: usize,
    pub global_best_score: Option<i64>,
    pub global_worst_score: Option<i64>,
    pub global_average_score: Option<f64>,
    pub first_score_date: Option<DateTime<Utc>>,
    pub last_score_date: Option<DateTime<Utc>>,
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Narrow a widened total, pinning it to the `i64` bounds
pub fn saturate(total: i128) -> i64 {
    i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX })
}
