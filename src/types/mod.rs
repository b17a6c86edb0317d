//! Data types for the score ledger
//!
//! This module contains the core records and derived views shared by the
//! event store, the ledger, the aggregator and the HTTP layer.

mod event;
mod summary;

pub use event::{is_win, wide_total, ScoreEvent, SortOrder, MAX_ABS_SCORE};
pub use summary::{round2, saturate, GlobalStats, LeaderboardEntry, Summary, SummarySource};
