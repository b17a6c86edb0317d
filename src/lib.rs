//! Score Ledger
//!
//! HTTP backend for slot-machine and Plinko style games. Every submitted
//! score becomes an immutable event; per-player views are derived from it:
//!
//! - **Recent history**: the last N scores (default 50), newest first
//! - **Victories**: every winning score (`score > 0`), oldest first
//! - **Summaries**: games played, total, best, worst and average
//! - **Leaderboard**: players ranked by total score
//!
//! State lives in a single JSON document, rewritten atomically after every
//! mutation.
//!
//! # Modules
//!
//! - `types`: Core records (ScoreEvent, Summary, LeaderboardEntry)
//! - `event_store`: Append-only event log and persistence adapters
//! - `ledger`: Recent-history buffer and victory ledger
//! - `aggregate`: Summaries, leaderboard and global statistics
//! - `service`: `ScoreService`, the guarded state container
//! - `api`: Axum router and REST handlers
//! - `config`: Environment-driven configuration
//! - `utils`: Atomic file writes and time helpers
//!
//! # Example
//!
//! ```no_run
//! use score_ledger::{ScoreService, ServiceConfig, SubmitScore};
//!
//! let service = ScoreService::open(ServiceConfig::with_data_file("scores.json")).unwrap();
//! let outcome = service.submit_score(SubmitScore::new("alice", 1500)).unwrap();
//! assert_eq!(outcome.total_victories, 1);
//! ```

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod event_store;
pub mod ledger;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use aggregate::Aggregator;
pub use config::{ConfigError, ServerConfig, ServiceConfig, StorageKind};
pub use error::{ScoreError, ScoreResult};
pub use event_store::{EventStore, JsonFileStore, MemoryStore, PersistenceAdapter, PersistenceError};
pub use ledger::{LedgerState, RecentHistory, ResetReport, VictoryLedger};
pub use service::{ScoreService, SubmitOutcome, SubmitScore};
pub use types::{GlobalStats, LeaderboardEntry, ScoreEvent, SortOrder, Summary, SummarySource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
