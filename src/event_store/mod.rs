//! Event Store Module
//!
//! This module provides the durable core of the ledger:
//! - `EventStore`: append-only log of score events, grouped per player
//! - `PersistenceAdapter`: snapshot/restore of the full state
//! - `JsonFileStore` / `MemoryStore`: the two adapters
//! - `ActivityCounters`: process-wide counters for health reporting
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌─────────┐    ┌────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ Submit  │───►│ append to  │───►│ update views │───►│ flush document   │
//! │ Request │    │ EventStore │    │ (ledger)     │    │ tmp → rename     │
//! └─────────┘    └────────────┘    └──────────────┘    └──────────────────┘
//!
//! Read Path (Startup):
//! ┌──────────────────┐    ┌────────────────────┐
//! │ Load scores.json │───►│ fall back to .bak  │───► Ready!
//! │ (primary)        │    │ if primary corrupt │
//! └──────────────────┘    └────────────────────┘
//! ```

mod snapshot;
mod stats;
mod store;

pub use snapshot::{
    JsonFileStore, MemoryStore, PersistenceAdapter, PlayerDocument, StoreDocument, FORMAT_VERSION,
};
pub use stats::{ActivityCounters, ActivitySnapshot};
pub use store::{clamp_limit, EventStore, PersistenceError, PersistenceResult, MAX_QUERY_LIMIT};
