//! HTTP surface of the score ledger
//!
//! Thin axum handlers over `ScoreService`. Reads use the published snapshot
//! directly; mutations run on the blocking pool because they flush to disk.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
