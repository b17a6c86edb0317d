//! Health endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;

/// Response for GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
    pub total_players: usize,
    pub total_games: usize,
    pub submissions_since_start: u64,
    /// Committed submissions, resets and purges
    pub mutations_since_start: u64,
    pub flush_failures: u64,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// GET /health - Process-wide counters
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let report = state.service.health();

    Json(HealthResponse {
        status: "healthy",
        storage: report.storage,
        total_players: report.total_players,
        total_games: report.total_games,
        submissions_since_start: report.activity.submissions_since_start,
        mutations_since_start: report.activity.mutations_since_start,
        flush_failures: report.activity.flush_failures,
        uptime_seconds: report.activity.uptime_seconds,
        timestamp: Utc::now(),
    })
}
