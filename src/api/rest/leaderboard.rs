//! Ranking endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::api::state::AppState;
use crate::types::{GlobalStats, LeaderboardEntry, SummarySource};

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<usize>,
}

/// Response for GET /get_leaderboard
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Which history the totals were computed over
    pub source: SummarySource,
    pub generated_at: DateTime<Utc>,
}

/// GET /get_leaderboard - Players ranked by total score
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LeaderboardParams>, QueryRejection>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let Query(params) = params?;

    Ok(Json(LeaderboardResponse {
        leaderboard: state.service.leaderboard(params.limit),
        source: state.service.config().summary_source,
        generated_at: Utc::now(),
    }))
}

/// GET /get_global_stats - Figures across every player
pub async fn get_global_stats(State(state): State<Arc<AppState>>) -> Json<GlobalStats> {
    Json(state.service.global_stats())
}
