//! Score endpoints - submission and per-event listings

use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{blocking, ApiError, PlayerParams};
use crate::api::state::AppState;
use crate::service::SubmitScore;
use crate::types::{ScoreEvent, SortOrder};
use crate::utils::date_display;

/// Response for POST /save_score
#[derive(Debug, Serialize)]
pub struct SaveScoreResponse {
    pub status: &'static str,
    pub player_id: String,
    pub score: i64,
    pub game_type: String,
    pub score_data: ScoreEvent,
    /// `dd/mm/YYYY HH:MM`, shown as-is by the game front ends
    pub date_display: String,
    pub current_total_score: i64,
    pub total_victories: usize,
    pub total_games: usize,
    pub message: String,
}

/// POST /save_score - Record one score
pub async fn save_score(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SubmitScore>, JsonRejection>,
) -> Result<Json<SaveScoreResponse>, ApiError> {
    let Json(submission) = body?;
    let outcome = blocking(&state, move |service| service.submit_score(submission)).await?;

    let event = outcome.event;
    Ok(Json(SaveScoreResponse {
        status: "success",
        message: format!("Score {} saved for player {}", event.score, event.player_id),
        player_id: event.player_id.clone(),
        score: event.score,
        game_type: event.game_type.clone(),
        date_display: date_display(&event.timestamp),
        score_data: event,
        current_total_score: outcome.current_total_score,
        total_victories: outcome.total_victories,
        total_games: outcome.total_games,
    }))
}

/// Query parameters for the recent-history and event-history listings
#[derive(Debug, Deserialize)]
pub struct ScoresParams {
    pub player_id: Option<String>,
    pub limit: Option<usize>,
    /// Only used by /get_history
    pub order: Option<SortOrder>,
}

/// Response for GET /get_scores and GET /get_history
#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub player_id: String,
    pub scores: Vec<ScoreEvent>,
    pub total_count: usize,
}

/// GET /get_scores - Recent history, newest first
pub async fn get_scores(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ScoresParams>, QueryRejection>,
) -> Result<Json<ScoresResponse>, ApiError> {
    let Query(params) = params?;
    let player_id = state.service.player_id(params.player_id)?;
    let scores = state.service.recent_scores(&player_id, params.limit);

    Ok(Json(ScoresResponse {
        total_count: scores.len(),
        player_id,
        scores,
    }))
}

/// GET /get_history - Every recorded event, including those evicted from recent history
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ScoresParams>, QueryRejection>,
) -> Result<Json<ScoresResponse>, ApiError> {
    let Query(params) = params?;
    let player_id = state.service.player_id(params.player_id)?;
    let scores = state.service.score_history(
        &player_id,
        params.limit,
        params.order.unwrap_or_default(),
    );

    Ok(Json(ScoresResponse {
        total_count: scores.len(),
        player_id,
        scores,
    }))
}

/// Response for GET /get_victories
#[derive(Debug, Serialize)]
pub struct VictoriesResponse {
    pub player_id: String,
    pub victories: Vec<ScoreEvent>,
    pub total_victories: usize,
}

/// GET /get_victories - Winning events, oldest first
pub async fn get_victories(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PlayerParams>, QueryRejection>,
) -> Result<Json<VictoriesResponse>, ApiError> {
    let Query(params) = params?;
    let player_id = state.service.player_id(params.player_id)?;
    let report = state.service.victories(&player_id);

    Ok(Json(VictoriesResponse {
        player_id,
        victories: report.victories,
        total_victories: report.total_victories,
    }))
}

/// Query parameters for GET /get_score
#[derive(Debug, Deserialize)]
pub struct ScoreParams {
    pub sequence: u64,
}

/// Response for GET /get_score
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score_data: ScoreEvent,
    pub date_display: String,
}

/// GET /get_score - One event by sequence number
pub async fn get_score(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ScoreParams>, QueryRejection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let Query(params) = params?;
    let event = state.service.score_by_sequence(params.sequence)?;

    Ok(Json(ScoreResponse {
        date_display: date_display(&event.timestamp),
        score_data: event,
    }))
}

/// Query parameters for GET /get_top_scores
#[derive(Debug, Deserialize)]
pub struct TopScoresParams {
    pub limit: Option<usize>,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
}

/// Response for GET /get_top_scores
#[derive(Debug, Serialize)]
pub struct TopScoresResponse {
    pub scores: Vec<ScoreEvent>,
    pub total_count: usize,
}

/// GET /get_top_scores - Best events across all players
pub async fn get_top_scores(
    State(state): State<Arc<AppState>>,
    params: Result<Query<TopScoresParams>, QueryRejection>,
) -> Result<Json<TopScoresResponse>, ApiError> {
    let Query(params) = params?;
    let scores = state
        .service
        .top_scores(params.min_score, params.max_score, params.limit)?;

    Ok(Json(TopScoresResponse {
        total_count: scores.len(),
        scores,
    }))
}
