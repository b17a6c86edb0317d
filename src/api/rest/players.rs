//! Player endpoints - stats, listing, resets and deletion

use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    Json,
};
use serde::Serialize;

use super::{blocking, ApiError, PlayerBody, PlayerParams};
use crate::api::state::AppState;
use crate::types::Summary;

/// GET /get_player_stats - Summary for one player
pub async fn get_player_stats(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PlayerParams>, QueryRejection>,
) -> Result<Json<Summary>, ApiError> {
    let Query(params) = params?;
    let player_id = state.service.player_id(params.player_id)?;
    Ok(Json(state.service.player_stats(&player_id)?))
}

/// Response for GET /get_all_players
#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<String>,
    pub total_players: usize,
}

/// GET /get_all_players - Every known player id, ascending
pub async fn get_all_players(State(state): State<Arc<AppState>>) -> Json<PlayersResponse> {
    let players = state.service.players();
    Json(PlayersResponse {
        total_players: players.len(),
        players,
    })
}

/// Response for POST /reset_scores
#[derive(Debug, Serialize)]
pub struct ResetScoresResponse {
    pub status: &'static str,
    pub player_id: String,
    pub score_reset_to: i64,
    pub scores_cleared: usize,
    pub victories_preserved: usize,
    pub message: String,
}

/// POST /reset_scores - Clear recent history, keep victories
pub async fn reset_scores(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlayerBody>, JsonRejection>,
) -> Result<Json<ResetScoresResponse>, ApiError> {
    let Json(body) = body?;
    let player_id = state.service.player_id(body.player_id)?;

    let target = player_id.clone();
    let report = blocking(&state, move |service| service.reset_scores(&target)).await?;

    Ok(Json(ResetScoresResponse {
        status: "success",
        message: format!(
            "Score reset for player {} ({} victories kept)",
            player_id, report.victories_preserved
        ),
        player_id,
        score_reset_to: 0,
        scores_cleared: report.scores_cleared,
        victories_preserved: report.victories_preserved,
    }))
}

/// Response for POST /reset_all
#[derive(Debug, Serialize)]
pub struct ResetAllResponse {
    pub status: &'static str,
    pub player_id: String,
    pub score_reset_to: i64,
    pub victories_reset_to: usize,
    pub scores_cleared: usize,
    pub victories_cleared: usize,
    pub message: String,
}

/// POST /reset_all - Clear recent history and victories
pub async fn reset_all(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlayerBody>, JsonRejection>,
) -> Result<Json<ResetAllResponse>, ApiError> {
    let Json(body) = body?;
    let player_id = state.service.player_id(body.player_id)?;

    let target = player_id.clone();
    let report = blocking(&state, move |service| service.reset_all(&target)).await?;

    Ok(Json(ResetAllResponse {
        status: "success",
        message: format!("Scores and victories reset for player {}", player_id),
        player_id,
        score_reset_to: 0,
        victories_reset_to: 0,
        scores_cleared: report.scores_cleared,
        victories_cleared: report.victories_cleared,
    }))
}

/// Response for POST /delete_scores
#[derive(Debug, Serialize)]
pub struct DeleteScoresResponse {
    pub status: &'static str,
    pub player_id: String,
    pub deleted_count: usize,
}

/// POST /delete_scores - Remove every recorded event of a player
pub async fn delete_scores(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlayerBody>, JsonRejection>,
) -> Result<Json<DeleteScoresResponse>, ApiError> {
    let Json(body) = body?;
    let player_id = state.service.player_id(body.player_id)?;

    let target = player_id.clone();
    let deleted_count = blocking(&state, move |service| service.delete_scores(&target)).await?;

    Ok(Json(DeleteScoresResponse {
        status: "success",
        player_id,
        deleted_count,
    }))
}
