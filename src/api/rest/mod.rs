//! REST endpoints
//!
//! - `POST /save_score`, `GET /get_scores`, `GET /get_history`,
//!   `GET /get_victories`, `GET /get_top_scores` - see [`scores`]
//! - `GET /get_player_stats`, `GET /get_all_players`, `POST /reset_scores`,
//!   `POST /reset_all`, `POST /delete_scores` - see [`players`]
//! - `GET /get_leaderboard`, `GET /get_global_stats` - see [`leaderboard`]
//! - `GET /health` - see [`health`]

pub mod health;
pub mod leaderboard;
pub mod players;
pub mod scores;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::state::AppState;
use crate::error::{ScoreError, ScoreResult};
use crate::service::ScoreService;

/// `?player_id=` on read endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PlayerParams {
    pub player_id: Option<String>,
}

/// `{"player_id": ...}` body of the reset and delete endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PlayerBody {
    #[serde(default)]
    pub player_id: Option<String>,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: &'static str,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
            code: "VALIDATION_ERROR",
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: message.into(),
            code: "NOT_FOUND",
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: message.into(),
            code: "PERSISTENCE_ERROR",
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: message.into(),
            code: "INTERNAL_ERROR",
        }
    }
}

impl From<ScoreError> for ApiError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::Validation(message) => ApiError::validation(message),
            ScoreError::NotFound(_) | ScoreError::EventNotFound(_) => {
                ApiError::not_found(err.to_string())
            }
            ScoreError::Persistence(_) => ApiError::persistence(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Run a service call on the blocking pool
///
/// Mutations flush to disk before returning, so they stay off the async workers.
pub async fn blocking<T, F>(state: &AppState, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&ScoreService) -> ScoreResult<T> + Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(|e| {
            error!(error = %e, "Blocking task failed");
            ApiError::internal("Request could not be completed")
        })?
        .map_err(ApiError::from)
}
