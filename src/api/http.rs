//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{health, leaderboard, players, scores};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Game front ends are served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        // Scores
        .route("/save_score", post(scores::save_score))
        .route("/get_score", get(scores::get_score))
        .route("/get_scores", get(scores::get_scores))
        .route("/get_history", get(scores::get_history))
        .route("/get_victories", get(scores::get_victories))
        .route("/get_top_scores", get(scores::get_top_scores))
        // Players
        .route("/get_player_stats", get(players::get_player_stats))
        .route("/get_all_players", get(players::get_all_players))
        .route("/reset_scores", post(players::reset_scores))
        .route("/reset_all", post(players::reset_all))
        .route("/delete_scores", post(players::delete_scores))
        // Rankings
        .route("/get_leaderboard", get(leaderboard::get_leaderboard))
        .route("/get_global_stats", get(leaderboard::get_global_stats))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::service::ScoreService;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> Router {
        let service = ScoreService::open(ServiceConfig::in_memory()).unwrap();
        create_router(Arc::new(AppState::new(Arc::new(service))))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = app();
        let (status, body) = send(&app, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["storage"], "memory");
        assert_eq!(body["total_players"], 0);
    }

    #[tokio::test]
    async fn test_save_and_read_back() {
        let app = app();

        let (status, body) = send(
            &app,
            post_json("/save_score", json!({"player_id": "alice", "score": 1500})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["game_type"], "slot");
        assert_eq!(body["current_total_score"], 1500);
        assert_eq!(body["total_victories"], 1);
        assert_eq!(body["score_data"]["sequence"], 1);

        let (status, body) = send(&app, get("/get_scores?player_id=alice")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["scores"][0]["score"], 1500);
    }

    #[tokio::test]
    async fn test_missing_score_is_rejected() {
        let app = app();
        let (status, body) = send(&app, post_json("/save_score", json!({"player_id": "alice"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Score is required");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/save_score")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_player_stats_is_404() {
        let app = app();
        let (status, body) = send(&app, get("/get_player_stats?player_id=ghost")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(&app, post_json("/reset_scores", json!({"player_id": "ghost"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_limit_is_rejected() {
        let app = app();
        let (status, body) = send(&app, get("/get_scores?limit=lots")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let app = app();
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:8000")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
