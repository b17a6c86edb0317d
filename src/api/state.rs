//! Shared application state

use std::sync::Arc;

use crate::service::ScoreService;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScoreService>,
}

impl AppState {
    pub fn new(service: Arc<ScoreService>) -> Self {
        Self { service }
    }
}
