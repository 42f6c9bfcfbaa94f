//! Axum app: shared state and router.

use std::sync::Arc;

use axum::{routing::post, Router};

use super::handlers::generate_handler;
use crate::core::ItineraryGenerator;

/// Shared state for the HTTP server.
///
/// The generator (and the model client inside it) is built once at startup and
/// shared read-only; requests keep no state of their own here.
#[derive(Debug, Clone)]
pub struct AppState {
    pub generator: ItineraryGenerator,
}

impl AppState {
    pub fn new(generator: ItineraryGenerator) -> Self {
        Self { generator }
    }
}

/// Builds the router with `POST /generate`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/generate", post(generate_handler))
        .with_state(state)
}
