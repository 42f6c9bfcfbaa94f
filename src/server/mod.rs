//! HTTP surface for the planner (axum).
//!
//! Single route: `POST /generate`. See [`router`] for wiring and
//! the `response` module for how errors become status codes.

mod app;
mod handlers;
mod response;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::{
    core::ItineraryGenerator,
    error::{PlannerError, Result},
};

pub use app::{router, AppState};

/// Serve on an existing listener. Tests bind `127.0.0.1:0` and pass the listener in.
pub async fn serve_on_listener(
    listener: TcpListener,
    generator: ItineraryGenerator,
) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|err| PlannerError::Unknown(format!("listener has no local address: {err}")))?;
    info!(
        target: "trip_planner::server",
        %addr,
        provider = generator.client().provider(),
        model = generator.client().model(),
        "itinerary server listening"
    );

    let app = router(Arc::new(AppState::new(generator)));
    axum::serve(listener, app)
        .await
        .map_err(|err| PlannerError::Unknown(format!("server error: {err}")))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn run_server(addr: &str, generator: ItineraryGenerator) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| PlannerError::Config(format!("failed to bind {addr}: {err}")))?;
    serve_on_listener(listener, generator).await
}
