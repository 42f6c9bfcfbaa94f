use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::warn;

use super::app::AppState;
use crate::{
    error::{PlannerError, ValidationError},
    types::Itinerary,
};

/// Handles `POST /generate`.
///
/// The body is read as raw bytes so that malformed JSON is reported through the
/// same validation error shape as bad field values.
pub(crate) async fn generate_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Itinerary>, PlannerError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|err| {
        warn!(target: "trip_planner::server", error = %err, "request body is not JSON");
        let mut details = ValidationError::new();
        details.push_form("Request body must be a valid JSON object.");
        PlannerError::Validation(details)
    })?;

    let itinerary = state.generator.generate_from_value(&payload).await?;
    Ok(Json(itinerary))
}
