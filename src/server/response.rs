//! Maps planner errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::error::{GenerationError, PlannerError};

pub(crate) fn status_for(err: &PlannerError) -> StatusCode {
    match err {
        PlannerError::Validation(_) => StatusCode::BAD_REQUEST,
        PlannerError::Generation(GenerationError::UpstreamFormat { .. }) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!(
                target: "trip_planner::server",
                code = self.error_code(),
                error = %self,
                "request failed"
            );
        } else {
            info!(
                target: "trip_planner::server",
                code = self.error_code(),
                error = %self,
                "request rejected"
            );
        }
        (status, Json(self.to_error_payload())).into_response()
    }
}
