use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// User-facing message for rejected request payloads
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input.";
/// User-facing message when the model reply cannot be parsed
pub const UPSTREAM_FORMAT_MESSAGE: &str =
    "The AI returned an invalid response format. Please try again.";
/// User-facing message for every other failure
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Field-level problems found while validating an itinerary request.
///
/// Every offending field is reported, not only the first one, so a client can
/// show all problems at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Problems with the payload as a whole (e.g. not a JSON object)
    pub form_errors: Vec<String>,
    /// Problems keyed by field name
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_form(&mut self, message: impl Into<String>) {
        self.form_errors.push(message.into());
    }

    pub fn push_field(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    /// Messages recorded for `field`, empty when the field is fine
    pub fn field(&self, field: &str) -> &[String] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.field_errors.contains_key(field)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self.form_errors.clone();
        for (field, messages) in &self.field_errors {
            parts.push(format!("{}: {}", field, messages.join(" ")));
        }
        write!(f, "Validation error: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Failures while producing an itinerary from the upstream model
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The model answered, but not with a usable itinerary document
    #[error("Upstream format error: {reason}")]
    UpstreamFormat { reason: String, raw: String },

    /// The model call itself failed (network, auth, quota, empty completion)
    #[error("Upstream call error: {0}")]
    UpstreamCall(String),
}

impl GenerationError {
    pub fn format(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        GenerationError::UpstreamFormat {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Raw model text attached to a format failure. Diagnostic use only.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            GenerationError::UpstreamFormat { raw, .. } => Some(raw),
            GenerationError::UpstreamCall(_) => None,
        }
    }
}

/// Main error type for the planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Get the error code for structured responses and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Validation(_) => "VALIDATION_ERROR",
            PlannerError::Generation(GenerationError::UpstreamFormat { .. }) => {
                "UPSTREAM_FORMAT_ERROR"
            }
            PlannerError::Generation(GenerationError::UpstreamCall(_)) => "UPSTREAM_CALL_ERROR",
            PlannerError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// The message shown to callers. Never includes internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            PlannerError::Validation(_) => INVALID_INPUT_MESSAGE,
            PlannerError::Generation(GenerationError::UpstreamFormat { .. }) => {
                UPSTREAM_FORMAT_MESSAGE
            }
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Convert to the JSON body returned to HTTP callers
    pub fn to_error_payload(&self) -> serde_json::Value {
        match self {
            PlannerError::Validation(details) => serde_json::json!({
                "error": self.public_message(),
                "details": details,
            }),
            _ => serde_json::json!({ "error": self.public_message() }),
        }
    }
}
