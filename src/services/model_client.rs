use async_trait::async_trait;

use crate::error::GenerationError;

/// A generative-text model reachable with a single prompt.
///
/// Implementations own their credential and transport settings; they are
/// constructed once at startup and shared read-only across requests.
#[async_trait]
pub trait ModelClient: Send + Sync + std::fmt::Debug {
    /// Short provider label used in logs (e.g. "gemini")
    fn provider(&self) -> &'static str;

    /// Model identifier sent with every call
    fn model(&self) -> &str;

    /// Send one prompt and return the model's text completion.
    ///
    /// Transport, auth, quota, and empty-completion failures are all
    /// [`GenerationError::UpstreamCall`].
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Pull a human readable message out of a provider error envelope
/// (`{"error": {"message": ...}}`), falling back to the raw body.
pub(crate) fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Build the shared reqwest client with the transport-level timeout.
pub(crate) fn build_http_client(
    timeout: std::time::Duration,
) -> Result<reqwest::Client, crate::error::PlannerError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| {
            crate::error::PlannerError::Config(format!("Failed to build HTTP client: {err}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted"}}"#;
        assert_eq!(upstream_error_message(body), "Resource has been exhausted");
        assert_eq!(upstream_error_message("Bad Gateway"), "Bad Gateway");
    }
}
