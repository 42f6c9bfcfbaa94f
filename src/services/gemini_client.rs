use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{GenerationError, Result},
    services::model_client::{build_http_client, upstream_error_message, ModelClient},
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Google Gemini client calling `models/{model}:generateContent`.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|err| GenerationError::UpstreamCall(format!("HTTP request failed: {err}")))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|err| {
            GenerationError::UpstreamCall(format!("Failed to read response: {err}"))
        })?;

        if !status.is_success() {
            return Err(GenerationError::UpstreamCall(format!(
                "HTTP {} error: {}",
                status,
                upstream_error_message(&response_text)
            )));
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|err| {
                GenerationError::UpstreamCall(format!("Failed to decode Gemini response: {err}"))
            })?;

        let text = envelope.first_candidate_text().ok_or_else(|| {
            let reason = envelope
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            GenerationError::UpstreamCall(format!("Gemini returned no text: {reason}"))
        })?;

        debug!(
            target: "trip_planner::upstream",
            provider = "gemini",
            model = %self.model,
            chars = text.len(),
            "received completion"
        );

        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn first_candidate_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|part| part.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-key", "gemini-1.5-flash", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url)
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let client = client("https://example.com/");
        assert_eq!(
            client.endpoint(),
            "https://example.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", client("https://example.com"));
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("gemini-1.5-flash"));
    }

    #[tokio::test]
    async fn test_complete_joins_parts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJsonString(
                r#"{"contents":[{"role":"user","parts":[{"text":"plan it"}]}]}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#,
            )
            .create_async()
            .await;

        let text = client(&server.url()).complete("plan it").await.unwrap();
        assert_eq!(text, "{\"a\":1}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_is_call_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let err = client(&server.url()).complete("plan it").await.unwrap_err();
        match err {
            GenerationError::UpstreamCall(message) => {
                assert!(message.contains("403"));
                assert!(message.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_call_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let err = client(&server.url()).complete("plan it").await.unwrap_err();
        assert!(matches!(err, GenerationError::UpstreamCall(ref m) if m.contains("SAFETY")));
    }
}
