use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    error::{GenerationError, Result},
    services::model_client::{build_http_client, upstream_error_message, ModelClient},
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "openai/gpt-4.1-mini";

/// Client for OpenAI-compatible `chat/completions` endpoints (OpenAI, OpenRouter, gateways).
#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAIClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ModelClient for OpenAIClient {
    fn provider(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        let body = ChatCompletionRequest::user_prompt(&self.model, prompt);

        let response = self
            .http
            .post(build_chat_url(&self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "trip-planner-rs")
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

        let response_json: Value = serde_json::from_str(&response_text).map_err(|err| {
            GenerationError::UpstreamCall(format!("Failed to parse JSON: {err}"))
        })?;

        if response_json.get("error").is_some() {
            return Err(GenerationError::UpstreamCall(format!(
                "API error: {}",
                upstream_error_message(&response_text)
            )));
        }

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::UpstreamCall("completion contained no message content".to_string())
            })?;

        debug!(
            target: "trip_planner::upstream",
            provider = "openai",
            model = %self.model,
            chars = content.len(),
            "received completion"
        );

        Ok(content.to_string())
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn user_prompt(model: &'a str, prompt: &str) -> Self {
        Self {
            model,
            messages: vec![json!({ "role": "user", "content": prompt })],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_build_chat_url() {
        assert_eq!(
            build_chat_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("http://localhost:8080/v1/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(ChatCompletionRequest::user_prompt("gpt-4o-mini", "plan it"))
            .unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "user", "content": "plan it" }]
            })
        );
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJsonString(
                r#"{"model":"gpt-4o-mini","messages":[{"role":"user","content":"plan it"}]}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"{}"}}]}"#)
            .create_async()
            .await;

        let client = OpenAIClient::new("sk-test", "gpt-4o-mini", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.url());
        assert_eq!(client.complete("plan it").await.unwrap(), "{}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit exceeded"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = OpenAIClient::new("sk-test", "gpt-4o-mini", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.url());
        let err = client.complete("plan it").await.unwrap_err();
        assert!(err.to_string().contains("Rate limit exceeded"));
        mock.assert_async().await;
    }
}
