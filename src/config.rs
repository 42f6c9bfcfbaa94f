//! Process configuration, read once at startup.
//!
//! Values come from the environment (after `.env` is loaded by the binary) and
//! may be overridden by CLI flags. The API key lives here and is handed to the
//! model client when it is built; nothing reads it from the environment later.

use std::{str::FromStr, sync::Arc, time::Duration};

use crate::{
    core::ItineraryGenerator,
    error::{PlannerError, Result},
    schemas::Validator,
    services::{
        gemini_client::DEFAULT_GEMINI_MODEL, openai_client::DEFAULT_OPENAI_MODEL, GeminiClient,
        ModelClient, OpenAIClient,
    },
};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which upstream API the generator talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
            Provider::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for Provider {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" | "openrouter" => Ok(Provider::OpenAi),
            other => Err(PlannerError::Config(format!(
                "unknown provider `{other}` (expected `gemini` or `openai`)"
            ))),
        }
    }
}

/// Settings for the generator, its model client, and the HTTP server
#[derive(Clone)]
pub struct PlannerConfig {
    pub provider: Provider,
    gemini_api_key: Option<String>,
    openai_api_key: Option<String>,
    /// Model identifier; the provider default when unset
    pub model: Option<String>,
    /// API base URL for whichever provider is selected; the provider default when unset
    pub base_url: Option<String>,
    /// `OPENAI_BASE_URL` / `OPENROUTER_BASE_URL`, consulted only for the openai provider
    openai_base_url: Option<String>,
    pub bind_addr: String,
    /// Transport timeout for the model call
    pub timeout: Duration,
    pub validator: Validator,
}

impl std::fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("provider", &self.provider)
            .field("api_key_set", &self.api_key().is_some())
            .field("model", &self.model())
            .field("base_url", &self.base_url())
            .field("bind_addr", &self.bind_addr)
            .field("timeout", &self.timeout)
            .field("validator", &self.validator)
            .finish()
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            gemini_api_key: None,
            openai_api_key: None,
            model: None,
            base_url: None,
            openai_base_url: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            validator: Validator::default(),
        }
    }
}

impl PlannerConfig {
    /// Build configuration from environment variables, falling back to defaults
    /// for unset or unparseable values.
    ///
    /// - `TRIP_PLANNER_PROVIDER` (`gemini` or `openai`, default `gemini`)
    /// - `GEMINI_API_KEY` / `OPENAI_API_KEY`
    /// - `TRIP_PLANNER_MODEL`
    /// - `TRIP_PLANNER_BASE_URL` (or `OPENAI_BASE_URL` / `OPENROUTER_BASE_URL` when the
    ///   final provider is openai)
    /// - `TRIP_PLANNER_BIND` (default 127.0.0.1:3000)
    /// - `TRIP_PLANNER_TIMEOUT_SECS` (default 120)
    /// - `TRIP_PLANNER_STRICT` (default true)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let provider = match non_empty("TRIP_PLANNER_PROVIDER") {
            Some(value) => value.parse()?,
            None => default.provider,
        };

        Ok(Self {
            provider,
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            model: non_empty("TRIP_PLANNER_MODEL"),
            base_url: non_empty("TRIP_PLANNER_BASE_URL"),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .or_else(|| non_empty("OPENROUTER_BASE_URL")),
            bind_addr: non_empty("TRIP_PLANNER_BIND").unwrap_or(default.bind_addr),
            timeout: non_empty("TRIP_PLANNER_TIMEOUT_SECS")
                .and_then(|value| value.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.timeout),
            validator: non_empty("TRIP_PLANNER_STRICT")
                .and_then(|value| parse_flag(&value))
                .map(|strict| {
                    if strict {
                        Validator::Strict
                    } else {
                        Validator::SerdeFirst
                    }
                })
                .unwrap_or(default.validator),
        })
    }

    /// Credential for the selected provider
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            Provider::Gemini => self.gemini_api_key.as_deref(),
            Provider::OpenAi => self.openai_api_key.as_deref(),
        }
    }

    /// Set the credential for the selected provider
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        let key = Some(key.into());
        match self.provider {
            Provider::Gemini => self.gemini_api_key = key,
            Provider::OpenAi => self.openai_api_key = key,
        }
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Base URL for the selected provider, resolved against the provider as it
    /// stands now so CLI overrides of `provider` pick the right fallback.
    pub fn base_url(&self) -> Option<&str> {
        match (&self.base_url, self.provider) {
            (Some(explicit), _) => Some(explicit.as_str()),
            (None, Provider::OpenAi) => self.openai_base_url.as_deref(),
            (None, Provider::Gemini) => None,
        }
    }

    /// Construct the model client for the selected provider.
    pub fn build_client(&self) -> Result<Arc<dyn ModelClient>> {
        let api_key = self.api_key().ok_or_else(|| {
            PlannerError::Config(format!(
                "{} must be set (or pass --api-key) to call the {:?} API",
                self.provider.api_key_var(),
                self.provider
            ))
        })?;

        let client: Arc<dyn ModelClient> = match self.provider {
            Provider::Gemini => {
                let mut client = GeminiClient::new(api_key, self.model(), self.timeout)?;
                if let Some(base_url) = self.base_url() {
                    client = client.with_base_url(base_url);
                }
                Arc::new(client)
            }
            Provider::OpenAi => {
                let mut client = OpenAIClient::new(api_key, self.model(), self.timeout)?;
                if let Some(base_url) = self.base_url() {
                    client = client.with_base_url(base_url);
                }
                Arc::new(client)
            }
        };

        Ok(client)
    }

    pub fn build_generator(&self) -> Result<ItineraryGenerator> {
        Ok(ItineraryGenerator::new(self.build_client()?).with_validator(self.validator))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
