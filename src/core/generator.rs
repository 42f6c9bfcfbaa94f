use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    core::{prompt::build_itinerary_prompt, sanitize::strip_code_fences},
    error::{GenerationError, Result},
    schemas::Validator,
    services::ModelClient,
    types::{Itinerary, ItineraryRequest},
};

/// Turns a validated request into an itinerary with one model call.
#[derive(Debug, Clone)]
pub struct ItineraryGenerator {
    client: Arc<dyn ModelClient>,
    validator: Validator,
}

impl ItineraryGenerator {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            validator: Validator::default(),
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn validator(&self) -> Validator {
        self.validator
    }

    pub fn client(&self) -> &dyn ModelClient {
        self.client.as_ref()
    }

    /// Prompt, call the model once, sanitize the reply, and parse it.
    ///
    /// Nothing is retried: a bad reply is an `UpstreamFormat` error and a failed
    /// call is an `UpstreamCall` error.
    pub async fn generate(
        &self,
        req: &ItineraryRequest,
    ) -> std::result::Result<Itinerary, GenerationError> {
        let prompt = build_itinerary_prompt(req);

        info!(
            target: "trip_planner::generator",
            city = req.city(),
            days = req.days(),
            provider = self.client.provider(),
            model = self.client.model(),
            "requesting itinerary"
        );

        let raw = self.client.complete(&prompt).await.map_err(|err| {
            error!(target: "trip_planner::upstream", error = %err, "model call failed");
            err
        })?;

        let text = strip_code_fences(&raw);
        debug!(target: "trip_planner::upstream", raw = %text, "sanitized completion");

        let itinerary = self.validator.parse(text).map_err(|err| {
            if let GenerationError::UpstreamFormat { reason, raw } = &err {
                error!(
                    target: "trip_planner::upstream",
                    error = %reason,
                    raw = %raw,
                    "model returned an unparseable itinerary"
                );
            }
            err
        })?;

        if itinerary.total_days != req.days() {
            warn!(
                target: "trip_planner::generator",
                requested = req.days(),
                returned = itinerary.total_days,
                "model planned a different number of days than requested"
            );
        }

        Ok(itinerary)
    }

    /// Validate an untyped payload and generate from it.
    ///
    /// Validation failures never reach the model.
    pub async fn generate_from_value(&self, raw: &Value) -> Result<Itinerary> {
        let req = ItineraryRequest::validate(raw)?;
        Ok(self.generate(&req).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::{io, sync::Mutex};

    #[derive(Debug)]
    struct ScriptedClient {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        fn provider(&self) -> &'static str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-1"
        }

        async fn complete(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(GenerationError::UpstreamCall)
        }
    }

    fn one_day_reply() -> String {
        json!({
            "city": "Prague",
            "budget": "$400",
            "total_days": 1,
            "itinerary": [{
                "day": 1,
                "title": "Old Town",
                "summary": "Bridges and spires.",
                "attractions": [
                    "Charles Bridge", "Prague Castle", "Old Town Square",
                    "Astronomical Clock", "Petřín Hill"
                ],
                "dining": [
                    {"name": "Café Savoy", "meal": "Breakfast", "estimated_cost_usd": "$10-15"},
                    {"name": "U Fleků", "meal": "Dinner", "estimated_cost_usd": "$20-30"}
                ]
            }]
        })
        .to_string()
    }

    #[test]
    fn test_generate_parses_fenced_reply() {
        let client = ScriptedClient::replying(&format!("```json\n{}\n```", one_day_reply()));
        let generator = ItineraryGenerator::new(client.clone());
        let req = ItineraryRequest::new("Prague", "$400", 1).unwrap();

        let itinerary = tokio_test::block_on(generator.generate(&req)).unwrap();

        assert_eq!(itinerary.city, "Prague");
        assert_eq!(itinerary.itinerary[0].dining.len(), 2);
        assert_eq!(client.calls(), 1);
        let prompts = client.prompts.lock().unwrap();
        assert!(prompts[0].contains("Prague"));
        assert!(prompts[0].contains("$400"));
        assert!(prompts[0].contains("1 days"));
    }

    #[test]
    fn test_prose_reply_is_format_error() {
        let client = ScriptedClient::replying("I'd love to help you plan a trip to Prague!");
        let generator = ItineraryGenerator::new(client.clone());
        let req = ItineraryRequest::new("Prague", "$400", 1).unwrap();

        let err = tokio_test::block_on(generator.generate(&req)).unwrap_err();
        assert!(matches!(err, GenerationError::UpstreamFormat { .. }));
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_call_failure_is_call_error() {
        let client = ScriptedClient::failing("HTTP 500 error: backend unavailable");
        let generator = ItineraryGenerator::new(client);
        let req = ItineraryRequest::new("Prague", "$400", 1).unwrap();

        let err = tokio_test::block_on(generator.generate(&req)).unwrap_err();
        assert!(matches!(err, GenerationError::UpstreamCall(_)));
    }

    #[test]
    fn test_day_mismatch_with_request_is_accepted() {
        let client = ScriptedClient::replying(&one_day_reply());
        let generator = ItineraryGenerator::new(client);
        let req = ItineraryRequest::new("Prague", "$400", 3).unwrap();

        let itinerary = tokio_test::block_on(generator.generate(&req)).unwrap();
        assert_eq!(itinerary.total_days, 1);
    }

    #[test]
    fn test_invalid_payload_skips_model() {
        let client = ScriptedClient::replying(&one_day_reply());
        let generator = ItineraryGenerator::new(client.clone());

        let err = tokio_test::block_on(
            generator.generate_from_value(&json!({"city": "", "budget": "$400", "days": 1})),
        )
        .unwrap_err();

        assert!(matches!(err, PlannerError::Validation(_)));
        assert_eq!(client.calls(), 0);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unparseable_reply_only_reaches_error_log() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();

        let client = ScriptedClient::replying("Sure! Day 1: see the castle at dawn.");
        let generator = ItineraryGenerator::new(client);
        let req = ItineraryRequest::new("Prague", "$400", 1).unwrap();

        let err = tracing::subscriber::with_default(subscriber, || {
            tokio_test::block_on(generator.generate(&req))
        })
        .unwrap_err();

        let output = logs.contents();
        assert!(output.contains("ERROR"), "{output}");
        assert!(output.contains("trip_planner::upstream"), "{output}");
        assert!(output.contains("model returned an unparseable itinerary"));
        assert!(output.contains("Sure! Day 1: see the castle at dawn."));

        let payload = PlannerError::from(err).to_error_payload();
        assert!(!payload.to_string().contains("castle"));
    }
}
