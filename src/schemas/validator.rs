use crate::{
    error::GenerationError,
    schemas::{
        validation::{validate_day_sequence, validate_structured_payload},
        CompletionSchema,
    },
    types::Itinerary,
};
use serde_json::Value;

/// How strictly a sanitized model reply is checked before it becomes an [`Itinerary`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validator {
    /// Typed deserialization only. Counts and day numbering are trusted.
    SerdeFirst,
    /// JSON Schema bounds, typed deserialization, then day-sequence checks
    #[default]
    Strict,
}

impl Validator {
    /// Parse sanitized model text into an itinerary.
    ///
    /// Every failure is an [`GenerationError::UpstreamFormat`] carrying the text.
    pub fn parse(&self, text: &str) -> Result<Itinerary, GenerationError> {
        match self {
            Validator::SerdeFirst => serde_first_parse(text),
            Validator::Strict => strict_parse(text),
        }
    }
}

fn serde_first_parse(text: &str) -> Result<Itinerary, GenerationError> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let itinerary = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        GenerationError::format(
            format!("failed to deserialize itinerary at {}: {}", location, err.inner()),
            text,
        )
    })?;
    deserializer
        .end()
        .map_err(|err| GenerationError::format(format!("trailing data: {}", err), text))?;
    Ok(itinerary)
}

fn strict_parse(text: &str) -> Result<Itinerary, GenerationError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| GenerationError::format(format!("invalid JSON: {}", err), text))?;

    validate_structured_payload(Itinerary::schema(), &value)
        .map_err(|reason| GenerationError::format(reason, text))?;

    let itinerary = serde_first_parse(text)?;

    validate_day_sequence(&itinerary).map_err(|reason| GenerationError::format(reason, text))?;

    Ok(itinerary)
}
