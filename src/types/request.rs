use crate::error::ValidationError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Smallest trip length accepted
pub const MIN_DAYS: u32 = 1;
/// Largest trip length accepted
pub const MAX_DAYS: u32 = 14;

/// A validated request for an itinerary.
///
/// Only [`ItineraryRequest::validate`] and [`ItineraryRequest::new`] build one, so
/// holding a value means the city and budget are non-empty and `days` is in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryRequest {
    city: String,
    budget: String,
    days: u32,
}

impl ItineraryRequest {
    /// Build a request from typed values, applying the same rules as [`validate`](Self::validate)
    pub fn new(
        city: impl Into<String>,
        budget: impl Into<String>,
        days: u32,
    ) -> Result<Self, ValidationError> {
        Self::validate(&serde_json::json!({
            "city": city.into(),
            "budget": budget.into(),
            "days": days,
        }))
    }

    /// Validate an untyped payload, reporting every offending field together.
    pub fn validate(raw: &Value) -> Result<Self, ValidationError> {
        let mut errors = ValidationError::new();

        let Some(fields) = raw.as_object() else {
            errors.push_form(format!("Expected object, received {}", type_label(raw)));
            return Err(errors);
        };

        let city = required_text(fields, "city", "City cannot be empty.", &mut errors);
        let budget = required_text(fields, "budget", "Budget cannot be empty.", &mut errors);
        let days = day_count(fields, &mut errors);

        match (city, budget, days) {
            (Some(city), Some(budget), Some(days)) if errors.is_empty() => {
                Ok(Self { city, budget, days })
            }
            _ => Err(errors),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn budget(&self) -> &str {
        &self.budget
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}

fn required_text(
    fields: &Map<String, Value>,
    name: &str,
    empty_message: &str,
    errors: &mut ValidationError,
) -> Option<String> {
    match fields.get(name) {
        None => {
            errors.push_field(name, "Required");
            None
        }
        Some(Value::String(text)) if text.is_empty() => {
            errors.push_field(name, empty_message);
            None
        }
        // Kept verbatim so the prompt carries exactly what the caller sent
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => {
            errors.push_field(
                name,
                format!("Expected string, received {}", type_label(other)),
            );
            None
        }
    }
}

fn day_count(fields: &Map<String, Value>, errors: &mut ValidationError) -> Option<u32> {
    let number = match fields.get("days") {
        None => {
            errors.push_field("days", "Required");
            return None;
        }
        Some(Value::Number(number)) => number,
        Some(other) => {
            errors.push_field(
                "days",
                format!("Expected number, received {}", type_label(other)),
            );
            return None;
        }
    };

    // Integral floats such as 3.0 are accepted as integers. A fractional value
    // still goes through the range checks so every failing rule is reported.
    let value = match (number.as_i64(), number.as_f64()) {
        (Some(int), _) => int as f64,
        (None, Some(float)) => float,
        (None, None) => return None,
    };
    let integral = value.is_finite() && value.fract() == 0.0;
    if !integral {
        errors.push_field("days", "Expected integer, received float");
    }

    if value < f64::from(MIN_DAYS) {
        errors.push_field("days", format!("Days must be at least {}.", MIN_DAYS));
        None
    } else if value > f64::from(MAX_DAYS) {
        errors.push_field("days", format!("Days cannot exceed {}.", MAX_DAYS));
        None
    } else if integral {
        Some(value as u32)
    } else {
        None
    }
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
