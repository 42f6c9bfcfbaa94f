use crate::{schemas::SchemaHandle, types::Itinerary};
use serde_json::Value;
use std::collections::BTreeSet;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Check a payload against a schema, returning a readable description of the
/// first few violations.
pub(crate) fn validate_structured_payload(
    schema: &SchemaHandle,
    payload: &Value,
) -> Result<(), String> {
    let validator = schema.compiled()?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "payload failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(format!(
            "payload does not match `{}` schema: {}",
            schema.schema_name(),
            detail_str
        ));
    }

    Ok(())
}

/// Checks the schema cannot express: the day count agrees with the entries and
/// day numbers are exactly 1..=total_days.
pub(crate) fn validate_day_sequence(itinerary: &Itinerary) -> Result<(), String> {
    let expected = itinerary.total_days as usize;
    if itinerary.day_count() != expected {
        return Err(format!(
            "`total_days` is {} but `itinerary` has {} entries",
            itinerary.total_days,
            itinerary.day_count()
        ));
    }

    let mut seen = BTreeSet::new();
    for plan in &itinerary.itinerary {
        if plan.day == 0 || plan.day > itinerary.total_days {
            return Err(format!(
                "day {} is outside 1..={}",
                plan.day, itinerary.total_days
            ));
        }
        if !seen.insert(plan.day) {
            return Err(format!("day {} appears more than once", plan.day));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schemas::CompletionSchema, types::DayPlan};
    use serde_json::json;

    fn day(n: u32) -> DayPlan {
        DayPlan {
            day: n,
            title: format!("Day {n}"),
            summary: "Busy day.".to_string(),
            attractions: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            dining: Vec::new(),
        }
    }

    fn itinerary(total_days: u32, days: &[u32]) -> Itinerary {
        Itinerary {
            city: "Oslo".to_string(),
            budget: "$900".to_string(),
            total_days,
            itinerary: days.iter().copied().map(day).collect(),
        }
    }

    #[test]
    fn test_day_sequence_accepts_any_order() {
        assert!(validate_day_sequence(&itinerary(3, &[1, 2, 3])).is_ok());
        assert!(validate_day_sequence(&itinerary(3, &[2, 1, 3])).is_ok());
    }

    #[test]
    fn test_day_sequence_rejects_gaps_and_duplicates() {
        let err = validate_day_sequence(&itinerary(3, &[1, 2])).unwrap_err();
        assert!(err.contains("has 2 entries"));

        let err = validate_day_sequence(&itinerary(2, &[1, 1])).unwrap_err();
        assert!(err.contains("more than once"));

        let err = validate_day_sequence(&itinerary(2, &[1, 3])).unwrap_err();
        assert!(err.contains("outside 1..=2"));
    }

    #[test]
    fn test_schema_violation_reports_path() {
        let payload = json!({
            "city": "Oslo",
            "budget": "$900",
            "total_days": 1,
            "itinerary": [{
                "day": 1,
                "title": "Harbour",
                "summary": "Fjord views.",
                "attractions": ["Opera House"],
                "dining": [
                    {"name": "Maaemo", "meal": "Dinner", "estimated_cost_usd": "$300+"},
                    {"name": "Fiskeriet", "meal": "Lunch", "estimated_cost_usd": "$20-30"}
                ]
            }]
        });

        let err = validate_structured_payload(Itinerary::schema(), &payload).unwrap_err();
        assert!(err.contains("/itinerary/0/attractions"), "{err}");
    }

    #[test]
    fn test_schema_compiled_once() {
        let handle = Itinerary::schema();
        let first = handle.compiled().unwrap();
        let second = handle.compiled().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
