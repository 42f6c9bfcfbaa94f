use crate::types::ItineraryRequest;

/// Build the instruction sent to the model for one itinerary request.
///
/// The field names and list sizes spelled out here are the contract the reply
/// is parsed against; keep them in sync with [`crate::types::Itinerary`].
pub fn build_itinerary_prompt(req: &ItineraryRequest) -> String {
    let city = req.city();
    let budget = req.budget();
    let days = req.days();

    format!(
        r#"Create a day-by-day travel itinerary for a trip to {city} for {days} days with a total budget of {budget}.

Your task is to generate a single, valid JSON object containing the complete itinerary.

JSON structure requirements:
The root object must contain exactly these keys: "city", "budget", "total_days", and "itinerary".
- "city": (String) The destination city.
- "budget": (String) The total budget as given above.
- "total_days": (Integer) The number of days in the trip ({days}).
- "itinerary": (Array) One day object per day, in order.
Each day object must contain:
- "day": (Integer) The day number, starting at 1.
- "title": (String) A short, thematic title for the day.
- "summary": (String) A 1-2 sentence summary of the day's plan.
- "attractions": (Array of Strings) A list of 5-7 attractions or activities.
- "dining": (Array of Objects) A list of 2-3 dining suggestions. Each dining object must contain:
  - "name": (String) The name of the restaurant.
  - "meal": (String) The suggested meal (e.g., "Breakfast", "Lunch", "Dinner").
  - "estimated_cost_usd": (String) The estimated cost per person in USD (e.g., "$10-15").

Important rules:
- Only reference real attractions and restaurants that are located in {city}.
- The output MUST be only the raw JSON object, with no additional text, no explanations, and no markdown formatting such as ```json code fences."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_restates_request() {
        let req = ItineraryRequest::new("Paris", "$1000", 3).unwrap();
        let prompt = build_itinerary_prompt(&req);

        assert!(prompt.contains("trip to Paris for 3 days"));
        assert!(prompt.contains("total budget of $1000"));
        assert!(prompt.contains("located in Paris"));
    }

    #[test]
    fn test_prompt_keeps_literal_values() {
        let req = ItineraryRequest::new("New York ", "$1000 USD ", 2).unwrap();
        let prompt = build_itinerary_prompt(&req);

        assert!(prompt.contains("trip to New York  for 2 days"));
        assert!(prompt.contains("total budget of $1000 USD "));
    }

    #[test]
    fn test_prompt_spells_out_schema() {
        let req = ItineraryRequest::new("Tokyo", "$2500", 5).unwrap();
        let prompt = build_itinerary_prompt(&req);

        for key in [
            "\"city\"",
            "\"budget\"",
            "\"total_days\"",
            "\"itinerary\"",
            "\"day\"",
            "\"title\"",
            "\"summary\"",
            "\"attractions\"",
            "\"dining\"",
            "\"name\"",
            "\"meal\"",
            "\"estimated_cost_usd\"",
        ] {
            assert!(prompt.contains(key), "prompt is missing {key}");
        }
        assert!(prompt.contains("5-7 attractions"));
        assert!(prompt.contains("2-3 dining suggestions"));
        assert!(prompt.contains("only the raw JSON object"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let req = ItineraryRequest::new("Cairo", "$600", 4).unwrap();
        assert_eq!(build_itinerary_prompt(&req), build_itinerary_prompt(&req));
    }
}
