use crate::schemas::{CompletionSchema, SchemaHandle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Day-by-day travel plan for one trip, as produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Itinerary {
    /// Destination city
    pub city: String,
    /// Total budget for the trip, as the traveler phrased it (e.g. "$1000")
    pub budget: String,
    /// Number of days the plan covers
    pub total_days: u32,
    /// One entry per day, in day order
    pub itinerary: Vec<DayPlan>,
}

/// One day's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DayPlan {
    /// 1-based day number
    #[schemars(range(min = 1))]
    pub day: u32,
    /// Short thematic title for the day
    pub title: String,
    /// One or two sentences describing the day
    pub summary: String,
    /// Attractions or activities, in visiting order
    #[schemars(length(min = 5, max = 7))]
    pub attractions: Vec<String>,
    /// Dining suggestions for the day
    #[schemars(length(min = 2, max = 3))]
    pub dining: Vec<DiningOption>,
}

/// A restaurant suggestion attached to a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiningOption {
    /// Restaurant name
    pub name: String,
    /// Suggested meal, e.g. "Breakfast", "Lunch", "Dinner"
    pub meal: String,
    /// Estimated cost per person in USD, e.g. "$10-15"
    pub estimated_cost_usd: String,
}

impl CompletionSchema for Itinerary {
    fn schema() -> &'static SchemaHandle {
        static HANDLE: OnceLock<SchemaHandle> = OnceLock::new();
        HANDLE.get_or_init(|| SchemaHandle::from_root_schema("Itinerary", schemars::schema_for!(Self)))
    }
}

impl Itinerary {
    /// Number of day entries actually present, independent of `total_days`
    pub fn day_count(&self) -> usize {
        self.itinerary.len()
    }

    /// Plain-text rendering for terminals and logs
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();

        let unit = if self.total_days == 1 { "Day" } else { "Days" };
        lines.push(format!("=== {} ===", self.city));
        lines.push(format!(
            "{} {} | Budget: {}",
            self.total_days, unit, self.budget
        ));

        for day in &self.itinerary {
            lines.push(String::new());
            lines.push(format!("Day {}: {}", day.day, day.title));
            lines.push(format!("  {}", day.summary));

            lines.push("  Attractions:".to_string());
            for attraction in &day.attractions {
                lines.push(format!("    - {}", attraction));
            }

            lines.push("  Dining:".to_string());
            for option in &day.dining {
                lines.push(format!(
                    "    - {}: {} ({})",
                    option.meal, option.name, option.estimated_cost_usd
                ));
            }
        }

        lines.join("\n")
    }
}
