pub mod generator;
pub mod prompt;
pub mod sanitize;

pub use generator::ItineraryGenerator;
pub use prompt::build_itinerary_prompt;
pub use sanitize::strip_code_fences;
