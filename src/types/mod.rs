pub mod itinerary;
pub mod request;

pub use itinerary::{DayPlan, DiningOption, Itinerary};
pub use request::{ItineraryRequest, MAX_DAYS, MIN_DAYS};
