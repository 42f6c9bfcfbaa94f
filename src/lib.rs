//! trip-planner-rs: turn a destination, budget, and trip length into an
//! LLM-generated day-by-day itinerary.
//!
//! A request is validated, rendered into a prompt, sent to the model once, and
//! the reply is stripped of code fences and parsed against the [`Itinerary`]
//! schema. Failures come back as typed errors that the HTTP layer maps to
//! 400 / 502 / 500.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_planner_rs::{ItineraryRequest, PlannerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = PlannerConfig::from_env()?.build_generator()?;
//!
//!     let request = ItineraryRequest::new("Paris", "$1000", 3)?;
//!     let itinerary = generator.generate(&request).await?;
//!     println!("{}", itinerary.render_text());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod server;
pub mod services;
pub mod types;

pub use config::{PlannerConfig, Provider};
pub use self::core::{build_itinerary_prompt, strip_code_fences, ItineraryGenerator};
pub use error::{GenerationError, PlannerError, Result, ValidationError};
pub use schemas::{CompletionSchema, SchemaHandle, Validator};
pub use services::{GeminiClient, ModelClient, OpenAIClient};
pub use types::{DayPlan, DiningOption, Itinerary, ItineraryRequest};

#[cfg(feature = "cli")]
pub mod cli;
