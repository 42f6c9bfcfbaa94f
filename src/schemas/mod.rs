//! Schema description of the itinerary document and the checks applied to model replies

pub mod schema;
pub mod validation;
pub mod validator;

pub use schema::{CompletionSchema, SchemaHandle};
pub use validator::Validator;
