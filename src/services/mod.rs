//! Clients for the upstream generative-text services

pub mod gemini_client;
pub mod model_client;
pub mod openai_client;

pub use gemini_client::GeminiClient;
pub use model_client::ModelClient;
pub use openai_client::OpenAIClient;
