//! Relay domain: single-route passthrough to the inference API

pub mod api;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::prompt::{instruction_prompt, reply_or_placeholder, NO_RESPONSE_PLACEHOLDER};

// Re-export API types
pub use api::handlers::chat::{ChatRequest, ChatResponse};
pub use api::routes;
pub use api::RelayState;
