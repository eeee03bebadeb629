//! Relay domain state

use relaychat_llm::LlmService;
use std::sync::Arc;

/// Application state for the Relay domain
///
/// Holds no per-request data; the credential lives inside the LLM service
/// it was constructed with.
#[derive(Clone)]
pub struct RelayState {
    pub llm: Arc<dyn LlmService>,
}

impl RelayState {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }
}
