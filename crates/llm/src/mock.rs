//! Mock LLM Service Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"`, and by tests that
//! need a scripted upstream. Records every request it receives.

use std::sync::{Arc, Mutex};

use crate::{GenerationRequest, GenerationResponse, LlmError, LlmService};

#[derive(Debug, Clone)]
enum Behavior {
    Echo,
    Reply(Option<String>),
    Fail(String),
}

/// Mock LLM service for testing
#[derive(Debug, Clone)]
pub struct MockLlmService {
    behavior: Behavior,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockLlmService {
    /// Mock that echoes the prompt back
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    /// Mock that always answers with the given generated text (or none)
    pub fn replying(text: Option<&str>) -> Self {
        Self::with_behavior(Behavior::Reply(text.map(str::to_string)))
    }

    /// Mock that always fails with a response error
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(reason.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return all recorded requests
    pub fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .expect("requests lock poisoned, prior test panicked")
            .clone()
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        tracing::info!("Mock LLM service processing generation request");

        self.requests
            .lock()
            .map_err(|e| LlmError::Request(format!("requests lock poisoned: {e}")))?
            .push(request.clone());

        match &self.behavior {
            Behavior::Echo => Ok(GenerationResponse {
                generated_text: Some(format!("Mock response to: {}", request.inputs)),
            }),
            Behavior::Reply(text) => Ok(GenerationResponse {
                generated_text: text.clone(),
            }),
            Behavior::Fail(reason) => Err(LlmError::Response(reason.clone())),
        }
    }

    fn provider(&self) -> &str {
        "mock"
    }
}
