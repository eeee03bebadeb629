//! Mock Relay Client Implementation
//!
//! Plays back scripted outcomes in order and records every message sent.
//! Once the script runs out it echoes the message back.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{ClientError, RelayClient};

/// Mock relay client for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct MockRelayClient {
    script: Arc<Mutex<VecDeque<Result<String, ClientError>>>>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl MockRelayClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    /// Queue a failure
    pub fn with_error(self, error: ClientError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, outcome: Result<String, ClientError>) {
        self.script
            .lock()
            .expect("script lock poisoned, prior test panicked")
            .push_back(outcome);
    }

    /// Return all messages sent so far
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("sent lock poisoned, prior test panicked")
            .clone()
    }
}

#[async_trait::async_trait]
impl RelayClient for MockRelayClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        tracing::debug!("Mock relay: recording message");
        self.sent
            .lock()
            .map_err(|e| ClientError::Request(format!("sent lock poisoned: {e}")))?
            .push(message.to_string());

        let next = self
            .script
            .lock()
            .map_err(|e| ClientError::Request(format!("script lock poisoned: {e}")))?
            .pop_front();

        next.unwrap_or_else(|| Ok(format!("Echo: {}", message)))
    }
}
