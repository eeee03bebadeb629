//! Client side of the relay contract
//!
//! `POST {base_url}/chat {"message"} -> {"reply"}`. Every way the call can
//! go wrong surfaces as a `ClientError`; the session turns any of them into
//! one error message in the conversation.

pub mod http;
pub mod mock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::{HttpRelayClient, DEFAULT_RELAY_URL};
pub use mock::MockRelayClient;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Relay request error: {0}")]
    Request(String),

    #[error("Relay returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Relay response error: {0}")]
    Decode(String),
}

/// Relay request body
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequestBody<'a> {
    pub message: &'a str,
}

/// Relay success body
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReplyBody {
    pub reply: String,
}

/// Sends one chat message to the relay and waits for the reply
#[async_trait::async_trait]
pub trait RelayClient: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, ClientError>;
}
