//! Relay HTTP client
//!
//! Real client that POSTs chat messages to `{base_url}/chat`.

use super::{ChatReplyBody, ChatRequestBody, ClientError, RelayClient};

/// Relay address used when none is configured
pub const DEFAULT_RELAY_URL: &str = "http://localhost:5001";

/// Real relay client backed by reqwest
pub struct HttpRelayClient {
    http: reqwest::Client,
    chat_url: String,
}

impl HttpRelayClient {
    /// Create a client for the relay at `base_url`
    pub fn new(base_url: &str) -> Self {
        let chat_url = format!("{}/chat", base_url.trim_end_matches('/'));
        Self {
            http: reqwest::Client::new(),
            chat_url,
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

impl Default for HttpRelayClient {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_URL)
    }
}

#[async_trait::async_trait]
impl RelayClient for HttpRelayClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(&self.chat_url)
            .json(&ChatRequestBody { message })
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatReplyBody = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        tracing::debug!(reply_len = reply.reply.len(), "Relay reply received");
        Ok(reply.reply)
    }
}
