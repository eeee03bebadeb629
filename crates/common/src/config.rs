//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. The only secret is the
//! inference credential; it is read once at start and then passed down
//! explicitly to whatever needs it.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Port the relay service listens on
pub const RELAY_PORT: u16 = 5001;

/// Default inference provider
pub const DEFAULT_LLM_PROVIDER: &str = "huggingface";

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hugging Face inference API token
    pub hf_api_key: Option<String>,

    /// Inference provider (huggingface, mock)
    pub llm_provider: String,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("hf_api_key", &self.hf_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("llm_provider", &self.llm_provider)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let hf_api_key = env::var("HF_API_KEY").ok().filter(|k| !k.trim().is_empty());

        let llm_provider = env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| DEFAULT_LLM_PROVIDER.to_string())
            .to_lowercase();

        if llm_provider.trim().is_empty() {
            return Err(anyhow::anyhow!("LLM_PROVIDER must not be empty"));
        }

        let config = Self {
            hf_api_key,
            llm_provider,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "relaychat=debug".to_string()),
            port: RELAY_PORT,
        };

        Ok(config)
    }
}
