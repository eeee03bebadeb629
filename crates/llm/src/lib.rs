//! Relaychat LLM Service
//!
//! Text generation against a hosted inference API:
//! - Hugging Face Inference API for production
//! - Mock service for tests and offline development

pub mod huggingface;
pub mod mock;

use relaychat_common::Config;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default inference endpoint host
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default instruction-tuned model
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request error: {0}")]
    Request(String),

    #[error("LLM response error: {0}")]
    Response(String),
}

/// A single text-generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Fully formatted prompt sent as the model input
    pub inputs: String,
}

/// Result of a text-generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// First generated text, if the provider returned one
    pub generated_text: Option<String>,
}

/// LLM service configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Provider name (huggingface, mock)
    pub provider: String,
    /// Bearer credential for the provider
    pub api_key: Option<String>,
    /// Model identifier appended to the endpoint path
    pub model: String,
    /// Override for the endpoint host, used to point at a local stub
    pub base_url: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LlmConfig {
    /// Build the LLM config from the application config
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: config.llm_provider.clone(),
            api_key: config.hf_api_key.clone(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }

    /// Hugging Face config with an explicit credential
    pub fn huggingface(api_key: impl Into<String>) -> Self {
        Self {
            provider: "huggingface".to_string(),
            api_key: Some(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }

    /// Point the client at a different host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Text generation service trait for different inference backends
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Run one generation call and return the first generated text
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError>;

    /// Provider name, for logs
    fn provider(&self) -> &str;
}

/// Factory for creating LlmService implementations
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "huggingface" | "hf" => {
                tracing::info!(model = %config.model, "Creating Hugging Face LLM service");
                let service = huggingface::HuggingFaceService::new(config)?;
                Ok(Box::new(service))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(mock::MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: huggingface, mock",
                provider
            ))),
        }
    }
}
