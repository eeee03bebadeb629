//! Hugging Face Inference API Implementation
//!
//! Calls `{base_url}/models/{model}` with a bearer token using the reqwest
//! HTTP client. The API answers with a JSON array of generations; only the
//! first `generated_text` is used.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    GenerationRequest, GenerationResponse, LlmConfig, LlmError, LlmService, DEFAULT_BASE_URL,
};

/// Inference API request body
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Inference API error body
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Hugging Face LLM service implementation
pub struct HuggingFaceService {
    client: Client,
    api_key: String,
    endpoint_url: String,
}

impl HuggingFaceService {
    /// Create a new Hugging Face service
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key.ok_or_else(|| {
            LlmError::Configuration("HF_API_KEY is required for the huggingface provider".into())
        })?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint_url = format!("{}/models/{}", base_url.trim_end_matches('/'), config.model);

        Ok(Self {
            client: Client::new(),
            api_key,
            endpoint_url,
        })
    }

    /// Full URL generation requests are posted to
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

/// Pull the first `generated_text` out of an inference payload.
///
/// Anything other than an array whose first element carries a string field
/// yields `None`.
fn first_generated_text(payload: &serde_json::Value) -> Option<String> {
    payload
        .as_array()?
        .first()?
        .get("generated_text")?
        .as_str()
        .map(str::to_string)
}

#[async_trait::async_trait]
impl LlmService for HuggingFaceService {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        tracing::debug!(
            endpoint = %self.endpoint_url,
            input_len = request.inputs.len(),
            "Sending Hugging Face inference request"
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .bearer_auth(&self.api_key)
            .json(&InferenceRequest {
                inputs: &request.inputs,
            })
            .send()
            .await
            .map_err(|e| LlmError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(LlmError::Response(format!(
                    "Hugging Face API error ({}): {}",
                    status, error_response.error
                )));
            }

            return Err(LlmError::Response(format!(
                "Hugging Face API returned {}: {}",
                status, error_body
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Response(format!("Failed to parse response: {}", e)))?;

        let generated_text = first_generated_text(&payload);
        if generated_text.is_none() {
            tracing::warn!("Hugging Face response carried no generated_text");
        }

        Ok(GenerationResponse { generated_text })
    }

    fn provider(&self) -> &str {
        "huggingface"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/models/mistralai/Mixtral-8x7B-Instruct-v0.1";

    fn service_for(server: &MockServer) -> HuggingFaceService {
        HuggingFaceService::new(LlmConfig::huggingface("hf_test").with_base_url(server.uri()))
            .unwrap()
    }

    fn request(inputs: &str) -> GenerationRequest {
        GenerationRequest {
            inputs: inputs.to_string(),
        }
    }

    #[test]
    fn test_missing_credential_is_configuration_error() {
        let config = LlmConfig {
            api_key: None,
            ..LlmConfig::huggingface("unused")
        };
        assert!(matches!(
            HuggingFaceService::new(config),
            Err(LlmError::Configuration(_))
        ));
    }

    #[test]
    fn test_endpoint_url_joins_model() {
        let service = HuggingFaceService::new(
            LlmConfig::huggingface("hf_test").with_base_url("http://localhost:9999/"),
        )
        .unwrap();
        assert_eq!(
            service.endpoint_url(),
            "http://localhost:9999/models/mistralai/Mixtral-8x7B-Instruct-v0.1"
        );
    }

    #[test]
    fn test_first_generated_text_shapes() {
        assert_eq!(
            first_generated_text(&json!([{"generated_text": "a"}, {"generated_text": "b"}])),
            Some("a".to_string())
        );
        assert_eq!(first_generated_text(&json!([])), None);
        assert_eq!(first_generated_text(&json!([{"score": 1}])), None);
        assert_eq!(first_generated_text(&json!({"generated_text": "x"})), None);
        assert_eq!(first_generated_text(&json!([{"generated_text": 3}])), None);
    }

    #[tokio::test]
    async fn test_generate_sends_bearer_and_inputs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_json(json!({"inputs": "<s>[INST] hi [/INST]"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"generated_text": "hello"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = service_for(&server)
            .generate(request("<s>[INST] hi [/INST]"))
            .await
            .unwrap();
        assert_eq!(response.generated_text.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_generate_missing_text_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{}])))
            .mount(&server)
            .await;

        let response = service_for(&server).generate(request("x")).await.unwrap();
        assert!(response.generated_text.is_none());
    }

    #[tokio::test]
    async fn test_generate_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"error": "Model is loading"})),
            )
            .mount(&server)
            .await;

        let err = service_for(&server)
            .generate(request("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Response(_)));
        assert!(err.to_string().contains("Model is loading"));
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = service_for(&server)
            .generate(request("x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to parse response"));
    }

    #[tokio::test]
    async fn test_generate_unreachable_host() {
        let service = HuggingFaceService::new(
            LlmConfig::huggingface("hf_test").with_base_url("http://127.0.0.1:1"),
        )
        .unwrap();
        let err = service.generate(request("x")).await.unwrap_err();
        assert!(matches!(err, LlmError::Request(_)));
    }
}
