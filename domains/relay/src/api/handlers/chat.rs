//! Chat relay handler

use axum::{extract::State, Json};
use relaychat_common::{Error, Result, ValidatedJson};
use relaychat_llm::GenerationRequest;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::api::middleware::RelayState;
use crate::domain::prompt::{instruction_prompt, reply_or_placeholder};

/// Request for relaying one chat message
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ChatRequest {
    /// Free-text user message, forwarded verbatim
    #[validate(custom(function = "validate_not_blank"))]
    pub message: String,
}

/// Relayed model reply
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ChatResponse {
    pub reply: String,
}

fn validate_not_blank(message: &str) -> std::result::Result<(), ValidationError> {
    if message.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Message is required".into()));
    }
    Ok(())
}

/// Forward a message to the inference API and return its reply
///
/// Upstream failures of any kind collapse into `Error::Upstream`, which
/// renders as a fixed 500 body; the detail only reaches the log.
pub async fn send_chat(
    State(state): State<RelayState>,
    ValidatedJson(req): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let inputs = instruction_prompt(&req.message);

    tracing::debug!(
        provider = state.llm.provider(),
        message_len = req.message.len(),
        "Relaying chat message"
    );

    let generation = state
        .llm
        .generate(GenerationRequest { inputs })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Inference API call failed");
            Error::Upstream(e.to_string())
        })?;

    Ok(Json(ChatResponse {
        reply: reply_or_placeholder(generation.generated_text),
    }))
}
