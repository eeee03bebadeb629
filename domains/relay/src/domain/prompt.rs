//! Prompt template and reply extraction
//!
//! The model is instruction-tuned and expects its input wrapped in
//! `[INST]` markers. Replies come back verbatim; an empty or missing
//! generation is replaced with a fixed placeholder.

/// Reply text used when the model produced nothing usable
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response";

/// Wrap a user message in the instruction template
pub fn instruction_prompt(message: &str) -> String {
    format!("<s>[INST] {} [/INST]", message)
}

/// Turn the provider's generated text into the reply sent to the caller
pub fn reply_or_placeholder(generated_text: Option<String>) -> String {
    generated_text
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string())
}
