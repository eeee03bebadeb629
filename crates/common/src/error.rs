//! Common error types and handling for Relaychat

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Public message returned for every upstream inference failure.
///
/// The upstream detail is logged and never echoed to the caller.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to get response from Hugging Face API";

/// Public message returned for any other server-side failure.
pub const INTERNAL_FAILURE_MESSAGE: &str = "Internal server error";

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Relaychat services
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Upstream(_)
            | Error::Unexpected(_)
            | Error::Serialization(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Upstream(_) => "UPSTREAM_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message that is safe to show to API callers.
    ///
    /// Validation messages describe the caller's own input; everything else
    /// collapses to a fixed string.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::Upstream(_) => UPSTREAM_FAILURE_MESSAGE.to_string(),
            Error::Unexpected(_) | Error::Serialization(_) | Error::Internal(_) => {
                INTERNAL_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors with full context
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        }

        let body = Json(json!({ "error": self.public_message() }));

        (status, body).into_response()
    }
}
