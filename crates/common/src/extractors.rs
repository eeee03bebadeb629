//! Custom axum extractors for Relaychat

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::Error;

/// JSON body extractor that runs `validator` rules before the handler sees it.
///
/// Every input problem (wrong content type, bad JSON, missing field, failed
/// rule) becomes `Error::Validation` and therefore a 400 with a flat
/// `{"error": ...}` body.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

/// Rejection type for `ValidatedJson`
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Validation(Error),
}

impl ValidatedJsonRejection {
    fn into_error(self) -> Error {
        match self {
            ValidatedJsonRejection::Json(JsonRejection::MissingJsonContentType(_)) => {
                Error::Validation("Expected a JSON request body".to_string())
            }
            ValidatedJsonRejection::Json(e) => {
                Error::Validation(format!("Invalid request body: {}", e.body_text()))
            }
            ValidatedJsonRejection::Validation(e) => e,
        }
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}

/// Collapse validator output into one line, e.g. `message: Message is required`.
///
/// Fields are sorted so the text is stable across runs.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: failed `{}` check", field, e.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value.validate().map_err(|e| {
            ValidatedJsonRejection::Validation(Error::Validation(describe(&e)))
        })?;
        Ok(ValidatedJson(value))
    }
}
