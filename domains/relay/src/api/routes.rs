//! Route definitions for Relay domain API

use axum::{routing::post, Router};

use super::handlers::chat;
use super::middleware::RelayState;

/// Create all Relay domain API routes
///
/// `/api/chat` is kept alongside `/chat` for clients built against the
/// older path.
pub fn routes() -> Router<RelayState> {
    Router::new()
        .route("/chat", post(chat::send_chat))
        .route("/api/chat", post(chat::send_chat))
}
