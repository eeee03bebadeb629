//! Relaychat application composition root
//!
//! Composes the relay domain router with infrastructure routes and layers.

use axum::Router;
use relaychat_common::Config;
use relaychat_llm::{LlmConfig, LlmService, LlmServiceFactory};
use relaychat_relay::RelayState;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the main application router from configuration
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let llm_config = LlmConfig::from_config(config);
    let llm = LlmServiceFactory::create(llm_config)?;

    Ok(build_app(Arc::from(llm)))
}

/// Build the router around an already constructed LLM service
pub fn build_app(llm: Arc<dyn LlmService>) -> Router {
    let relay_state = RelayState::new(llm);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async {
                concat!("Relaychat relay v", env!("CARGO_PKG_VERSION"))
            }),
        )
        .merge(relaychat_relay::routes().with_state(relay_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .into_inner(),
        )
}

/// CORS policy for the relay: any origin, method, and header
pub fn build_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
