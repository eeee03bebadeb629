//! Shared utilities, configuration, and error handling for Relaychat
//!
//! - Configuration loaded from the environment
//! - Error type with its HTTP mapping
//! - Validated JSON extractor
//! - State machine errors

pub mod config;
pub mod error;
pub mod extractors;
pub mod state;

pub use config::Config;
pub use error::{Error, Result, INTERNAL_FAILURE_MESSAGE, UPSTREAM_FAILURE_MESSAGE};
pub use extractors::ValidatedJson;
pub use state::StateError;
