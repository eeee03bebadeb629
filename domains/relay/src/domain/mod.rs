//! Relay domain logic

pub mod prompt;
