//! HTTP handlers for the Relay domain

pub mod chat;
