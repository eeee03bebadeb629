//! Conversations domain model: entities, session state machine, view

pub mod entities;
pub mod session;
pub mod state;
pub mod view;
