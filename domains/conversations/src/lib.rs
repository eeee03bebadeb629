//! Conversations domain: the chat client's session and its relay client
//!
//! Holds the in-memory conversation, drives one relay call at a time, and
//! exposes a render-ready view. No terminal or widget code lives here.

pub mod client;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Conversation, Message, MessageRole};
pub use domain::session::{
    ChatSession, PendingRequest, Rejection, Settlement, SubmitOutcome, CONNECTION_BANNER,
    ERROR_APOLOGY,
};
pub use domain::state::{SessionEvent, SessionState, SessionStateMachine, StateError};
pub use domain::view::{
    Align, ConversationView, EntryView, Tone, EMPTY_HINT, EMPTY_TITLE, THINKING_TEXT,
};

// Re-export client types
pub use client::{ClientError, HttpRelayClient, MockRelayClient, RelayClient, DEFAULT_RELAY_URL};
