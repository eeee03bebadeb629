//! State machine for the chat session's request lifecycle
//!
//! Session states: Idle → AwaitingResponse → Idle. At most one relay call
//! is in flight; a second submit while awaiting is not a valid transition.

pub use relaychat_common::StateError;
use serde::{Deserialize, Serialize};

/// Session request states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingResponse,
}

impl SessionState {
    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [SessionState] {
        match self {
            Self::Idle => &[Self::AwaitingResponse],
            Self::AwaitingResponse => &[Self::Idle],
        }
    }

    /// Whether the input affordance accepts edits and submits
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingResponse => write!(f, "awaiting-response"),
        }
    }
}

/// Events that trigger session state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// User submitted a message and the relay call was issued
    Submit,
    /// The relay call finished, successfully or not
    Settle,
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit => write!(f, "submit"),
            Self::Settle => write!(f, "settle"),
        }
    }
}

/// Session state machine
pub struct SessionStateMachine;

impl SessionStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: SessionState,
        event: SessionEvent,
    ) -> Result<SessionState, StateError> {
        match (current, event) {
            (SessionState::Idle, SessionEvent::Submit) => Ok(SessionState::AwaitingResponse),
            (SessionState::AwaitingResponse, SessionEvent::Settle) => Ok(SessionState::Idle),
            _ => Err(StateError::InvalidTransition {
                from: current.to_string(),
                event: event.to_string(),
            }),
        }
    }
}
