//! Chat session: the conversation, the input field, and the request cycle
//!
//! A submit is split into `begin_submit`, which records the user message and
//! hands back a `PendingRequest` ticket, and `settle`, which records the
//! outcome of that ticket. Front ends that must keep drawing while the relay
//! call runs use the two halves; everything else can call `submit`.

use crate::client::{ClientError, RelayClient};
use crate::domain::entities::{Conversation, Message, MessageRole};
use crate::domain::state::{SessionEvent, SessionState, SessionStateMachine};

/// Text of the error entry appended for a failed submission
pub const ERROR_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Banner shown while the error flag is set
pub const CONNECTION_BANNER: &str = "Connection error. Please check your network and try again.";

/// Ticket for the one relay call in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    message: String,
    epoch: u64,
}

impl PendingRequest {
    /// Message to send to the relay
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why a submit did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Input was empty or whitespace-only
    Empty,
    /// A relay call is already in flight
    Busy,
}

/// Result of `begin_submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent(PendingRequest),
    Rejected(Rejection),
}

/// What `settle` did with an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// A message with this role was appended
    Appended(MessageRole),
    /// The conversation was cleared while the call ran; nothing appended
    Discarded,
}

/// In-memory chat session
#[derive(Debug, Default)]
pub struct ChatSession {
    conversation: Conversation,
    input: String,
    state: SessionState,
    has_error: bool,
    /// Bumped on every clear so late replies for a cleared conversation are dropped
    epoch: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        self.state == SessionState::AwaitingResponse
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Banner text while the error flag is set
    pub fn error_banner(&self) -> Option<&'static str> {
        self.has_error.then_some(CONNECTION_BANNER)
    }

    /// Mutable access to the input field; `None` while a call is in flight
    pub fn input_mut(&mut self) -> Option<&mut String> {
        if self.state.accepts_input() {
            Some(&mut self.input)
        } else {
            None
        }
    }

    /// Replace the input text; ignored while a call is in flight
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        match self.input_mut() {
            Some(input) => {
                *input = text.into();
                true
            }
            None => false,
        }
    }

    /// Whether the send affordance is enabled
    pub fn can_send(&self) -> bool {
        self.state.accepts_input() && !self.input.trim().is_empty()
    }

    /// Whether the clear affordance is offered
    pub fn can_clear(&self) -> bool {
        !self.conversation.is_empty()
    }

    /// Record the user message and enter `AwaitingResponse`
    pub fn begin_submit(&mut self) -> SubmitOutcome {
        if !self.state.accepts_input() {
            tracing::debug!("Submit ignored, relay call already in flight");
            return SubmitOutcome::Rejected(Rejection::Busy);
        }
        if self.input.trim().is_empty() {
            return SubmitOutcome::Rejected(Rejection::Empty);
        }

        self.state = match SessionStateMachine::transition(self.state, SessionEvent::Submit) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(error = %e, "Submit rejected by state machine");
                return SubmitOutcome::Rejected(Rejection::Busy);
            }
        };

        let message = std::mem::take(&mut self.input);
        self.conversation.push(Message::user(message.clone()));
        self.has_error = false;

        SubmitOutcome::Sent(PendingRequest {
            message,
            epoch: self.epoch,
        })
    }

    /// Record the outcome of a pending call and return to `Idle`
    pub fn settle(
        &mut self,
        pending: PendingRequest,
        outcome: Result<String, ClientError>,
    ) -> Settlement {
        match SessionStateMachine::transition(self.state, SessionEvent::Settle) {
            Ok(next) => self.state = next,
            Err(e) => {
                tracing::warn!(error = %e, "Settle without a pending request");
                return Settlement::Discarded;
            }
        }

        if pending.epoch != self.epoch {
            tracing::debug!("Dropping reply for a cleared conversation");
            return Settlement::Discarded;
        }

        match outcome {
            Ok(reply) => {
                self.conversation.push(Message::assistant(reply));
                Settlement::Appended(MessageRole::Assistant)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error sending message");
                self.conversation.push(Message::error(ERROR_APOLOGY));
                self.has_error = true;
                Settlement::Appended(MessageRole::Error)
            }
        }
    }

    /// Submit the current input through `client` and wait for it to settle
    pub async fn submit(&mut self, client: &dyn RelayClient) -> Result<Settlement, Rejection> {
        match self.begin_submit() {
            SubmitOutcome::Sent(pending) => {
                let outcome = client.send(pending.message()).await;
                Ok(self.settle(pending, outcome))
            }
            SubmitOutcome::Rejected(reason) => Err(reason),
        }
    }

    /// Empty the conversation, the input, and the error flag
    ///
    /// Does not touch an in-flight call; its reply is dropped when it settles.
    pub fn clear(&mut self) {
        self.conversation.clear();
        self.input.clear();
        self.has_error = false;
        self.epoch = self.epoch.wrapping_add(1);
    }
}
