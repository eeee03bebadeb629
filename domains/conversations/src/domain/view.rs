//! View model over a chat session
//!
//! `ConversationView` is a cheap borrowed snapshot. Each call to `entries`
//! walks the conversation again, so a front end can re-render as often as it
//! likes without copying messages.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::domain::entities::{Message, MessageRole};
use crate::domain::session::ChatSession;

/// Placeholder shown while a relay call is in flight
pub const THINKING_TEXT: &str = "AI is thinking...";

/// Empty-state heading
pub const EMPTY_TITLE: &str = "Start a conversation with the AI assistant!";

/// Empty-state hint
pub const EMPTY_HINT: &str = "Type your message below and press Enter to send.";

/// Horizontal placement of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Visual style of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    User,
    Assistant,
    Error,
    Thinking,
}

impl From<MessageRole> for Tone {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => Tone::User,
            MessageRole::Assistant => Tone::Assistant,
            MessageRole::Error => Tone::Error,
        }
    }
}

impl Tone {
    pub fn align(&self) -> Align {
        match self {
            Tone::User => Align::Right,
            Tone::Assistant | Tone::Error | Tone::Thinking => Align::Left,
        }
    }
}

/// One rendered row of the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView<'a> {
    /// Position in the conversation; the thinking row takes the next index
    pub key: usize,
    pub text: &'a str,
    pub tone: Tone,
    /// `HH:MM` in the viewer's zone; absent for the thinking row
    pub time_label: Option<String>,
}

impl EntryView<'_> {
    pub fn align(&self) -> Align {
        self.tone.align()
    }
}

/// Format a timestamp as a short clock label in `tz`
pub fn time_label<Tz>(sent_at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    sent_at.with_timezone(tz).format("%H:%M").to_string()
}

/// Borrowed view over a session
#[derive(Debug, Clone, Copy)]
pub struct ConversationView<'a> {
    session: &'a ChatSession,
}

impl<'a> ConversationView<'a> {
    pub fn new(session: &'a ChatSession) -> Self {
        Self { session }
    }

    /// Whether to show the empty-state text instead of bubbles
    pub fn is_empty(&self) -> bool {
        self.session.conversation().is_empty()
    }

    /// Number of rows `entries` yields
    pub fn len(&self) -> usize {
        self.session.conversation().len() + usize::from(self.session.is_awaiting())
    }

    /// Banner text, if the error flag is set
    pub fn banner(&self) -> Option<&'static str> {
        self.session.error_banner()
    }

    /// Rows with time labels in the local time zone
    pub fn entries(&self) -> impl Iterator<Item = EntryView<'a>> + 'a {
        self.entries_in(Local)
    }

    /// Rows with time labels in `tz`
    pub fn entries_in<Tz>(&self, tz: Tz) -> impl Iterator<Item = EntryView<'a>> + 'a
    where
        Tz: TimeZone + 'a,
        Tz::Offset: std::fmt::Display,
    {
        let conversation = self.session.conversation();
        let thinking = self.session.is_awaiting().then(|| EntryView {
            key: conversation.len(),
            text: THINKING_TEXT,
            tone: Tone::Thinking,
            time_label: None,
        });

        conversation
            .iter()
            .enumerate()
            .map(move |(key, message): (usize, &'a Message)| EntryView {
                key,
                text: message.text(),
                tone: message.role().into(),
                time_label: Some(time_label(message.sent_at(), &tz)),
            })
            .chain(thinking)
    }
}

impl ChatSession {
    /// Borrowed view for rendering
    pub fn view(&self) -> ConversationView<'_> {
        ConversationView::new(self)
    }
}
