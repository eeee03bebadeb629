use std::sync::Arc;

use relaychat_conversations::{
    ChatSession, ClientError, PendingRequest, RelayClient, Rejection, SubmitOutcome,
};
use tokio::sync::mpsc;

use crate::tui::AppEvent;

/// Shown when the user sends while a reply is still pending
pub const BUSY_NOTICE: &str = "Still waiting for the last reply...";

/// Ticks a transient notice stays on screen
const NOTICE_TICKS: u8 = 6;

/// Lines moved per PageUp/PageDown
const SCROLL_STEP: u16 = 5;

pub struct App {
    pub session: ChatSession,
    pub relay_url: String,
    pub should_quit: bool,
    pub animation_frame: u8,
    /// Lines scrolled up from the newest message; 0 follows the tail
    pub scroll_from_bottom: u16,
    notice: Option<(&'static str, u8)>,
    client: Arc<dyn RelayClient>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        client: Arc<dyn RelayClient>,
        events: mpsc::UnboundedSender<AppEvent>,
        relay_url: String,
    ) -> Self {
        Self {
            session: ChatSession::new(),
            relay_url,
            should_quit: false,
            animation_frame: 0,
            scroll_from_bottom: 0,
            notice: None,
            client,
            events,
        }
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice.map(|(text, _)| text)
    }

    /// Send the current input; the reply arrives later as `AppEvent::Reply`
    pub fn submit(&mut self) {
        match self.session.begin_submit() {
            SubmitOutcome::Sent(pending) => {
                self.scroll_from_bottom = 0;
                self.notice = None;

                let client = Arc::clone(&self.client);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = client.send(pending.message()).await;
                    if events.send(AppEvent::Reply { pending, outcome }).is_err() {
                        tracing::debug!("Event loop gone, dropping relay reply");
                    }
                });
            }
            SubmitOutcome::Rejected(Rejection::Busy) => {
                self.notice = Some((BUSY_NOTICE, NOTICE_TICKS));
            }
            SubmitOutcome::Rejected(Rejection::Empty) => {}
        }
    }

    pub fn on_reply(&mut self, pending: PendingRequest, outcome: Result<String, ClientError>) {
        let settlement = self.session.settle(pending, outcome);
        tracing::debug!(?settlement, "Relay call settled");
        self.scroll_from_bottom = 0;
    }

    /// Clear the chat if there is anything to clear
    pub fn clear(&mut self) {
        if self.session.can_clear() {
            self.session.clear();
            self.scroll_from_bottom = 0;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(input) = self.session.input_mut() {
            input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(input) = self.session.input_mut() {
            input.pop();
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(SCROLL_STEP);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(SCROLL_STEP);
    }

    pub fn tick(&mut self) {
        if self.session.is_awaiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.notice = match self.notice {
            Some((text, ticks)) if ticks > 1 => Some((text, ticks - 1)),
            _ => None,
        };
    }
}
