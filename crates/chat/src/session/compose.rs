//! Compose-box model for chat screens
//!
//! A session draft overwrites the compose text once: the first time the
//! screen observes that draft for the active thread. Later observations of
//! the same draft leave whatever the user has typed alone. Every handoff
//! into or out of a chat starts from an empty box, including a return to the
//! same thread.

use crate::error::{ChatError, Result};
use crate::models::Message;

use super::ChatSession;

#[derive(Debug, Default, Clone)]
pub struct ComposeBox {
    text: String,
    /// Session handoff the box currently belongs to
    handoff: Option<u64>,
    /// Draft revision already copied into `text`
    applied_revision: Option<u64>,
}

impl ComposeBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text as the user types
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Whether the send affordance should be enabled
    pub fn can_send(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Observe the session. Returns `true` if a draft was copied in.
    pub fn sync(&mut self, session: &ChatSession) -> bool {
        let handoff = session.handoff();
        if self.handoff != Some(handoff) {
            self.handoff = Some(handoff);
            self.text.clear();
            self.applied_revision = None;
        }

        match (session.draft_text(), session.draft_revision()) {
            (Some(draft), Some(revision)) if self.applied_revision != Some(revision) => {
                self.text = draft.to_string();
                self.applied_revision = Some(revision);
                true
            }
            _ => false,
        }
    }

    /// Send the current text to the active thread.
    ///
    /// The text is cleared only when the send succeeds; on
    /// [`ChatError::EmptyText`] it is left exactly as it was.
    pub fn submit(&mut self, session: &mut ChatSession) -> Result<Message> {
        let thread_id = session
            .active_thread_id()
            .cloned()
            .ok_or(ChatError::NoActiveThread)?;
        let message = session.send_from_chat(&thread_id, &self.text)?;
        self.text.clear();
        Ok(message)
    }
}
