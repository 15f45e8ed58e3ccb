//! ChatService facade for UniFFI export
//!
//! Wraps a [`ChatSession`] behind a mutex. Native hosts may call in from
//! more than one thread, and every mutation has to see the store's ordering
//! and one-thread-per-counterpart invariants intact.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::SystemClock;
use crate::ffi::types::*;
use crate::models::{Counterpart, ThreadId};
use crate::query::{chat_view, list_threads_with_activity};
use crate::session::ChatSession;
use crate::settings::ChatSettings;

/// Main service object for chat operations
///
/// One instance per signed-in user. Drop it (or call `sign_out`) at logout.
#[derive(uniffi::Object)]
pub struct ChatService {
    session: Mutex<ChatSession>,
}

impl ChatService {
    fn from_settings(settings: ChatSettings) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(ChatSession::with_settings(settings, Arc::new(SystemClock))),
        })
    }

    fn session(&self) -> MutexGuard<'_, ChatSession> {
        // A panic while holding the lock leaves the session consistent: every
        // mutation validates before touching state.
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[uniffi::export]
impl ChatService {
    /// Create a service using `chat.json` from the config directory, or defaults
    #[uniffi::constructor]
    pub fn new() -> Result<Arc<Self>, ChatFfiError> {
        Ok(Self::from_settings(ChatSettings::load()?))
    }

    /// Create a service from an explicit settings JSON document
    #[uniffi::constructor]
    pub fn with_settings_json(settings_json: String) -> Result<Arc<Self>, ChatFfiError> {
        Ok(Self::from_settings(ChatSettings::from_json(&settings_json)?))
    }

    // ========================================================================
    // Handoff entry points
    // ========================================================================

    /// Open a conversation with no preset message. Returns the thread id.
    pub fn open_chat(&self, counterpart_id: String, name: String, avatar_ref: String) -> String {
        let counterpart = Counterpart::new(counterpart_id, name, avatar_ref);
        self.session().open_chat(counterpart).0
    }

    /// Hand off from a lesson request; quick replies become visible.
    pub fn request_contact(
        &self,
        counterpart_id: String,
        name: String,
        avatar_ref: String,
    ) -> String {
        let counterpart = Counterpart::new(counterpart_id, name, avatar_ref);
        self.session().request_contact(counterpart).0
    }

    /// Select a thread from the thread list
    pub fn open_thread(&self, thread_id: String) -> Result<(), ChatFfiError> {
        self.session().open_thread(&ThreadId::new(thread_id))?;
        Ok(())
    }

    /// Send a message typed in the chat screen
    pub fn send_from_chat(
        &self,
        thread_id: String,
        text: String,
    ) -> Result<FfiMessage, ChatFfiError> {
        let message = self
            .session()
            .send_from_chat(&ThreadId::new(thread_id), &text)?;
        Ok(message.into())
    }

    /// Record a message written by the counterpart
    pub fn receive_message(
        &self,
        counterpart_id: String,
        name: String,
        avatar_ref: String,
        text: String,
    ) -> Result<FfiMessage, ChatFfiError> {
        let counterpart = Counterpart::new(counterpart_id, name, avatar_ref);
        let message = self.session().receive_message(counterpart, &text)?;
        Ok(message.into())
    }

    /// Put a quick reply into the draft. Returns the draft, or None when
    /// quick replies are hidden or the index is out of range.
    pub fn select_quick_action(&self, index: u32) -> Option<String> {
        self.session()
            .select_quick_action(index as usize)
            .map(str::to_string)
    }

    /// Leave the chat screen
    pub fn close_chat(&self) {
        self.session().close_chat();
    }

    /// Discard all conversations
    pub fn sign_out(&self) {
        self.session().sign_out();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn resolve_thread(&self, thread_id: String) -> Option<FfiThread> {
        self.session()
            .resolve_thread(&ThreadId::new(thread_id))
            .map(FfiThread::from)
    }

    /// Threads with at least one message, most recent first
    pub fn list_with_activity(&self) -> Vec<FfiThreadSummary> {
        list_threads_with_activity(self.session().store())
            .into_iter()
            .map(FfiThreadSummary::from)
            .collect()
    }

    pub fn session_state(&self) -> FfiSessionState {
        FfiSessionState::from(&*self.session())
    }

    /// Snapshot for the chat screen, None when no thread is active
    pub fn chat_view(&self) -> Option<FfiChatView> {
        chat_view(&self.session()).map(FfiChatView::from)
    }
}
