//! Chat session: the policy layer over the thread store

use log::{debug, error, info};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::{ChatError, Result};
use crate::models::{Counterpart, Message, SenderSide, Thread, ThreadId};
use crate::settings::{ChatSettings, QuickAction};
use crate::storage::ThreadStore;

/// Coarse state of the transient session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No active thread
    Idle,
    /// Arrived from a request flow; quick replies are showing
    RequestPending,
    /// Conversation in progress. After a plain open the thread may still be
    /// empty.
    Engaged,
}

/// A draft is always a complete suggested message. The revision changes
/// every time a new draft is set so views can tell drafts apart.
#[derive(Debug, Clone)]
struct Draft {
    text: String,
    revision: u64,
}

/// One signed-in user's conversations plus the active-chat state
///
/// Constructed once per user session and dropped (or [`sign_out`]) at
/// logout. Every entry point locates or creates the counterpart's thread, so
/// a counterpart never ends up with two threads.
///
/// [`sign_out`]: ChatSession::sign_out
#[derive(Debug)]
pub struct ChatSession {
    store: ThreadStore,
    active_thread_id: Option<ThreadId>,
    draft: Option<Draft>,
    next_draft_revision: u64,
    /// Bumped on every handoff into or out of a chat
    handoff: u64,
    quick_actions_visible: bool,
    quick_actions: Vec<QuickAction>,
}

impl ChatSession {
    /// Session with default settings and the system clock
    pub fn new() -> Self {
        Self::with_settings(ChatSettings::default(), Arc::new(SystemClock))
    }

    pub fn with_settings(settings: ChatSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: ThreadStore::with_clock(clock, settings.time_format),
            active_thread_id: None,
            draft: None,
            next_draft_revision: 1,
            handoff: 0,
            quick_actions_visible: false,
            quick_actions: settings.quick_actions,
        }
    }

    // ========================================================================
    // Read side
    // ========================================================================

    pub fn store(&self) -> &ThreadStore {
        &self.store
    }

    pub fn active_thread_id(&self) -> Option<&ThreadId> {
        self.active_thread_id.as_ref()
    }

    pub fn active_thread(&self) -> Option<&Thread> {
        self.active_thread_id
            .as_ref()
            .and_then(|id| self.store.get(id))
    }

    pub fn draft_text(&self) -> Option<&str> {
        self.draft.as_ref().map(|d| d.text.as_str())
    }

    /// Revision of the current draft, if any
    pub fn draft_revision(&self) -> Option<u64> {
        self.draft.as_ref().map(|d| d.revision)
    }

    /// Counter that changes whenever a chat is entered or left, even when
    /// the same thread is entered again.
    pub fn handoff(&self) -> u64 {
        self.handoff
    }

    pub fn quick_actions_visible(&self) -> bool {
        self.quick_actions_visible
    }

    /// The configured quick-reply catalog, whether or not it is showing
    pub fn quick_actions(&self) -> &[QuickAction] {
        &self.quick_actions
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.active_thread_id, self.quick_actions_visible) {
            (None, _) => SessionPhase::Idle,
            (Some(_), true) => SessionPhase::RequestPending,
            (Some(_), false) => SessionPhase::Engaged,
        }
    }

    pub fn resolve_thread(&self, id: &ThreadId) -> Option<&Thread> {
        self.store.get(id)
    }

    /// Threads with at least one message, most recent first
    pub fn list_with_activity(&self) -> Vec<&Thread> {
        self.store.list_with_activity()
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Open (or continue) a conversation with no preset message.
    pub fn open_chat(&mut self, counterpart: Counterpart) -> ThreadId {
        self.begin_handoff();
        let thread_id = self.store.get_or_create(counterpart).id().clone();
        info!("Opened chat {}", thread_id);
        self.active_thread_id = Some(thread_id.clone());
        thread_id
    }

    /// Hand off from a lesson request or booking action. Quick replies are
    /// shown so the user can start with one tap.
    pub fn request_contact(&mut self, counterpart: Counterpart) -> ThreadId {
        self.begin_handoff();
        self.quick_actions_visible = true;
        let thread_id = self.store.get_or_create(counterpart).id().clone();
        info!("Contact requested, chat {} awaiting first message", thread_id);
        self.active_thread_id = Some(thread_id.clone());
        thread_id
    }

    /// Select an existing thread, e.g. from the thread list.
    pub fn open_thread(&mut self, thread_id: &ThreadId) -> Result<()> {
        if self.store.get(thread_id).is_none() {
            return Err(ChatError::thread_not_found(thread_id));
        }
        self.begin_handoff();
        info!("Opened chat {} from list", thread_id);
        self.active_thread_id = Some(thread_id.clone());
        Ok(())
    }

    /// Send a message typed in the chat screen.
    ///
    /// Blank text returns [`ChatError::EmptyText`] and changes nothing, so
    /// the view keeps its input. On success the draft and quick replies are
    /// cleared.
    pub fn send_from_chat(&mut self, thread_id: &ThreadId, text: &str) -> Result<Message> {
        match self
            .store
            .append_message(thread_id, SenderSide::SelfSide, text)
        {
            Ok(message) => {
                self.clear_transient();
                info!("Sent message {} in chat {}", message.id(), thread_id);
                Ok(message)
            }
            Err(ChatError::EmptyText) => {
                debug!("Ignoring blank send in chat {}", thread_id);
                Err(ChatError::EmptyText)
            }
            // Reported rather than asserted: native hosts reach this through
            // the FFI service and must keep running.
            Err(e) => {
                error!("Send bypassed the chat handoff: {}", e);
                Err(e)
            }
        }
    }

    /// Record a message from the counterpart, creating their thread if
    /// needed. The active chat and compose state are left alone.
    pub fn receive_message(&mut self, counterpart: Counterpart, text: &str) -> Result<Message> {
        let (thread_id, message) = self
            .store
            .deliver(counterpart, SenderSide::Counterpart, text)?;
        info!("Received message {} in chat {}", message.id(), thread_id);
        Ok(message)
    }

    /// Put the quick reply at `index` into the draft, whole.
    ///
    /// Returns the new draft, or `None` when quick replies are hidden or the
    /// index is out of range (the draft is then unchanged).
    pub fn select_quick_action(&mut self, index: usize) -> Option<&str> {
        if !self.quick_actions_visible {
            return None;
        }
        let text = self.quick_actions.get(index)?.text.clone();
        let revision = self.next_draft_revision;
        self.next_draft_revision += 1;
        self.draft = Some(Draft { text, revision });
        self.draft_text()
    }

    /// Leave the chat screen (back navigation).
    pub fn close_chat(&mut self) {
        self.begin_handoff();
        self.active_thread_id = None;
    }

    /// Discard every conversation and all transient state.
    pub fn sign_out(&mut self) {
        info!("Signing out, dropping {} threads", self.store.len());
        self.close_chat();
        self.store.clear();
    }

    fn begin_handoff(&mut self) {
        self.handoff += 1;
        self.clear_transient();
    }

    fn clear_transient(&mut self) {
        self.draft = None;
        self.quick_actions_visible = false;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn session() -> ChatSession {
        let clock = FixedClock::at("2024-05-02T14:32:00-03:00").unwrap();
        ChatSession::with_settings(ChatSettings::default(), Arc::new(clock))
    }

    fn ana() -> Counterpart {
        Counterpart::new("inst-7", "Ana Oliveira", "avatar://ana")
    }

    fn rodrigo() -> Counterpart {
        Counterpart::new("inst-1", "Rodrigo Silva", "avatar://rodrigo")
    }

    #[test]
    fn test_starts_idle() {
        let session = session();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.active_thread().is_none());
        assert!(session.draft_text().is_none());
        assert!(!session.quick_actions_visible());
    }

    #[test]
    fn test_request_contact_shows_quick_actions() {
        let mut session = session();
        let thread_id = session.request_contact(ana());

        assert_eq!(session.active_thread_id(), Some(&thread_id));
        assert!(session.quick_actions_visible());
        assert!(session.draft_text().is_none());
        assert_eq!(session.phase(), SessionPhase::RequestPending);
        assert!(!session.active_thread().unwrap().has_activity());
    }

    #[test]
    fn test_request_contact_is_idempotent() {
        let mut session = session();
        let first = session.request_contact(ana());
        let second = session.request_contact(ana());

        assert_eq!(first, second);
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_open_chat_is_quiet() {
        let mut session = session();
        session.request_contact(ana());
        session.select_quick_action(0);

        let thread_id = session.open_chat(rodrigo());
        assert_eq!(session.active_thread_id(), Some(&thread_id));
        assert!(!session.quick_actions_visible());
        assert!(session.draft_text().is_none());
        assert_eq!(session.phase(), SessionPhase::Engaged);
    }

    #[test]
    fn test_open_chat_reuses_requested_thread() {
        let mut session = session();
        let requested = session.request_contact(ana());
        let opened = session.open_chat(ana());
        assert_eq!(requested, opened);
    }

    #[test]
    fn test_send_clears_transient_state() {
        let mut session = session();
        let thread_id = session.request_contact(ana());
        session.select_quick_action(0);

        let msg = session
            .send_from_chat(&thread_id, "Olá! Gostaria de agendar uma aula prática.")
            .unwrap();

        assert!(msg.sender_side().is_self());
        assert_eq!(msg.display_timestamp(), "14:32");
        assert!(!session.quick_actions_visible());
        assert!(session.draft_text().is_none());
        assert_eq!(session.phase(), SessionPhase::Engaged);
        assert_eq!(
            session.active_thread().unwrap().last_message_text(),
            "Olá! Gostaria de agendar uma aula prática."
        );
    }

    #[test]
    fn test_blank_send_keeps_state() {
        let mut session = session();
        let thread_id = session.request_contact(ana());
        session.select_quick_action(1);

        assert_eq!(session.send_from_chat(&thread_id, ""), Err(ChatError::EmptyText));
        assert_eq!(session.send_from_chat(&thread_id, "   "), Err(ChatError::EmptyText));

        assert!(session.quick_actions_visible());
        assert!(session.draft_text().is_some());
        let thread = session.resolve_thread(&thread_id).unwrap();
        assert!(thread.messages().is_empty());
        assert_eq!(thread.last_message_text(), "");
    }

    #[test]
    fn test_send_to_unknown_thread() {
        let mut session = session();
        session.request_contact(ana());
        let err = session
            .send_from_chat(&ThreadId::new("chat-ghost-1"), "hello")
            .unwrap_err();

        assert!(err.is_invariant_violation());
        // a failed send is not a send: quick replies stay up
        assert!(session.quick_actions_visible());
    }

    #[test]
    fn test_select_quick_action_sets_whole_draft() {
        let mut session = session();
        session.request_contact(ana());

        let draft = session.select_quick_action(1).map(str::to_string);
        assert_eq!(
            draft.as_deref(),
            Some("Olá! Você tem horários disponíveis para esta semana?")
        );
        let first_revision = session.draft_revision();

        session.select_quick_action(1);
        assert_ne!(session.draft_revision(), first_revision);
    }

    #[test]
    fn test_select_quick_action_rejected() {
        let mut session = session();
        session.open_chat(ana());
        assert!(session.select_quick_action(0).is_none());

        session.request_contact(ana());
        assert!(session.select_quick_action(99).is_none());
        assert!(session.draft_text().is_none());
    }

    #[test]
    fn test_open_thread_from_list() {
        let mut session = session();
        let ana_id = session.request_contact(ana());
        session.send_from_chat(&ana_id, "Oi").unwrap();
        session.open_chat(rodrigo());

        session.open_thread(&ana_id).unwrap();
        assert_eq!(session.active_thread_id(), Some(&ana_id));
        assert_eq!(session.phase(), SessionPhase::Engaged);

        let err = session.open_thread(&ThreadId::new("chat-ghost-1")).unwrap_err();
        assert!(matches!(err, ChatError::ThreadNotFound { .. }));
        assert_eq!(session.active_thread_id(), Some(&ana_id));
    }

    #[test]
    fn test_receive_message_leaves_compose_state() {
        let mut session = session();
        let ana_id = session.request_contact(ana());
        session.select_quick_action(0);

        let msg = session
            .receive_message(rodrigo(), "Olá! Posso te ajudar?")
            .unwrap();
        assert_eq!(msg.sender_side(), SenderSide::Counterpart);
        assert!(session.quick_actions_visible());
        assert!(session.draft_text().is_some());
        assert_eq!(session.active_thread_id(), Some(&ana_id));

        let listed: Vec<_> = session
            .list_with_activity()
            .iter()
            .map(|t| t.counterpart_name().to_string())
            .collect();
        assert_eq!(listed, vec!["Rodrigo Silva"]);
    }

    #[test]
    fn test_close_chat_returns_to_idle() {
        let mut session = session();
        session.request_contact(ana());
        session.close_chat();

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.quick_actions_visible());
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_handoff_changes_on_reentry() {
        let mut session = session();
        let first = session.request_contact(ana());
        let entered = session.handoff();

        session.send_from_chat(&first, "Oi").unwrap();
        session.select_quick_action(0);
        assert_eq!(session.handoff(), entered);

        session.close_chat();
        let left = session.handoff();
        assert_ne!(left, entered);

        let again = session.open_thread(&first).map(|_| session.handoff()).unwrap();
        assert_eq!(session.active_thread_id(), Some(&first));
        assert_ne!(again, left);

        assert!(session.open_thread(&ThreadId::new("chat-ghost-1")).is_err());
        assert_eq!(session.handoff(), again);
    }

    #[test]
    fn test_sign_out_drops_everything() {
        let mut session = session();
        let id = session.request_contact(ana());
        session.send_from_chat(&id, "Oi").unwrap();
        session.sign_out();

        assert!(session.store().is_empty());
        assert!(session.list_with_activity().is_empty());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }
}
