//! Thread list and chat screen projections

use serde::{Deserialize, Serialize};

use crate::models::{CounterpartId, Thread, ThreadId};
use crate::session::ChatSession;
use crate::settings::QuickAction;
use crate::storage::ThreadStore;

/// Summary information for displaying a thread in a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: ThreadId,
    pub counterpart_id: CounterpartId,
    pub counterpart_name: String,
    pub counterpart_avatar_ref: String,
    /// Text of the most recent message
    pub last_message_text: String,
    /// Display timestamp of the most recent message
    pub last_message_time: Option<String>,
    pub message_count: usize,
    pub unread_count: u32,
}

impl From<&Thread> for ThreadSummary {
    fn from(thread: &Thread) -> Self {
        Self {
            id: thread.id().clone(),
            counterpart_id: thread.counterpart_id().clone(),
            counterpart_name: thread.counterpart_name().to_string(),
            counterpart_avatar_ref: thread.counterpart_avatar_ref().to_string(),
            last_message_text: thread.last_message_text().to_string(),
            last_message_time: thread
                .last_message()
                .map(|m| m.display_timestamp().to_string()),
            message_count: thread.message_count(),
            unread_count: thread.unread_count(),
        }
    }
}

/// Everything a chat screen renders for the active thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatView {
    pub thread: Thread,
    /// Complete suggested message to pre-fill the input with, if any
    pub draft_text: Option<String>,
    pub quick_actions_visible: bool,
    /// Quick replies to render; empty while they are hidden
    pub quick_actions: Vec<QuickAction>,
}

/// List threads that have at least one message
///
/// Returns threads most-recently-active first. Threads that were opened but
/// never written to are left out.
pub fn list_threads_with_activity(store: &ThreadStore) -> Vec<ThreadSummary> {
    store
        .list_with_activity()
        .into_iter()
        .map(ThreadSummary::from)
        .collect()
}

/// Snapshot of the chat screen, or `None` when no thread is active
pub fn chat_view(session: &ChatSession) -> Option<ChatView> {
    let thread = session.active_thread()?;
    let quick_actions = if session.quick_actions_visible() {
        session.quick_actions().to_vec()
    } else {
        Vec::new()
    };

    Some(ChatView {
        thread: thread.clone(),
        draft_text: session.draft_text().map(str::to_string),
        quick_actions_visible: session.quick_actions_visible(),
        quick_actions,
    })
}
