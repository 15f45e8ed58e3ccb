//! Error types for the conversation core

use crate::models::ThreadId;

/// Result alias used by store and session operations
pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// Message text was empty or whitespace only. The caller keeps the
    /// compose box as it is.
    #[error("message text is empty")]
    EmptyText,

    /// No thread with this id. The session's entry points always create a
    /// thread before a send can happen, so this means a caller bypassed them.
    #[error("thread not found: {thread_id}")]
    ThreadNotFound { thread_id: ThreadId },

    /// A chat-screen action arrived while no thread was selected
    #[error("no active thread")]
    NoActiveThread,
}

impl ChatError {
    pub fn thread_not_found(thread_id: &ThreadId) -> Self {
        ChatError::ThreadNotFound {
            thread_id: thread_id.clone(),
        }
    }

    /// Errors that indicate a defect in the caller rather than bad user input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            ChatError::ThreadNotFound { .. } | ChatError::NoActiveThread
        )
    }
}
