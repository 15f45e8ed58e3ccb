//! FFI-friendly type wrappers for UniFFI export
//!
//! These types convert internal Rust types to FFI-compatible versions:
//! - `DateTime<Utc>` → `i64` (Unix timestamp)
//! - `ThreadId`/`MessageId`/`CounterpartId` → `String`
//! - `usize` counts → `u32`

use crate::error::ChatError;
use crate::models::{Message, SenderSide, Thread};
use crate::query::{ChatView, ThreadSummary};
use crate::session::{ChatSession, SessionPhase};
use crate::settings::QuickAction;

// ============================================================================
// Error Types
// ============================================================================

/// FFI-friendly error type
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ChatFfiError {
    /// Blank message text; keep the compose box as is
    #[error("Message text is empty")]
    EmptyText,

    #[error("Thread not found: {thread_id}")]
    ThreadNotFound { thread_id: String },

    #[error("No active thread")]
    NoActiveThread,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<ChatError> for ChatFfiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyText => ChatFfiError::EmptyText,
            ChatError::ThreadNotFound { thread_id } => ChatFfiError::ThreadNotFound {
                thread_id: thread_id.0,
            },
            ChatError::NoActiveThread => ChatFfiError::NoActiveThread,
        }
    }
}

impl From<anyhow::Error> for ChatFfiError {
    fn from(e: anyhow::Error) -> Self {
        ChatFfiError::Config {
            message: format!("{:#}", e),
        }
    }
}

// ============================================================================
// Message Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSenderSide {
    User,
    Counterpart,
}

impl From<SenderSide> for FfiSenderSide {
    fn from(side: SenderSide) -> Self {
        match side {
            SenderSide::SelfSide => FfiSenderSide::User,
            SenderSide::Counterpart => FfiSenderSide::Counterpart,
        }
    }
}

/// FFI-friendly message representation
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMessage {
    pub id: String,
    pub sender_side: FfiSenderSide,
    pub text: String,
    pub display_timestamp: String,
    /// Unix timestamp (seconds since epoch)
    pub sent_at: i64,
}

impl From<&Message> for FfiMessage {
    fn from(m: &Message) -> Self {
        Self {
            id: m.id().as_str().to_string(),
            sender_side: m.sender_side().into(),
            text: m.text().to_string(),
            display_timestamp: m.display_timestamp().to_string(),
            sent_at: m.sent_at().timestamp(),
        }
    }
}

impl From<Message> for FfiMessage {
    fn from(m: Message) -> Self {
        FfiMessage::from(&m)
    }
}

// ============================================================================
// Thread Types
// ============================================================================

/// FFI-friendly thread with its messages
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiThread {
    pub id: String,
    pub counterpart_id: String,
    pub counterpart_name: String,
    pub counterpart_avatar_ref: String,
    pub messages: Vec<FfiMessage>,
    pub last_message_text: String,
    pub unread_count: u32,
}

impl From<&Thread> for FfiThread {
    fn from(t: &Thread) -> Self {
        Self {
            id: t.id().as_str().to_string(),
            counterpart_id: t.counterpart_id().as_str().to_string(),
            counterpart_name: t.counterpart_name().to_string(),
            counterpart_avatar_ref: t.counterpart_avatar_ref().to_string(),
            messages: t.messages().iter().map(FfiMessage::from).collect(),
            last_message_text: t.last_message_text().to_string(),
            unread_count: t.unread_count(),
        }
    }
}

/// FFI-friendly thread summary for list views
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiThreadSummary {
    pub id: String,
    pub counterpart_id: String,
    pub counterpart_name: String,
    pub counterpart_avatar_ref: String,
    pub last_message_text: String,
    pub last_message_time: Option<String>,
    pub message_count: u32,
    pub unread_count: u32,
}

impl From<ThreadSummary> for FfiThreadSummary {
    fn from(s: ThreadSummary) -> Self {
        Self {
            id: s.id.0,
            counterpart_id: s.counterpart_id.0,
            counterpart_name: s.counterpart_name,
            counterpart_avatar_ref: s.counterpart_avatar_ref,
            last_message_text: s.last_message_text,
            last_message_time: s.last_message_time,
            message_count: u32::try_from(s.message_count).unwrap_or(u32::MAX),
            unread_count: s.unread_count,
        }
    }
}

// ============================================================================
// Session Types
// ============================================================================

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQuickAction {
    pub label: String,
    pub text: String,
}

impl From<QuickAction> for FfiQuickAction {
    fn from(a: QuickAction) -> Self {
        Self {
            label: a.label,
            text: a.text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSessionPhase {
    Idle,
    RequestPending,
    Engaged,
}

impl From<SessionPhase> for FfiSessionPhase {
    fn from(p: SessionPhase) -> Self {
        match p {
            SessionPhase::Idle => FfiSessionPhase::Idle,
            SessionPhase::RequestPending => FfiSessionPhase::RequestPending,
            SessionPhase::Engaged => FfiSessionPhase::Engaged,
        }
    }
}

/// Transient session fields, read-only to the host
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSessionState {
    pub active_thread_id: Option<String>,
    pub draft_text: Option<String>,
    pub quick_actions_visible: bool,
    pub phase: FfiSessionPhase,
    /// Changes on every chat entry or exit; reset the compose field when it does
    pub handoff: u64,
}

impl From<&ChatSession> for FfiSessionState {
    fn from(s: &ChatSession) -> Self {
        Self {
            active_thread_id: s.active_thread_id().map(|id| id.as_str().to_string()),
            draft_text: s.draft_text().map(str::to_string),
            quick_actions_visible: s.quick_actions_visible(),
            phase: s.phase().into(),
            handoff: s.handoff(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChatView {
    pub thread: FfiThread,
    pub draft_text: Option<String>,
    pub quick_actions_visible: bool,
    pub quick_actions: Vec<FfiQuickAction>,
}

impl From<ChatView> for FfiChatView {
    fn from(v: ChatView) -> Self {
        Self {
            thread: FfiThread::from(&v.thread),
            draft_text: v.draft_text,
            quick_actions_visible: v.quick_actions_visible,
            quick_actions: v.quick_actions.into_iter().map(FfiQuickAction::from).collect(),
        }
    }
}

// ============================================================================
// Log Callback
// ============================================================================

/// Log level for FFI callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<log::Level> for FfiLogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => FfiLogLevel::Error,
            log::Level::Warn => FfiLogLevel::Warn,
            log::Level::Info => FfiLogLevel::Info,
            log::Level::Debug => FfiLogLevel::Debug,
            log::Level::Trace => FfiLogLevel::Trace,
        }
    }
}

impl From<FfiLogLevel> for log::Level {
    fn from(level: FfiLogLevel) -> Self {
        match level {
            FfiLogLevel::Error => log::Level::Error,
            FfiLogLevel::Warn => log::Level::Warn,
            FfiLogLevel::Info => log::Level::Info,
            FfiLogLevel::Debug => log::Level::Debug,
            FfiLogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Callback interface for receiving log messages from Rust
///
/// Swift should implement this using os_log/Logger, Kotlin with android.util.Log.
#[uniffi::export(callback_interface)]
pub trait LogCallback: Send + Sync {
    /// Called for each log record at or above the configured level
    ///
    /// `target` is the module path, e.g. "chat::session::controller".
    fn on_log(&self, level: FfiLogLevel, target: String, message: String);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CounterpartId, ThreadId};

    #[test]
    fn test_error_mapping() {
        let err: ChatFfiError = ChatError::thread_not_found(&ThreadId::new("t1")).into();
        assert!(matches!(err, ChatFfiError::ThreadNotFound { thread_id } if thread_id == "t1"));
        assert!(matches!(
            ChatFfiError::from(ChatError::EmptyText),
            ChatFfiError::EmptyText
        ));
    }

    #[test]
    fn test_summary_message_count_saturates() {
        let summary = ThreadSummary {
            id: ThreadId::new("chat-inst-7-1"),
            counterpart_id: CounterpartId::new("inst-7"),
            counterpart_name: "Ana Oliveira".to_string(),
            counterpart_avatar_ref: String::new(),
            last_message_text: "Oi".to_string(),
            last_message_time: Some("14:32".to_string()),
            message_count: usize::MAX,
            unread_count: 0,
        };
        assert_eq!(FfiThreadSummary::from(summary).message_count, u32::MAX);
    }

    #[test]
    fn test_log_level_round_trip() {
        for level in [log::Level::Error, log::Level::Info, log::Level::Trace] {
            assert_eq!(log::Level::from(FfiLogLevel::from(level)), level);
        }
    }
}
