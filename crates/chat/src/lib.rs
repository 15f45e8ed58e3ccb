//! Chat crate - Conversation core for lesson booking
//!
//! This crate provides the in-memory conversation model behind the booking
//! app's chat, independent of how conversations are rendered:
//! - Domain models (Thread, Message, Counterpart)
//! - Thread store with create-or-append and promote-to-front ordering
//! - Chat session handling open / request / send handoffs, drafts and quick replies
//! - Query API for the thread list and chat screens
//! - Settings (quick-reply catalog, time format) from the config directory
//! - UniFFI facade for Swift/Kotlin hosts
//!
//! The core is single-threaded; `ffi::ChatService` adds the lock needed when
//! a host calls in from several threads.

uniffi::setup_scaffolding!();

pub mod clock;
pub mod error;
pub mod ffi;
pub mod models;
pub mod query;
pub mod session;
pub mod settings;
pub mod storage;

pub use clock::{Clock, DEFAULT_TIME_FORMAT, FixedClock, SystemClock, format_display_time};
pub use error::{ChatError, Result};
pub use models::{Counterpart, CounterpartId, Message, MessageId, SenderSide, Thread, ThreadId};
pub use query::{ChatView, ThreadSummary, chat_view, list_threads_with_activity};
pub use session::{ChatSession, ComposeBox, SessionPhase};
pub use settings::{ChatSettings, QuickAction, default_quick_actions};
pub use storage::ThreadStore;
