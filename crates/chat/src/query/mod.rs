//! Query API for UI consumption
//!
//! Read-only projections handed to the thread list and chat screens.

mod threads;

pub use threads::{ChatView, ThreadSummary, chat_view, list_threads_with_activity};
