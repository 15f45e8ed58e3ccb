//! FFI bindings for UniFFI export
//!
//! This module provides Swift/Kotlin bindings for the chat crate via UniFFI.
//!
//! ## Usage from Swift
//!
//! ```swift
//! import ChatFFI
//!
//! // Initialize logging first
//! initializeLogging(callback: myLogCallback, maxLevel: .info)
//!
//! // One service per signed-in user
//! let chat = try ChatService()
//!
//! // "Request lesson" from the map or feed
//! let threadId = chat.requestContact(counterpartId: "inst-7", name: "Ana Oliveira", avatarRef: avatarUrl)
//!
//! // Chat screen
//! let view = chat.chatView()
//! let message = try chat.sendFromChat(threadId: threadId, text: "Olá!")
//!
//! // Thread list screen
//! let rows = chat.listWithActivity()
//! ```

mod logging;
mod service;
mod types;

pub use logging::{init_ffi_logger, initialize_logging, set_log_callback, set_log_level};
pub use service::*;
pub use types::*;
