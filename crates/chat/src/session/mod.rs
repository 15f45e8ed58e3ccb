//! Session handoff
//!
//! Coordinates how a thread becomes the active conversation (direct open,
//! lesson request, selection from the list) and owns the transient draft and
//! quick-action state that primes the chat input.

pub mod compose;
mod controller;

pub use compose::ComposeBox;
pub use controller::{ChatSession, SessionPhase};
