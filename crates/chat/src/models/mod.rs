//! Domain models for conversation entities

mod message;
mod thread;

pub use message::{Message, MessageId, SenderSide};
pub use thread::{Counterpart, CounterpartId, Thread, ThreadId};
