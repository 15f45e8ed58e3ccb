//! Thread model representing a conversation with one counterpart

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Message;

/// Unique identifier for a thread
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh id for a thread with `counterpart`
    pub fn generate(counterpart: &CounterpartId) -> Self {
        Self(format!(
            "chat-{}-{}",
            counterpart.as_str(),
            uuid::Uuid::new_v4().simple()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the other party (instructor or student id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterpartId(pub String);

impl CounterpartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CounterpartId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CounterpartId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for CounterpartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who the user is talking to, as handed over by booking and profile flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterpart {
    pub id: CounterpartId,
    /// Display name (e.g., "Ana Oliveira")
    pub name: String,
    /// Avatar reference (URL or asset key)
    pub avatar_ref: String,
}

impl Counterpart {
    pub fn new(
        id: impl Into<CounterpartId>,
        name: impl Into<String>,
        avatar_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_ref: avatar_ref.into(),
        }
    }
}

/// A conversation with a single counterpart
///
/// Display metadata is captured when the thread is created and is not
/// refreshed on later contact. Only the thread store mutates a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    id: ThreadId,
    counterpart_id: CounterpartId,
    counterpart_name: String,
    counterpart_avatar_ref: String,
    /// Insertion order is conversation order
    messages: Vec<Message>,
    /// Text of the most recently appended message, empty before the first one
    last_message_text: String,
    /// Reserved for read tracking; nothing in the core changes it
    unread_count: u32,
}

impl Thread {
    /// Create an empty thread ("opened but not yet started")
    pub(crate) fn open(counterpart: Counterpart) -> Self {
        Self {
            id: ThreadId::generate(&counterpart.id),
            counterpart_id: counterpart.id,
            counterpart_name: counterpart.name,
            counterpart_avatar_ref: counterpart.avatar_ref,
            messages: Vec::new(),
            last_message_text: String::new(),
            unread_count: 0,
        }
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.last_message_text = message.text().to_string();
        self.messages.push(message);
    }

    pub fn id(&self) -> &ThreadId {
        &self.id
    }

    pub fn counterpart_id(&self) -> &CounterpartId {
        &self.counterpart_id
    }

    pub fn counterpart_name(&self) -> &str {
        &self.counterpart_name
    }

    pub fn counterpart_avatar_ref(&self) -> &str {
        &self.counterpart_avatar_ref
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message_text(&self) -> &str {
        &self.last_message_text
    }

    pub fn unread_count(&self) -> u32 {
        self.unread_count
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// True once at least one message has been appended
    pub fn has_activity(&self) -> bool {
        !self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{DEFAULT_TIME_FORMAT, FixedClock};
    use crate::models::SenderSide;

    fn ana() -> Counterpart {
        Counterpart::new("inst-2", "Ana Oliveira", "avatar://ana")
    }

    #[test]
    fn test_open_thread_is_empty() {
        let thread = Thread::open(ana());
        assert_eq!(thread.counterpart_id().as_str(), "inst-2");
        assert_eq!(thread.counterpart_name(), "Ana Oliveira");
        assert_eq!(thread.counterpart_avatar_ref(), "avatar://ana");
        assert!(!thread.has_activity());
        assert_eq!(thread.last_message_text(), "");
        assert_eq!(thread.unread_count(), 0);
        assert!(thread.last_message().is_none());
    }

    #[test]
    fn test_thread_id_embeds_counterpart() {
        let thread = Thread::open(ana());
        assert!(thread.id().as_str().starts_with("chat-inst-2-"));
        assert_ne!(thread.id(), Thread::open(ana()).id());
    }

    #[test]
    fn test_push_updates_last_message_text() {
        let clock = FixedClock::at("2024-05-02T14:32:00-03:00").unwrap();
        let mut thread = Thread::open(ana());
        thread.push(Message::compose(SenderSide::SelfSide, "first", &clock, DEFAULT_TIME_FORMAT));
        thread.push(Message::compose(
            SenderSide::Counterpart,
            "second",
            &clock,
            DEFAULT_TIME_FORMAT,
        ));

        assert_eq!(thread.message_count(), 2);
        assert_eq!(thread.last_message_text(), "second");
        assert_eq!(thread.messages()[0].text(), "first");
        assert_eq!(thread.unread_count(), 0);
    }
}
