//! Message model: one chat utterance

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::{Clock, format_display_time};

/// Unique identifier for a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh id. UUID v4, so two messages composed within the same
    /// millisecond still get distinct ids.
    pub fn generate() -> Self {
        Self(format!("m-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of the conversation authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderSide {
    /// The signed-in user
    #[serde(rename = "self")]
    SelfSide,
    /// The instructor or student on the other end
    Counterpart,
}

impl SenderSide {
    pub fn is_self(self) -> bool {
        matches!(self, SenderSide::SelfSide)
    }
}

/// A single chat message within a thread
///
/// Messages are immutable once composed; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    sender_side: SenderSide,
    text: String,
    /// Short pre-formatted time label, e.g. "14:32"
    display_timestamp: String,
    /// Instant the message was composed
    sent_at: DateTime<Utc>,
}

impl Message {
    /// Compose a new message stamped with the clock's current time.
    ///
    /// Text validation is the caller's job; the store rejects blank text
    /// before getting here.
    pub(crate) fn compose(
        sender_side: SenderSide,
        text: impl Into<String>,
        clock: &dyn Clock,
        time_format: &str,
    ) -> Self {
        let now = clock.now();
        Self {
            id: MessageId::generate(),
            sender_side,
            text: text.into(),
            display_timestamp: format_display_time(&now, time_format),
            sent_at: now.with_timezone(&Utc),
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn sender_side(&self) -> SenderSide {
        self.sender_side
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn display_timestamp(&self) -> &str {
        &self.display_timestamp
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}
