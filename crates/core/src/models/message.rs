//! Chat message model

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide message sequence number, increasing in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl MessageId {
    pub fn next() -> Self {
        Self(NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat message in the active room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: Option<String>,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
    pub image_url: Option<String>,
}

impl Message {
    pub fn new(sender: impl Into<String>, text: Option<String>, image_url: Option<String>) -> Self {
        Self {
            id: MessageId::next(),
            text,
            sender: sender.into(),
            timestamp: Utc::now(),
            image_url,
        }
    }

    /// Text-only message
    pub fn text(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(sender, Some(text.into()), None)
    }

    /// True if the message carries visible text or an image
    pub fn has_content(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty()) || self.image_url.is_some()
    }

    pub fn is_from(&self, username: &str) -> bool {
        self.sender == username
    }

    /// Local wall-clock time, e.g. "14:05"
    pub fn format_timestamp(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Outgoing message as composed, before it is stamped with a sender and id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDraft {
    pub text: String,
    pub image_url: Option<String>,
}

impl MessageDraft {
    pub fn new(text: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            text: text.into(),
            image_url,
        }
    }

    /// Reject drafts with no content or with text over `max_len` characters
    pub fn validate(&self, max_len: usize) -> Result<()> {
        if self.text.trim().is_empty() && self.image_url.is_none() {
            return Err(Error::EmptyMessage);
        }

        let len = self.text.chars().count();
        if len > max_len {
            return Err(Error::MessageTooLong { len, max: max_len });
        }

        Ok(())
    }

    /// Whitespace-only text is dropped so an image-only message has no text.
    pub fn into_message(self, sender: impl Into<String>) -> Message {
        let text = if self.text.trim().is_empty() {
            None
        } else {
            Some(self.text)
        };
        Message::new(sender, text, self.image_url)
    }
}
