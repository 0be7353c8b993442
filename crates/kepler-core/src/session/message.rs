//! Chat message types.
//!
//! This module contains the messages shown in a planet-analysis transcript,
//! including their sender role and identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sender of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Text typed by the student.
    User,
    /// Reply from Mission Command.
    Assistant,
    /// Notice generated by the application (navigation, failures).
    SystemNotice,
}

/// Identifier of a transcript message.
///
/// Issued from a monotonically increasing counter, so identifiers order
/// messages by creation and are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// A single immutable message in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
