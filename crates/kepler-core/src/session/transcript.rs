//! Append-only transcript log.

use super::message::{ChatMessage, MessageId, MessageRole};
use chrono::Utc;
use serde::Serialize;

/// Issues message identifiers for the whole mission session.
///
/// Owned by the session rather than by a transcript so identifiers stay
/// unique when a transcript is discarded and replaced.
#[derive(Debug, Default)]
pub struct MessageSequence {
    next: u64,
}

impl MessageSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> MessageId {
        self.next += 1;
        MessageId(self.next)
    }
}

/// Ordered messages of one planet-focus period.
///
/// Messages are only ever appended. A transcript is cleared by discarding it
/// as a whole; there is no per-message removal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    /// Set once the focus period ends ("back" was taken).
    closed: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns a reference to it.
    pub fn append(
        &mut self,
        sequence: &mut MessageSequence,
        role: MessageRole,
        text: impl Into<String>,
    ) -> &ChatMessage {
        let message = ChatMessage {
            id: sequence.next_id(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        };
        self.messages.push(message);
        // Just pushed, the vector is non-empty
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Messages created after `id`, in order.
    pub fn since(&self, id: Option<MessageId>) -> &[ChatMessage] {
        match id {
            None => &self.messages,
            Some(id) => {
                let start = self.messages.partition_point(|message| message.id <= id);
                &self.messages[start..]
            }
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
