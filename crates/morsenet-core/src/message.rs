//! Priority-tagged messages
//!
//! The message record carried through the network. Content is plaintext while
//! the sender holds it and cipher-encoded from the moment it is handed to the
//! network until a reader decodes it on drain.

use serde::{Deserialize, Serialize};

use crate::types::PersonId;

// ----------------------------------------------------------------------------
// Priority
// ----------------------------------------------------------------------------

/// Message priority, ordered `Low < Medium < High`.
///
/// The order is used only when draining a mailbox; routing ignores it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    Low,
    Medium,
    High,
}

// ----------------------------------------------------------------------------
// Message
// ----------------------------------------------------------------------------

/// A single message in flight or at rest in a mailbox.
///
/// Immutable by convention: once enqueued, a message is never modified in
/// place. Decoding for a reader goes through [`Message::with_content`], which
/// produces a fresh value and leaves any queued copy untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who authored the message.
    pub sender: PersonId,
    /// Cipher-encoded content (plaintext only before injection into the network).
    pub content: String,
    /// Read-ordering priority.
    pub priority: Priority,
    /// Addressee, or `None` for a broadcast to everyone but the sender.
    pub receiver: Option<PersonId>,
}

impl Message {
    /// Create a direct message to a single receiver.
    pub fn direct(
        sender: impl Into<PersonId>,
        content: impl Into<String>,
        priority: Priority,
        receiver: impl Into<PersonId>,
    ) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            priority,
            receiver: Some(receiver.into()),
        }
    }

    /// Create a broadcast message (no specific receiver).
    pub fn broadcast(
        sender: impl Into<PersonId>,
        content: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            priority,
            receiver: None,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        self.receiver.is_none()
    }

    /// Copy of this message with replaced content, leaving the original as-is.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
