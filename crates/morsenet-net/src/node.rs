//! Per-gateway mailbox node
//!
//! Each topology node keeps one mailbox per locally registered person, created
//! lazily on first delivery. Messages wait in arrival order; a drain returns
//! them sorted by priority (high first, stable within a tier) and empties the
//! mailbox, so a message is readable at most once.
//!
//! The node holds no reference back to the owning network: the list of local
//! residents needed for broadcast fan-out is passed in by the caller.

use hashbrown::HashMap;
use tracing::debug;

use morsenet_core::{Message, NodeId, PersonId};

// ----------------------------------------------------------------------------
// Node
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct Node {
    id: NodeId,
    /// person -> pending messages in arrival order
    mailboxes: HashMap<PersonId, Vec<Message>>,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            mailboxes: HashMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Deliver a message that has reached this node.
    ///
    /// A broadcast (no receiver) is already scoped to this node: a copy is
    /// enqueued for every local resident except the sender. A direct message
    /// is enqueued for exactly its named receiver.
    pub fn receive(&mut self, message: Message, local_residents: &[PersonId]) {
        match &message.receiver {
            None => {
                for resident in local_residents {
                    if *resident != message.sender {
                        debug!(node = %self.id, person = %resident, "enqueuing broadcast copy");
                        self.mailboxes
                            .entry(resident.clone())
                            .or_default()
                            .push(message.clone());
                    }
                }
            }
            Some(receiver) => {
                debug!(node = %self.id, person = %receiver, "enqueuing direct message");
                self.mailboxes
                    .entry(receiver.clone())
                    .or_default()
                    .push(message);
            }
        }
    }

    /// Return all pending messages for a person and empty their mailbox.
    ///
    /// Ordered by priority descending; equal priorities keep arrival order.
    /// One-shot: an immediate second drain returns an empty vec.
    pub fn drain(&mut self, person_id: &PersonId) -> Vec<Message> {
        let mut messages = self.mailboxes.remove(person_id).unwrap_or_default();
        // Stable sort keeps arrival order within a priority tier.
        messages.sort_by(|a, b| b.priority.cmp(&a.priority));
        messages
    }

    /// Drop a person's pending messages without returning them.
    pub fn discard(&mut self, person_id: &PersonId) {
        self.mailboxes.remove(person_id);
    }

    /// Number of messages waiting for a person (pre-drain).
    pub fn pending(&self, person_id: &PersonId) -> usize {
        self.mailboxes.get(person_id).map_or(0, Vec::len)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
