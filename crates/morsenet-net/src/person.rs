//! Person façade
//!
//! Thin convenience layer over the network: the send variants tag a priority,
//! encode the plain content with the person's own key, and delegate to
//! `send`/`broadcast`; `get_all_messages` drains the mailbox and decodes each
//! message with its sender's key fetched from the registry.
//!
//! A person holds the network as an explicit collaborator handle, set when
//! they join and cleared when they leave. There is no hidden global.

use std::rc::Rc;

use morsenet_core::{Key, Message, NodeId, PersonId, Priority, RegistryError, Result};

use crate::network::SharedNetwork;

// ----------------------------------------------------------------------------
// Person
// ----------------------------------------------------------------------------

pub struct Person {
    id: PersonId,
    /// Trained once at construction, immutable afterward.
    key: Key,
    /// Set at join time, cleared at leave time.
    network: Option<SharedNetwork>,
}

impl Person {
    /// Create a person, training their cipher key from private text.
    pub fn new(id: impl Into<PersonId>, training_text: &str) -> Self {
        Self {
            id: id.into(),
            key: Key::train(training_text),
            network: None,
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    /// The flat registry form of this person's key.
    pub fn serialized_key(&self) -> String {
        self.key.serialize()
    }

    /// Register with the network at a gateway node and keep the handle.
    pub fn join(&mut self, network: &SharedNetwork, gateway: NodeId) -> Result<()> {
        network
            .borrow_mut()
            .join_network(self.id.clone(), gateway, self.key.serialize())?;
        self.network = Some(Rc::clone(network));
        Ok(())
    }

    /// Deregister from the network and drop the handle.
    ///
    /// Pending unread messages are discarded by the network.
    pub fn leave(&mut self) -> Result<()> {
        let network = self.network()?;
        network.borrow_mut().leave_network(&self.id)?;
        self.network = None;
        Ok(())
    }

    fn network(&self) -> Result<SharedNetwork> {
        self.network
            .clone()
            .ok_or_else(|| RegistryError::PersonNotFound(self.id.clone()).into())
    }

    // ------------------------------------------------------------------------
    // Send Variants
    // ------------------------------------------------------------------------

    /// Send a LOW priority message to another person.
    pub fn send_message_to(&self, to: impl Into<PersonId>, plain_content: &str) -> Result<()> {
        self.send_with(to, plain_content, Priority::Low)
    }

    /// Send a MEDIUM priority message to another person.
    pub fn send_urgent_message_to(
        &self,
        to: impl Into<PersonId>,
        plain_content: &str,
    ) -> Result<()> {
        self.send_with(to, plain_content, Priority::Medium)
    }

    /// Send a HIGH priority message to another person.
    pub fn send_very_urgent_message_to(
        &self,
        to: impl Into<PersonId>,
        plain_content: &str,
    ) -> Result<()> {
        self.send_with(to, plain_content, Priority::High)
    }

    /// Broadcast a LOW priority message to everyone else.
    pub fn send_message_to_everyone(&self, plain_content: &str) -> Result<()> {
        self.broadcast_with(plain_content, Priority::Low)
    }

    /// Broadcast a MEDIUM priority message to everyone else.
    pub fn send_urgent_message_to_everyone(&self, plain_content: &str) -> Result<()> {
        self.broadcast_with(plain_content, Priority::Medium)
    }

    /// Broadcast a HIGH priority message to everyone else.
    pub fn send_very_urgent_message_to_everyone(&self, plain_content: &str) -> Result<()> {
        self.broadcast_with(plain_content, Priority::High)
    }

    fn send_with(
        &self,
        to: impl Into<PersonId>,
        plain_content: &str,
        priority: Priority,
    ) -> Result<()> {
        let encoded = self.key.encode(plain_content)?;
        let message = Message::direct(self.id.clone(), encoded, priority, to);
        self.network()?.borrow_mut().send(message)
    }

    fn broadcast_with(&self, plain_content: &str, priority: Priority) -> Result<()> {
        let encoded = self.key.encode(plain_content)?;
        let message = Message::broadcast(self.id.clone(), encoded, priority);
        self.network()?.borrow_mut().broadcast(message)
    }

    // ------------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------------

    /// Drain this person's mailbox, returning decoded messages in priority
    /// order.
    ///
    /// Each message is decoded with its sender's key, rebuilt from the
    /// registry form. Decoding produces fresh message values; nothing queued
    /// is ever mutated in place.
    pub fn get_all_messages(&self) -> Result<Vec<Message>> {
        let handle = self.network()?;
        let mut network = handle.borrow_mut();
        let drained = network.get_all_messages(&self.id)?;

        let mut decoded = Vec::with_capacity(drained.len());
        for message in drained {
            let serialized = network
                .registry()
                .serialized_key(&message.sender)
                .ok_or_else(|| RegistryError::PersonNotFound(message.sender.clone()))?;
            let sender_key = Key::deserialize(serialized)?;
            let plain = sender_key.decode(&message.content)?;
            decoded.push(message.with_content(plain));
        }
        Ok(decoded)
    }
}
