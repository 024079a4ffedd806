//! Person registry
//!
//! In-memory lookup table mapping each registered person to their gateway
//! node and serialized cipher key, plus the node-to-persons reverse index
//! used to resolve broadcast fan-out. Pure lookups, no business logic beyond
//! person-id uniqueness.
//!
//! The registry stores flat copy-by-value strings only; structured `Key`
//! objects never enter it.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use tracing::debug;

use morsenet_core::{NodeId, PersonId, RegistryError};

// ----------------------------------------------------------------------------
// Registry
// ----------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Registry {
    /// person -> serialized cipher key (the flat 36-char registry form)
    keys: HashMap<PersonId, String>,
    /// node -> persons registered at that gateway, in join order
    residents: BTreeMap<NodeId, Vec<PersonId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a person joining the network at a gateway node.
    ///
    /// Fails with [`RegistryError::DuplicatePerson`] if the id is already
    /// registered anywhere.
    pub fn insert(
        &mut self,
        person_id: PersonId,
        node_id: NodeId,
        serialized_key: String,
    ) -> Result<(), RegistryError> {
        if self.is_connected(&person_id) {
            return Err(RegistryError::DuplicatePerson(person_id));
        }
        debug!(person = %person_id, node = %node_id, "registering person");
        self.residents
            .entry(node_id)
            .or_default()
            .push(person_id.clone());
        self.keys.insert(person_id, serialized_key);
        Ok(())
    }

    /// Drop everything recorded for a person. No-op if unknown; in
    /// particular this never panics when the key record is already absent.
    pub fn delete(&mut self, person_id: &PersonId) {
        for persons in self.residents.values_mut() {
            persons.retain(|resident| resident != person_id);
        }
        self.keys.remove(person_id);
    }

    /// Gateway node for a person, if registered.
    pub fn node_id(&self, person_id: &PersonId) -> Option<NodeId> {
        self.residents
            .iter()
            .find(|(_, persons)| persons.contains(person_id))
            .map(|(node_id, _)| *node_id)
    }

    /// Serialized cipher key for a person, if on file.
    pub fn serialized_key(&self, person_id: &PersonId) -> Option<&str> {
        self.keys.get(person_id).map(String::as_str)
    }

    /// Whether the person appears in some node's reverse index.
    pub fn is_connected(&self, person_id: &PersonId) -> bool {
        self.residents
            .values()
            .any(|persons| persons.contains(person_id))
    }

    /// Persons registered at a gateway node, in join order.
    pub fn persons_at(&self, node_id: NodeId) -> &[PersonId] {
        self.residents
            .get(&node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_delete_reinsert_lifecycle() {
        let mut registry = Registry::new();
        let bob = PersonId::from("bob");

        registry
            .insert(bob.clone(), NodeId::new(1), "saldmsla".to_string())
            .unwrap();
        assert!(registry.is_connected(&bob));

        registry.delete(&bob);
        assert!(!registry.is_connected(&bob));
        assert_eq!(registry.serialized_key(&bob), None);

        // A deleted id can be registered again.
        registry
            .insert(bob.clone(), NodeId::new(2), "saldmsla".to_string())
            .unwrap();
        assert_eq!(registry.node_id(&bob), Some(NodeId::new(2)));
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let mut registry = Registry::new();
        let bob = PersonId::from("bob");

        registry
            .insert(bob.clone(), NodeId::new(1), "k".to_string())
            .unwrap();
        // Same id at a different node is still a duplicate.
        assert_eq!(
            registry.insert(bob.clone(), NodeId::new(2), "k".to_string()),
            Err(RegistryError::DuplicatePerson(bob))
        );
    }

    #[test]
    fn test_unknown_person_lookups_return_none() {
        let registry = Registry::new();
        let alice = PersonId::from("alice");

        assert_eq!(registry.node_id(&alice), None);
        assert_eq!(registry.serialized_key(&alice), None);
        assert!(!registry.is_connected(&alice));
    }

    #[test]
    fn test_delete_unknown_person_is_a_noop() {
        let mut registry = Registry::new();
        registry.delete(&PersonId::from("ghost"));
    }

    #[test]
    fn test_reverse_index_tracks_join_order() {
        let mut registry = Registry::new();
        let node = NodeId::new(7);
        registry
            .insert(PersonId::from("alice"), node, "a".to_string())
            .unwrap();
        registry
            .insert(PersonId::from("bob"), node, "b".to_string())
            .unwrap();

        assert_eq!(
            registry.persons_at(node),
            &[PersonId::from("alice"), PersonId::from("bob")]
        );
        assert!(registry.persons_at(NodeId::new(8)).is_empty());
    }
}
