//! Error types for the Morsenet simulation
//!
//! One error enum per concern (cipher, topology, registry, delivery) plus the
//! unified `MorsenetError` that ties them together for callers that cross
//! layer boundaries.

use crate::types::{NodeId, PersonId};

// ----------------------------------------------------------------------------
// Cipher Errors
// ----------------------------------------------------------------------------

/// Failures while training, serializing, or applying a cipher key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    /// Plain content holds a character outside `[a-z0-9 ]`.
    #[error("invalid content: unsupported character {0:?}")]
    UnsupportedCharacter(char),
    /// Encoded content holds a token that is not in the code table.
    #[error("invalid content: unknown code token {0:?}")]
    UnknownCode(String),
    /// A serialized key is not a permutation of the 36-symbol alphabet.
    #[error("malformed key: not a permutation of the 36-symbol alphabet")]
    MalformedKey,
}

// ----------------------------------------------------------------------------
// Topology Errors
// ----------------------------------------------------------------------------

/// Failures raised by topology mutations and route computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("node {0} already exists in the network")]
    DuplicateNode(NodeId),
    #[error("node {0} does not exist in the network")]
    UnknownNode(NodeId),
    #[error("cannot link node {0} to itself")]
    SelfLoop(NodeId),
    #[error("nodes {0} and {1} are already linked")]
    DuplicateLink(NodeId, NodeId),
    #[error("link cost must be strictly positive, got {0}")]
    InvalidCost(u32),
    /// Removing the node disconnected the remaining graph. The removal is
    /// not rolled back; callers must treat the network as already mutated.
    #[error("network became invalid: not all nodes are reachable")]
    NetworkBecameInvalid,
    #[error("no route from node {0} to node {1}")]
    NoRoute(NodeId, NodeId),
}

// ----------------------------------------------------------------------------
// Registry Errors
// ----------------------------------------------------------------------------

/// Identity failures raised by the registry and the network's person ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("person {0} is already registered")]
    DuplicatePerson(PersonId),
    #[error("person {0} is not registered")]
    PersonNotFound(PersonId),
}

// ----------------------------------------------------------------------------
// Delivery Errors
// ----------------------------------------------------------------------------

/// Failures raised by `send`/`broadcast` before any delivery side effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("sender {0} is not connected to the network")]
    SenderNotConnected(PersonId),
    #[error("receiver {0} is not connected to the network")]
    ReceiverNotConnected(PersonId),
    #[error("broadcast from {0} must not name a receiver")]
    BroadcastHasReceiver(PersonId),
    #[error("direct send from {0} must name a receiver")]
    MissingReceiver(PersonId),
}

// ----------------------------------------------------------------------------
// Unified Error Type
// ----------------------------------------------------------------------------

/// Top-level error for the Morsenet simulation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MorsenetError {
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

pub type Result<T> = core::result::Result<T, MorsenetError>;
