//! Morsenet Network Layer
//!
//! Store-and-forward delivery over a weighted undirected topology: the
//! registry of persons and their gateway nodes, per-node mailboxes, the
//! communication network with connectivity validation and cheapest-path
//! routing, and the person façade that encodes outbound and decodes inbound
//! content.
//!
//! The whole layer is single-threaded and synchronous: every operation runs
//! to completion before the next begins, and persons share the network
//! through an `Rc<RefCell<..>>` handle set at join time.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod network;
pub mod node;
pub mod person;
pub mod registry;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use network::{CommunicationNetwork, ForwardObserver, SharedNetwork};
pub use node::Node;
pub use person::Person;
pub use registry::Registry;

pub use morsenet_core::{
    CipherError, DeliveryError, Key, Message, MorsenetError, NodeId, PersonId, Priority,
    RegistryError, Result, TopologyError,
};
