//! Morsenet Core
//!
//! This crate provides the foundational types for the Morsenet store-and-forward
//! simulation: person and node identifiers, priority-tagged messages, and the
//! frequency-trained substitution cipher used to obscure message content.
//! The network layer itself lives in `morsenet-net`.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod cipher;
pub mod errors;
pub mod message;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use cipher::{Key, ALPHABET_LEN, WORD_SEPARATOR};
pub use errors::{
    CipherError, DeliveryError, MorsenetError, RegistryError, Result, TopologyError,
};
pub use message::{Message, Priority};
pub use types::{NodeId, PersonId};
