//! Frequency-trained substitution cipher
//!
//! A key is a permutation of the 36-symbol alphabet `a-z0-9`, ranked by how
//! often each symbol appears in the owner's private training text. Position
//! `i` of the key maps to position `i` of a fixed table of dot/dash code
//! sequences, so encode and decode are positional lookups in opposite
//! directions. This is a fixed invertible substitution, not cryptography.

mod code_table;
mod key;

pub use code_table::{code_at, code_index, CODE_TABLE, WORD_SEPARATOR};
pub use key::{Key, ALPHABET_LEN};
