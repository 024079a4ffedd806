//! Property-based tests for the substitution cipher
//!
//! These tests verify the encode/decode round-trip, alphabet coverage of
//! trained keys, and serialization fidelity across arbitrary inputs.

use morsenet_core::{Key, ALPHABET_LEN};
use proptest::prelude::*;
use std::collections::HashSet;

/// Generate arbitrary training text, including characters outside the alphabet
fn arb_training_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-zA-Z0-9 .,!?]{0,200}").unwrap()
}

/// Generate plain content over the encodable character set
fn arb_plain_content() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-z0-9 ]{0,200}").unwrap()
}

proptest! {
    /// Property: decode(encode(s)) == s for any encodable string and any key
    #[test]
    fn encode_decode_round_trip(training in arb_training_text(), plain in arb_plain_content()) {
        let key = Key::train(&training);
        let encoded = key.encode(&plain).expect("encodable content");
        prop_assert_eq!(key.decode(&encoded).expect("decodable content"), plain);
    }

    /// Property: every trained key is a permutation of the 36-symbol alphabet
    #[test]
    fn trained_key_is_a_permutation(training in arb_training_text()) {
        let serialized = Key::train(&training).serialize();
        prop_assert_eq!(serialized.chars().count(), ALPHABET_LEN);

        let symbols: HashSet<char> = serialized.chars().collect();
        let alphabet: HashSet<char> = ('a'..='z').chain('0'..='9').collect();
        prop_assert_eq!(symbols, alphabet);
    }

    /// Property: serialization survives a round trip through the registry form
    #[test]
    fn serialize_deserialize_round_trip(training in arb_training_text()) {
        let key = Key::train(&training);
        let rebuilt = Key::deserialize(&key.serialize()).expect("valid registry form");
        prop_assert_eq!(rebuilt, key);
    }

    /// Property: a deserialized copy decodes exactly what the original encoded
    #[test]
    fn foreign_decode_matches(training in arb_training_text(), plain in arb_plain_content()) {
        let key = Key::train(&training);
        let encoded = key.encode(&plain).expect("encodable content");
        let rebuilt = Key::deserialize(&key.serialize()).expect("valid registry form");
        prop_assert_eq!(rebuilt.decode(&encoded).expect("decodable content"), plain);
    }
}
