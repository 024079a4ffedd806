//! Cipher key: training, encode/decode, registry serialization

use crate::errors::CipherError;

use super::code_table::{code_at, code_index, WORD_SEPARATOR};

/// Number of symbols in the cipher alphabet (`a-z` plus `0-9`).
pub const ALPHABET_LEN: usize = 36;

fn is_alphabet_symbol(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

// ----------------------------------------------------------------------------
// Key
// ----------------------------------------------------------------------------

/// A substitution cipher key: the 36 alphabet symbols ranked by descending
/// frequency in the owner's training text.
///
/// Built once at person construction and immutable afterward. The symbol at
/// position `i` encodes to the code-table entry at position `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    symbols: [char; ALPHABET_LEN],
}

impl Key {
    /// Train a key from arbitrary text.
    ///
    /// Only `[a-z0-9]` characters contribute to the frequency count; anything
    /// else is skipped. Symbols are ranked by descending frequency with a
    /// stable sort, so equal frequencies keep their first-encountered order.
    /// Symbols absent from the text are appended afterward, letters `a..z`
    /// first, then digits `0..9`.
    pub fn train(training_text: &str) -> Self {
        // First-encounter order matters for the stable tie-break.
        let mut ranked: Vec<(char, u32)> = Vec::new();
        for c in training_text.chars() {
            if !is_alphabet_symbol(c) {
                continue;
            }
            match ranked.iter_mut().find(|(symbol, _)| *symbol == c) {
                Some((_, count)) => *count += 1,
                None => ranked.push((c, 1)),
            }
        }
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let mut symbols = [' '; ALPHABET_LEN];
        let mut filled = 0;
        for (symbol, _) in &ranked {
            symbols[filled] = *symbol;
            filled += 1;
        }
        for c in ('a'..='z').chain('0'..='9') {
            if !ranked.iter().any(|(symbol, _)| *symbol == c) {
                symbols[filled] = c;
                filled += 1;
            }
        }
        debug_assert_eq!(filled, ALPHABET_LEN);

        Self { symbols }
    }

    /// Position of a symbol within this key, if it is in the alphabet.
    fn position(&self, c: char) -> Option<usize> {
        self.symbols.iter().position(|&symbol| symbol == c)
    }

    /// Encode plain content into space-joined code tokens.
    ///
    /// A literal space becomes the word-separator token; every other
    /// character must be an alphabet symbol.
    pub fn encode(&self, plain_content: &str) -> Result<String, CipherError> {
        let mut tokens: Vec<&str> = Vec::new();
        for c in plain_content.chars() {
            if c == ' ' {
                tokens.push(WORD_SEPARATOR);
            } else {
                let index = self
                    .position(c)
                    .ok_or(CipherError::UnsupportedCharacter(c))?;
                tokens.push(code_at(index));
            }
        }
        Ok(tokens.join(" "))
    }

    /// Decode space-joined code tokens back into plain content.
    ///
    /// The exact positional inverse of [`Key::encode`]: round-trips any
    /// string over `[a-z0-9 ]`.
    pub fn decode(&self, encoded_content: &str) -> Result<String, CipherError> {
        let mut plain = String::new();
        for token in encoded_content.split_whitespace() {
            if token == WORD_SEPARATOR {
                plain.push(' ');
            } else {
                let index = code_index(token)
                    .ok_or_else(|| CipherError::UnknownCode(token.to_string()))?;
                plain.push(self.symbols[index]);
            }
        }
        Ok(plain)
    }

    /// Flatten the key to its 36-character registry form.
    ///
    /// The registry stores flat copy-by-value strings only, never the
    /// structured key.
    pub fn serialize(&self) -> String {
        self.symbols.iter().collect()
    }

    /// Rebuild a key from its registry form.
    ///
    /// The input must be a permutation of the alphabet; anything else fails
    /// with [`CipherError::MalformedKey`]. The rebuilt key carries symbols
    /// only, no training text.
    pub fn deserialize(serialized: &str) -> Result<Self, CipherError> {
        let mut symbols = [' '; ALPHABET_LEN];
        let mut seen = [false; ALPHABET_LEN];
        let mut count = 0;
        for c in serialized.chars() {
            if count == ALPHABET_LEN || !is_alphabet_symbol(c) {
                return Err(CipherError::MalformedKey);
            }
            let slot = if c.is_ascii_lowercase() {
                (c as u8 - b'a') as usize
            } else {
                26 + (c as u8 - b'0') as usize
            };
            if seen[slot] {
                return Err(CipherError::MalformedKey);
            }
            seen[slot] = true;
            symbols[count] = c;
            count += 1;
        }
        if count != ALPHABET_LEN {
            return Err(CipherError::MalformedKey);
        }
        Ok(Self { symbols })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_covers_the_whole_alphabet() {
        let key = Key::train("this is a simple text to train create the key");
        let mut symbols: Vec<char> = key.symbols.to_vec();
        symbols.sort_unstable();
        let expected: Vec<char> = ('0'..='9').chain('a'..='z').collect();
        assert_eq!(symbols, expected);
    }

    #[test]
    fn test_most_frequent_symbol_ranks_first() {
        let key = Key::train("aaabb");
        assert_eq!(key.symbols[0], 'a');
        assert_eq!(key.symbols[1], 'b');
    }

    #[test]
    fn test_equal_frequencies_keep_encounter_order() {
        // b and a both appear twice; b was seen first.
        let key = Key::train("baba");
        assert_eq!(key.symbols[0], 'b');
        assert_eq!(key.symbols[1], 'a');
    }

    #[test]
    fn test_unseen_symbols_appended_letters_then_digits() {
        let key = Key::train("zz9");
        assert_eq!(key.symbols[0], 'z');
        assert_eq!(key.symbols[1], '9');
        // The remainder is the untrained alphabet in ascending order.
        let tail: String = key.symbols[2..].iter().collect();
        assert_eq!(tail, "abcdefghijklmnopqrstuvwxy012345678");
    }

    #[test]
    fn test_training_ignores_unsupported_characters() {
        assert_eq!(Key::train("a.b, C!"), Key::train("ab"));
    }

    #[test]
    fn test_encode_most_frequent_gets_shortest_code() {
        let key = Key::train("aaaaab");
        assert_eq!(key.encode("a").unwrap(), ".");
        assert_eq!(key.encode("b").unwrap(), "-");
    }

    #[test]
    fn test_encode_space_uses_word_separator() {
        let key = Key::train("ab");
        assert_eq!(key.encode("a b").unwrap(), ". / -");
    }

    #[test]
    fn test_encode_rejects_unsupported_character() {
        let key = Key::train("abc");
        assert_eq!(
            key.encode("abC").unwrap_err(),
            CipherError::UnsupportedCharacter('C')
        );
        assert_eq!(
            key.encode("a.b").unwrap_err(),
            CipherError::UnsupportedCharacter('.')
        );
    }

    #[test]
    fn test_decode_rejects_unknown_token() {
        let key = Key::train("abc");
        assert_eq!(
            key.decode("........").unwrap_err(),
            CipherError::UnknownCode("........".to_string())
        );
    }

    #[test]
    fn test_round_trip() {
        let key = Key::train("aaaaaaaaaaaaadsdsndks");
        let text = "i am here";
        assert_eq!(key.decode(&key.encode(text).unwrap()).unwrap(), text);
    }

    #[test]
    fn test_serialize_round_trip() {
        let key = Key::train("the quick brown fox jumps over the lazy dog 0123456789");
        let serialized = key.serialize();
        assert_eq!(serialized.len(), ALPHABET_LEN);
        assert_eq!(Key::deserialize(&serialized).unwrap(), key);
    }

    #[test]
    fn test_deserialize_rejects_non_permutations() {
        assert_eq!(Key::deserialize("").unwrap_err(), CipherError::MalformedKey);
        // Right length, duplicate symbol.
        let duplicated = "aabcdefghijklmnopqrstuvwxyz012345678";
        assert_eq!(
            Key::deserialize(duplicated).unwrap_err(),
            CipherError::MalformedKey
        );
        // Unsupported symbol.
        let bad = "Abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(Key::deserialize(bad).unwrap_err(), CipherError::MalformedKey);
    }

    #[test]
    fn test_deserialized_key_decodes_foreign_messages() {
        let sender_key = Key::train("some private training text 42");
        let encoded = sender_key.encode("meet me at 15").unwrap();

        let rebuilt = Key::deserialize(&sender_key.serialize()).unwrap();
        assert_eq!(rebuilt.decode(&encoded).unwrap(), "meet me at 15");
    }
}
