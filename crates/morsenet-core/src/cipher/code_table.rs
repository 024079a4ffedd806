//! Fixed dot/dash code table
//!
//! Exactly 36 unique variable-length sequences over `{., -}`, one per
//! alphabet symbol: both 1-length sequences, all 2-, 3- and 4-length
//! sequences, then the first six 5-length sequences in enumeration order.
//! The mapping to symbols is positional via a [`super::Key`], so the table
//! must stay a bijection of size 36 for decoding to be unambiguous.

/// Token standing in for a literal space in encoded content.
pub const WORD_SEPARATOR: &str = "/";

/// The 36 code sequences, index-aligned with key positions.
pub const CODE_TABLE: [&str; 36] = [
    ".",
    "-",
    "..",
    ".-",
    "-.",
    "--",
    "...",
    "..-",
    ".-.",
    ".--",
    "-..",
    "-.-",
    "--.",
    "---",
    "....",
    "...-",
    "..-.",
    "..--",
    ".-..",
    ".-.-",
    ".--.",
    ".---",
    "-...",
    "-..-",
    "-.-.",
    "-.--",
    "--..",
    "--.-",
    "---.",
    "----",
    ".....",
    "....-",
    "...-.",
    "...--",
    "..-..",
    "..-.-",
];

/// Code sequence at a key position.
pub fn code_at(index: usize) -> &'static str {
    CODE_TABLE[index]
}

/// Position of a code sequence in the table, if it is a member.
pub fn code_index(code: &str) -> Option<usize> {
    CODE_TABLE.iter().position(|&entry| entry == code)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
