//! Character vocabulary for the visualized model.
//!
//! The vocabulary is fetched once per session from the backend's `/vocab`
//! endpoint and is read-only afterwards. A failed load is a valid state:
//! every lookup against an absent vocabulary resolves to `None`, and the
//! pipeline keeps working with unresolved token indices.

use serde::{Deserialize, Serialize};

/// Wire payload of `GET /vocab`.
///
/// The backend also sends a `BOS` token id; it only matters server-side and
/// is ignored here.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabPayload {
    /// Ordered unique characters of the model's alphabet.
    pub unique_chars: Vec<char>,
    /// Vocabulary size including the end-of-word slot.
    pub vocab_size: usize,
}

/// Read-only character-to-index table.
#[derive(Debug, Clone, Serialize)]
pub struct Vocabulary {
    chars: Vec<char>,
    size: usize,
}

impl Vocabulary {
    /// Build a vocabulary from the wire payload.
    pub fn from_payload(payload: VocabPayload) -> Self {
        Self {
            chars: payload.unique_chars,
            size: payload.vocab_size,
        }
    }

    /// Resolve a character to its vocabulary index.
    ///
    /// Returns `None` for characters outside the alphabet.
    pub fn index_of(&self, ch: char) -> Option<usize> {
        self.chars.iter().position(|&c| c == ch)
    }

    /// The ordered alphabet characters.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Total vocabulary size (alphabet plus end-of-word slot).
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_vocab() -> Vocabulary {
        Vocabulary::from_payload(VocabPayload {
            unique_chars: vec!['a', 'b', 'c'],
            vocab_size: 4,
        })
    }

    #[test]
    fn test_index_lookup() {
        let vocab = abc_vocab();
        assert_eq!(vocab.index_of('a'), Some(0));
        assert_eq!(vocab.index_of('c'), Some(2));
        assert_eq!(vocab.index_of('z'), None);
    }

    #[test]
    fn test_size_includes_end_of_word_slot() {
        let vocab = abc_vocab();
        assert_eq!(vocab.chars().len(), 3);
        assert_eq!(vocab.size(), 4);
    }

    #[test]
    fn test_payload_parses_single_char_strings() {
        let payload: VocabPayload =
            serde_json::from_str(r#"{"unique_chars":["a","b"],"vocab_size":3,"BOS":2}"#).unwrap();
        assert_eq!(payload.unique_chars, vec!['a', 'b']);
        assert_eq!(payload.vocab_size, 3);
    }
}
