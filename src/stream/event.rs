//! Typed events carried by the generation stream.

use serde::{Deserialize, Serialize};

/// One vocabulary entry of a probability distribution.
///
/// `ch` is a string rather than a char because the backend labels the
/// end-of-word slot `"BOS"`. Probabilities are percentages in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbEntry {
    /// Character (or `"BOS"` for the end-of-word slot).
    #[serde(rename = "char")]
    pub ch: String,
    /// Probability as a percentage.
    pub prob: f64,
}

/// One decoded frame of the generation stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// A fresh next-character distribution over the full vocabulary.
    /// Replaces any previously seen distribution.
    Probs {
        /// Full-vocabulary probability entries.
        probs: Vec<ProbEntry>,
    },
    /// One character was sampled and appended to the word.
    Char {
        /// The sampled character.
        #[serde(rename = "char")]
        ch: char,
        /// The whole word generated so far, prefix included.
        word: String,
    },
    /// Generation finished.
    Done {
        /// Final result; absent when the stream ends without one.
        #[serde(default)]
        result: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probs_event_parses() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"probs","probs":[{"char":"a","prob":80.0}]}"#).unwrap();
        match event {
            StreamEvent::Probs { probs } => {
                assert_eq!(probs.len(), 1);
                assert_eq!(probs[0].ch, "a");
                assert_eq!(probs[0].prob, 80.0);
            }
            other => panic!("expected probs event, got {other:?}"),
        }
    }

    #[test]
    fn test_char_event_parses() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"char","char":"a","word":"creda"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Char {
                ch: 'a',
                word: "creda".to_string()
            }
        );
    }

    #[test]
    fn test_done_event_result_optional() {
        let with: StreamEvent = serde_json::from_str(r#"{"type":"done","result":"creda"}"#).unwrap();
        let without: StreamEvent = serde_json::from_str(r#"{"type":"done"}"#).unwrap();
        assert_eq!(
            with,
            StreamEvent::Done {
                result: Some("creda".to_string())
            }
        );
        assert_eq!(without, StreamEvent::Done { result: None });
    }

    #[test]
    fn test_bos_label_is_accepted() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"probs","probs":[{"char":"BOS","prob":3.5}]}"#).unwrap();
        match event {
            StreamEvent::Probs { probs } => assert_eq!(probs[0].ch, "BOS"),
            other => panic!("expected probs event, got {other:?}"),
        }
    }
}
