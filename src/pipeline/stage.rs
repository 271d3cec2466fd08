//! Stages of the visualized inference pass.

use serde::{Deserialize, Serialize};

/// One discrete phase of the pipeline.
///
/// Exactly one stage is active at a time. Within a run the stage only moves
/// forward, with two exceptions: `reset` returns to [`Stage::Idle`], and a
/// fresh probability event pulls [`Stage::Generating`] back to
/// [`Stage::Probabilities`] because a new prediction step has begun.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Nothing running.
    #[default]
    Idle,
    /// Characters being mapped to vocabulary indices.
    Tokenize,
    /// Embedding vectors being produced per token.
    Embed,
    /// Context weights over the prefix (skipped for a single token).
    Attention,
    /// Next-character distribution on display.
    Probabilities,
    /// Autoregressive character emission in progress.
    Generating,
    /// Final output available.
    Result,
}

impl Stage {
    /// Ordinal position, 0 (Idle) through 6 (Result).
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Check if a run is past its locally computed stages.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Probabilities | Self::Generating)
    }

    /// Check if the run has produced its final state.
    pub fn is_result(&self) -> bool {
        matches!(self, Self::Result)
    }

    /// Get the stage name as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Tokenize => "Tokenize",
            Self::Embed => "Embed",
            Self::Attention => "Attention",
            Self::Probabilities => "Probabilities",
            Self::Generating => "Generating",
            Self::Result => "Result",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_cover_zero_through_six() {
        let stages = [
            Stage::Idle,
            Stage::Tokenize,
            Stage::Embed,
            Stage::Attention,
            Stage::Probabilities,
            Stage::Generating,
            Stage::Result,
        ];
        for (i, stage) in stages.iter().enumerate() {
            assert_eq!(stage.ordinal(), i as u8);
        }
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(Stage::default(), Stage::Idle);
    }

    #[test]
    fn test_predicates() {
        assert!(Stage::Probabilities.is_streaming());
        assert!(Stage::Generating.is_streaming());
        assert!(!Stage::Embed.is_streaming());
        assert!(Stage::Result.is_result());
    }
}
