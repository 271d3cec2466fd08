//! Configuration types for microgpt-viz.

use serde::{Deserialize, Serialize};

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Base URL of the inference backend.
    pub base_url: String,
    /// Pacing delays between visualization sub-steps.
    pub pacing: PacingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            pacing: PacingConfig::default(),
        }
    }
}

/// Artificial delays that pace the visualization.
///
/// These exist so a human can follow each step; they never change the outcome
/// of a run. Tests use [`PacingConfig::instant`] to run the same pipeline
/// with zero delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Delay after each token appended during the tokenize stage (ms).
    pub per_token_ms: u64,
    /// Pause after the tokenize stage completes (ms).
    pub after_tokenize_ms: u64,
    /// Pause on the embed stage (ms).
    pub embed_ms: u64,
    /// Pause on the attention stage (ms).
    pub attention_ms: u64,
    /// Pause after each probability event (ms).
    pub probs_ms: u64,
    /// Pause after each generated character (ms).
    pub char_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            per_token_ms: 210,
            after_tokenize_ms: 700,
            embed_ms: 1300,
            attention_ms: 1500,
            probs_ms: 650,
            char_ms: 550,
        }
    }
}

impl PacingConfig {
    /// All delays zero. Outcomes are identical to the default pacing.
    pub fn instant() -> Self {
        Self {
            per_token_ms: 0,
            after_tokenize_ms: 0,
            embed_ms: 0,
            attention_ms: 0,
            probs_ms: 0,
            char_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pacing_is_nonzero() {
        let pacing = PacingConfig::default();
        assert!(pacing.per_token_ms > 0);
        assert!(pacing.probs_ms > 0);
    }

    #[test]
    fn test_instant_pacing_is_zero() {
        let pacing = PacingConfig::instant();
        assert_eq!(pacing.per_token_ms, 0);
        assert_eq!(pacing.after_tokenize_ms, 0);
        assert_eq!(pacing.embed_ms, 0);
        assert_eq!(pacing.attention_ms, 0);
        assert_eq!(pacing.probs_ms, 0);
        assert_eq!(pacing.char_ms, 0);
    }
}
