//! Per-run state of the visualization pipeline.

use serde::Serialize;

use super::stage::Stage;
use crate::features::EMBEDDING_DIM;
use crate::stream::ProbEntry;

/// One input character paired with its resolved vocabulary index.
///
/// `index` is `None` when the vocabulary is absent or does not contain the
/// character. Tokens are immutable once created and keep input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The input character.
    pub ch: char,
    /// Vocabulary index, or `None` if unresolved.
    pub index: Option<usize>,
}

/// A token together with its synthesized embedding vector.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingEntry {
    /// The token this embedding belongs to.
    pub token: Token,
    /// Synthesized vector, components in `[-1, 1]`.
    pub vector: [f32; EMBEDDING_DIM],
}

/// Mutable state of the autoregressive generation loop.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationState {
    /// The word produced so far, prefix included.
    pub word: String,
    /// Most recently emitted character, if any.
    pub last_char: Option<char>,
    /// Last probability distribution seen, kept for display while a
    /// character lands.
    pub live_probs: Vec<ProbEntry>,
}

/// Everything one pipeline run accumulates.
///
/// The session is the snapshot: it is cloned whole and published on every
/// state change, so the presentation layer only ever sees consistent
/// read-only views.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSession {
    /// Currently active stage.
    pub stage: Stage,
    /// Tokens in input order. Never shrinks within a run.
    pub tokens: Vec<Token>,
    /// One embedding entry per token.
    pub embeddings: Vec<EmbeddingEntry>,
    /// Attention weights, index-aligned with `tokens`; populated only when
    /// the context has at least two characters.
    pub attention: Vec<f32>,
    /// Current full-vocabulary distribution; replaced on every probs event.
    pub probs: Vec<ProbEntry>,
    /// Generation loop state.
    pub generation: GenerationState,
    /// Final result; empty until the run reaches [`Stage::Result`] with one.
    pub result: String,
    /// Whether a run is in flight.
    pub running: bool,
}

impl RunSession {
    /// Fresh idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every field back to the idle state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The characters of the current token list.
    pub fn context_chars(&self) -> Vec<char> {
        self.tokens.iter().map(|t| t.ch).collect()
    }

    /// Number of tokens in the current context.
    pub fn context_len(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = RunSession::new();
        assert_eq!(session.stage, Stage::Idle);
        assert!(session.tokens.is_empty());
        assert!(session.embeddings.is_empty());
        assert!(session.attention.is_empty());
        assert!(session.probs.is_empty());
        assert!(session.generation.word.is_empty());
        assert!(session.result.is_empty());
        assert!(!session.running);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = RunSession::new();
        session.stage = Stage::Generating;
        session.tokens.push(Token { ch: 'a', index: Some(0) });
        session.generation.word = "abc".to_string();
        session.running = true;

        session.clear();

        assert_eq!(session.stage, Stage::Idle);
        assert!(session.tokens.is_empty());
        assert!(session.generation.word.is_empty());
        assert!(!session.running);
    }

    #[test]
    fn test_context_accessors() {
        let mut session = RunSession::new();
        session.tokens.push(Token { ch: 'h', index: Some(7) });
        session.tokens.push(Token { ch: 'i', index: None });
        assert_eq!(session.context_len(), 2);
        assert_eq!(session.context_chars(), vec!['h', 'i']);
    }
}
