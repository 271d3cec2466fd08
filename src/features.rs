//! Synthesized visualization features.
//!
//! The remote service only streams probabilities and characters; the early
//! pipeline stages still need plausible numbers to draw. These functions
//! produce them deterministically so the same input always renders the same
//! picture (and so tests have fixed expectations). They are placeholders for
//! the eye, not model output.

/// Length of a synthesized embedding vector.
pub const EMBEDDING_DIM: usize = 16;

/// Knuth multiplicative-hash constant; scrambles the token index so adjacent
/// indices produce visually unrelated vectors.
const INDEX_SCRAMBLE: f64 = 2_654_435_761.0;

/// Scale applied before `sin` to keep the argument in a useful range.
const EMBED_SCALE: f64 = 1e-4;

/// Exponential decay rate for attention weights per step of distance.
const ATTENTION_DECAY: f64 = 0.6;

/// Synthesize a fixed-length embedding vector for a token index.
///
/// An unresolved index is treated as index 0. Every component lies in
/// `[-1, 1]`.
pub fn synthesize_embedding(index: Option<usize>) -> [f32; EMBEDDING_DIM] {
    let id = index.unwrap_or(0) as f64;
    let mut vector = [0.0f32; EMBEDDING_DIM];
    for (i, v) in vector.iter_mut().enumerate() {
        let raw = (id * INDEX_SCRAMBLE * (i + 1) as f64 * EMBED_SCALE).sin();
        *v = raw.clamp(-1.0, 1.0) as f32;
    }
    vector
}

/// Synthesize attention weights over a context of `context_len` characters.
///
/// Weights decay exponentially with distance from the most recent position;
/// the last position always gets exactly `1.0`. Only meaningful for
/// `context_len > 1` (a single character has nothing to attend to).
pub fn synthesize_attention(context_len: usize) -> Vec<f32> {
    (0..context_len)
        .map(|i| (-((context_len - 1 - i) as f64) * ATTENTION_DECAY).exp() as f32)
        .collect()
}
