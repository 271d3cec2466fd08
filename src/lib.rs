//! microgpt-viz: a step-by-step visualization pipeline for a character-level
//! GPT's inference pass.
//!
//! The crate drives the state behind an inference visualization: it
//! tokenizes a prefix against the model's vocabulary, synthesizes plausible
//! embedding and attention numbers for the local stages, then consumes the
//! backend's live generation stream and advances a strict stage machine one
//! decoded event at a time. Rendering is someone else's job; this crate only
//! publishes read-only snapshots.
//!
//! - [`PipelineController`] owns the run, its stage machine, and cancellation
//! - [`FrameDecoder`] turns raw stream chunks into ordered typed events
//! - [`features`] produces the deterministic placeholder numbers
//! - [`Vocabulary`] is the once-loaded character table

pub mod backend;
pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod stream;
pub mod vocab;

pub use backend::{Backend, ByteStream, HttpBackend};
pub use config::{PacingConfig, PipelineConfig};
pub use error::{Error, Result};
pub use pipeline::{
    normalize_prefix, EmbeddingEntry, GenerationState, PipelineController, RunSession, Stage, Token,
};
pub use stream::{FrameDecoder, ProbEntry, StreamEvent};
pub use vocab::{VocabPayload, Vocabulary};
