//! Pipeline state machine and orchestration.

pub mod controller;
pub mod session;
pub mod stage;

pub use controller::{normalize_prefix, PipelineController};
pub use session::{EmbeddingEntry, GenerationState, RunSession, Token};
pub use stage::Stage;
