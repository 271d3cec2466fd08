//! Streaming wire format of the generation backend.
//!
//! The backend answers `GET /generate/stream` with a long-lived body of
//! newline-delimited frames, one JSON event per physical line:
//!
//! ```text
//! data: {"type":"probs","probs":[{"char":"a","prob":80.0}, ...]}
//! data: {"type":"char","char":"a","word":"creda"}
//! data: {"type":"done","result":"creda"}
//! ```
//!
//! [`FrameDecoder`] turns raw body chunks, arriving at arbitrary boundaries,
//! into an ordered sequence of [`StreamEvent`]s.

pub mod decoder;
pub mod event;

pub use decoder::FrameDecoder;
pub use event::{ProbEntry, StreamEvent};
