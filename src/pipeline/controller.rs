//! Pipeline controller.
//!
//! The controller owns one [`RunSession`] and drives it through the stages:
//!
//! ```text
//! Idle ─▶ Tokenize ─▶ Embed ─▶ Attention ─▶ Probabilities ⇄ Generating ─▶ Result
//!                               (≥2 tokens)     └── streamed events ──┘
//! ```
//!
//! The first three stages are computed locally with synthesized features and
//! paced so a human can follow them. From Probabilities on, the controller
//! consumes the backend's event stream in arrival order, one transition per
//! event. A clone of the session is published through a watch channel on
//! every state change; the presentation layer only ever sees those read-only
//! snapshots.
//!
//! Cancellation is cooperative. Each run captures an epoch number;
//! [`PipelineController::reset`] bumps the epoch, and the run task re-checks
//! it under the session lock before every mutation and after every
//! suspension point. A stale task stops without touching the cleared
//! session, even if a new run has already started.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::session::{EmbeddingEntry, RunSession, Token};
use super::stage::Stage;
use crate::backend::Backend;
use crate::config::PacingConfig;
use crate::features::{synthesize_attention, synthesize_embedding};
use crate::stream::{FrameDecoder, StreamEvent};
use crate::vocab::Vocabulary;

/// Orchestrates one visualization run at a time.
///
/// Callers hold the controller in an `Arc`, await [`start_run`] from one
/// task, and may call [`reset`] from anywhere.
///
/// [`start_run`]: PipelineController::start_run
/// [`reset`]: PipelineController::reset
pub struct PipelineController<B> {
    /// Transport to the inference service.
    backend: B,
    /// Visualization delays.
    pacing: PacingConfig,
    /// Character table, loaded once; absent on load failure.
    vocab: OnceLock<Vocabulary>,
    /// The run state. Mutated only at transition boundaries.
    session: Mutex<RunSession>,
    /// Guards against overlapping runs; a second start is a no-op.
    running: AtomicBool,
    /// Current run epoch; bumped by reset and by each new run.
    epoch: AtomicU64,
    /// Snapshot feed for the presentation layer.
    updates: watch::Sender<RunSession>,
}

impl<B: Backend> PipelineController<B> {
    /// Create a controller over the given backend.
    pub fn new(backend: B, pacing: PacingConfig) -> Self {
        let (updates, _) = watch::channel(RunSession::new());
        Self {
            backend,
            pacing,
            vocab: OnceLock::new(),
            session: Mutex::new(RunSession::new()),
            running: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            updates,
        }
    }

    /// Fetch the vocabulary once.
    ///
    /// A failed load is absorbed: the vocabulary stays absent, no retry is
    /// scheduled, and later token lookups resolve to unresolved indices.
    pub async fn init_vocab(&self) {
        match self.backend.fetch_vocab().await {
            Ok(payload) => {
                let vocab = Vocabulary::from_payload(payload);
                info!(vocab_size = vocab.size(), "vocabulary loaded");
                let _ = self.vocab.set(vocab);
            }
            Err(err) => {
                warn!("vocabulary unavailable, token indices will be unresolved: {err}");
            }
        }
    }

    /// The loaded vocabulary, if the load succeeded.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocab.get()
    }

    /// Subscribe to session snapshots. A new snapshot is published on every
    /// state change.
    pub fn subscribe(&self) -> watch::Receiver<RunSession> {
        self.updates.subscribe()
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> RunSession {
        self.lock_session().clone()
    }

    /// Abandon any in-flight run and clear the session back to Idle.
    ///
    /// The in-flight task is not forcibly aborted; it observes the epoch
    /// bump at its next checkpoint and stops applying events.
    pub fn reset(&self) {
        let mut session = self.lock_session();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        session.clear();
        self.running.store(false, Ordering::SeqCst);
        self.updates.send_replace(session.clone());
        info!("pipeline reset");
    }

    /// Run the full pipeline for one prefix.
    ///
    /// A no-op if a run is already active. The input is normalized to ASCII
    /// lowercase letters before tokenization. Transport failures never
    /// propagate: the run falls back to the best word generated so far and
    /// still reaches [`Stage::Result`], and the running flag is always
    /// cleared once the stream closes.
    pub async fn start_run(&self, prefix: &str, temperature: f32) {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("run already active, ignoring start request");
            return;
        }

        let normalized = normalize_prefix(prefix);
        info!(prefix = %normalized, temperature, "starting run");

        // Claim an epoch and enter Tokenize in one critical section.
        let run_epoch = {
            let mut session = self.lock_session();
            let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            session.clear();
            session.running = true;
            session.stage = Stage::Tokenize;
            self.updates.send_replace(session.clone());
            epoch
        };

        for ch in normalized.chars() {
            let index = self.vocab.get().and_then(|v| v.index_of(ch));
            if !self.apply(run_epoch, |s| s.tokens.push(Token { ch, index })) {
                return;
            }
            if !self.pace(self.pacing.per_token_ms, run_epoch).await {
                return;
            }
        }
        if !self.pace(self.pacing.after_tokenize_ms, run_epoch).await {
            return;
        }

        if !self.apply(run_epoch, |s| {
            s.stage = Stage::Embed;
            s.embeddings = s
                .tokens
                .iter()
                .map(|&token| EmbeddingEntry {
                    token,
                    vector: synthesize_embedding(token.index),
                })
                .collect();
        }) {
            return;
        }
        if !self.pace(self.pacing.embed_ms, run_epoch).await {
            return;
        }

        if normalized.chars().count() > 1 {
            if !self.apply(run_epoch, |s| {
                s.stage = Stage::Attention;
                s.attention = synthesize_attention(s.context_len());
            }) {
                return;
            }
            if !self.pace(self.pacing.attention_ms, run_epoch).await {
                return;
            }
        }

        // The word the stream grows; starts as the prefix so a transport
        // failure mid-stream still has something to fall back to.
        let mut word = normalized.clone();
        if !self.apply(run_epoch, |s| {
            s.stage = Stage::Probabilities;
            s.generation.word = normalized.clone();
        }) {
            return;
        }

        let mut stream = match self.backend.open_stream(&normalized, temperature).await {
            Ok(stream) => stream,
            Err(err) => {
                warn!("failed to open generation stream: {err}");
                self.finish(run_epoch, word);
                return;
            }
        };

        let mut decoder = FrameDecoder::new();
        'stream: loop {
            let chunk = match stream.next().await {
                Some(Ok(chunk)) => chunk,
                Some(Err(err)) => {
                    warn!("generation stream error: {err}");
                    break 'stream;
                }
                None => break 'stream,
            };
            for event in decoder.push(&chunk) {
                match event {
                    StreamEvent::Probs { probs } => {
                        debug!(entries = probs.len(), "probs event");
                        // A fresh prediction step pulls the stage back to
                        // Probabilities even while generating.
                        if !self.apply(run_epoch, |s| {
                            s.stage = Stage::Probabilities;
                            s.probs = probs.clone();
                            s.generation.live_probs = probs;
                        }) {
                            return;
                        }
                        if !self.pace(self.pacing.probs_ms, run_epoch).await {
                            return;
                        }
                    }
                    StreamEvent::Char { ch, word: grown } => {
                        debug!(%ch, word = %grown, "char event");
                        word = grown.clone();
                        if !self.apply(run_epoch, |s| {
                            s.stage = Stage::Generating;
                            s.generation.last_char = Some(ch);
                            s.generation.word = grown;
                        }) {
                            return;
                        }
                        if !self.pace(self.pacing.char_ms, run_epoch).await {
                            return;
                        }
                    }
                    StreamEvent::Done { result } => {
                        let final_word = result.filter(|r| !r.is_empty()).unwrap_or_else(|| word.clone());
                        self.finish(run_epoch, final_word);
                        return;
                    }
                }
            }
        }

        // Stream ended without a done frame (or errored): fall back to the
        // best-known word. An empty prefix with no generated characters
        // leaves the result empty.
        self.finish(run_epoch, word);
    }

    /// Enter Result with the given word and clear the running flag.
    fn finish(&self, run_epoch: u64, word: String) {
        let finished = self.apply(run_epoch, |s| {
            s.stage = Stage::Result;
            s.result = word.clone();
            s.running = false;
        });
        if finished {
            self.running.store(false, Ordering::SeqCst);
            info!(result = %word, "run finished");
        }
    }

    /// Mutate the session and publish a snapshot, unless the run was
    /// superseded. The epoch check happens under the session lock, so a
    /// reset can never interleave between check and mutation.
    fn apply(&self, run_epoch: u64, f: impl FnOnce(&mut RunSession)) -> bool {
        let mut session = self.lock_session();
        if self.epoch.load(Ordering::SeqCst) != run_epoch {
            return false;
        }
        f(&mut session);
        self.updates.send_replace(session.clone());
        true
    }

    /// Pacing delay; returns false if the run was superseded while asleep.
    async fn pace(&self, ms: u64, run_epoch: u64) -> bool {
        if ms > 0 {
            sleep(Duration::from_millis(ms)).await;
        }
        self.epoch.load(Ordering::SeqCst) == run_epoch
    }

    fn lock_session(&self) -> MutexGuard<'_, RunSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lowercase the input and keep only ASCII letters, matching the alphabet
/// the model was trained on.
pub fn normalize_prefix(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("Cred"), "cred");
        assert_eq!(normalize_prefix("c r-3d!"), "crd");
        assert_eq!(normalize_prefix("123 !?"), "");
        assert_eq!(normalize_prefix(""), "");
    }
}
