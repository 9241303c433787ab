//! Background scrubbing with request coalescing.
//!
//! The worker thread owns the [`TimelineEngine`] exclusively (moved in
//! via `thread::spawn`). Requests arrive over a bounded crossbeam
//! channel and are drained in bursts:
//!
//! ```text
//! UI thread                        Scrub thread
//!     |                                 |
//!     |--select(i)--------------------->| recv() + try_recv() burst
//!     |   ticket.fetch_add(1)           | drop selects superseded in burst
//!     |--apply(log)-------------------->| apply batches / clears in order
//!     |                                 | replay_to(i, ticket moved?)
//!     |<--latest() [Mutex<Arc<View>>]---| publish Arc<TimelineView>
//! ```
//!
//! A replay in flight polls the ticket counter once per cell and is
//! abandoned, never partially published, as soon as a newer select has
//! been issued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use blastline_core::SequenceIndex;
use blastline_grid::EditLog;
use crossbeam_channel::{bounded, Receiver, Sender};

use crate::config::{ConfigError, ScrubConfig};
use crate::timeline::TimelineEngine;
use crate::view::TimelineView;

// ── Error types ──────────────────────────────────────────────────

/// Errors from talking to the scrub worker.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScrubError {
    /// The worker thread has stopped.
    #[error("scrub worker has disconnected")]
    Disconnected,
    /// The configuration failed validation.
    #[error("invalid scrub config: {0}")]
    Config(#[from] ConfigError),
    /// The worker thread could not be started.
    #[error("failed to spawn scrub thread: {reason}")]
    Spawn {
        /// The OS error message.
        reason: String,
    },
    /// The worker thread panicked and its engine is lost.
    #[error("scrub worker panicked")]
    Panicked,
}

// ── Requests and stats ───────────────────────────────────────────

enum ScrubRequest {
    Select { index: SequenceIndex, ticket: u64 },
    Apply(EditLog),
    Clear,
    Barrier(Sender<()>),
    Shutdown,
}

/// Counters describing how select requests were resolved.
///
/// Every select ends up in exactly one of `replays`, `dropped`, or
/// `cancelled`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrubStats {
    /// Select requests sent.
    pub requests: u64,
    /// Replays that ran to completion and were published.
    pub replays: u64,
    /// Selects discarded because a later select was already queued.
    pub dropped: u64,
    /// Replays abandoned midway because a newer select was issued.
    pub cancelled: u64,
}

#[derive(Default)]
struct Counters {
    requests: AtomicU64,
    replays: AtomicU64,
    dropped: AtomicU64,
    cancelled: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> ScrubStats {
        ScrubStats {
            requests: self.requests.load(Ordering::Acquire),
            replays: self.replays.load(Ordering::Acquire),
            dropped: self.dropped.load(Ordering::Acquire),
            cancelled: self.cancelled.load(Ordering::Acquire),
        }
    }
}

// ── ScrubWorker ──────────────────────────────────────────────────

/// Handle to a timeline engine running on a background thread.
pub struct ScrubWorker {
    tx: Option<Sender<ScrubRequest>>,
    ticket: Arc<AtomicU64>,
    published: Arc<Mutex<Arc<TimelineView>>>,
    counters: Arc<Counters>,
    thread: Option<JoinHandle<TimelineEngine>>,
}

impl ScrubWorker {
    /// Move `engine` onto a new worker thread.
    pub fn spawn(engine: TimelineEngine, config: ScrubConfig) -> Result<Self, ScrubError> {
        config.validate()?;
        let (tx, rx) = bounded(config.channel_capacity);
        let ticket = Arc::new(AtomicU64::new(0));
        let published = Arc::new(Mutex::new(Arc::new(engine.view())));
        let counters = Arc::new(Counters::default());

        let state = WorkerState {
            engine,
            rx,
            ticket: Arc::clone(&ticket),
            published: Arc::clone(&published),
            counters: Arc::clone(&counters),
        };
        let thread = thread::Builder::new()
            .name("blastline-scrub".into())
            .spawn(move || state.run())
            .map_err(|e| ScrubError::Spawn {
                reason: e.to_string(),
            })?;

        Ok(Self {
            tx: Some(tx),
            ticket,
            published,
            counters,
            thread: Some(thread),
        })
    }

    /// Request a scrub to `index`. Supersedes every earlier select.
    pub fn select(&self, index: SequenceIndex) -> Result<(), ScrubError> {
        let ticket = self.ticket.fetch_add(1, Ordering::AcqRel) + 1;
        self.counters.requests.fetch_add(1, Ordering::AcqRel);
        self.send(ScrubRequest::Select { index, ticket })
    }

    /// Queue a batch. Batches are never dropped and apply in order.
    pub fn apply(&self, log: EditLog) -> Result<(), ScrubError> {
        self.send(ScrubRequest::Apply(log))
    }

    /// Queue a clear of the whole timeline.
    pub fn clear(&self) -> Result<(), ScrubError> {
        self.send(ScrubRequest::Clear)
    }

    /// Block until every request sent before this call has been handled.
    pub fn wait_idle(&self) -> Result<(), ScrubError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(ScrubRequest::Barrier(reply_tx))?;
        reply_rx.recv().map_err(|_| ScrubError::Disconnected)
    }

    /// The most recently published view.
    pub fn latest(&self) -> Arc<TimelineView> {
        let guard = self.published.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// How select requests have been resolved so far.
    pub fn stats(&self) -> ScrubStats {
        self.counters.snapshot()
    }

    /// Stop the worker and recover its engine.
    pub fn shutdown(mut self) -> Result<TimelineEngine, ScrubError> {
        self.stop()
    }

    fn send(&self, request: ScrubRequest) -> Result<(), ScrubError> {
        self.tx
            .as_ref()
            .ok_or(ScrubError::Disconnected)?
            .send(request)
            .map_err(|_| ScrubError::Disconnected)
    }

    fn stop(&mut self) -> Result<TimelineEngine, ScrubError> {
        if let Some(tx) = self.tx.take() {
            // The worker may already be gone; joining reports that.
            let _ = tx.send(ScrubRequest::Shutdown);
        }
        let handle = self.thread.take().ok_or(ScrubError::Disconnected)?;
        handle.join().map_err(|_| ScrubError::Panicked)
    }
}

impl Drop for ScrubWorker {
    fn drop(&mut self) {
        if self.thread.is_some() {
            if let Err(e) = self.stop() {
                tracing::warn!(error = %e, "scrub worker did not stop cleanly");
            }
        }
    }
}

// ── Worker loop ──────────────────────────────────────────────────

struct WorkerState {
    engine: TimelineEngine,
    rx: Receiver<ScrubRequest>,
    ticket: Arc<AtomicU64>,
    published: Arc<Mutex<Arc<TimelineView>>>,
    counters: Arc<Counters>,
}

impl WorkerState {
    fn run(mut self) -> TimelineEngine {
        while let Ok(first) = self.rx.recv() {
            let mut burst = vec![first];
            burst.extend(self.rx.try_iter());

            let last_select = burst
                .iter()
                .rposition(|r| matches!(r, ScrubRequest::Select { .. }));
            for (i, request) in burst.into_iter().enumerate() {
                match request {
                    ScrubRequest::Select { index, ticket } => {
                        if Some(i) == last_select {
                            self.scrub(index, ticket);
                        } else {
                            self.counters.dropped.fetch_add(1, Ordering::AcqRel);
                        }
                    }
                    ScrubRequest::Apply(log) => {
                        self.engine.apply_batch(log);
                        self.publish(self.engine.view());
                    }
                    ScrubRequest::Clear => {
                        self.engine.clear();
                        self.publish(self.engine.view());
                    }
                    ScrubRequest::Barrier(reply) => {
                        // The caller may have given up waiting.
                        let _ = reply.send(());
                    }
                    ScrubRequest::Shutdown => return self.engine,
                }
            }
        }
        self.engine
    }

    fn scrub(&mut self, index: SequenceIndex, ticket: u64) {
        let current = Arc::clone(&self.ticket);
        let superseded = move || current.load(Ordering::Acquire) != ticket;
        match self.engine.replay_to(index, &superseded) {
            Some(view) => {
                self.engine.install(&view);
                self.counters.replays.fetch_add(1, Ordering::AcqRel);
                self.publish(view);
            }
            None => {
                tracing::debug!(index = %index, "scrub superseded mid-replay");
                self.counters.cancelled.fetch_add(1, Ordering::AcqRel);
            }
        }
    }

    fn publish(&self, view: TimelineView) {
        let mut guard = self.published.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(view);
    }
}
