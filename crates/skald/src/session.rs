//! Trace sessions: event queue, background writer, session clock.
//!
//! A [`TraceSession`] decouples producers (any number of application
//! threads) from a single background writer thread. Producers submit
//! events into an unbounded channel; the writer drains it and appends one
//! serialized line per event to the destination, in dequeue order. The
//! writer is the sole owner of the destination, so no concurrent writes
//! are possible.
//!
//! Shutdown is close-then-drain-then-exit: [`TraceSession::stop`] closes
//! the channel and joins the writer, which writes every already-queued
//! event before flushing and closing the destination. Events submitted
//! after that are silently lost; submission is fire-and-forget by
//! contract and never alters the control flow of instrumented code.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::event::TraceEvent;

/// Configuration for a trace session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Destination file for the trace log.
    pub trace_path: PathBuf,

    /// Whether tracing is enabled. A disabled session accepts every call
    /// and writes nothing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SessionConfig {
    /// Create a config writing to the given file.
    pub fn new(trace_path: impl Into<PathBuf>) -> Self {
        Self {
            trace_path: trace_path.into(),
            enabled: true,
        }
    }

    /// Disable tracing.
    pub fn disabled() -> Self {
        Self {
            trace_path: PathBuf::new(),
            enabled: false,
        }
    }
}

/// A tracing session: one destination, one background writer.
///
/// Handles are cheap to clone and share the same writer. All persisted
/// offsets are relative to the session's creation instant.
#[derive(Debug, Clone)]
pub struct TraceSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    started_at: Instant,
    sender: Mutex<Option<Sender<TraceEvent>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl TraceSession {
    /// Open a session writing to `trace_path`.
    ///
    /// Captures the reference instant and spawns the background writer.
    /// Never fails observably: the destination is opened by the writer
    /// thread, and an open failure is logged there while subsequent
    /// events are discarded.
    pub fn new(trace_path: impl Into<PathBuf>) -> Self {
        Self::with_config(SessionConfig::new(trace_path))
    }

    /// Open a session with an explicit configuration.
    pub fn with_config(config: SessionConfig) -> Self {
        let started_at = Instant::now();

        if !config.enabled {
            return Self {
                inner: Arc::new(SessionInner {
                    started_at,
                    sender: Mutex::new(None),
                    writer: Mutex::new(None),
                }),
            };
        }

        let (tx, rx) = channel();
        let path = config.trace_path;
        let handle = thread::spawn(move || writer_loop(rx, path));

        Self {
            inner: Arc::new(SessionInner {
                started_at,
                sender: Mutex::new(Some(tx)),
                writer: Mutex::new(Some(handle)),
            }),
        }
    }

    /// The session's reference instant.
    pub fn started_at(&self) -> Instant {
        self.inner.started_at
    }

    /// Whether the session still accepts events.
    pub fn is_running(&self) -> bool {
        self.inner.sender.lock().unwrap().is_some()
    }

    /// Submit one timed event.
    ///
    /// Offsets are computed against the session's reference instant,
    /// saturating at zero. Fire-and-forget: after [`stop`](Self::stop)
    /// the event is silently dropped, and nothing here can fail or block
    /// beyond a brief lock acquisition.
    pub fn submit(&self, name: impl Into<String>, start: Instant, end: Instant) {
        let event = TraceEvent::new(
            name,
            start.saturating_duration_since(self.inner.started_at),
            end.saturating_duration_since(self.inner.started_at),
        );

        if let Some(tx) = self.inner.sender.lock().unwrap().as_ref() {
            // A send failure means the writer is already gone; the event
            // is lost by contract.
            let _ = tx.send(event);
        }
    }

    /// Stop the session.
    ///
    /// Closes the queue, then blocks until the writer has drained every
    /// already-submitted event and closed the destination. Idempotent;
    /// dropping the last handle has the same effect.
    pub fn stop(&self) {
        self.inner.shutdown();
    }
}

impl SessionInner {
    fn shutdown(&self) {
        // Dropping the sender closes the channel. The receiver still
        // yields everything buffered before reporting disconnect, so the
        // writer drains the queue before exiting.
        drop(self.sender.lock().unwrap().take());

        if let Some(handle) = self.writer.lock().unwrap().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Background writer: sole writer to the destination.
///
/// Blocks on the channel between events and exits once every sender is
/// gone and the queue is drained.
fn writer_loop(rx: Receiver<TraceEvent>, path: PathBuf) {
    let mut out = match File::create(&path) {
        Ok(file) => Some(BufWriter::new(file)),
        Err(e) => {
            tracing::error!("Failed to open trace destination {}: {}", path.display(), e);
            None
        }
    };

    while let Ok(event) = rx.recv() {
        if let Some(w) = out.as_mut() {
            if let Err(e) = writeln!(w, "{event}") {
                tracing::error!("Failed to write trace event: {}", e);
            }
        }
    }

    if let Some(mut w) = out {
        if let Err(e) = w.flush() {
            tracing::error!("Failed to flush trace log {}: {}", path.display(), e);
        }
    }

    tracing::debug!("Trace writer for {} exited", path.display());
}
