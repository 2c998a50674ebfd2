//! Shared named traces: start/end matching across threads and call sites.
//!
//! A [`NamedSharedTrace`] lets `start()` and `end()` be called from
//! different code locations without passing an object around. Pending
//! start instants live in a fixed-capacity ring buffer; matching is
//! strictly FIFO, so the oldest unmatched `start()` is paired with the
//! next `end()` regardless of which thread issued either. Callers that
//! need per-occurrence correlation should use distinct names or a
//! [`TraceGuard`](crate::TraceGuard) instead.

use std::sync::Mutex;
use std::time::Instant;

use crate::session::TraceSession;

/// Default number of pending starts a shared trace can hold.
pub const DEFAULT_CAPACITY: usize = 100;

/// A named, thread-safe start/end matcher backed by a bounded ring buffer.
#[derive(Debug)]
pub struct NamedSharedTrace {
    session: TraceSession,
    name: String,
    state: Mutex<RingState>,
}

/// Ring of pending start instants. `live` counts unmatched starts and
/// stays within `[0, slots.len()]`; `head`/`tail` advance modulo capacity.
#[derive(Debug)]
struct RingState {
    slots: Vec<Option<Instant>>,
    head: usize,
    tail: usize,
    live: usize,
}

impl NamedSharedTrace {
    /// Create a shared trace with [`DEFAULT_CAPACITY`] pending-start slots.
    pub fn new(session: &TraceSession, name: impl Into<String>) -> Self {
        Self::with_capacity(session, name, DEFAULT_CAPACITY)
    }

    /// Create a shared trace with an explicit pending-start capacity.
    pub fn with_capacity(
        session: &TraceSession,
        name: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            session: session.clone(),
            name: name.into(),
            state: Mutex::new(RingState {
                slots: vec![None; capacity],
                head: 0,
                tail: 0,
                live: 0,
            }),
        }
    }

    /// Record a pending start.
    ///
    /// If every slot is occupied the newest attempt is dropped with a
    /// warning; existing pending starts are preserved.
    pub fn start(&self) {
        let now = Instant::now();
        let mut ring = self.state.lock().unwrap();
        let capacity = ring.slots.len();

        if ring.live == capacity {
            tracing::warn!(
                "Pending start buffer full for trace '{}' (capacity {}), dropping start",
                self.name,
                capacity
            );
            return;
        }

        let tail = ring.tail;
        ring.slots[tail] = Some(now);
        ring.tail = (tail + 1) % capacity;
        ring.live += 1;
    }

    /// Match the oldest pending start and submit the completed event.
    ///
    /// With no pending start the call is a warned no-op. The matched
    /// instant is read under the lock; submission happens outside it so
    /// unrelated sink contention is not serialized here.
    pub fn end(&self) {
        let now = Instant::now();

        let matched = {
            let mut ring = self.state.lock().unwrap();

            if ring.live == 0 {
                tracing::warn!(
                    "No matching start() for end() on trace '{}', ignoring",
                    self.name
                );
                return;
            }

            let capacity = ring.slots.len();
            let head = ring.head;
            let matched = ring.slots[head].take();
            ring.head = (head + 1) % capacity;
            ring.live -= 1;
            matched
        };

        if let Some(started) = matched {
            self.session.submit(self.name.clone(), started, now);
        }
    }

    /// Number of currently unmatched starts.
    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().live
    }

    /// The trace's event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pending-start capacity.
    pub fn capacity(&self) -> usize {
        self.state.lock().unwrap().slots.len()
    }
}
