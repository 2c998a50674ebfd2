//! Identifier-keyed directory of shared named traces.
//!
//! Lets disjoint code locations start and end the same named trace by
//! identifier alone. The primary API is an explicit [`TraceRegistry`]
//! owned by the application and passed to the call sites that need it;
//! [`global()`] provides a lazily-initialized process-wide instance for
//! call sites that cannot thread a handle through.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::session::TraceSession;
use crate::shared::NamedSharedTrace;

/// Maps identifiers to exclusively-owned [`NamedSharedTrace`]s.
///
/// One mutex covers registration and lookup. Registration is expected to
/// be rare relative to start/end traffic.
#[derive(Debug, Default)]
pub struct TraceRegistry {
    traces: Mutex<HashMap<String, NamedSharedTrace>>,
}

impl TraceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trace under `id`, bound to `session`.
    ///
    /// Replaces any prior entry for `id`, discarding its unmatched
    /// pending starts.
    pub fn register(&self, id: impl Into<String>, session: &TraceSession) {
        let id = id.into();
        let trace = NamedSharedTrace::new(session, id.clone());
        self.traces.lock().unwrap().insert(id, trace);
    }

    /// Register with an explicit pending-start capacity.
    pub fn register_with_capacity(
        &self,
        id: impl Into<String>,
        session: &TraceSession,
        capacity: usize,
    ) {
        let id = id.into();
        let trace = NamedSharedTrace::with_capacity(session, id.clone(), capacity);
        self.traces.lock().unwrap().insert(id, trace);
    }

    /// Start the trace registered under `id`.
    ///
    /// Unknown identifiers are not errors; the call is a silent no-op.
    pub fn start(&self, id: &str) {
        if let Some(trace) = self.traces.lock().unwrap().get(id) {
            trace.start();
        }
    }

    /// End the trace registered under `id`. Silent no-op for unknown
    /// identifiers.
    pub fn end(&self, id: &str) {
        if let Some(trace) = self.traces.lock().unwrap().get(id) {
            trace.end();
        }
    }

    /// Whether `id` currently has a registered trace.
    pub fn is_registered(&self, id: &str) -> bool {
        self.traces.lock().unwrap().contains_key(id)
    }
}

/// Process-wide registry, lazily initialized, living until process exit.
pub fn global() -> &'static TraceRegistry {
    static GLOBAL: OnceLock<TraceRegistry> = OnceLock::new();
    GLOBAL.get_or_init(TraceRegistry::new)
}
