//! Lightweight execution tracing.
//!
//! Application code marks the start and end of named events; skald records
//! each event's timing to a plain-text log for later offline analysis.
//!
//! - **Session**: an event queue plus one background writer thread per
//!   destination ([`TraceSession`])
//! - **Guard**: scope-bound timing, start at construction, emit on drop
//!   ([`TraceGuard`], [`trace_scope!`])
//! - **Shared traces**: FIFO start/end matching across threads and call
//!   sites ([`NamedSharedTrace`])
//! - **Registry**: identifier-keyed access for disjoint code locations
//!   ([`TraceRegistry`], [`registry::global`])
//!
//! # Usage
//!
//! ```rust,no_run
//! use skald::{TraceSession, trace_scope};
//!
//! fn handle_request(session: &TraceSession) {
//!     trace_scope!(session);
//!     // work here is timed until the end of this function
//! }
//!
//! let session = TraceSession::new("trace.log");
//! handle_request(&session);
//! session.stop();
//! ```
//!
//! The log holds one line per event, `<name> <start_ns> <end_ns>`, both
//! offsets relative to the session's creation instant. Lines appear in
//! queue-drain order: per producer this is submission order, but the file
//! is not globally time-sorted across producers.
//!
//! Tracing is fire-and-forget. Producer-facing calls never fail, never
//! block on I/O, and never alter the control flow of instrumented code;
//! dropped operations surface only as [`tracing`] warnings and missing
//! log lines. `stop()` is the single blocking call: it drains every
//! already-submitted event before returning, and events submitted after
//! that are permanently lost.

pub mod event;
pub mod guard;
pub mod registry;
pub mod session;
pub mod shared;

pub use event::{ParseEventError, ReadError, TraceEvent, read_events};
pub use guard::{TraceGuard, trace_name};
pub use registry::TraceRegistry;
pub use session::{SessionConfig, TraceSession};
pub use shared::{DEFAULT_CAPACITY, NamedSharedTrace};
