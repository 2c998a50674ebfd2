//! Scope guards: construct-to-drop timing of one lexical scope.

use std::time::Instant;

use crate::session::TraceSession;

/// Times one lexical scope.
///
/// Captures the current instant at construction and submits exactly one
/// event to the bound session when dropped, on every exit path (normal
/// return, early return, or unwinding). Creating and dropping a guard has
/// no other side effect and can never fail.
#[derive(Debug)]
pub struct TraceGuard {
    session: TraceSession,
    name: String,
    start: Instant,
}

impl TraceGuard {
    /// Create a guard bound to `session`.
    ///
    /// `raw_name` may be a plain display name or a full function
    /// signature; it is passed through [`trace_name`] either way.
    pub fn new(session: &TraceSession, raw_name: &str) -> Self {
        Self {
            session: session.clone(),
            name: trace_name(raw_name),
            start: Instant::now(),
        }
    }

    /// The instant captured when this guard was created.
    pub fn start_time(&self) -> Instant {
        self.start
    }
}

impl Drop for TraceGuard {
    fn drop(&mut self) {
        let name = std::mem::take(&mut self.name);
        self.session.submit(name, self.start, Instant::now());
    }
}

/// Derive a display name from a raw signature string.
///
/// Drops everything from the first `(` onward, then keeps only the
/// substring after the last remaining space. This strips a parameter list
/// and a return-type/qualifier prefix from C-style signatures.
///
/// Best effort: generic argument lists or operator names containing `(`
/// or spaces ahead of the parameter list truncate at the wrong point.
pub fn trace_name(signature: &str) -> String {
    let head = match signature.find('(') {
        Some(pos) => &signature[..pos],
        None => signature,
    };
    match head.rfind(' ') {
        Some(pos) => head[pos + 1..].to_string(),
        None => head.to_string(),
    }
}

/// Trace the enclosing scope.
///
/// Creates a [`TraceGuard`] bound to the nearest enclosing scope. With one
/// argument the event is named after the enclosing function's path; a
/// second argument supplies the name (or raw signature) explicitly.
#[macro_export]
macro_rules! trace_scope {
    ($session:expr) => {
        let _trace_guard = $crate::TraceGuard::new(
            &$session,
            $crate::guard::enclosing_fn_name({
                fn probe() {}
                fn name_of<T>(_: T) -> &'static str {
                    ::std::any::type_name::<T>()
                }
                name_of(probe)
            }),
        );
    };
    ($session:expr, $name:expr) => {
        let _trace_guard = $crate::TraceGuard::new(&$session, $name);
    };
}

/// Strip the probe-function suffix from a `type_name` path.
#[doc(hidden)]
pub fn enclosing_fn_name(probe: &'static str) -> &'static str {
    probe.strip_suffix("::probe").unwrap_or(probe)
}
