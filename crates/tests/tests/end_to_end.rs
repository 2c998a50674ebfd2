//! End-to-end scenarios exercising the full pipeline: producers, the
//! background writer, and the persisted log read back from disk.

use std::thread;
use std::time::{Duration, Instant};

use skald::{NamedSharedTrace, TraceGuard, TraceRegistry, TraceSession, read_events};
use tempfile::tempdir;

#[test]
fn manual_submissions_persist_exact_offsets_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.log");
    let session = TraceSession::new(&path);

    let t = session.started_at();
    session.submit("a", t, t + Duration::from_nanos(50));
    session.submit("b", t + Duration::from_nanos(10), t + Duration::from_nanos(40));
    session.stop();

    let lines = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = lines.lines().collect();
    assert_eq!(lines, vec!["a 0 50", "b 10 40"]);
}

#[test]
fn registry_trace_spans_at_least_the_slept_duration() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.log");
    let session = TraceSession::new(&path);
    let registry = TraceRegistry::new();

    registry.register("x", &session);
    registry.start("x");
    thread::sleep(Duration::from_millis(50));
    registry.end("x");
    session.stop();

    let events = read_events(&path).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "x");
    assert!(events[0].duration() >= Duration::from_millis(50));
}

#[test]
fn parallel_producers_lose_nothing_before_stop() {
    const THREADS: usize = 4;
    const EVENTS_PER_THREAD: usize = 250;

    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.log");
    let session = TraceSession::new(&path);

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let session = session.clone();
            thread::spawn(move || {
                for i in 0..EVENTS_PER_THREAD {
                    let now = Instant::now();
                    session.submit(format!("w{worker}_e{i}"), now, now);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    session.stop();

    let events = read_events(&path).unwrap();
    assert_eq!(events.len(), THREADS * EVENTS_PER_THREAD);

    // Per-producer submission order survives queue draining.
    for worker in 0..THREADS {
        let prefix = format!("w{worker}_e");
        let indices: Vec<usize> = events
            .iter()
            .filter_map(|e| e.name.strip_prefix(&prefix))
            .map(|rest| rest.parse().unwrap())
            .collect();
        assert_eq!(indices, (0..EVENTS_PER_THREAD).collect::<Vec<_>>());
    }
}

#[test]
fn guards_and_shared_traces_share_one_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.log");
    let session = TraceSession::new(&path);

    {
        let _guard = TraceGuard::new(&session, "void handler::run(int)");
        let frames = NamedSharedTrace::new(&session, "frame");
        frames.start();
        thread::sleep(Duration::from_millis(2));
        frames.end();
    }
    session.stop();

    let events = read_events(&path).unwrap();
    assert_eq!(events.len(), 2);
    // The shared trace ended (and submitted) before the guard dropped.
    assert_eq!(events[0].name, "frame");
    assert_eq!(events[1].name, "handler::run");
}

#[test]
fn stopping_twice_and_submitting_late_is_harmless() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.log");
    let session = TraceSession::new(&path);

    let t = session.started_at();
    session.submit("kept", t, t + Duration::from_nanos(1));
    session.stop();
    session.stop();
    session.submit("lost", t, t + Duration::from_nanos(2));

    let events = read_events(&path).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "kept");
}
