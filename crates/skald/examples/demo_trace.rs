//! Demo of the tracer: scope guards, a shared named trace driven from a
//! second thread, and registry-based start/end by identifier.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use skald::{NamedSharedTrace, TraceSession, read_events, registry, trace_scope};

fn parse_input(session: &TraceSession) {
    trace_scope!(session);
    thread::sleep(Duration::from_millis(5));
}

fn plan_route(session: &TraceSession) {
    trace_scope!(session);
    thread::sleep(Duration::from_millis(12));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let session = TraceSession::new("skald_demo.log");

    // Scope-guarded functions: named automatically, emitted on return.
    parse_input(&session);
    plan_route(&session);

    // One shared named trace, started in a worker thread and ended here.
    let frames = Arc::new(NamedSharedTrace::new(&session, "sensor_frame"));
    let producer = {
        let frames = frames.clone();
        thread::spawn(move || {
            for _ in 0..3 {
                frames.start();
                thread::sleep(Duration::from_millis(3));
            }
        })
    };
    producer.join().unwrap();
    for _ in 0..3 {
        frames.end();
    }

    // Identifier-based tracing through the process-wide registry.
    registry::global().register("checkpoint", &session);
    registry::global().start("checkpoint");
    thread::sleep(Duration::from_millis(8));
    registry::global().end("checkpoint");

    session.stop();

    println!("--- skald_demo.log ---");
    for event in read_events("skald_demo.log")? {
        println!(
            "{:30} start={:>10}ns end={:>10}ns duration={:?}",
            event.name,
            event.start.as_nanos(),
            event.end.as_nanos(),
            event.duration()
        );
    }

    Ok(())
}
