//! # Example: async_fanout
//!
//! Asynchronous emitter: every callback runs as its own task, `emit_event`
//! returns immediately, and `shutdown()` waits (bounded by `grace`) for the
//! callbacks still running.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► build async emitter (grace = 2s)
//!   ├─► listeners: "job.done" (slow), "job.done" (fast), recursive "job.retry"
//!   ├─► emit a few events from several tasks
//!   └─► shutdown() → Ok or GraceExceeded
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example async_fanout
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use eventvisor::{DispatchMode, Emitter, EventType, Value};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventvisor=debug".into()),
        )
        .init();

    let emitter: Emitter<Value> = Emitter::builder()
        .mode(DispatchMode::Async)
        .grace(Duration::from_secs(2))
        .build()?;

    let done = Arc::new(AtomicU64::new(0));

    emitter.add_listener("job.done", |args: &[Value]| {
        std::thread::sleep(Duration::from_millis(300));
        println!("[slow] job {:?} archived", args.first());
    });

    let d = Arc::clone(&done);
    emitter.add_listener("job.done", move |args: &[Value]| {
        println!("[fast] job {:?} done", args.first());
        d.fetch_add(1, Ordering::Relaxed);
    });

    // Retries re-emit "job.done" from inside a callback: a new wave is spawned.
    let em = emitter.clone();
    emitter.add_listener("job.retry", move |args: &[Value]| {
        println!("[retry] retrying {:?}", args.first());
        em.emit_event("job.done", args.to_vec());
    });

    emitter.add_capturer(|ev: &EventType, _: &[Value]| println!("[capturer] {ev}"));

    let mut producers = Vec::new();
    for worker in 0..3 {
        let em = emitter.clone();
        producers.push(tokio::spawn(async move {
            em.emit_event("job.done", vec![Value::from(worker)]);
            em.emit_event("job.retry", vec![Value::from(worker + 100)]);
        }));
    }
    for p in producers {
        p.await?;
    }

    println!("in flight after emitting: {}", emitter.in_flight());

    match emitter.shutdown().await {
        Ok(()) => println!("all callbacks finished"),
        Err(e) => println!("shutdown: {e}"),
    }
    println!("fast listener ran {} times", done.load(Ordering::Relaxed));
    Ok(())
}
