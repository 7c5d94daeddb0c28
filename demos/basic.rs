//! # Example: basic
//!
//! Synchronous emitter shared between a "producer" and a "consumer" that only
//! see the capability they need.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► consumer registers: listener("order.placed"), once("order.placed"), capturer
//!   ├─► producer emits: order.placed ×3, order.shipped ×1
//!   └─► counters printed (listener=3, once=1, capturer=4)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use eventvisor::{Emitter, EventEmitter, EventType, Observable, Value};

fn consumer(events: Arc<dyn Observable<Value>>, counters: Arc<[AtomicU64; 3]>) {
    let c = Arc::clone(&counters);
    events.add_listener(
        EventType::from("order.placed"),
        Arc::new(move |args: &[Value]| {
            let id = args.first().and_then(Value::as_int).unwrap_or_default();
            println!("[listener] order #{id} placed");
            c[0].fetch_add(1, Ordering::Relaxed);
        }),
    );

    let c = Arc::clone(&counters);
    events.listen_once(
        EventType::from("order.placed"),
        Arc::new(move |_: &[Value]| {
            println!("[once] first order of the day");
            c[1].fetch_add(1, Ordering::Relaxed);
        }),
    );

    let c = Arc::clone(&counters);
    events.add_capturer(Arc::new(move |ev: &EventType, args: &[Value]| {
        println!("[capturer] {ev} {args:?}");
        c[2].fetch_add(1, Ordering::Relaxed);
    }));
}

fn producer(events: Arc<dyn EventEmitter<Value>>) {
    for id in 1..=3 {
        events.emit_event(
            EventType::from("order.placed"),
            vec![Value::from(id), Value::from("EUR")].into(),
        );
    }
    events.emit_event(EventType::from("order.shipped"), vec![Value::from(1)].into());
}

fn main() {
    let emitter: Emitter<Value> = Emitter::sync();
    let counters = Arc::new([AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)]);

    consumer(Arc::new(emitter.clone()), Arc::clone(&counters));
    producer(Arc::new(emitter.clone()));

    println!();
    println!("Counters:");
    println!(" ├─► listener: {}", counters[0].load(Ordering::Relaxed));
    println!(" ├─► once:     {}", counters[1].load(Ordering::Relaxed));
    println!(" └─► capturer: {}", counters[2].load(Ordering::Relaxed));
}
