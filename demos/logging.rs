//! # Example: logging
//!
//! Installs the built-in [`LogWriter`] capturer and shows how a panicking
//! callback is reported without disturbing its siblings.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example logging --features logging
//! ```

use eventvisor::{Emitter, LogWriter, Value};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let emitter: Emitter<Value> = Emitter::sync();
    LogWriter::new().with_label("demo").install(&emitter);

    emitter.add_listener("user.saved", |_: &[Value]| panic!("listener bug"));
    emitter.add_listener("user.saved", |args: &[Value]| {
        println!("saved user {:?}", args.first().and_then(Value::as_str));
    });

    emitter.emit_event("user.saved", vec![Value::from("ada"), Value::from(3)]);
    emitter.emit_event("user.deleted", vec![Value::from("bob")]);
}
