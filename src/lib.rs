//! # eventvisor
//!
//! **Eventvisor** is a small in-process event emitter for Rust.
//!
//! Producers emit named events with positional arguments; consumers register
//! callbacks that run when matching events occur. Components talk to each other
//! through the emitter without holding direct references.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producers                                              consumers
//! ┌────────────┐                                       ┌──────────────────┐
//! │ component  │── emit_event("saved", [..]) ──┐       │ add_listener(ev) │
//! └────────────┘                               ▼       │ listen_once(ev)  │
//! ┌────────────┐                ┌─────────────────────────────────────────┤
//! │ component  │── emit ───────►│  Emitter (cheap Clone, Arc-backed)      │
//! └────────────┘                │  - Registry   (one mutex, snapshots)    │
//!                               │  - Dispatcher (Sync | Async, fixed)     │
//!                               └───────┬─────────────────────────────────┘
//!                                       ▼
//!                   ┌─────────────── snapshot ────────────────┐
//!                   ▼                                         ▼
//!          capturers (every event)                listeners[event] (in order)
//!          cap1 ─► cap2 ─► ...          then      l1 ─► l2 ─► once(l3) ─► ...
//! ```
//!
//! ### Dispatch modes
//! ```text
//! DispatchMode::Sync
//!   emit_event ─► cap1 ─► cap2 ─► l1 ─► l2 ─► return      (nested emits resolve inline)
//!
//! DispatchMode::Async
//!   emit_event ─┬─► task(cap1)
//!               ├─► task(l1)          no ordering between tasks
//!               ├─► task(l2)
//!               └─► return immediately
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                    |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------|
//! | **Emitter**       | Register callbacks and emit events, sync or async.              | [`Emitter`], [`DispatchMode`]         |
//! | **Capabilities**  | Hand out only the registration or only the emit surface.       | [`Observable`], [`EventEmitter`]      |
//! | **Data model**    | Event keys, removal tokens, dynamic argument values.            | [`EventType`], [`ListenerId`], [`Value`] |
//! | **Errors**        | Typed errors for construction/shutdown and callback failures.   | [`RuntimeError`], [`CallbackError`]   |
//! | **Configuration** | Mode, shutdown grace, explicit runtime handle.                  | [`EmitterConfig`], [`EmitterBuilder`] |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a capturer that records every emission via `tracing` _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventvisor::{Emitter, EventType, Value};
//!
//! let em: Emitter<Value> = Emitter::sync();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! // Fires on every "a"
//! let s = Arc::clone(&seen);
//! em.add_listener("a", move |args: &[Value]| {
//!     assert_eq!(args.len(), 3);
//!     s.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! // Fires on the first "a" only
//! em.listen_once("a", |_args: &[Value]| println!("first a"));
//!
//! // Sees every event
//! em.add_capturer(|ev: &EventType, _args: &[Value]| println!("captured {ev}"));
//!
//! for _ in 0..3 {
//!     em.emit_event("a", vec![Value::from("test"), 123.into(), true.into()]);
//! }
//! em.emit_event("b", Vec::new());
//!
//! assert_eq!(seen.load(Ordering::SeqCst), 3);
//! ```
mod core;
mod error;
mod events;
mod observers;

// ---- Public re-exports ----

pub use crate::core::{DispatchMode, Emitter, EmitterBuilder, EmitterConfig};
pub use error::{CallbackError, RuntimeError};
pub use events::{CapturerId, EventType, ListenerId, Value};
pub use observers::{CapturerFn, EventEmitter, ListenerFn, Observable};

// Optional: expose a simple built-in logging capturer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
