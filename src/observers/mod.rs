//! # Capability surfaces of the emitter.
//!
//! An [`Emitter`](crate::Emitter) implements two narrow capabilities so callers
//! can hand out only what a component needs:
//!
//! - [`Observable`] registration surface (listeners, one-shot listeners, capturers)
//! - [`EventEmitter`] emit surface
//!
//! ```text
//!          producers                               consumers
//!   Arc<dyn EventEmitter<A>>                 Arc<dyn Observable<A>>
//!             │                                        │
//!             └── emit_event(ev, args) ──► Emitter ◄── add_listener / add_capturer
//!                                            │
//!                            ┌───────────────┴───────────────┐
//!                            ▼                               ▼
//!                     capturers (all events)        listeners[ev] (in order)
//! ```
//!
//! Both traits are object safe: callbacks travel as shared function objects
//! ([`ListenerFn`], [`CapturerFn`]).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Emitter, EventEmitter, EventType, Observable, Value};
//!
//! let emitter: Emitter<Value> = Emitter::sync();
//! let observable: Arc<dyn Observable<Value>> = Arc::new(emitter.clone());
//! let producer: Arc<dyn EventEmitter<Value>> = Arc::new(emitter.clone());
//!
//! observable.add_listener(EventType::from("ping"), Arc::new(|args: &[Value]| {
//!     assert_eq!(args[0].as_int(), Some(1));
//! }));
//! producer.emit_event(EventType::from("ping"), vec![Value::from(1)].into());
//! ```

mod event_emitter;
#[cfg(feature = "logging")]
mod log;
mod observable;

use std::sync::Arc;

use crate::events::EventType;

pub use event_emitter::EventEmitter;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observable::Observable;

/// Shared listener callback: receives the emission's argument sequence.
pub type ListenerFn<A> = Arc<dyn Fn(&[A]) + Send + Sync + 'static>;

/// Shared capturer callback: receives the event key and the argument sequence.
pub type CapturerFn<A> = Arc<dyn Fn(&EventType, &[A]) + Send + Sync + 'static>;
