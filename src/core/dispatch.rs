//! # Dispatch strategies.
//!
//! [`Dispatcher`] turns a registry [`Snapshot`] into callback invocations.
//!
//! ```text
//! Sync:   emit_event ─► capturer1 ─► capturer2 ─► listener1 ─► listener2 ─► return
//!                       (inline, same call stack; nested emits resolve in place)
//!
//! Async:  emit_event ─┬─► spawn_blocking(capturer1)
//!                     ├─► spawn_blocking(listener1)      (tracked by TaskTracker)
//!                     ├─► spawn_blocking(listener2)
//!                     └─► return immediately
//! ```
//!
//! ## Isolation
//! Every invocation runs behind `catch_unwind`: a panic is converted into a
//! [`CallbackError::Panicked`] and logged with `tracing::error!`, and the
//! remaining callbacks of the emission still run.
//!
//! **Warning**: `AssertUnwindSafe` is used, so a callback that panics while
//! holding its own `Mutex` leaves that mutex poisoned for its other users.

use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;

use crate::error::CallbackError;
use crate::events::EventType;

use super::registry::Snapshot;

/// Background executor for async mode.
pub(crate) struct Spawner {
    handle: Handle,
    tracker: TaskTracker,
    /// Serializes `drain()` calls: a drain reopening the tracker must not
    /// strand another drain still waiting on it.
    drain_gate: Mutex<()>,
}

impl Spawner {
    pub(crate) fn new(handle: Handle) -> Self {
        Self {
            handle,
            tracker: TaskTracker::new(),
            drain_gate: Mutex::new(()),
        }
    }

    pub(crate) fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub(crate) fn drain_gate(&self) -> &Mutex<()> {
        &self.drain_gate
    }

    fn spawn<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Detached: the emitter never awaits individual callbacks.
        drop(self.tracker.spawn_blocking_on(f, &self.handle));
    }
}

/// Strategy fixed at construction.
pub(crate) enum Dispatcher {
    Sync,
    Async(Spawner),
}

impl Dispatcher {
    /// Invokes capturers, then listeners, according to the strategy.
    pub(crate) fn dispatch<A>(&self, event: EventType, args: Arc<[A]>, snapshot: Snapshot<A>)
    where
        A: Send + Sync + 'static,
    {
        match self {
            Dispatcher::Sync => {
                for (id, cb) in &snapshot.capturers {
                    isolated(&event, id, || cb(&event, &args[..]));
                }
                for (id, cb) in &snapshot.listeners {
                    isolated(&event, id, || cb(&args[..]));
                }
            }
            Dispatcher::Async(spawner) => {
                for (id, cb) in snapshot.capturers {
                    let event = event.clone();
                    let args = Arc::clone(&args);
                    spawner.spawn(move || isolated(&event, &id, || cb(&event, &args[..])));
                }
                for (id, cb) in snapshot.listeners {
                    let event = event.clone();
                    let args = Arc::clone(&args);
                    spawner.spawn(move || isolated(&event, &id, || cb(&args[..])));
                }
            }
        }
    }
}

/// Runs one callback behind a panic boundary.
fn isolated<F: FnOnce()>(event: &EventType, token: &dyn Display, f: F) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
        let err = CallbackError::Panicked {
            event: event.clone(),
            token: token.to_string(),
            info: panic_info(payload.as_ref()),
        };
        tracing::error!(
            event = %event,
            token = %token,
            label = err.as_label(),
            "{}",
            err.as_message()
        );
    }
}

fn panic_info(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
