//! # Emitter: registry + dispatch strategy behind one cheap handle.
//!
//! [`Emitter`] owns a [`Registry`] and a [`Dispatcher`] chosen once from
//! [`EmitterConfig::mode`]. Clones share the same state, so a callback may
//! capture a clone and emit, register or remove from inside its own invocation.
//!
//! ## Emit algorithm
//! ```text
//! emit_event(ev, args)
//!   ├─► shut down?  ─► drop (debug log), return
//!   ├─► registry.snapshot(ev)          (lock held only here)
//!   │     ├─ clone capturers            (registration order)
//!   │     ├─ clone listeners[ev]        (registration order)
//!   │     └─ claim one-shot listeners   (removed from registry)
//!   └─► dispatcher.dispatch(ev, Arc<[A]>, snapshot)
//!         ├─ Sync:  run inline, capturers first, then listeners
//!         └─ Async: spawn one task per callback, return immediately
//! ```
//!
//! ## Snapshot rules
//! - Listeners added while an emission is running do not receive it.
//! - Listeners removed while an emission is running still receive it if they
//!   were already in its snapshot; removal applies from the next emission.
//! - No callback is invoked twice by one emission; a one-shot listener is
//!   invoked by at most one emission.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventvisor::{Emitter, Value};
//!
//! let em: Emitter<Value> = Emitter::sync();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let h = Arc::clone(&hits);
//! let id = em.add_listener("saved", move |args: &[Value]| {
//!     assert_eq!(args[0].as_str(), Some("doc-1"));
//!     h.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! em.emit_event("saved", vec![Value::from("doc-1")]);
//! em.remove_listener("saved", id);
//! em.emit_event("saved", vec![Value::from("doc-2")]);
//!
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::error::RuntimeError;
use crate::events::{CapturerId, EventType, ListenerId, Value};
use crate::observers::{CapturerFn, EventEmitter, ListenerFn, Observable};

use super::builder::EmitterBuilder;
use super::config::{DispatchMode, EmitterConfig};
use super::dispatch::{Dispatcher, Spawner};
use super::registry::Registry;

struct Inner<A> {
    registry: Registry<A>,
    dispatcher: Dispatcher,
    cfg: EmitterConfig,
    closed: CancellationToken,
}

/// In-process event emitter.
///
/// Implements both [`Observable`] and [`EventEmitter`]. Cloning is cheap and
/// every clone refers to the same registry.
pub struct Emitter<A = Value> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for Emitter<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> fmt::Debug for Emitter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("mode", &self.inner.cfg.mode)
            .field("capturers", &self.inner.registry.capturer_count())
            .field("events", &self.inner.registry.event_types())
            .field("shut_down", &self.inner.closed.is_cancelled())
            .finish()
    }
}

impl<A: Send + Sync + 'static> Default for Emitter<A> {
    fn default() -> Self {
        Self::sync()
    }
}

impl Emitter {
    /// Returns a builder for configuring an emitter.
    pub fn builder() -> EmitterBuilder {
        EmitterBuilder::new()
    }
}

impl<A: Send + Sync + 'static> Emitter<A> {
    /// Creates an emitter with the given dispatch mode and default settings.
    ///
    /// Fails with [`RuntimeError::NoRuntime`] for [`DispatchMode::Async`] when
    /// called outside a tokio runtime.
    pub fn new(mode: DispatchMode) -> Result<Self, RuntimeError> {
        Self::with_config(EmitterConfig::with_mode(mode))
    }

    /// Creates a synchronous emitter. Never fails.
    pub fn sync() -> Self {
        Self::from_parts(Dispatcher::Sync, EmitterConfig::with_mode(DispatchMode::Sync))
    }

    /// Creates an emitter from a full configuration.
    pub fn with_config(cfg: EmitterConfig) -> Result<Self, RuntimeError> {
        let dispatcher = match cfg.mode {
            DispatchMode::Sync => Dispatcher::Sync,
            DispatchMode::Async => {
                let handle = match &cfg.runtime {
                    Some(h) => h.clone(),
                    None => Handle::try_current().map_err(|_| RuntimeError::NoRuntime)?,
                };
                Dispatcher::Async(Spawner::new(handle))
            }
        };
        Ok(Self::from_parts(dispatcher, cfg))
    }

    fn from_parts(dispatcher: Dispatcher, cfg: EmitterConfig) -> Self {
        tracing::debug!(mode = ?cfg.mode, "emitter created");
        Self {
            inner: Arc::new(Inner {
                registry: Registry::new(),
                dispatcher,
                cfg,
                closed: CancellationToken::new(),
            }),
        }
    }

    /// Dispatch mode fixed at construction.
    pub fn mode(&self) -> DispatchMode {
        self.inner.cfg.mode
    }

    /// Configuration the emitter was built with.
    pub fn config(&self) -> &EmitterConfig {
        &self.inner.cfg
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Appends a listener for `event`; it runs on every matching emission.
    pub fn add_listener<F>(&self, event: impl Into<EventType>, callback: F) -> ListenerId
    where
        F: Fn(&[A]) + Send + Sync + 'static,
    {
        self.register_listener(event.into(), Arc::new(callback), false)
    }

    /// Appends a listener for `event` that fires at most once.
    pub fn listen_once<F>(&self, event: impl Into<EventType>, callback: F) -> ListenerId
    where
        F: Fn(&[A]) + Send + Sync + 'static,
    {
        self.register_listener(event.into(), Arc::new(callback), true)
    }

    /// Removes a listener. Returns `false` if it was not registered (no-op).
    pub fn remove_listener(&self, event: impl AsRef<str>, id: ListenerId) -> bool {
        let removed = self.inner.registry.remove_listener(event.as_ref(), id);
        tracing::trace!(event = event.as_ref(), token = %id, removed, "listener removed");
        removed
    }

    /// Removes every listener of `event`, returning how many were removed.
    pub fn remove_all_listeners(&self, event: impl AsRef<str>) -> usize {
        let n = self.inner.registry.remove_all_listeners(event.as_ref());
        tracing::trace!(event = event.as_ref(), removed = n, "listeners cleared");
        n
    }

    /// Appends a capturer; it observes every emitted event.
    pub fn add_capturer<F>(&self, callback: F) -> CapturerId
    where
        F: Fn(&EventType, &[A]) + Send + Sync + 'static,
    {
        self.register_capturer(Arc::new(callback))
    }

    /// Removes a capturer. Returns `false` if it was not registered (no-op).
    pub fn remove_capturer(&self, id: CapturerId) -> bool {
        let removed = self.inner.registry.remove_capturer(id);
        tracing::trace!(token = %id, removed, "capturer removed");
        removed
    }

    pub(crate) fn register_listener(
        &self,
        event: EventType,
        callback: ListenerFn<A>,
        once: bool,
    ) -> ListenerId {
        let id = self.inner.registry.add_listener(event.clone(), callback, once);
        tracing::trace!(event = %event, token = %id, once, "listener added");
        id
    }

    pub(crate) fn register_capturer(&self, callback: CapturerFn<A>) -> CapturerId {
        let id = self.inner.registry.add_capturer(callback);
        tracing::trace!(token = %id, "capturer added");
        id
    }

    // ---------------------------
    // Emission
    // ---------------------------

    /// Delivers `args` to every capturer, then every listener of `event`.
    ///
    /// - Sync mode: returns after all callbacks (and nested emissions) finish.
    /// - Async mode: returns immediately; callbacks run as independent tasks.
    ///
    /// After [`shutdown`](Self::shutdown) the emission is dropped.
    pub fn emit_event(&self, event: impl Into<EventType>, args: impl Into<Arc<[A]>>) {
        let event = event.into();
        if self.inner.closed.is_cancelled() {
            tracing::debug!(event = %event, "emitter shut down, event dropped");
            return;
        }

        let snapshot = self.inner.registry.snapshot(&event);
        tracing::trace!(
            event = %event,
            callbacks = snapshot.len(),
            "emit"
        );
        if snapshot.is_empty() {
            return;
        }
        self.inner.dispatcher.dispatch(event, args.into(), snapshot);
    }

    // ---------------------------
    // Introspection
    // ---------------------------

    /// Number of listeners currently registered for `event`.
    pub fn listener_count(&self, event: impl AsRef<str>) -> usize {
        self.inner.registry.listener_count(event.as_ref())
    }

    /// Number of registered capturers.
    pub fn capturer_count(&self) -> usize {
        self.inner.registry.capturer_count()
    }

    /// Returns sorted list of events with at least one listener.
    pub fn event_types(&self) -> Vec<EventType> {
        self.inner.registry.event_types()
    }

    // ---------------------------
    // Drain / shutdown
    // ---------------------------

    /// Async callbacks spawned and not yet finished (always 0 in sync mode).
    pub fn in_flight(&self) -> usize {
        match &self.inner.dispatcher {
            Dispatcher::Sync => 0,
            Dispatcher::Async(spawner) => spawner.tracker().len(),
        }
    }

    /// Waits until every async callback spawned so far has finished.
    ///
    /// The emitter stays usable. Returns immediately in sync mode.
    pub async fn drain(&self) {
        let Dispatcher::Async(spawner) = &self.inner.dispatcher else {
            return;
        };
        let _gate = spawner.drain_gate().lock().await;
        let tracker = spawner.tracker();
        tracker.close();
        tracker.wait().await;
        if !self.inner.closed.is_cancelled() {
            tracker.reopen();
            // shutdown() may have started between the check and reopen()
            if self.inner.closed.is_cancelled() {
                tracker.close();
            }
        }
    }

    /// True once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.inner.closed.is_cancelled()
    }

    /// Stops accepting emissions and waits up to `grace` for in-flight callbacks.
    ///
    /// ### Behavior
    /// - Later `emit_event` calls are dropped (debug log).
    /// - Running callbacks are not cancelled; they run to completion.
    /// - Returns [`RuntimeError::GraceExceeded`] if callbacks are still running
    ///   when the grace window (see [`EmitterConfig::grace`]) elapses.
    /// - Registration keeps working; it just has nothing to deliver anymore.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.inner.closed.cancel();
        let Dispatcher::Async(spawner) = &self.inner.dispatcher else {
            tracing::debug!("emitter shut down");
            return Ok(());
        };

        let tracker = spawner.tracker();
        tracker.close();

        let grace = self.inner.cfg.grace;
        let drained = match self.inner.cfg.grace_window() {
            Some(window) => tokio::time::timeout(window, tracker.wait()).await.is_ok(),
            None => tracker.is_empty(),
        };

        if drained {
            tracing::debug!("emitter shut down, all callbacks finished");
            Ok(())
        } else {
            let err = RuntimeError::GraceExceeded {
                grace,
                pending: tracker.len(),
            };
            tracing::warn!(label = err.as_label(), "{}", err.as_message());
            Err(err)
        }
    }
}

impl<A: Send + Sync + 'static> Observable<A> for Emitter<A> {
    fn add_listener(&self, event: EventType, callback: ListenerFn<A>) -> ListenerId {
        self.register_listener(event, callback, false)
    }

    fn listen_once(&self, event: EventType, callback: ListenerFn<A>) -> ListenerId {
        self.register_listener(event, callback, true)
    }

    fn remove_listener(&self, event: &EventType, id: ListenerId) -> bool {
        Emitter::remove_listener(self, event, id)
    }

    fn add_capturer(&self, callback: CapturerFn<A>) -> CapturerId {
        self.register_capturer(callback)
    }

    fn remove_capturer(&self, id: CapturerId) -> bool {
        Emitter::remove_capturer(self, id)
    }
}

impl<A: Send + Sync + 'static> EventEmitter<A> for Emitter<A> {
    fn emit_event(&self, event: EventType, args: Arc<[A]>) {
        Emitter::emit_event(self, event, args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn args() -> Vec<Value> {
        vec!["test".into(), 123.into(), true.into()]
    }

    fn verify_args(args: &[Value]) {
        assert_eq!(args.len(), 3, "wrong argument count: {args:?}");
        assert_eq!(args[0].as_str(), Some("test"));
        assert_eq!(args[1].as_int(), Some(123));
        assert_eq!(args[2].as_bool(), Some(true));
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn bump(c: &Arc<AtomicUsize>) -> impl Fn(&[Value]) + Send + Sync + 'static {
        let c = Arc::clone(c);
        move |_: &[Value]| {
            c.fetch_add(1, Ordering::SeqCst);
        }
    }

    type Log = Arc<Mutex<Vec<String>>>;

    fn log_to(log: &Log, tag: &str) -> impl Fn(&[Value]) + Send + Sync + 'static {
        let log = Arc::clone(log);
        let tag = tag.to_string();
        move |_: &[Value]| log.lock().unwrap().push(tag.clone())
    }

    /// Drives both modes through the same scenario: listener, once, capturer, removal.
    fn exercise(e: &Emitter<Value>) -> (Arc<AtomicUsize>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let em: Arc<dyn EventEmitter<Value>> = Arc::new(e.clone());
        let ob: Arc<dyn Observable<Value>> = Arc::new(e.clone());

        let (single, listener, capture) = (counter(), counter(), counter());

        let l = Arc::clone(&listener);
        let id = ob.add_listener(
            "test event A".into(),
            Arc::new(move |a: &[Value]| {
                verify_args(a);
                l.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let s = Arc::clone(&single);
        ob.listen_once(
            "test event A".into(),
            Arc::new(move |a: &[Value]| {
                verify_args(a);
                s.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let c = Arc::clone(&capture);
        let cap = ob.add_capturer(Arc::new(move |_: &EventType, a: &[Value]| {
            verify_args(a);
            c.fetch_add(1, Ordering::SeqCst);
        }));

        for ev in ["test event A", "test event B", "test event C", "test event A", "test event A"] {
            em.emit_event(ev.into(), args().into());
        }

        ob.remove_listener(&"test event A".into(), id);
        ob.remove_capturer(cap);

        em.emit_event("Testing 123".into(), vec![Value::from(1)].into());
        em.emit_event("test event A".into(), vec![Value::from(1)].into());
        em.emit_event("Wow".into(), vec![Value::from(2)].into());

        (single, listener, capture)
    }

    #[test]
    fn sync_scenario() {
        let e: Emitter<Value> = Emitter::sync();
        let (single, listener, capture) = exercise(&e);
        assert_eq!(single.load(Ordering::SeqCst), 1);
        assert_eq!(listener.load(Ordering::SeqCst), 3);
        assert_eq!(capture.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_scenario() {
        let e: Emitter<Value> = Emitter::new(DispatchMode::Async).unwrap();
        let (single, listener, capture) = exercise(&e);
        e.drain().await;
        assert_eq!(single.load(Ordering::SeqCst), 1);
        assert_eq!(listener.load(Ordering::SeqCst), 3);
        assert_eq!(capture.load(Ordering::SeqCst), 5);
        assert_eq!(e.in_flight(), 0);
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let e: Emitter<Value> = Emitter::sync();
        let log: Log = Arc::default();
        for tag in ["l1", "l2", "l3", "l4"] {
            e.add_listener("ev", log_to(&log, tag));
        }
        e.emit_event("ev", Vec::new());
        assert_eq!(*log.lock().unwrap(), ["l1", "l2", "l3", "l4"]);
    }

    #[test]
    fn capturers_fire_before_listeners() {
        let e: Emitter<Value> = Emitter::sync();
        let log: Log = Arc::default();

        e.add_listener("ev", log_to(&log, "listener"));
        for tag in ["cap1", "cap2"] {
            let log = Arc::clone(&log);
            e.add_capturer(move |ev: &EventType, _: &[Value]| {
                log.lock().unwrap().push(format!("{tag}:{ev}"));
            });
        }

        e.emit_event("ev", Vec::new());
        assert_eq!(*log.lock().unwrap(), ["cap1:ev", "cap2:ev", "listener"]);
    }

    #[test]
    fn once_fires_exactly_once() {
        let e: Emitter<Value> = Emitter::sync();
        let hits = counter();
        let id = e.listen_once("a", bump(&hits));

        for _ in 0..5 {
            e.emit_event("a", Vec::new());
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(e.listener_count("a"), 0);
        assert!(!e.remove_listener("a", id));
    }

    #[test]
    fn removal_is_idempotent() {
        let e: Emitter<Value> = Emitter::sync();
        let hits = counter();
        let id = e.add_listener("a", bump(&hits));
        let cap = e.add_capturer(|_: &EventType, _: &[Value]| {});

        assert!(e.remove_listener("a", id));
        assert!(!e.remove_listener("a", id));
        assert!(e.remove_capturer(cap));
        assert!(!e.remove_capturer(cap));

        let kept = e.add_listener("a", bump(&hits));
        assert!(!e.remove_listener("other", kept));
        assert!(!e.remove_listener("a", id));

        e.emit_event("a", Vec::new());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn recursive_emit_is_strictly_nested() {
        let e: Emitter<Value> = Emitter::sync();
        let log: Log = Arc::default();

        let inner = e.clone();
        let l = Arc::clone(&log);
        e.add_listener("root", move |_| {
            l.lock().unwrap().push("root:start".into());
            inner.emit_event("sub", vec![Value::from(1), 2.into(), 3.into()]);
            inner.emit_event("sub", vec![Value::from(1), 2.into(), 3.into()]);
            l.lock().unwrap().push("root:end".into());
        });
        e.add_listener("root", log_to(&log, "root:sibling"));

        let l = Arc::clone(&log);
        e.add_listener("sub", move |a: &[Value]| {
            assert_eq!(a.len(), 3);
            l.lock().unwrap().push("sub".into());
        });

        e.emit_event("root", vec![Value::from("test")]);
        assert_eq!(
            *log.lock().unwrap(),
            ["root:start", "sub", "sub", "root:end", "root:sibling"]
        );
    }

    #[test]
    fn recursive_emit_does_not_refire_once() {
        let e: Emitter<Value> = Emitter::sync();
        let hits = counter();
        let inner = e.clone();
        let h = Arc::clone(&hits);
        e.listen_once("a", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            inner.emit_event("a", Vec::new());
        });

        e.emit_event("a", Vec::new());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_added_during_emission_waits_for_next() {
        let e: Emitter<Value> = Emitter::sync();
        let late = counter();

        let inner = e.clone();
        let l = Arc::clone(&late);
        e.listen_once("a", move |_| {
            inner.add_listener("a", bump(&l));
        });

        e.emit_event("a", Vec::new());
        assert_eq!(late.load(Ordering::SeqCst), 0);
        e.emit_event("a", Vec::new());
        assert_eq!(late.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_removed_during_emission_still_gets_it() {
        let e: Emitter<Value> = Emitter::sync();
        let victim_hits = counter();
        let victim_id: Arc<Mutex<Option<ListenerId>>> = Arc::default();

        let inner = e.clone();
        let vid = Arc::clone(&victim_id);
        e.add_listener("a", move |_| {
            if let Some(id) = vid.lock().unwrap().take() {
                assert!(inner.remove_listener("a", id));
            }
        });
        *victim_id.lock().unwrap() = Some(e.add_listener("a", bump(&victim_hits)));

        e.emit_event("a", Vec::new());
        assert_eq!(victim_hits.load(Ordering::SeqCst), 1);
        e.emit_event("a", Vec::new());
        assert_eq!(victim_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_callback_does_not_stop_siblings() {
        let e: Emitter<Value> = Emitter::sync();
        let hits = counter();

        e.add_capturer(|_: &EventType, _: &[Value]| panic!("capturer boom"));
        e.add_listener("a", |_: &[Value]| panic!("listener boom"));
        e.add_listener("a", bump(&hits));

        e.emit_event("a", Vec::new());
        e.emit_event("a", Vec::new());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_panic_is_isolated() {
        let e: Emitter<Value> = Emitter::new(DispatchMode::Async).unwrap();
        let hits = counter();

        e.add_listener("a", |_: &[Value]| panic!("boom"));
        e.add_listener("a", bump(&hits));
        e.emit_event("a", Vec::new());
        e.drain().await;

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arguments_reach_every_callback_intact() {
        let e: Emitter<Value> = Emitter::sync();
        let seen = counter();

        for _ in 0..3 {
            let s = Arc::clone(&seen);
            e.add_listener("e", move |a: &[Value]| {
                verify_args(a);
                s.fetch_add(1, Ordering::SeqCst);
            });
        }
        let s = Arc::clone(&seen);
        e.add_capturer(move |_: &EventType, a: &[Value]| {
            verify_args(a);
            s.fetch_add(1, Ordering::SeqCst);
        });

        e.emit_event("e", args());
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn callbacks_share_one_argument_sequence() {
        let e: Emitter<u32> = Emitter::sync();
        let ptrs: Arc<Mutex<Vec<usize>>> = Arc::default();
        for _ in 0..2 {
            let p = Arc::clone(&ptrs);
            e.add_listener("e", move |a: &[u32]| p.lock().unwrap().push(a.as_ptr() as usize));
        }
        e.emit_event("e", [1u32, 2, 3]);

        let ptrs = ptrs.lock().unwrap();
        assert_eq!(ptrs.len(), 2);
        assert_eq!(ptrs[0], ptrs[1]);
    }

    #[test]
    fn end_to_end() {
        let e: Emitter<Value> = Emitter::sync();
        let (x, y, z) = (counter(), counter(), counter());

        e.add_listener("a", bump(&x));
        let yc = Arc::clone(&y);
        e.add_capturer(move |_: &EventType, _: &[Value]| {
            yc.fetch_add(1, Ordering::SeqCst);
        });
        e.listen_once("a", bump(&z));

        for _ in 0..3 {
            e.emit_event("a", Vec::new());
        }
        e.emit_event("b", Vec::new());

        assert_eq!(z.load(Ordering::SeqCst), 1);
        assert_eq!(x.load(Ordering::SeqCst), 3);
        assert_eq!(y.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn concurrent_registration_and_emission() {
        let e: Emitter<Value> = Emitter::sync();
        let hits = counter();

        thread::scope(|s| {
            for _ in 0..10 {
                s.spawn(|| {
                    e.emit_event("blurp", vec![Value::from(1), 2.into(), 3.into()]);
                    e.emit_event("worst", vec![Value::from(321)]);
                });
            }
            for _ in 0..10 {
                s.spawn(|| {
                    e.add_listener("blurp", |_: &[Value]| {});
                    e.add_capturer(|_: &EventType, _: &[Value]| {});
                });
            }
        });

        assert_eq!(e.listener_count("blurp"), 10);
        assert_eq!(e.capturer_count(), 10);

        // every registration that completed before this emission sees it exactly once
        let c = Arc::clone(&hits);
        e.add_capturer(move |_: &EventType, _: &[Value]| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        for _ in 0..4 {
            e.add_listener("blurp", bump(&hits));
        }
        e.emit_event("blurp", Vec::new());
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn concurrent_once_fires_once() {
        let e: Emitter<Value> = Emitter::sync();
        let hits = counter();
        e.listen_once("race", bump(&hits));

        thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| e.emit_event("race", Vec::new()));
            }
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn async_emit_from_many_tasks() {
        let e: Emitter<Value> = Emitter::new(DispatchMode::Async).unwrap();
        let hits = counter();

        let mut joins = Vec::new();
        for _ in 0..10 {
            let e = e.clone();
            joins.push(tokio::spawn(async move {
                e.emit_event("blurp", vec![Value::from(1), 2.into(), 3.into()]);
                e.emit_event("worst", vec![Value::from(321)]);
            }));
        }
        for _ in 0..10 {
            let e = e.clone();
            joins.push(tokio::spawn(async move {
                e.add_listener("blurp", |_: &[Value]| {});
                e.add_capturer(|_: &EventType, _: &[Value]| {});
            }));
        }
        for j in joins {
            j.await.unwrap();
        }
        e.drain().await;

        e.add_listener("blurp", bump(&hits));
        e.emit_event("blurp", Vec::new());
        e.drain().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(e.listener_count("blurp"), 11);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_emit_returns_before_callbacks_finish() {
        let e: Emitter<Value> = Emitter::new(DispatchMode::Async).unwrap();
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let rx = Arc::new(Mutex::new(rx));
        let done = counter();

        let d = Arc::clone(&done);
        e.add_listener("slow", move |_| {
            let _ = rx.lock().unwrap().recv();
            d.fetch_add(1, Ordering::SeqCst);
        });

        e.emit_event("slow", Vec::new());
        assert_eq!(done.load(Ordering::SeqCst), 0);
        tx.send(()).unwrap();
        e.drain().await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_recursive_emit_fires_new_wave() {
        let e: Emitter<Value> = Emitter::new(DispatchMode::Async).unwrap();
        let sub = counter();

        let inner = e.clone();
        e.add_listener("root", move |_| {
            inner.emit_event("sub", vec![Value::from(1)]);
            inner.emit_event("sub", vec![Value::from(2)]);
        });
        e.add_listener("sub", bump(&sub));

        e.emit_event("root", Vec::new());
        // the nested wave is spawned by the root callback, so wait until it settles
        for _ in 0..50 {
            e.drain().await;
            if sub.load(Ordering::SeqCst) == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(sub.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn async_without_runtime_fails() {
        let err = Emitter::<Value>::new(DispatchMode::Async).unwrap_err();
        assert!(matches!(err, RuntimeError::NoRuntime));
    }

    #[test]
    fn async_with_explicit_runtime() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let e: Emitter<Value> = Emitter::builder()
            .mode(DispatchMode::Async)
            .runtime(rt.handle().clone())
            .build()
            .unwrap();
        let hits = counter();
        e.add_listener("a", bump(&hits));

        e.emit_event("a", Vec::new());
        rt.block_on(e.drain());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shutdown_reports_stuck_callbacks() {
        let e: Emitter<Value> = Emitter::builder()
            .mode(DispatchMode::Async)
            .grace(Duration::from_millis(50))
            .build()
            .unwrap();
        let hits = counter();

        e.add_listener("slow", |_: &[Value]| thread::sleep(Duration::from_millis(400)));
        e.add_listener("fast", bump(&hits));
        e.emit_event("slow", Vec::new());

        let err = e.shutdown().await.unwrap_err();
        assert!(matches!(err, RuntimeError::GraceExceeded { pending: 1, .. }));
        assert!(e.is_shut_down());

        e.emit_event("fast", Vec::new());
        e.drain().await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(e.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shutdown_within_grace() {
        let e: Emitter<Value> = Emitter::new(DispatchMode::Async).unwrap();
        let hits = counter();
        e.add_listener("a", bump(&hits));
        e.emit_event("a", Vec::new());

        e.shutdown().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn sync_shutdown_drops_later_emissions() {
        let e: Emitter<Value> = Emitter::sync();
        let hits = counter();
        e.add_listener("a", bump(&hits));

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(e.shutdown()).unwrap();

        e.emit_event("a", Vec::new());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(e.in_flight(), 0);
    }

    #[test]
    fn introspection() {
        let e: Emitter<Value> = Emitter::default();
        assert_eq!(e.mode(), DispatchMode::Sync);
        e.add_listener("b", |_: &[Value]| {});
        e.add_listener("a", |_: &[Value]| {});
        e.add_listener("a", |_: &[Value]| {});

        assert_eq!(e.event_types(), vec![EventType::from("a"), EventType::from("b")]);
        assert_eq!(e.listener_count("a"), 2);
        assert_eq!(e.remove_all_listeners("a"), 2);
        assert_eq!(e.listener_count("a"), 0);
        assert!(format!("{e:?}").contains("Sync"));
    }
}
