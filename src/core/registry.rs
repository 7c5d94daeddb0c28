//! # Callback registry.
//!
//! Registry owns every listener and capturer of one emitter:
//! - `listeners`: `EventType → Vec<entry>` in registration order
//! - `capturers`: `Vec<entry>` in registration order
//!
//! ## Architecture
//! ```text
//! add_listener / listen_once ──► lock ─► listeners[ev].push(entry)
//! add_capturer              ──► lock ─► capturers.push(entry)
//! remove_*                  ──► lock ─► retain(id != token)       (no-op if absent)
//! snapshot(ev)              ──► lock ─► clone capturers + listeners[ev]
//!                                       claim one-shot entries (removed here)
//! ```
//!
//! ## Rules
//! - One mutex guards the whole state; it is never held while a callback runs
//! - Removal keeps the relative order of the remaining entries
//! - Empty listener sequences are dropped from the map
//! - One-shot entries leave the registry in the same critical section that
//!   hands them to a dispatch, so no other emission can see them again

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::events::{CapturerId, EventType, IdSeq, ListenerId};
use crate::observers::{CapturerFn, ListenerFn};

/// Listener bound to one event.
struct ListenerEntry<A> {
    id: ListenerId,
    callback: ListenerFn<A>,
    once: bool,
}

/// Capturer bound to every event.
struct CapturerEntry<A> {
    id: CapturerId,
    callback: CapturerFn<A>,
}

struct State<A> {
    listeners: HashMap<EventType, Vec<ListenerEntry<A>>>,
    capturers: Vec<CapturerEntry<A>>,
}

/// Callbacks selected for one emission, in invocation order.
pub(crate) struct Snapshot<A> {
    pub(crate) capturers: Vec<(CapturerId, CapturerFn<A>)>,
    pub(crate) listeners: Vec<(ListenerId, ListenerFn<A>)>,
}

impl<A> Snapshot<A> {
    pub(crate) fn is_empty(&self) -> bool {
        self.capturers.is_empty() && self.listeners.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.capturers.len() + self.listeners.len()
    }
}

/// Thread-safe store of listeners and capturers.
pub(crate) struct Registry<A> {
    state: Mutex<State<A>>,
    ids: IdSeq,
}

impl<A> Registry<A> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                listeners: HashMap::new(),
                capturers: Vec::new(),
            }),
            ids: IdSeq::new(),
        }
    }

    /// No user code runs under the lock, so a poisoned guard still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, State<A>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add_listener(
        &self,
        event: EventType,
        callback: ListenerFn<A>,
        once: bool,
    ) -> ListenerId {
        let id = self.ids.next_listener();
        self.lock()
            .listeners
            .entry(event)
            .or_default()
            .push(ListenerEntry { id, callback, once });
        id
    }

    pub(crate) fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        let mut state = self.lock();
        let Some(seq) = state.listeners.get_mut(event) else {
            return false;
        };
        let before = seq.len();
        seq.retain(|e| e.id != id);
        let removed = seq.len() != before;
        if seq.is_empty() {
            state.listeners.remove(event);
        }
        removed
    }

    pub(crate) fn remove_all_listeners(&self, event: &str) -> usize {
        self.lock()
            .listeners
            .remove(event)
            .map_or(0, |seq| seq.len())
    }

    pub(crate) fn add_capturer(&self, callback: CapturerFn<A>) -> CapturerId {
        let id = self.ids.next_capturer();
        self.lock().capturers.push(CapturerEntry { id, callback });
        id
    }

    pub(crate) fn remove_capturer(&self, id: CapturerId) -> bool {
        let mut state = self.lock();
        let before = state.capturers.len();
        state.capturers.retain(|e| e.id != id);
        state.capturers.len() != before
    }

    /// Takes the callbacks for one emission of `event` and claims its one-shot listeners.
    pub(crate) fn snapshot(&self, event: &EventType) -> Snapshot<A> {
        let mut state = self.lock();

        let capturers = state
            .capturers
            .iter()
            .map(|e| (e.id, e.callback.clone()))
            .collect();

        let mut listeners = Vec::new();
        if let Some(seq) = state.listeners.get_mut(event) {
            listeners.reserve(seq.len());
            listeners.extend(seq.iter().map(|e| (e.id, e.callback.clone())));
            seq.retain(|e| !e.once);
            if seq.is_empty() {
                state.listeners.remove(event);
            }
        }

        Snapshot {
            capturers,
            listeners,
        }
    }

    pub(crate) fn listener_count(&self, event: &str) -> usize {
        self.lock().listeners.get(event).map_or(0, Vec::len)
    }

    pub(crate) fn capturer_count(&self) -> usize {
        self.lock().capturers.len()
    }

    /// Returns sorted list of events with at least one listener.
    pub(crate) fn event_types(&self) -> Vec<EventType> {
        let state = self.lock();
        let mut keys: Vec<EventType> = state.listeners.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }
}
