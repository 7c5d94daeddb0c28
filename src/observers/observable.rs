//! # Registration surface.

use crate::events::{CapturerId, EventType, ListenerId};

use super::{CapturerFn, ListenerFn};

/// Contract for registering and removing callbacks.
///
/// ### Rules
/// - Registration never fails and always returns a fresh token.
/// - Removal is idempotent: unknown or already removed tokens are a no-op
///   (the returned `bool` only reports whether something was removed).
/// - Registering has no retroactive effect: past events are not replayed.
pub trait Observable<A>: Send + Sync {
    /// Appends `callback` to the listeners of `event`.
    fn add_listener(&self, event: EventType, callback: ListenerFn<A>) -> ListenerId;

    /// Like [`add_listener`](Self::add_listener), but the entry is removed
    /// when it is first dispatched, so it fires at most once.
    fn listen_once(&self, event: EventType, callback: ListenerFn<A>) -> ListenerId;

    /// Removes a listener of `event`.
    fn remove_listener(&self, event: &EventType, id: ListenerId) -> bool;

    /// Appends a capturer; it observes every emitted event.
    fn add_capturer(&self, callback: CapturerFn<A>) -> CapturerId;

    /// Removes a capturer.
    fn remove_capturer(&self, id: CapturerId) -> bool;
}
