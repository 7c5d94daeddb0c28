//! # Emit surface.

use std::sync::Arc;

use crate::events::EventType;

/// Contract for publishing events.
///
/// Emission never fails: events without listeners only reach capturers,
/// and callback failures are isolated from the caller.
pub trait EventEmitter<A>: Send + Sync {
    /// Delivers `args` to every capturer, then to every listener of `event`.
    ///
    /// All callbacks of one emission borrow the same argument sequence.
    fn emit_event(&self, event: EventType, args: Arc<[A]>);
}
