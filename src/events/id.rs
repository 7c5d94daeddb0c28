//! Identity tokens returned by registration.
//!
//! Tokens come from one per-emitter counter that only grows, so a token is
//! never handed out twice by the same [`Emitter`](crate::Emitter). Removing with
//! a stale or foreign token is always a harmless no-op.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Token identifying a registered capturer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapturerId(u64);

impl ListenerId {
    /// Raw sequence value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl CapturerId {
    /// Raw sequence value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

impl fmt::Display for CapturerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capturer#{}", self.0)
    }
}

/// Monotonic token source owned by one emitter.
#[derive(Debug)]
pub(crate) struct IdSeq(AtomicU64);

impl IdSeq {
    pub(crate) fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn next_listener(&self) -> ListenerId {
        ListenerId(self.bump())
    }

    pub(crate) fn next_capturer(&self) -> CapturerId {
        CapturerId(self.bump())
    }
}
