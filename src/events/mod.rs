//! Event data model: keys, identity tokens and argument values.
//!
//! ## Contents
//! - [`EventType`] opaque event key (exact string equality)
//! - [`ListenerId`], [`CapturerId`] registration tokens used for removal
//! - [`Value`] tagged union for dynamically typed argument lists
//!
//! The dispatcher treats arguments as opaque: it neither validates nor copies
//! them. One emission shares a single `Arc<[A]>` across all of its callbacks.

mod event;
mod id;
mod value;

pub use event::EventType;
pub(crate) use id::IdSeq;
pub use id::{CapturerId, ListenerId};
pub use value::Value;
