//! Emitter core: registry, dispatch strategies and the public handle.
//!
//! The only public API from this module is [`Emitter`] with its
//! configuration types ([`EmitterConfig`], [`DispatchMode`], [`EmitterBuilder`]).
//!
//! Internal modules:
//! - [`registry`]: listener/capturer storage, snapshots and one-shot claiming;
//! - [`dispatch`]: sync inline calls vs. tracked background tasks, panic isolation;
//! - [`emitter`]: the handle tying both together, plus drain/shutdown;
//! - [`config`], [`builder`]: construction-time settings.

mod builder;
mod config;
mod dispatch;
mod emitter;
mod registry;

pub use builder::EmitterBuilder;
pub use config::{DispatchMode, EmitterConfig};
pub use emitter::Emitter;
