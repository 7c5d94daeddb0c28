//! # Emitter configuration.
//!
//! Provides [`EmitterConfig`], the settings fixed when an emitter is built.
//!
//! Config is used in two ways:
//! 1. **Direct construction**: `Emitter::with_config(config)`
//! 2. **Builder**: `Emitter::builder().mode(..).grace(..).build()`
//!
//! ## Sentinel values
//! - `grace = 0s` → `shutdown()` does not wait for in-flight callbacks
//! - `runtime = None` → the ambient tokio runtime is captured at construction (async mode only)

use std::time::Duration;

use tokio::runtime::Handle;

/// How an emitter delivers an emission to its callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Callbacks run inline on the emitting caller's stack, one after another.
    ///
    /// `emit_event` returns after every callback (and nested emission) completes.
    #[default]
    Sync,
    /// Each callback runs as an independent task; `emit_event` returns immediately.
    Async,
}

/// Configuration of one emitter instance.
///
/// ## Field semantics
/// - `mode`: dispatch strategy, fixed for the emitter's lifetime
/// - `grace`: how long `shutdown()` waits for in-flight async callbacks (`0s` = no wait)
/// - `runtime`: tokio runtime that runs async callbacks (`None` = current runtime)
#[derive(Clone, Debug)]
pub struct EmitterConfig {
    /// Dispatch strategy.
    pub mode: DispatchMode,

    /// Maximum time `shutdown()` waits for in-flight callbacks.
    ///
    /// Callbacks are never cancelled. If they outlive the grace period,
    /// `shutdown()` returns `RuntimeError::GraceExceeded` and they keep running.
    pub grace: Duration,

    /// Runtime used to spawn async callbacks.
    ///
    /// Ignored in [`DispatchMode::Sync`].
    pub runtime: Option<Handle>,
}

impl EmitterConfig {
    /// Config for the given mode with every other field defaulted.
    pub fn with_mode(mode: DispatchMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Returns the shutdown grace window as an `Option`.
    ///
    /// - `None` → do not wait
    /// - `Some(d)` → wait up to `d`
    #[inline]
    pub fn grace_window(&self) -> Option<Duration> {
        if self.grace.is_zero() {
            None
        } else {
            Some(self.grace)
        }
    }
}

impl Default for EmitterConfig {
    /// Default configuration:
    ///
    /// - `mode = DispatchMode::Sync`
    /// - `grace = 5s`
    /// - `runtime = None`
    fn default() -> Self {
        Self {
            mode: DispatchMode::Sync,
            grace: Duration::from_secs(5),
            runtime: None,
        }
    }
}
