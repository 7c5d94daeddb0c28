use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::RuntimeError;

use super::config::{DispatchMode, EmitterConfig};
use super::emitter::Emitter;

/// Builder for constructing an [`Emitter`] with non-default settings.
#[derive(Debug, Default)]
pub struct EmitterBuilder {
    cfg: EmitterConfig,
}

impl EmitterBuilder {
    /// Creates a new builder with [`EmitterConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(cfg: EmitterConfig) -> Self {
        Self { cfg }
    }

    /// Sets the dispatch mode.
    pub fn mode(mut self, mode: DispatchMode) -> Self {
        self.cfg.mode = mode;
        self
    }

    /// Sets how long `shutdown()` waits for in-flight callbacks.
    pub fn grace(mut self, grace: Duration) -> Self {
        self.cfg.grace = grace;
        self
    }

    /// Runs async callbacks on `handle` instead of the ambient runtime.
    ///
    /// Lets an async emitter be built (and used) from outside the runtime.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.cfg.runtime = Some(handle);
        self
    }

    /// Builds the emitter.
    ///
    /// Fails only in async mode, when no runtime was given and none is current.
    pub fn build<A: Send + Sync + 'static>(self) -> Result<Emitter<A>, RuntimeError> {
        Emitter::with_config(self.cfg)
    }
}
