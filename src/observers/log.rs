//! # LogWriter — capturer that records every emission
//!
//! A minimal capturer that writes each emitted event through `tracing`.
//! Use it for tests, demos, or to eyeball traffic while debugging.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! INFO eventvisor::emit: event emitted event=user.saved args=[Str("ada"), Int(3)]
//! INFO eventvisor::emit: event emitted event=shutdown args=[]
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use crate::core::Emitter;
use crate::events::{CapturerId, EventType};

use super::CapturerFn;

/// Event writer capturer.
#[derive(Debug, Clone, Default)]
pub struct LogWriter {
    label: Option<&'static str>,
}

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self { label: None }
    }

    /// Tags every record with `label` (useful with several emitters).
    #[must_use]
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Turns the writer into a capturer callback.
    pub fn into_capturer<A: Debug + Send + Sync + 'static>(self) -> CapturerFn<A> {
        let label = self.label.unwrap_or("emitter");
        Arc::new(move |event: &EventType, args: &[A]| {
            tracing::info!(
                target: "eventvisor::emit",
                emitter = label,
                event = %event,
                args = ?args,
                "event emitted"
            );
        })
    }

    /// Registers the writer as a capturer on `emitter`.
    pub fn install<A: Debug + Send + Sync + 'static>(self, emitter: &Emitter<A>) -> CapturerId {
        emitter.register_capturer(self.into_capturer())
    }
}
