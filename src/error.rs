//! Error types used by the emitter runtime and by callback isolation.
//!
//! This module defines two enums:
//!
//! - [`RuntimeError`] — errors raised while constructing or shutting down an [`Emitter`](crate::Emitter).
//! - [`CallbackError`] — failures of individual callback invocations.
//!
//! Registration, removal and emission never fail. A [`CallbackError`] is never
//! returned to the emitting caller; it is only reported through `tracing`.
//! Both types provide helper methods (`as_label`, `as_message`) for logs/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::events::EventType;

/// # Errors produced by the emitter runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Asynchronous dispatch was requested but no tokio runtime was available
    /// (neither an explicit handle in the config nor an ambient runtime).
    #[error("async dispatch requires a tokio runtime, none found")]
    NoRuntime,

    /// Shutdown grace period elapsed while some callbacks were still running.
    #[error("shutdown grace {grace:?} exceeded; {pending} callback(s) still running")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Callback tasks still in flight when the grace period elapsed.
        pending: usize,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), pending: 2 };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NoRuntime => "runtime_missing",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::NoRuntime => "no tokio runtime for async dispatch".to_string(),
            RuntimeError::GraceExceeded { grace, pending } => {
                format!("grace exceeded after {grace:?}; pending callbacks={pending}")
            }
        }
    }
}

/// # Failures of a single callback invocation.
///
/// Produced by the isolation boundary around every listener/capturer call and
/// handed to the logging channel. The emission that triggered it carries on.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CallbackError {
    /// The callback panicked.
    #[error("callback {token} panicked on {event}: {info}")]
    Panicked {
        /// Event being dispatched.
        event: EventType,
        /// Display form of the callback's identity token.
        token: String,
        /// Panic payload rendered as text.
        info: String,
    },
}

impl CallbackError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::{CallbackError, EventType};
    ///
    /// let err = CallbackError::Panicked {
    ///     event: EventType::from("saved"),
    ///     token: "listener#3".into(),
    ///     info: "boom".into(),
    /// };
    /// assert_eq!(err.as_label(), "callback_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CallbackError::Panicked { .. } => "callback_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallbackError::Panicked { info, .. } => format!("panic: {info}"),
        }
    }
}
