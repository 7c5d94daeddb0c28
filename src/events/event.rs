//! # Event keys.
//!
//! [`EventType`] names an event channel. It is an opaque, comparable string
//! token: two keys match only when their text is exactly equal. There is no
//! wildcard or pattern syntax inside a key; "listen to everything" is the job
//! of a capturer, not of a special key.
//!
//! ## Example
//! ```rust
//! use eventvisor::EventType;
//!
//! let a = EventType::from("user.saved");
//! let b = EventType::from(String::from("user.saved"));
//!
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "user.saved");
//! assert_ne!(a, EventType::from("user.*"));
//! ```

use std::borrow::{Borrow, Cow};
use std::fmt;

/// Opaque identifier of an event channel.
///
/// Cheap to build from `&'static str` (no allocation); owned strings are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(Cow<'static, str>);

impl EventType {
    /// Creates a new event key.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the key text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for EventType {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&EventType> for EventType {
    fn from(ev: &EventType) -> Self {
        ev.clone()
    }
}

impl Borrow<str> for EventType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EventType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
