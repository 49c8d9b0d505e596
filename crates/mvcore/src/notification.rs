//! The message value object broadcast through the observer bus.
//!
//! A [`Notification`] is a named, ephemeral message. The name is fixed at
//! construction and is the sole dispatch key; the body and kind are optional
//! and writable, so a sender may rework a notification before re-sending it.
//!
//! # Invariants
//!
//! 1. The name never changes after construction.
//! 2. The framework never reads or mutates the body; it is an opaque payload
//!    whose typing is entirely the host's concern.
//! 3. Dispatch is synchronous, so a notification is free for collection as
//!    soon as the send that carried it returns (unless a handler kept the
//!    body alive — the body is shared, the notification is not).
//!
//! # Body typing
//!
//! The body is `Arc<dyn Any + Send + Sync>`. A handler that wants to write
//! results back into the payload puts interior mutability *inside* its own
//! payload type (e.g. `Arc<Mutex<MyVo>>`), because handlers receive the
//! notification by shared reference.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

/// Opaque notification payload.
///
/// Shared so that a sender and every handler can hold it concurrently.
pub type Body = Arc<dyn Any + Send + Sync>;

/// A named message carried through [`View::notify_observers`](crate::View::notify_observers).
pub struct Notification {
    name: String,
    body: Option<Body>,
    kind: Option<String>,
}

impl Notification {
    /// Create a notification with no body and no kind.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: None,
            kind: None,
        }
    }

    /// Create a notification carrying a body.
    #[must_use]
    pub fn with_body(name: impl Into<String>, body: Body) -> Self {
        Self {
            name: name.into(),
            body: Some(body),
            kind: None,
        }
    }

    /// Create a notification from all three parts.
    #[must_use]
    pub fn with_parts(name: impl Into<String>, body: Option<Body>, kind: Option<String>) -> Self {
        Self {
            name: name.into(),
            body,
            kind,
        }
    }

    /// The dispatch name. Immutable for the life of the notification.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw body payload, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Downcast the body to a concrete type.
    ///
    /// Returns `None` when there is no body or the body is of another type;
    /// a mismatch is the host's affair, never a framework error.
    #[must_use]
    pub fn body_as<T: 'static>(&self) -> Option<&T> {
        self.body.as_deref().and_then(|body| body.downcast_ref())
    }

    /// The optional kind discriminator.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Replace the body. Senders may mutate before re-sending.
    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    /// Replace the kind.
    pub fn set_kind(&mut self, kind: Option<String>) {
        self.kind = kind;
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("name", &self.name)
            .field("has_body", &self.body.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Notification[{}", self.name)?;
        if self.body.is_some() {
            write!(f, " +body")?;
        }
        if let Some(kind) = &self.kind {
            write!(f, " kind={kind}")?;
        }
        write!(f, "]")
    }
}
