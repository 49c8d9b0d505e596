//! Callback-plus-context pairs invoked during notification fan-out.
//!
//! An [`Observer`] binds a dispatch callback to a [`ContextId`], the identity
//! of the object the callback will re-enter. The context relationship is
//! strictly non-owning: an observer holds an address-derived token, and the
//! callback itself captures at most a `Weak` handle to its target. Observers
//! must never be the reason a mediator or controller outlives its
//! registration.
//!
//! # Invariants
//!
//! 1. At most one observer per context may sit in any one observer list;
//!    removal by context therefore removes at most one entry.
//! 2. A context whose target has been dropped compares as "no match" during
//!    removal and is a silent skip during dispatch — never an error.

use std::sync::Arc;

use crate::notification::Notification;

/// Opaque identity token for an observer's notify context.
///
/// Derived from the data-pointer address of the `Arc` holding the target, so
/// two handles to the same allocation compare equal while handles to distinct
/// targets never do. The token carries no ownership; it is only meaningful
/// while the target is registered somewhere that keeps it alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

impl ContextId {
    /// Identity token for the target behind `handle`.
    #[must_use]
    pub fn of<T: ?Sized>(handle: &Arc<T>) -> Self {
        Self(Arc::as_ptr(handle) as *const () as usize)
    }

    /// Identity token for a target reached by plain reference.
    ///
    /// Equal to [`ContextId::of`] for any reference borrowed out of the
    /// same `Arc`.
    #[must_use]
    pub fn of_ref<T: ?Sized>(target: &T) -> Self {
        Self(core::ptr::from_ref(target) as *const () as usize)
    }
}

type NotifyFn = Arc<dyn Fn(&Notification) + Send + Sync>;

/// A (callback, context) pair registered in a view's observer list.
pub struct Observer {
    notify: NotifyFn,
    context: ContextId,
}

impl Observer {
    /// Build an observer around a dispatch callback.
    ///
    /// The callback should capture its target weakly and treat a failed
    /// upgrade as "nothing to do".
    pub fn new(context: ContextId, notify: impl Fn(&Notification) + Send + Sync + 'static) -> Self {
        Self {
            notify: Arc::new(notify),
            context,
        }
    }

    /// Invoke the callback with a notification.
    pub fn notify(&self, note: &Notification) {
        (self.notify)(note);
    }

    /// Whether this observer was registered on behalf of `context`.
    #[must_use]
    pub fn compare_context(&self, context: ContextId) -> bool {
        self.context == context
    }
}

impl Clone for Observer {
    fn clone(&self) -> Self {
        Self {
            notify: Arc::clone(&self.notify),
            context: self.context,
        }
    }
}

impl core::fmt::Debug for Observer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observer")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
