//! The capability that lets any actor reach its facade and send
//! notifications.
//!
//! Proxies, mediators, and commands all need to broadcast. Rather than hand
//! each of them a facade reference up front, the framework assigns a
//! [`NotifierContext`] — the owning registry plus core key — at the moment
//! the actor joins a core: a proxy when registered with the Model, a
//! mediator when registered with the View, a command when the Controller
//! executes it. Until that moment the actor cannot reach a facade, and
//! trying is a fail-fast panic rather than a silent misroute.
//!
//! Host actors embed a [`Notifier`] and delegate their
//! `initialize_notifier` trait method to [`Notifier::initialize`]. The
//! context slot is an [`ArcSwapOption`], so reads on the send path are
//! lock-free and re-registration into a different core simply swaps the
//! context.

use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;

use crate::facade::Facade;
use crate::notification::Body;
use crate::registry::{self, CoreRegistry, Cores};

/// An actor's link to its owning core: registry handle plus core key.
///
/// The registry is held weakly; a notifier never keeps an arena alive.
#[derive(Clone)]
pub struct NotifierContext {
    cores: Weak<Cores>,
    key: Arc<str>,
}

impl NotifierContext {
    pub(crate) fn new(cores: Weak<Cores>, key: Arc<str>) -> Self {
        Self { cores, key }
    }

    /// The core key this context is scoped to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn registry(&self) -> CoreRegistry {
        registry::upgrade(&self.cores)
    }

    /// Resolve the facade for this context's core, constructing the core's
    /// facade (and with it the model, controller, and view) on first use.
    #[must_use]
    pub fn facade(&self) -> Arc<Facade> {
        let cores = self.registry();
        Facade::get_instance(&cores, &self.key, || Facade::new(&cores, &self.key))
    }
}

impl core::fmt::Debug for NotifierContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotifierContext")
            .field("key", &self.key)
            .finish()
    }
}

/// Embeddable send capability, lazily bound to a core.
#[derive(Default)]
pub struct Notifier {
    ctx: ArcSwapOption<NotifierContext>,
}

impl Notifier {
    /// A notifier with no context yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or rebind) this notifier to a core.
    ///
    /// Called by the framework when the owning actor is registered or
    /// executed; hosts normally never call it directly.
    pub fn initialize(&self, ctx: NotifierContext) {
        self.ctx.store(Some(Arc::new(ctx)));
    }

    /// Whether a core has claimed this notifier yet.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.ctx.load().is_some()
    }

    /// The bound context, if any.
    #[must_use]
    pub fn try_context(&self) -> Option<Arc<NotifierContext>> {
        self.ctx.load_full()
    }

    /// The bound context.
    ///
    /// # Panics
    ///
    /// Panics when no core has claimed this notifier yet. Actors cannot
    /// reach their facade from their constructors; the context arrives only
    /// at registration/execution time.
    #[must_use]
    pub fn context(&self) -> Arc<NotifierContext> {
        self.try_context()
            .expect("notifier not yet initialized: no core has claimed this actor")
    }

    /// The owning core's key.
    ///
    /// # Panics
    ///
    /// Panics when the notifier is uninitialized.
    #[must_use]
    pub fn key(&self) -> Arc<str> {
        Arc::clone(&self.context().key)
    }

    /// The owning core's facade, resolved (and created if need be) on each
    /// call.
    ///
    /// # Panics
    ///
    /// Panics when the notifier is uninitialized.
    #[must_use]
    pub fn facade(&self) -> Arc<Facade> {
        self.context().facade()
    }

    /// Build and broadcast a [`Notification`](crate::Notification) through
    /// the owning core's view.
    ///
    /// # Panics
    ///
    /// Panics when the notifier is uninitialized.
    pub fn send_notification(&self, name: &str, body: Option<Body>, kind: Option<&str>) {
        self.facade().send_notification(name, body, kind);
    }
}

impl core::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Notifier")
            .field("key", &self.try_context().map(|ctx| ctx.key.to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        let notifier = Notifier::new();
        assert!(!notifier.is_initialized());
        assert!(notifier.try_context().is_none());
    }

    #[test]
    #[should_panic(expected = "not yet initialized")]
    fn context_before_initialize_panics() {
        let _ = Notifier::new().context();
    }

    #[test]
    fn initialize_binds_key() {
        let cores = CoreRegistry::new();
        let notifier = Notifier::new();
        notifier.initialize(NotifierContext::new(cores.downgrade(), Arc::from("app")));
        assert!(notifier.is_initialized());
        assert_eq!(&*notifier.key(), "app");
    }

    #[test]
    fn rebinding_swaps_the_core() {
        let cores = CoreRegistry::new();
        let notifier = Notifier::new();
        notifier.initialize(NotifierContext::new(cores.downgrade(), Arc::from("a")));
        notifier.initialize(NotifierContext::new(cores.downgrade(), Arc::from("b")));
        assert_eq!(&*notifier.key(), "b");
    }

    #[test]
    fn facade_is_created_on_demand() {
        let cores = CoreRegistry::new();
        let notifier = Notifier::new();
        notifier.initialize(NotifierContext::new(cores.downgrade(), Arc::from("lazy")));
        assert!(!cores.has_core("lazy"));
        let facade = notifier.facade();
        assert!(cores.has_core("lazy"));
        assert!(Arc::ptr_eq(&facade, &notifier.facade()));
    }
}
