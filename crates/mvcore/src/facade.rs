//! The single entry point host applications talk to.
//!
//! A `Facade` aggregates one core's [`Model`], [`View`], and [`Controller`]
//! behind a unified API. It carries no state of its own beyond the core key
//! and the three actor references: every registration and lookup is a
//! pass-through, and the only operation it adds is
//! [`Facade::send_notification`] — the one place notifications are
//! constructed on a sender's behalf.
//!
//! Construction resolves the model, then the controller, then the view, in
//! that fixed order. Controller construction itself resolves the view for
//! the same key (commands need somewhere to hang relay observers), so the
//! view may already exist by the time the facade asks for it — the
//! get-instance calls are idempotent either way.

use std::sync::Arc;

use crate::command::Command;
use crate::mediator::Mediator;
use crate::model::Model;
use crate::notification::{Body, Notification};
use crate::proxy::Proxy;
use crate::registry::{self, CoreRegistry};
use crate::view::View;

use crate::controller::Controller;

/// A core's aggregated public surface.
pub struct Facade {
    key: Arc<str>,
    model: Arc<Model>,
    view: Arc<View>,
    controller: Arc<Controller>,
}

impl Facade {
    /// Plain constructor: resolves (creating on demand) the core's model,
    /// controller, and view. Does not claim the key; use
    /// [`Facade::get_instance`] or [`Facade::install`] for that.
    #[must_use]
    pub fn new(cores: &CoreRegistry, key: &str) -> Self {
        let model = Model::get_instance(cores, key, || Model::new(cores, key));
        let controller = Controller::get_instance(cores, key, || Controller::new(cores, key));
        let view = View::get_instance(cores, key, || View::new(cores, key));
        Self {
            key: Arc::from(key),
            model,
            view,
            controller,
        }
    }

    /// Multiton factory: the facade for `key`, built via `factory` on first
    /// request. Atomic check-and-set, same contract as
    /// [`Model::get_instance`].
    pub fn get_instance(
        cores: &CoreRegistry,
        key: &str,
        factory: impl FnOnce() -> Facade,
    ) -> Arc<Facade> {
        registry::get_or_insert(&cores.cores.facades, key, || {
            let facade = factory();
            assert_eq!(facade.key(), key, "facade factory produced a mismatched key");
            Arc::new(facade)
        })
    }

    /// Claim `facade`'s key unconditionally.
    ///
    /// # Panics
    ///
    /// Panics if a facade for that key is already registered.
    pub fn install(cores: &CoreRegistry, facade: Facade) -> Arc<Facade> {
        let key = Arc::clone(&facade.key);
        registry::install(&cores.cores.facades, &key, Arc::new(facade), "Facade")
    }

    /// Whether a core is registered under `key`.
    #[must_use]
    pub fn has_core(cores: &CoreRegistry, key: &str) -> bool {
        cores.has_core(key)
    }

    /// Remove the entire core for `key`: model, view, controller, and
    /// facade, with no residual registry entries.
    pub fn remove_core(cores: &CoreRegistry, key: &str) {
        cores.remove_core(key);
    }

    /// This facade's core key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The core's model.
    #[must_use]
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// The core's view.
    #[must_use]
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// The core's controller.
    #[must_use]
    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    // ── Proxy pass-throughs ─────────────────────────────────────────

    /// See [`Model::register_proxy`].
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) {
        self.model.register_proxy(proxy);
    }

    /// See [`Model::retrieve_proxy`].
    #[must_use]
    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.model.retrieve_proxy(name)
    }

    /// See [`Model::has_proxy`].
    #[must_use]
    pub fn has_proxy(&self, name: &str) -> bool {
        self.model.has_proxy(name)
    }

    /// See [`Model::remove_proxy`].
    pub fn remove_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.model.remove_proxy(name)
    }

    // ── Mediator pass-throughs ──────────────────────────────────────

    /// See [`View::register_mediator`].
    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) {
        self.view.register_mediator(mediator);
    }

    /// See [`View::retrieve_mediator`].
    #[must_use]
    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.view.retrieve_mediator(name)
    }

    /// See [`View::has_mediator`].
    #[must_use]
    pub fn has_mediator(&self, name: &str) -> bool {
        self.view.has_mediator(name)
    }

    /// See [`View::remove_mediator`].
    pub fn remove_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.view.remove_mediator(name)
    }

    // ── Command pass-throughs ───────────────────────────────────────

    /// See [`Controller::register_command`].
    pub fn register_command(
        &self,
        name: &str,
        factory: impl Fn() -> Box<dyn Command> + Send + Sync + 'static,
    ) {
        self.controller.register_command(name, factory);
    }

    /// See [`Controller::has_command`].
    #[must_use]
    pub fn has_command(&self, name: &str) -> bool {
        self.controller.has_command(name)
    }

    /// See [`Controller::remove_command`].
    pub fn remove_command(&self, name: &str) {
        self.controller.remove_command(name);
    }

    // ── Messaging ───────────────────────────────────────────────────

    /// Build a [`Notification`] from the parts and broadcast it through the
    /// core's view. This is the convenience senders normally use instead of
    /// constructing notifications themselves.
    pub fn send_notification(&self, name: &str, body: Option<Body>, kind: Option<&str>) {
        self.notify_observers(&Notification::with_parts(name, body, kind.map(str::to_owned)));
    }

    /// Broadcast a pre-built notification. Public so senders with custom
    /// construction needs can still dispatch through the facade.
    pub fn notify_observers(&self, note: &Notification) {
        self.view.notify_observers(note);
    }
}

impl core::fmt::Debug for Facade {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Facade").field("key", &self.key).finish()
    }
}
