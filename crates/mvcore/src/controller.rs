//! Per-core mapping of notification names to command factories.
//!
//! The `Controller` follows the command-and-controller strategy: it
//! remembers which command handles which notification name, registers
//! itself (through one relay observer per name) with the view, and builds a
//! fresh command instance for every execution. Commands are never cached —
//! holding factories instead of instances keeps commands per-invocation and
//! stateless across dispatches.
//!
//! # Invariants
//!
//! 1. The relay observer for a name is installed exactly once: on the first
//!    registration for that name. Re-registering replaces which command
//!    runs without adding a duplicate dispatch path.
//! 2. Executing a name with no registered factory is a silent no-op.
//! 3. Removing a name removes both the factory and its relay observer;
//!    removing an unregistered name is a no-op.
//! 4. Relays hold no strong controller handle; once the controller leaves
//!    the registry a lingering relay is skipped, never an error.

use std::sync::{Arc, RwLock, Weak};

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::command::{Command, CommandFactory};
use crate::notification::Notification;
use crate::notifier::NotifierContext;
use crate::observer::{ContextId, Observer};
use crate::registry::{self, CoreRegistry, Cores, read_lock, write_lock};
use crate::view::View;

/// A core's command registry and notification-to-command relay.
pub struct Controller {
    key: Arc<str>,
    cores: Weak<Cores>,
    view: Arc<View>,
    commands: RwLock<AHashMap<String, CommandFactory>>,
}

impl Controller {
    /// Plain constructor. Resolves (creating on demand) the view for the
    /// same key, since registering a command needs a view to attach relay
    /// observers to. Does not claim the key itself; use
    /// [`Controller::get_instance`] or [`Controller::install`] for that.
    #[must_use]
    pub fn new(cores: &CoreRegistry, key: &str) -> Self {
        let view = View::get_instance(cores, key, || View::new(cores, key));
        Self {
            key: Arc::from(key),
            cores: cores.downgrade(),
            view,
            commands: RwLock::default(),
        }
    }

    /// Multiton factory: the controller for `key`, built via `factory` on
    /// first request. Atomic check-and-set, same contract as
    /// [`Model::get_instance`](crate::Model::get_instance).
    pub fn get_instance(
        cores: &CoreRegistry,
        key: &str,
        factory: impl FnOnce() -> Controller,
    ) -> Arc<Controller> {
        registry::get_or_insert(&cores.cores.controllers, key, || {
            let controller = factory();
            assert_eq!(
                controller.key(),
                key,
                "controller factory produced a mismatched key"
            );
            Arc::new(controller)
        })
    }

    /// Claim `controller`'s key unconditionally.
    ///
    /// # Panics
    ///
    /// Panics if a controller for that key is already registered.
    pub fn install(cores: &CoreRegistry, controller: Controller) -> Arc<Controller> {
        let key = Arc::clone(&controller.key);
        registry::install(&cores.cores.controllers, &key, Arc::new(controller), "Controller")
    }

    /// Discard the controller registered under `key`, if any.
    pub fn remove_controller(cores: &CoreRegistry, key: &str) {
        registry::discard(&cores.cores.controllers, key);
    }

    /// This controller's core key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The view this controller relays through.
    #[must_use]
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    fn notifier_context(&self) -> NotifierContext {
        NotifierContext::new(self.cores.clone(), Arc::clone(&self.key))
    }

    /// Map `name` to `factory`, replacing any previous factory for that
    /// name.
    ///
    /// The relay observer that makes this controller react to `name` is
    /// created only on the first registration for that name; the vacancy
    /// gate and the observer install share one write-lock acquisition, so
    /// racing first registrations cannot install duplicates.
    ///
    /// The relay holds no strong handle to this controller. It carries the
    /// core key and resolves the controller through the registry on every
    /// dispatch, so a removed core simply stops relaying.
    pub fn register_command(
        &self,
        name: &str,
        factory: impl Fn() -> Box<dyn Command> + Send + Sync + 'static,
    ) {
        let mut map = write_lock(&self.commands);
        if !map.contains_key(name) {
            let arena = self.cores.clone();
            let key = Arc::clone(&self.key);
            let relay = Observer::new(ContextId::of_ref(self), move |note| {
                let controller = arena
                    .upgrade()
                    .and_then(|cores| registry::lookup(&cores.controllers, &key));
                if let Some(controller) = controller {
                    controller.execute_command(note);
                }
            });
            self.view.register_observer(name, relay);
        }
        map.insert(name.to_owned(), Arc::new(factory));
        debug!(key = %self.key, name, "registered command");
    }

    /// If a factory is registered for `note`'s name, build a fresh command,
    /// hand it this core's context, and execute it. No-op otherwise.
    ///
    /// The command map lock is held only for the lookup; the command runs
    /// unlocked, so it may re-enter this controller.
    pub fn execute_command(&self, note: &Notification) {
        let factory = read_lock(&self.commands).get(note.name()).cloned();
        if let Some(factory) = factory {
            trace!(key = %self.key, name = note.name(), "executing command");
            let mut command = factory();
            command.initialize_notifier(self.notifier_context());
            command.execute(note);
        }
    }

    /// Whether a command is registered for `name`.
    #[must_use]
    pub fn has_command(&self, name: &str) -> bool {
        read_lock(&self.commands).contains_key(name)
    }

    /// Remove the factory for `name` and the relay observer that fed it.
    /// A no-op when nothing is registered for `name`.
    pub fn remove_command(&self, name: &str) {
        let mut map = write_lock(&self.commands);
        if map.remove(name).is_some() {
            self.view.remove_observer(name, ContextId::of_ref(self));
            debug!(key = %self.key, name, "removed command");
        }
    }
}

impl core::fmt::Debug for Controller {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("key", &self.key)
            .field("commands", &read_lock(&self.commands).len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FnCommand;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn controller() -> (CoreRegistry, Arc<Controller>) {
        let cores = CoreRegistry::new();
        let controller =
            Controller::get_instance(&cores, "test", || Controller::new(&cores, "test"));
        (cores, controller)
    }

    fn counting_factory(hits: &Arc<AtomicUsize>) -> impl Fn() -> Box<dyn Command> + Send + Sync + use<> {
        let hits = Arc::clone(hits);
        move || {
            let hits = Arc::clone(&hits);
            Box::new(FnCommand::new(move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
            }))
        }
    }

    #[test]
    fn registered_command_runs_once_per_dispatch() {
        let (_cores, controller) = controller();
        let hits = Arc::new(AtomicUsize::new(0));
        controller.register_command("go", counting_factory(&hits));
        assert!(controller.has_command("go"));

        controller.view().notify_observers(&Notification::new("go"));
        controller.view().notify_observers(&Notification::new("go"));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn execute_with_no_mapping_is_a_noop() {
        let (_cores, controller) = controller();
        controller.execute_command(&Notification::new("unmapped"));
        assert!(!controller.has_command("unmapped"));
    }

    #[test]
    fn reregistration_replaces_the_command_without_double_firing() {
        let (_cores, controller) = controller();
        let old_hits = Arc::new(AtomicUsize::new(0));
        let new_hits = Arc::new(AtomicUsize::new(0));
        controller.register_command("go", counting_factory(&old_hits));
        controller.register_command("go", counting_factory(&new_hits));

        controller.view().notify_observers(&Notification::new("go"));
        assert_eq!(old_hits.load(Ordering::SeqCst), 0);
        assert_eq!(new_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_command_unwires_the_relay() {
        let (_cores, controller) = controller();
        let hits = Arc::new(AtomicUsize::new(0));
        controller.register_command("go", counting_factory(&hits));
        controller.remove_command("go");
        assert!(!controller.has_command("go"));

        controller.view().notify_observers(&Notification::new("go"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        // Removing again is a safe no-op.
        controller.remove_command("go");
    }

    #[test]
    fn commands_receive_the_core_context() {
        let (_cores, controller) = controller();
        let seen: Arc<std::sync::Mutex<Option<String>>> = Arc::default();
        let sink = Arc::clone(&seen);
        controller.register_command("go", move || {
            let sink = Arc::clone(&sink);
            Box::new(FnCommand::new(move |notifier, _| {
                *sink.lock().unwrap() = Some(notifier.key().to_string());
            }))
        });

        controller.execute_command(&Notification::new("go"));
        assert_eq!(seen.lock().unwrap().as_deref(), Some("test"));
    }

    #[test]
    fn torn_down_controller_relay_is_skipped() {
        let (cores, controller) = controller();
        let hits = Arc::new(AtomicUsize::new(0));
        controller.register_command("go", counting_factory(&hits));
        let view = Arc::clone(controller.view());

        Controller::remove_controller(&cores, "test");
        drop(controller);

        // The relay observer still sits in the view, but its controller has
        // left the registry; dispatch skips it instead of erroring.
        view.notify_observers(&Notification::new("go"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
