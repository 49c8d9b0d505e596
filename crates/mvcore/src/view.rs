//! Per-core mediator registry and the observer dispatch core.
//!
//! A `View` keeps two independently locked collections: the mediator map
//! (name → mediator) and the observer map (notification name → ordered
//! observer list). Dispatch fans a notification out to the observers
//! registered under its name.
//!
//! # Invariants
//!
//! 1. **Dispatch order**: observers fire in registration order, every time.
//! 2. **Snapshot dispatch**: [`View::notify_observers`] copies the list
//!    before iterating, so a callback that mutates the live list (a
//!    mediator removing itself, say) cannot skip, repeat, or crash the
//!    fan-out in flight. Every observer present when the fan-out started is
//!    invoked exactly once; structural changes take effect from the next
//!    dispatch.
//! 3. One observer per mediator, registered under each of its interests.
//! 4. Emptied observer lists are deleted from the map; "no entry" and
//!    "empty list" are indistinguishable to callers.
//! 5. Mediator re-registration under a live name is a no-op; remove first.
//!
//! # Locking
//!
//! The two maps are never locked together. Registration and removal
//! coordinate them as separate critical sections, and no lock is held
//! while mediator hooks or observer callbacks run, which is what makes
//! re-entrant calls from handlers safe.

use std::sync::{Arc, RwLock, Weak};

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::mediator::Mediator;
use crate::notification::Notification;
use crate::notifier::NotifierContext;
use crate::observer::{ContextId, Observer};
use crate::registry::{self, CoreRegistry, Cores, read_lock, write_lock};

/// A core's mediator registry and notification dispatcher.
pub struct View {
    key: Arc<str>,
    cores: Weak<Cores>,
    mediators: RwLock<AHashMap<String, Arc<dyn Mediator>>>,
    observers: RwLock<AHashMap<String, Vec<Observer>>>,
}

impl View {
    /// Plain constructor. Does not claim the key; use [`View::get_instance`]
    /// (or [`View::install`]) to place the instance in a registry.
    #[must_use]
    pub fn new(cores: &CoreRegistry, key: &str) -> Self {
        Self {
            key: Arc::from(key),
            cores: cores.downgrade(),
            mediators: RwLock::default(),
            observers: RwLock::default(),
        }
    }

    /// Multiton factory: the view for `key`, built via `factory` on first
    /// request. Atomic check-and-set, same contract as
    /// [`Model::get_instance`](crate::Model::get_instance).
    pub fn get_instance(
        cores: &CoreRegistry,
        key: &str,
        factory: impl FnOnce() -> View,
    ) -> Arc<View> {
        registry::get_or_insert(&cores.cores.views, key, || {
            let view = factory();
            assert_eq!(view.key(), key, "view factory produced a mismatched key");
            Arc::new(view)
        })
    }

    /// Claim `view`'s key unconditionally.
    ///
    /// # Panics
    ///
    /// Panics if a view for that key is already registered.
    pub fn install(cores: &CoreRegistry, view: View) -> Arc<View> {
        let key = Arc::clone(&view.key);
        registry::install(&cores.cores.views, &key, Arc::new(view), "View")
    }

    /// Discard the view registered under `key`, if any.
    pub fn remove_view(cores: &CoreRegistry, key: &str) {
        registry::discard(&cores.cores.views, key);
    }

    /// This view's core key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn notifier_context(&self) -> NotifierContext {
        NotifierContext::new(self.cores.clone(), Arc::clone(&self.key))
    }

    // ── Observer list management ────────────────────────────────────

    /// Append `observer` to the list for `name`, creating the list if
    /// absent. Append order is dispatch order.
    pub fn register_observer(&self, name: &str, observer: Observer) {
        write_lock(&self.observers)
            .entry(name.to_owned())
            .or_default()
            .push(observer);
    }

    /// Broadcast `note` to every observer registered under its name, in
    /// registration order.
    ///
    /// The list is snapshotted before iteration and no lock is held while
    /// callbacks run; a callback may freely re-enter this view, including
    /// for the name being dispatched.
    pub fn notify_observers(&self, note: &Notification) {
        let snapshot = read_lock(&self.observers).get(note.name()).cloned();
        if let Some(observers) = snapshot {
            trace!(key = %self.key, name = note.name(), count = observers.len(), "notifying observers");
            for observer in &observers {
                observer.notify(note);
            }
        }
    }

    /// Remove the observer registered for `context` from the list for
    /// `name`; a list holds at most one observer per context. Deletes the
    /// list entirely when it empties.
    pub fn remove_observer(&self, name: &str, context: ContextId) {
        let mut map = write_lock(&self.observers);
        if let Some(list) = map.get_mut(name) {
            if let Some(index) = list.iter().position(|o| o.compare_context(context)) {
                list.remove(index);
            }
            if list.is_empty() {
                map.remove(name);
            }
        }
    }

    // ── Mediator lifecycle ──────────────────────────────────────────

    /// Register `mediator` under its own name and wire exactly one
    /// observer for it under every interest it lists, then fire
    /// `on_register`.
    ///
    /// A no-op when a mediator with that name is already registered;
    /// callers must [`View::remove_mediator`] first.
    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) {
        if self.has_mediator(mediator.name()) {
            return;
        }

        mediator.initialize_notifier(self.notifier_context());

        {
            // Vacancy re-check and insert under one lock: racing duplicate
            // registrations collapse to one winner.
            let mut map = write_lock(&self.mediators);
            if map.contains_key(mediator.name()) {
                return;
            }
            map.insert(mediator.name().to_owned(), Arc::clone(&mediator));
        }

        let interests = mediator.list_notification_interests();
        if !interests.is_empty() {
            // One observer per mediator, not per interest. The callback
            // holds the mediator weakly; the mediator map is the owner.
            let weak: Weak<dyn Mediator> = Arc::downgrade(&mediator);
            let observer = Observer::new(ContextId::of(&mediator), move |note| {
                if let Some(mediator) = weak.upgrade() {
                    mediator.handle_notification(note);
                }
            });
            let mut map = write_lock(&self.observers);
            for interest in &interests {
                map.entry(interest.clone()).or_default().push(observer.clone());
            }
        }

        debug!(key = %self.key, name = mediator.name(), interests = interests.len(), "registered mediator");
        mediator.on_register();
    }

    /// Look up a mediator by name without removing it.
    #[must_use]
    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        read_lock(&self.mediators).get(name).cloned()
    }

    /// Whether a mediator is registered under `name`.
    #[must_use]
    pub fn has_mediator(&self, name: &str) -> bool {
        read_lock(&self.mediators).contains_key(name)
    }

    /// Remove the mediator registered under `name`, unwire its observer
    /// from every interest it lists, then fire `on_remove`. Returns the
    /// removed mediator, or `None` (a safe no-op) if the name was unknown.
    pub fn remove_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        let removed = write_lock(&self.mediators).remove(name)?;

        let context = ContextId::of(&removed);
        for interest in removed.list_notification_interests() {
            self.remove_observer(&interest, context);
        }

        debug!(key = %self.key, name, "removed mediator");
        removed.on_remove();
        Some(removed)
    }
}

impl core::fmt::Debug for View {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("View")
            .field("key", &self.key)
            .field("mediators", &read_lock(&self.mediators).len())
            .field("observed_names", &read_lock(&self.observers).len())
            .finish()
    }
}
