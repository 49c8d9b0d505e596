//! The keyed arena holding every core's actor instances.
//!
//! The classic multiton pattern keeps one static instance map per actor
//! type. Here that global state is replaced by an explicit [`CoreRegistry`]:
//! a cheap-to-clone handle to an arena of per-key {Model, View, Controller,
//! Facade} slots, constructed by the host at startup and owned for exactly
//! as long as the host wants its cores to live. Tests build one registry
//! each, so no state leaks across test cases.
//!
//! # Invariants
//!
//! 1. At most one instance of each actor type exists per core key.
//! 2. `get_instance` check-and-set is atomic: of two racing callers for an
//!    unconstructed key, exactly one factory runs and both receive the same
//!    instance.
//! 3. `install` on an occupied key panics (a host bug, not a runtime
//!    condition).
//! 4. [`CoreRegistry::remove_core`] removes all four actor slots while
//!    holding all four map locks, so no external caller can observe a
//!    half-removed core.
//!
//! # Lock order
//!
//! facades → models → controllers → views. The construction paths nest in
//! the same direction (facade construction resolves the other three;
//! controller construction resolves the view), so holding the four locks in
//! this order cannot deadlock against them.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use ahash::AHashMap;

use crate::controller::Controller;
use crate::facade::Facade;
use crate::model::Model;
use crate::view::View;

/// One instance map: core key → shared actor instance.
pub(crate) type InstanceMap<T> = RwLock<AHashMap<Arc<str>, Arc<T>>>;

/// Read-lock a registry, recovering the guard if a handler panicked while
/// holding it. Registry state is plain map bookkeeping and stays coherent
/// across a poisoned guard.
pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write-lock counterpart of [`read_lock`].
pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// The arena behind a [`CoreRegistry`]. Actors hold it weakly; only host
/// handles keep it alive.
#[derive(Default)]
pub(crate) struct Cores {
    pub(crate) facades: InstanceMap<Facade>,
    pub(crate) models: InstanceMap<Model>,
    pub(crate) controllers: InstanceMap<Controller>,
    pub(crate) views: InstanceMap<View>,
}

/// Return the instance for `key`, constructing it via `build` if absent.
///
/// The check and the insert happen under one write-lock acquisition, so a
/// key's factory runs at most once ever. `build` must not re-enter the map
/// being initialized (its write lock is held); resolving *other* actor
/// types is fine and follows the module-level lock order.
pub(crate) fn get_or_insert<T>(
    map: &InstanceMap<T>,
    key: &str,
    build: impl FnOnce() -> Arc<T>,
) -> Arc<T> {
    if let Some(existing) = read_lock(map).get(key) {
        return Arc::clone(existing);
    }
    let mut map = write_lock(map);
    if let Some(existing) = map.get(key) {
        return Arc::clone(existing);
    }
    let fresh = build();
    map.insert(Arc::from(key), Arc::clone(&fresh));
    fresh
}

/// Unconditionally claim `key` for `instance`.
///
/// # Panics
///
/// Panics if an instance is already registered under `key`; constructing a
/// second actor of one type for a live core is a host-application bug.
pub(crate) fn install<T>(map: &InstanceMap<T>, key: &str, instance: Arc<T>, actor: &str) -> Arc<T> {
    let mut map = write_lock(map);
    assert!(
        !map.contains_key(key),
        "{actor} instance for core key {key:?} already constructed"
    );
    map.insert(Arc::from(key), Arc::clone(&instance));
    instance
}

pub(crate) fn lookup<T>(map: &InstanceMap<T>, key: &str) -> Option<Arc<T>> {
    read_lock(map).get(key).cloned()
}

/// Discard the slot for `key`, if any. The evicted instance is not
/// notified; teardown hooks are a proxy/mediator concern, not an actor one.
pub(crate) fn discard<T>(map: &InstanceMap<T>, key: &str) {
    write_lock(map).remove(key);
}

/// Handle to an arena of cores, keyed by caller-supplied strings.
///
/// Cloning is cheap (an `Arc` bump) and every clone addresses the same
/// arena. A core key scopes one independent {Model, View, Controller,
/// Facade} quartet; keys are chosen and owned by the caller, never
/// generated here.
#[derive(Clone, Default)]
pub struct CoreRegistry {
    pub(crate) cores: Arc<Cores>,
}

impl CoreRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a core (specifically, its facade) is registered under `key`.
    #[must_use]
    pub fn has_core(&self, key: &str) -> bool {
        read_lock(&self.cores.facades).contains_key(key)
    }

    /// Remove the Model, View, Controller, and Facade registered under
    /// `key`, leaving no residual slot for that core.
    ///
    /// All four map locks are held for the duration, so to any other caller
    /// the core vanishes in one step. Removing an unknown key is a no-op.
    pub fn remove_core(&self, key: &str) {
        let mut facades = write_lock(&self.cores.facades);
        let mut models = write_lock(&self.cores.models);
        let mut controllers = write_lock(&self.cores.controllers);
        let mut views = write_lock(&self.cores.views);
        facades.remove(key);
        models.remove(key);
        controllers.remove(key);
        views.remove(key);
        tracing::debug!(key, "removed core");
    }

    pub(crate) fn downgrade(&self) -> Weak<Cores> {
        Arc::downgrade(&self.cores)
    }
}

impl core::fmt::Debug for CoreRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CoreRegistry")
            .field("cores", &read_lock(&self.cores.facades).len())
            .finish()
    }
}

/// Re-materialize a registry handle from an actor's weak reference.
///
/// # Panics
///
/// Panics if the host has dropped every registry handle while actors that
/// need it are still reachable; that teardown order is a host bug.
pub(crate) fn upgrade(cores: &Weak<Cores>) -> CoreRegistry {
    CoreRegistry {
        cores: cores
            .upgrade()
            .expect("core registry dropped while its actors were still in use"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_has_no_cores() {
        let cores = CoreRegistry::new();
        assert!(!cores.has_core("app"));
    }

    #[test]
    fn get_or_insert_reuses_existing_slot() {
        let map: InstanceMap<u32> = InstanceMap::default();
        let first = get_or_insert(&map, "k", || Arc::new(1));
        let second = get_or_insert(&map, "k", || unreachable!("factory must not rerun"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    #[should_panic(expected = "already constructed")]
    fn install_on_occupied_key_panics() {
        let map: InstanceMap<u32> = InstanceMap::default();
        install(&map, "k", Arc::new(1), "Widget");
        install(&map, "k", Arc::new(2), "Widget");
    }

    #[test]
    fn discard_is_a_noop_for_unknown_keys() {
        let map: InstanceMap<u32> = InstanceMap::default();
        discard(&map, "missing");
        assert!(lookup(&map, "missing").is_none());
    }

    #[test]
    fn clones_share_one_arena() {
        let a = CoreRegistry::new();
        let b = a.clone();
        install(&a.cores.views, "app", Arc::new(crate::View::new(&a, "app")), "View");
        assert!(lookup(&b.cores.views, "app").is_some());
    }
}
