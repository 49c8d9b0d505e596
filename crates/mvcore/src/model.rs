//! Per-core registry of named [`Proxy`] instances.
//!
//! A `Model` is pure bookkeeping: a name → proxy map plus the lifecycle
//! hooks fired as entries come and go. Typically a host registers proxies
//! from a startup command once the facade has built the core's actors.
//!
//! # Invariants
//!
//! 1. `register_proxy` overwrites silently; the displaced proxy (if any) is
//!    not sent `on_remove`, since it was replaced rather than removed.
//! 2. `on_register`/`on_remove` fire exactly once per registration, inside
//!    the registering/removing call, with the map already updated.
//! 3. Lookups of unknown names are `None`/`false`, never an error.

use std::sync::{Arc, RwLock, Weak};

use ahash::AHashMap;
use tracing::debug;

use crate::notifier::NotifierContext;
use crate::proxy::Proxy;
use crate::registry::{self, CoreRegistry, Cores, read_lock, write_lock};

/// A core's proxy registry.
pub struct Model {
    key: Arc<str>,
    cores: Weak<Cores>,
    proxies: RwLock<AHashMap<String, Arc<dyn Proxy>>>,
}

impl Model {
    /// Plain constructor. Does not claim the key; use [`Model::get_instance`]
    /// (or [`Model::install`]) to place the instance in a registry.
    #[must_use]
    pub fn new(cores: &CoreRegistry, key: &str) -> Self {
        Self {
            key: Arc::from(key),
            cores: cores.downgrade(),
            proxies: RwLock::default(),
        }
    }

    /// Multiton factory: the model for `key`, built via `factory` on first
    /// request. The check-and-set is atomic; of racing callers, exactly one
    /// factory runs and all receive the same instance.
    ///
    /// `factory` must construct without touching `cores` (it runs under the
    /// registry's write lock); [`Model::new`] qualifies.
    pub fn get_instance(
        cores: &CoreRegistry,
        key: &str,
        factory: impl FnOnce() -> Model,
    ) -> Arc<Model> {
        registry::get_or_insert(&cores.cores.models, key, || {
            let model = factory();
            assert_eq!(model.key(), key, "model factory produced a mismatched key");
            Arc::new(model)
        })
    }

    /// Claim `model`'s key unconditionally.
    ///
    /// # Panics
    ///
    /// Panics if a model for that key is already registered.
    pub fn install(cores: &CoreRegistry, model: Model) -> Arc<Model> {
        let key = Arc::clone(&model.key);
        registry::install(&cores.cores.models, &key, Arc::new(model), "Model")
    }

    /// Discard the model registered under `key`, if any. The discarded
    /// instance is not notified.
    pub fn remove_model(cores: &CoreRegistry, key: &str) {
        registry::discard(&cores.cores.models, key);
    }

    /// This model's core key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn notifier_context(&self) -> NotifierContext {
        NotifierContext::new(self.cores.clone(), Arc::clone(&self.key))
    }

    /// Register `proxy` under its own name, replacing any previous entry,
    /// then fire `on_register`.
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) {
        proxy.initialize_notifier(self.notifier_context());
        let name = proxy.name().to_owned();
        write_lock(&self.proxies).insert(name.clone(), Arc::clone(&proxy));
        debug!(key = %self.key, name = %name, "registered proxy");
        proxy.on_register();
    }

    /// Look up a proxy by name without removing it.
    #[must_use]
    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        read_lock(&self.proxies).get(name).cloned()
    }

    /// Whether a proxy is registered under `name`.
    #[must_use]
    pub fn has_proxy(&self, name: &str) -> bool {
        read_lock(&self.proxies).contains_key(name)
    }

    /// Remove the proxy registered under `name`, firing `on_remove` on it.
    /// Returns the removed proxy, or `None` if the name was unknown.
    pub fn remove_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        let removed = write_lock(&self.proxies).remove(name);
        if let Some(proxy) = &removed {
            debug!(key = %self.key, name, "removed proxy");
            proxy.on_remove();
        }
        removed
    }
}

impl core::fmt::Debug for Model {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Model")
            .field("key", &self.key)
            .field("proxies", &read_lock(&self.proxies).len())
            .finish()
    }
}
