//! Host-supplied named data holders registered with a [`Model`](crate::Model).
//!
//! A proxy owns a slice of the application's data and is looked up by name.
//! Interacting with it may be fully synchronous (get/set on local data) or
//! follow an asynchronous idiom where the proxy talks to a remote service
//! and broadcasts a notification once data arrives; either way the
//! framework only ever sees the trait surface below.

use crate::notifier::NotifierContext;

/// A named data holder managed by a core's model.
///
/// Proxies are shared (`Arc<dyn Proxy>`) once registered, so mutable data
/// lives behind the proxy's own interior mutability.
pub trait Proxy: Send + Sync {
    /// The registration name. Must stay stable while the proxy is
    /// registered; the model keys its map by this value.
    fn name(&self) -> &str;

    /// Receive the owning core's context at registration time.
    ///
    /// Implementations embedding a [`Notifier`](crate::Notifier) delegate
    /// here to [`Notifier::initialize`](crate::Notifier::initialize). The
    /// default discards the context, for proxies that never send.
    fn initialize_notifier(&self, ctx: NotifierContext) {
        let _ = ctx;
    }

    /// Called exactly once, synchronously, within the registering call,
    /// after the proxy is retrievable.
    fn on_register(&self) {}

    /// Called exactly once, synchronously, within the removing call, after
    /// the proxy is no longer retrievable.
    fn on_remove(&self) {}
}
