//! Host-supplied view-glue actors registered with a [`View`](crate::View).
//!
//! A mediator stands between the notification bus and some opaque view
//! component it tends. At registration the view asks it once for the
//! notification names it cares about and wires a single observer under
//! every one of them; from then on [`Mediator::handle_notification`] is the
//! mediator's inbox.

use crate::notification::Notification;
use crate::notifier::NotifierContext;

/// A named notification handler managed by a core's view.
///
/// Mediators are shared (`Arc<dyn Mediator>`) once registered;
/// `handle_notification` takes `&self`, so mutable mediator state lives
/// behind interior mutability.
pub trait Mediator: Send + Sync {
    /// The registration name. The view keys its mediator map by this value.
    fn name(&self) -> &str;

    /// Notification names this mediator wants delivered.
    ///
    /// Queried once at registration (to wire observers) and once at removal
    /// (to unwire them); keep it stable in between. Defaults to none.
    fn list_notification_interests(&self) -> Vec<String> {
        Vec::new()
    }

    /// Handle one notification of interest.
    ///
    /// Invoked synchronously during fan-out. A handler may call back into
    /// the view — including removing this very mediator — without
    /// disturbing the dispatch already in flight.
    fn handle_notification(&self, note: &Notification) {
        let _ = note;
    }

    /// Receive the owning core's context at registration time. Default
    /// discards it; see [`Proxy::initialize_notifier`](crate::Proxy::initialize_notifier).
    fn initialize_notifier(&self, ctx: NotifierContext) {
        let _ = ctx;
    }

    /// Called exactly once, synchronously, after registration completes
    /// (observers already wired).
    fn on_register(&self) {}

    /// Called exactly once, synchronously, after removal (observers already
    /// unwired).
    fn on_remove(&self) {}
}
