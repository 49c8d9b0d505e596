#![forbid(unsafe_code)]

//! Keyed multi-core MVC actor registries with a synchronous
//! publish/subscribe notification bus.
//!
//! `mvcore` lets a host application wire data proxies, view mediators, and
//! command handlers together without any of them holding direct references
//! to one another. A caller-supplied string key scopes one complete,
//! independent "core" — a [`Model`], [`View`], [`Controller`] triad fronted
//! by a [`Facade`] — inside an explicit [`CoreRegistry`] arena, so several
//! cores coexist in one process and tests never share hidden state.
//!
//! # Architecture
//!
//! - [`Notification`]: the named, opaque-payload message value.
//! - [`Observer`]: a (callback, context-identity) pair on a view's per-name
//!   dispatch list.
//! - [`Model`] / [`View`] / [`Controller`]: per-key registries of proxies,
//!   mediators + observers, and command factories respectively.
//! - [`Facade`]: the aggregated entry point; also the one place
//!   notifications are constructed for senders.
//! - [`Notifier`]: the embeddable capability giving any actor lazy access
//!   to its facade and a `send_notification` helper.
//! - [`FnCommand`] / [`MacroCommand`]: command bases.
//!
//! # Invariants
//!
//! 1. At most one instance of each core actor type per key; duplicate
//!    construction panics, idempotent lookup via `get_instance`.
//! 2. Observers fire in registration order, against a snapshot taken when
//!    the fan-out starts; handlers may re-enter the registries freely.
//! 3. Every public method is synchronous and thread-safe: each registry is
//!    guarded by a readers-writer lock held only for map bookkeeping, never
//!    across host callbacks.
//! 4. Not-found is `None` or a no-op, never an error; broken preconditions
//!    panic.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use mvcore::{CoreRegistry, Facade, FnCommand};
//!
//! let cores = CoreRegistry::new();
//! let facade = Facade::get_instance(&cores, "app", || Facade::new(&cores, "app"));
//!
//! facade.register_command("double", || {
//!     Box::new(FnCommand::new(|_notifier, note| {
//!         if let Some(cell) = note.body_as::<AtomicI64>() {
//!             cell.store(cell.load(Ordering::SeqCst) * 2, Ordering::SeqCst);
//!         }
//!     }))
//! });
//!
//! let value = Arc::new(AtomicI64::new(21));
//! facade.send_notification("double", Some(value.clone()), None);
//! assert_eq!(value.load(Ordering::SeqCst), 42);
//! ```

pub mod command;
pub mod controller;
pub mod facade;
pub mod mediator;
pub mod model;
pub mod notification;
pub mod notifier;
pub mod observer;
pub mod proxy;
mod registry;
pub mod view;

pub use command::{Command, CommandFactory, FnCommand, MacroCommand};
pub use controller::Controller;
pub use facade::Facade;
pub use mediator::Mediator;
pub use model::Model;
pub use notification::{Body, Notification};
pub use notifier::{Notifier, NotifierContext};
pub use observer::{ContextId, Observer};
pub use proxy::Proxy;
pub use registry::CoreRegistry;
pub use view::View;
