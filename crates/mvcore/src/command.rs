//! Units of work executed in response to notifications.
//!
//! Commands are stateless by convention and short-lived by construction:
//! the [`Controller`](crate::Controller) holds only factories and builds a
//! fresh command for every execution, so no state leaks between
//! invocations and concurrent dispatches of one notification name cannot
//! interfere.
//!
//! Two base shapes cover most hosts:
//!
//! - [`FnCommand`] wraps a closure — the one-shot business-logic command.
//! - [`MacroCommand`] sequences sub-command factories FIFO, draining its
//!   queue as it goes; one instance therefore executes meaningfully at most
//!   once.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::notification::Notification;
use crate::notifier::{Notifier, NotifierContext};

/// A host-supplied unit of work, constructed fresh per dispatch.
pub trait Command: Send {
    /// Fulfill the use-case initiated by `note`.
    fn execute(&mut self, note: &Notification);

    /// Receive the owning core's context just before execution. Default
    /// discards it; commands that send notifications embed a
    /// [`Notifier`] and delegate here.
    fn initialize_notifier(&mut self, ctx: NotifierContext) {
        let _ = ctx;
    }
}

/// Factory producing a fresh boxed command per invocation.
pub type CommandFactory = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

/// Closure-backed command: the minimal concrete [`Command`].
///
/// The closure receives the command's [`Notifier`] (bound by the
/// controller before execution) so it can send follow-up notifications.
///
/// ```
/// use mvcore::{FnCommand, Notification};
///
/// let mut doubled = None;
/// {
///     let mut cmd = FnCommand::new(|_notifier, note| {
///         doubled = note.body_as::<i64>().map(|n| n * 2);
///     });
///     mvcore::Command::execute(&mut cmd, &Notification::with_body("calc", std::sync::Arc::new(21i64)));
/// }
/// assert_eq!(doubled, Some(42));
/// ```
pub struct FnCommand<F> {
    notifier: Notifier,
    run: F,
}

impl<F> FnCommand<F>
where
    F: FnMut(&Notifier, &Notification) + Send,
{
    /// Wrap `run` as a command.
    pub fn new(run: F) -> Self {
        Self {
            notifier: Notifier::new(),
            run,
        }
    }
}

impl<F> Command for FnCommand<F>
where
    F: FnMut(&Notifier, &Notification) + Send,
{
    fn execute(&mut self, note: &Notification) {
        (self.run)(&self.notifier, note);
    }

    fn initialize_notifier(&mut self, ctx: NotifierContext) {
        self.notifier.initialize(ctx);
    }
}

/// A command that executes a FIFO queue of sub-commands.
///
/// Each sub-command factory is consumed as its product executes, and every
/// sub-command receives the same notification plus the macro's core
/// context. Because the queue drains, calling [`Command::execute`] a second
/// time on the same instance does nothing.
///
/// # Failure Modes
///
/// - Executing a macro that still has sub-commands but was never bound to a
///   core panics (the sub-commands could not be given a context).
/// - Executing an already-drained macro is a silent no-op, bound or not.
#[derive(Default)]
pub struct MacroCommand {
    notifier: Notifier,
    sub_commands: VecDeque<CommandFactory>,
}

impl MacroCommand {
    /// A macro with an empty sub-command queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-command factory. Sub-commands execute in the order they
    /// were added.
    pub fn add_sub_command(&mut self, factory: impl Fn() -> Box<dyn Command> + Send + Sync + 'static) {
        self.sub_commands.push_back(Arc::new(factory));
    }

    /// Number of sub-commands still queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.sub_commands.len()
    }
}

impl Command for MacroCommand {
    fn execute(&mut self, note: &Notification) {
        while let Some(factory) = self.sub_commands.pop_front() {
            let mut sub = factory();
            sub.initialize_notifier((*self.notifier.context()).clone());
            sub.execute(note);
        }
    }

    fn initialize_notifier(&mut self, ctx: NotifierContext) {
        self.notifier.initialize(ctx);
    }
}
