#![forbid(unsafe_code)]

//! Recording actors for exercising `mvcore` cores in tests and benches.
//!
//! Every fixture here counts or logs what the framework does to it, so a
//! test can assert on lifecycle-hook counts, delivery order, and payload
//! plumbing without writing a bespoke actor each time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mvcore::{Command, MacroCommand, Mediator, Notification, Notifier, NotifierContext, Proxy};

// ── Proxies ─────────────────────────────────────────────────────────

/// A proxy holding a list of strings, counting its lifecycle hooks.
pub struct RecordingProxy {
    name: String,
    data: Mutex<Vec<String>>,
    notifier: Notifier,
    registrations: AtomicUsize,
    removals: AtomicUsize,
}

impl RecordingProxy {
    pub fn new(name: &str, data: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            data: Mutex::new(data),
            notifier: Notifier::new(),
            registrations: AtomicUsize::new(0),
            removals: AtomicUsize::new(0),
        })
    }

    pub fn data(&self) -> Vec<String> {
        self.data.lock().unwrap().clone()
    }

    pub fn set_data(&self, data: Vec<String>) {
        *self.data.lock().unwrap() = data;
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Proxy for RecordingProxy {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize_notifier(&self, ctx: NotifierContext) {
        self.notifier.initialize(ctx);
    }

    fn on_register(&self) {
        self.registrations.fetch_add(1, Ordering::SeqCst);
    }

    fn on_remove(&self) {
        self.removals.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Mediators ───────────────────────────────────────────────────────

/// A mediator with fixed interests that logs every notification name it
/// handles, in order.
pub struct RecordingMediator {
    name: String,
    interests: Vec<String>,
    notifier: Notifier,
    handled: Mutex<Vec<String>>,
    registrations: AtomicUsize,
    removals: AtomicUsize,
}

impl RecordingMediator {
    pub fn new(name: &str, interests: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            interests: interests.iter().map(|s| (*s).into()).collect(),
            notifier: Notifier::new(),
            handled: Mutex::default(),
            registrations: AtomicUsize::new(0),
            removals: AtomicUsize::new(0),
        })
    }

    /// Names handled so far, in delivery order.
    pub fn handled(&self) -> Vec<String> {
        self.handled.lock().unwrap().clone()
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

impl Mediator for RecordingMediator {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_notification_interests(&self) -> Vec<String> {
        self.interests.clone()
    }

    fn handle_notification(&self, note: &Notification) {
        self.handled.lock().unwrap().push(note.name().to_owned());
    }

    fn initialize_notifier(&self, ctx: NotifierContext) {
        self.notifier.initialize(ctx);
    }

    fn on_register(&self) {
        self.registrations.fetch_add(1, Ordering::SeqCst);
    }

    fn on_remove(&self) {
        self.removals.fetch_add(1, Ordering::SeqCst);
    }
}

/// A mediator that removes itself from its view while handling a
/// notification of interest, bumping a shared counter first.
///
/// Exercises the snapshot-dispatch guarantee: every observer present when
/// a fan-out starts is invoked exactly once even if handlers mutate the
/// live observer list mid-flight.
pub struct SelfRemovingMediator {
    name: String,
    interest: String,
    notifier: Notifier,
    handled: Arc<AtomicUsize>,
}

impl SelfRemovingMediator {
    pub fn new(name: &str, interest: &str, handled: Arc<AtomicUsize>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            interest: interest.into(),
            notifier: Notifier::new(),
            handled,
        })
    }
}

impl Mediator for SelfRemovingMediator {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_notification_interests(&self) -> Vec<String> {
        vec![self.interest.clone()]
    }

    fn handle_notification(&self, _note: &Notification) {
        self.handled.fetch_add(1, Ordering::SeqCst);
        self.notifier.facade().remove_mediator(&self.name);
    }

    fn initialize_notifier(&self, ctx: NotifierContext) {
        self.notifier.initialize(ctx);
    }
}

// ── Value objects and math commands ─────────────────────────────────

/// Payload for [`DoubleInputCommand`]: handlers write the doubled input
/// back into `result`.
#[derive(Debug, Default)]
pub struct DoubleVo {
    pub input: i64,
    pub result: Option<i64>,
}

impl DoubleVo {
    #[must_use]
    pub fn boxed(input: i64) -> Arc<Mutex<DoubleVo>> {
        Arc::new(Mutex::new(DoubleVo {
            input,
            result: None,
        }))
    }
}

/// Payload for the two-step macro pipeline: one sub-command doubles the
/// input, the other squares it.
#[derive(Debug, Default)]
pub struct PipelineVo {
    pub input: i64,
    pub doubled: Option<i64>,
    pub squared: Option<i64>,
}

impl PipelineVo {
    #[must_use]
    pub fn boxed(input: i64) -> Arc<Mutex<PipelineVo>> {
        Arc::new(Mutex::new(PipelineVo {
            input,
            doubled: None,
            squared: None,
        }))
    }
}

/// Writes `2 * input` into a [`DoubleVo`] body.
#[derive(Default)]
pub struct DoubleInputCommand;

impl Command for DoubleInputCommand {
    fn execute(&mut self, note: &Notification) {
        if let Some(vo) = note.body_as::<Mutex<DoubleVo>>() {
            let mut vo = vo.lock().unwrap();
            vo.result = Some(vo.input * 2);
        }
    }
}

/// Writes `2 * input` into a [`PipelineVo`] body.
#[derive(Default)]
pub struct DoubleStepCommand;

impl Command for DoubleStepCommand {
    fn execute(&mut self, note: &Notification) {
        if let Some(vo) = note.body_as::<Mutex<PipelineVo>>() {
            let mut vo = vo.lock().unwrap();
            vo.doubled = Some(vo.input * 2);
        }
    }
}

/// Writes `input * input` into a [`PipelineVo`] body.
#[derive(Default)]
pub struct SquareStepCommand;

impl Command for SquareStepCommand {
    fn execute(&mut self, note: &Notification) {
        if let Some(vo) = note.body_as::<Mutex<PipelineVo>>() {
            let mut vo = vo.lock().unwrap();
            vo.squared = Some(vo.input * vo.input);
        }
    }
}

/// A macro command sequencing [`DoubleStepCommand`] then
/// [`SquareStepCommand`].
#[must_use]
pub fn math_pipeline() -> MacroCommand {
    let mut pipeline = MacroCommand::new();
    pipeline.add_sub_command(|| Box::new(DoubleStepCommand));
    pipeline.add_sub_command(|| Box::new(SquareStepCommand));
    pipeline
}
