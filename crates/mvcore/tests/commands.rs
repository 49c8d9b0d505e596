//! Command wiring through a whole core: facade in, view relay, command out.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mvcore::{Body, Command, CoreRegistry, Facade, FnCommand};
use mvcore_harness::{DoubleInputCommand, DoubleVo, PipelineVo, math_pipeline};

fn facade(cores: &CoreRegistry, key: &str) -> Arc<Facade> {
    Facade::get_instance(cores, key, || Facade::new(cores, key))
}

fn counting(hits: &Arc<AtomicUsize>) -> impl Fn() -> Box<dyn Command> + Send + Sync + use<> {
    let hits = Arc::clone(hits);
    move || {
        let hits = Arc::clone(&hits);
        Box::new(FnCommand::new(move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

#[test]
fn broadcast_reaches_the_registered_command() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let hits = Arc::new(AtomicUsize::new(0));
    facade.register_command("go", counting(&hits));

    facade.send_notification("go", None, None);
    facade.send_notification("go", None, None);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // Unmapped names fall through silently.
    facade.send_notification("elsewhere", None, None);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn remove_then_reregister_fires_exactly_once() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    facade.register_command("go", counting(&first));
    facade.remove_command("go");
    facade.register_command("go", counting(&second));

    facade.send_notification("go", None, None);
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn removed_command_stops_reacting() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let hits = Arc::new(AtomicUsize::new(0));

    facade.register_command("go", counting(&hits));
    assert!(facade.has_command("go"));
    facade.remove_command("go");
    assert!(!facade.has_command("go"));

    facade.send_notification("go", None, None);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn round_trip_through_a_core_doubles_the_input() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "math");
    facade.register_command("double", || Box::new(DoubleInputCommand));

    let vo = DoubleVo::boxed(32);
    facade.send_notification("double", Some(vo.clone() as Body), None);
    assert_eq!(vo.lock().unwrap().result, Some(64));
}

#[test]
fn macro_pipeline_runs_sub_commands_in_sequence() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "math");
    facade.register_command("pipeline", || Box::new(math_pipeline()));

    let vo = PipelineVo::boxed(5);
    facade.send_notification("pipeline", Some(vo.clone() as Body), None);
    let vo = vo.lock().unwrap();
    assert_eq!(vo.doubled, Some(10));
    assert_eq!(vo.squared, Some(25));
}

#[test]
fn each_dispatch_gets_a_fresh_macro_instance() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "math");
    facade.register_command("pipeline", || Box::new(math_pipeline()));

    for input in [2, 3] {
        let vo = PipelineVo::boxed(input);
        facade.send_notification("pipeline", Some(vo.clone() as Body), None);
        let vo = vo.lock().unwrap();
        assert_eq!(vo.doubled, Some(input * 2));
        assert_eq!(vo.squared, Some(input * input));
    }
}

#[test]
fn commands_can_broadcast_follow_up_notifications() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();

    {
        let seen = Arc::clone(&seen);
        facade.register_command("finish", move || {
            let seen = Arc::clone(&seen);
            Box::new(FnCommand::new(move |_, note| {
                seen.lock().unwrap().push(note.name().to_owned());
            }))
        });
    }
    facade.register_command("start", || {
        Box::new(FnCommand::new(|notifier, _| {
            notifier.send_notification("finish", None, None);
        }))
    });

    facade.send_notification("start", None, None);
    assert_eq!(*seen.lock().unwrap(), vec!["finish".to_owned()]);
}
