//! Proxy and mediator lifecycles driven through the facade.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mvcore::{Command, CoreRegistry, Facade, FnCommand, Proxy};
use mvcore_harness::{RecordingMediator, RecordingProxy};

fn facade(cores: &CoreRegistry, key: &str) -> Arc<Facade> {
    Facade::get_instance(cores, key, || Facade::new(cores, key))
}

fn colors() -> Vec<String> {
    ["red", "green", "blue"].map(str::to_owned).to_vec()
}

#[test]
fn proxy_lifecycle_hooks_fire_around_registration() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let proxy = RecordingProxy::new("colors", colors());

    facade.register_proxy(proxy.clone());
    assert_eq!(proxy.registrations(), 1);
    assert_eq!(proxy.removals(), 0);
    assert!(facade.has_proxy("colors"));

    let retrieved = facade
        .retrieve_proxy("colors")
        .expect("registered proxy is retrievable");
    assert_eq!(retrieved.name(), "colors");

    let removed = facade.remove_proxy("colors").expect("proxy was present");
    assert_eq!(proxy.removals(), 1);
    assert!(!facade.has_proxy("colors"));
    assert!(Arc::ptr_eq(&removed, &(proxy as Arc<dyn Proxy>)));
}

#[test]
fn reregistering_a_proxy_name_replaces_the_instance() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let first = RecordingProxy::new("colors", colors());
    let second = RecordingProxy::new("colors", vec!["cyan".to_owned()]);

    facade.register_proxy(first.clone());
    facade.register_proxy(second.clone());
    assert_eq!(first.registrations(), 1);
    assert_eq!(second.registrations(), 1);
    // The displaced instance is replaced, not torn down.
    assert_eq!(first.removals(), 0);
    assert_eq!(second.data(), vec!["cyan".to_owned()]);

    let held = facade.retrieve_proxy("colors").expect("present");
    assert!(Arc::ptr_eq(&held, &(second as Arc<dyn Proxy>)));
}

#[test]
fn registered_proxy_can_broadcast_through_its_notifier() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&hits);
    facade.register_command("ping", move || {
        let counter = Arc::clone(&counter);
        Box::new(FnCommand::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        })) as Box<dyn Command>
    });

    let proxy = RecordingProxy::new("colors", colors());
    facade.register_proxy(proxy.clone());
    proxy.notifier().send_notification("ping", None, None);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(&*proxy.notifier().key(), "app");
}

#[test]
fn mediator_hears_only_its_interests_in_order() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let mediator = RecordingMediator::new("panel", &["open", "close"]);
    facade.register_mediator(mediator.clone());
    assert_eq!(mediator.registrations(), 1);

    facade.send_notification("open", None, None);
    facade.send_notification("resize", None, None);
    facade.send_notification("close", None, None);
    facade.send_notification("open", None, None);
    assert_eq!(mediator.handled(), vec!["open", "close", "open"]);
}

#[test]
fn duplicate_mediator_name_is_rejected_silently() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let original = RecordingMediator::new("panel", &["open"]);
    let usurper = RecordingMediator::new("panel", &["open"]);

    facade.register_mediator(original.clone());
    facade.register_mediator(usurper.clone());
    assert_eq!(original.registrations(), 1);
    assert_eq!(usurper.registrations(), 0);

    facade.send_notification("open", None, None);
    assert_eq!(original.handled().len(), 1);
    assert!(usurper.handled().is_empty());
}

#[test]
fn removing_one_mediator_leaves_shared_interests_wired() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let left = RecordingMediator::new("left", &["open"]);
    let right = RecordingMediator::new("right", &["open"]);
    facade.register_mediator(left.clone());
    facade.register_mediator(right.clone());

    facade.remove_mediator("left");
    assert_eq!(left.removals(), 1);
    assert!(!facade.has_mediator("left"));

    facade.send_notification("open", None, None);
    assert!(left.handled().is_empty());
    assert_eq!(right.handled(), vec!["open"]);
}

#[test]
fn remove_mediator_returns_the_instance() {
    let cores = CoreRegistry::new();
    let facade = facade(&cores, "app");
    let mediator = RecordingMediator::new("panel", &["open"]);
    facade.register_mediator(mediator.clone());

    let removed = facade.remove_mediator("panel").expect("was present");
    assert_eq!(removed.name(), "panel");
    assert!(facade.remove_mediator("panel").is_none());
}
