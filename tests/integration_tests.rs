//! Integration tests for Radux

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use radux::{
    namespace, Action, ActionCreator, RaduxError, Reducer, Registry, StateConnector,
    StoreConfig, DEFAULT_STORE,
};
use serde_json::{json, Map, Value};

fn value_payload(args: &[Value]) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("value".to_string(), args.first().cloned().unwrap_or(json!(0)));
    payload
}

fn adder(namespace: &str, initial: i64) -> Arc<Reducer> {
    Arc::new(
        radux::reducer(namespace, json!({ "v": initial })).add_action_with(
            "add",
            value_payload,
            |state: &Value, action: &Action| {
                json!({"v": state["v"].as_i64().unwrap() + action["value"].as_i64().unwrap()})
            },
        ),
    )
}

#[test]
fn named_and_default_stores_include_registered_reducers() {
    Registry::scope(|| {
        let globals = Arc::new(radux::reducer("globals", json!({"g": 0})));
        let jest = adder("jest", 0);
        let jest2 = adder("jest2", 1);
        let jest3 = adder("jest3", 2);

        radux::register_named_reducers("jest", [("jest".to_string(), Arc::clone(&jest))]).unwrap();
        radux::register_reducers([("jest2".to_string(), jest2)]).unwrap();
        radux::register_global_reducer(globals).unwrap();

        radux::create_store(StoreConfig::new()).unwrap();
        radux::create_named_store("jest", StoreConfig::new().reducer("jest3", jest3)).unwrap();

        let unnamed = radux::get_store().unwrap().get_state();
        assert!(unnamed.get("globals").is_some());
        assert!(unnamed.get("jest2").is_some());
        assert!(unnamed.get("jest").is_none());

        let named = radux::get_named_store("jest").unwrap().get_state();
        assert!(named.get("globals").is_some());
        assert!(named.get("jest").is_some());
        assert!(named.get("jest3").is_some());

        radux::dispatch_to("jest", jest.create_action("add", &[json!(10)]).unwrap()).unwrap();
        assert_eq!(
            radux::get_named_store("jest").unwrap().get_state()["jest"]["v"],
            json!(10)
        );
    });
}

#[test]
fn round_trip_matches_left_fold() {
    Registry::scope(|| {
        let jest = adder("jest", 0);
        radux::register_reducer("jest", Arc::clone(&jest)).unwrap();
        radux::create_store(StoreConfig::new()).unwrap();

        let add = jest.action_creators()["jest/add"].clone();
        for value in [10, -3, 5] {
            radux::dispatch(add.create(&[json!(value)])).unwrap();
        }

        let state = radux::get_store().unwrap().get_state();
        assert_eq!(state["jest"]["v"], json!(12));
    });
}

#[test]
fn stores_are_isolated() {
    let registry = Registry::new();
    registry
        .register_named_reducer("left", "counter", adder("counter", 0))
        .unwrap();
    registry
        .register_named_reducer("right", "counter", adder("counter", 0))
        .unwrap();
    let left = registry.create_named_store("left", StoreConfig::new()).unwrap();
    let right = registry.create_named_store("right", StoreConfig::new()).unwrap();

    left.dispatch(Action::new("counter/add").with("value", 7));

    assert_eq!(left.get_state()["counter"]["v"], json!(7));
    assert_eq!(right.get_state()["counter"]["v"], json!(0));
}

#[test]
fn unknown_actions_leave_state_untouched() {
    let registry = Registry::new();
    registry.register_reducer("jest", adder("jest", 4)).unwrap();
    let store = registry.create_store(StoreConfig::new()).unwrap();
    let before = store.get_state();

    store.dispatch(Action::new("elsewhere/add").with("value", 1));
    store.dispatch(Action::new("jest/unknown"));

    assert_eq!(store.get_state(), before);
}

#[test]
fn global_reducers_are_visible_to_every_connector() {
    let registry = Registry::new();
    registry
        .register_global_reducer(radux::reducer("session", json!({"user": "ada"})))
        .unwrap();
    registry.register_reducer("private", adder("private", 0)).unwrap();
    let store = registry.create_store(StoreConfig::new()).unwrap();

    let restrictive = StateConnector::with_registry(Arc::clone(&registry))
        .connect()
        .unwrap();
    let props = restrictive.props(&store);
    assert_eq!(Value::Object(props.state), json!({"session": {"user": "ada"}}));

    let permissive = StateConnector::with_registry(registry)
        .add_state_filter(radux::permissive())
        .connect()
        .unwrap();
    let props = permissive.props(&store);
    assert_eq!(props.state.len(), 2);
}

#[test]
fn connected_actions_dispatch_to_the_store() {
    let registry = Registry::new();
    let jest = adder("jest", 0);
    registry.register_reducer("jest", Arc::clone(&jest)).unwrap();
    let store = registry.create_store(StoreConfig::new()).unwrap();

    let renders = Arc::new(AtomicUsize::new(0));
    let renders_clone = renders.clone();
    store.subscribe(move |_| {
        renders_clone.fetch_add(1, Ordering::SeqCst);
    });

    let connection = StateConnector::with_registry(registry)
        .use_reducer(jest)
        .connect()
        .unwrap();
    let props = connection.props(&store);
    props.actions.call("jest", "add", &[json!(2)]).unwrap();
    props.actions.call("jest", "add", &[json!(3)]).unwrap();

    assert_eq!(renders.load(Ordering::SeqCst), 2);
    assert_eq!(
        Value::Object(connection.props(&store).state),
        json!({"jest": {"v": 5}})
    );
}

#[test]
fn malformed_identifiers_fail_at_build_time() {
    let connector = StateConnector::with_registry(Registry::new()).add_action_creators([(
        "a/b/c".to_string(),
        ActionCreator::from_payload("a/b/c", None),
    )]);

    assert!(matches!(
        connector.connect(),
        Err(RaduxError::MalformedIdentifier { .. })
    ));
    assert_eq!(namespace::qualify("a", "b/c"), "b/c");
}

#[test]
fn dispatch_without_store_fails() {
    Registry::scope(|| {
        assert_eq!(
            radux::dispatch(Action::new("x/y")).unwrap_err(),
            RaduxError::MissingStore {
                name: DEFAULT_STORE.to_string()
            }
        );
        assert!(radux::get_store().is_none());
    });
}

#[test]
fn middleware_sees_every_dispatch() {
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_clone = seen.clone();

    let registry = Registry::new();
    let store = registry
        .create_store(
            StoreConfig::new()
                .reducer("jest", adder("jest", 0))
                .middleware(radux::ActionLogger)
                .middleware(
                    move |_: &radux::Store, action: Action, next: radux::store::Next<'_>| {
                        seen_clone.fetch_add(1, Ordering::SeqCst);
                        next(action)
                    },
                ),
        )
        .unwrap();

    store.dispatch(Action::new("jest/add").with("value", 1));
    store.dispatch(Action::new("jest/add").with("value", 1));

    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(store.get_state()["jest"]["v"], json!(2));
    assert_eq!(registry.reducer_names(DEFAULT_STORE), ["jest"]);
}

#[test]
fn preloaded_state_seeds_named_store() {
    let registry = Registry::new();
    registry
        .register_named_reducer("preload", "jest", adder("jest", 0))
        .unwrap();
    registry
        .register_named_reducer("preload", "other", adder("other", 7))
        .unwrap();

    let preloaded = match json!({"jest": {"v": 41}, "stray": {"v": 1}}) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    let store = registry
        .create_named_store("preload", StoreConfig::new().initial_state(preloaded))
        .unwrap();

    assert_eq!(
        store.get_state(),
        json!({"jest": {"v": 41}, "other": {"v": 7}})
    );

    store.dispatch(Action::new("jest/add").with("value", 1));
    assert_eq!(registry.get_state("preload").unwrap()["jest"]["v"], json!(42));
}
