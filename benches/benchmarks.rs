use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Map, Value};
use std::hint::black_box;
use std::sync::Arc;

use radux::{include, Action, Reducer, Registry, StateConnector, StoreConfig};

fn counter(namespace: &str) -> Arc<Reducer> {
    Arc::new(
        Reducer::new(namespace, json!({"v": 0})).add_action("inc", |state, _| {
            json!({"v": state["v"].as_i64().unwrap_or(0) + 1})
        }),
    )
}

fn reduce_benchmark(c: &mut Criterion) {
    let reducer = counter("bench");
    let state = json!({"v": 0});
    let matched = Action::new("bench/inc");
    let unmatched = Action::new("other/inc");

    c.bench_function("reduce_matched", |b| {
        b.iter(|| black_box(reducer.reduce(Some(&state), black_box(&matched))));
    });

    c.bench_function("reduce_unmatched", |b| {
        b.iter(|| black_box(reducer.reduce(Some(&state), black_box(&unmatched))));
    });
}

fn store_dispatch_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_dispatch");

    for reducer_count in [1, 10, 100].iter() {
        let registry = Registry::new();
        for i in 0..*reducer_count {
            let name = format!("r{i}");
            registry.register_reducer(&name, counter(&name)).unwrap();
        }
        let store = registry.create_store(StoreConfig::new()).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(reducer_count),
            reducer_count,
            |b, _| {
                b.iter(|| store.dispatch(black_box(Action::new("r0/inc"))));
            },
        );
    }
    group.finish();
}

fn store_subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_subscribe");

    for subscriber_count in [1, 10, 100].iter() {
        let registry = Registry::new();
        registry.register_reducer("bench", counter("bench")).unwrap();
        let store = registry.create_store(StoreConfig::new()).unwrap();

        for _ in 0..*subscriber_count {
            store.subscribe(|_| {
                // Empty subscriber
            });
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                b.iter(|| store.dispatch(black_box(Action::new("bench/inc"))));
            },
        );
    }
    group.finish();
}

fn state_to_props_benchmark(c: &mut Criterion) {
    let state: Map<String, Value> = (0..100).map(|i| (format!("k{i}"), json!(i))).collect();
    let state = Value::Object(state);
    let map_state = StateConnector::with_registry(Registry::new())
        .add_state_filter(include(["k1", "k50", "k99"]))
        .add_state_predicate(|key| key.ends_with('7'))
        .build_state_to_props();

    c.bench_function("state_to_props", |b| {
        b.iter(|| black_box(map_state(black_box(&state))));
    });
}

criterion_group!(
    benches,
    reduce_benchmark,
    store_dispatch_benchmark,
    store_subscribe_benchmark,
    state_to_props_benchmark,
);
criterion_main!(benches);
