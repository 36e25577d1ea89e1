use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::action::Action;
use crate::reducer::ReduceFn;

/// Combine named reduction functions into one over an object state.
///
/// Each reducer sees only the slice under its own name and receives
/// `None` while that slice does not exist yet. Keys without a reducer
/// are dropped from the result.
pub fn combine_reducers(reducers: BTreeMap<String, ReduceFn>) -> ReduceFn {
    Arc::new(move |state: Option<&Value>, action: &Action| {
        let mut next = Map::with_capacity(reducers.len());
        for (name, reduce) in &reducers {
            let slice = state.and_then(|state| state.get(name));
            next.insert(name.clone(), reduce(slice, action));
        }
        Value::Object(next)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counter(step: i64) -> ReduceFn {
        Arc::new(move |state: Option<&Value>, action: &Action| {
            let current = state.and_then(Value::as_i64).unwrap_or(0);
            if action.kind() == "tick" {
                json!(current + step)
            } else {
                json!(current)
            }
        })
    }

    #[test]
    fn slices_are_reduced_independently() {
        let combined = combine_reducers(BTreeMap::from([
            ("one".to_string(), counter(1)),
            ("ten".to_string(), counter(10)),
        ]));

        let state = combined(None, &Action::new("init"));
        assert_eq!(state, json!({"one": 0, "ten": 0}));

        let state = combined(Some(&state), &Action::new("tick"));
        let state = combined(Some(&state), &Action::new("tick"));
        assert_eq!(state, json!({"one": 2, "ten": 20}));
    }

    #[test]
    fn preloaded_slices_are_kept_and_unknown_keys_dropped() {
        let combined = combine_reducers(BTreeMap::from([("one".to_string(), counter(1))]));
        let state = combined(Some(&json!({"one": 5, "stray": true})), &Action::new("tick"));
        assert_eq!(state, json!({"one": 6}));
    }
}
