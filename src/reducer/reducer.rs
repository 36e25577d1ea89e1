use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::action::{Action, ActionCreator, DispatchExtension, PayloadConstructor};
use crate::namespace::qualify;

/// Computes a state patch from the current slice and the incoming action.
pub type Transition = Arc<dyn Fn(&Value, &Action) -> Value + Send + Sync>;

/// A reduction function as the store combines them.
///
/// Receives `None` on the first call, before the slice exists.
pub type ReduceFn = Arc<dyn Fn(Option<&Value>, &Action) -> Value + Send + Sync>;

/// Merge `patch` over `state` one level deep.
///
/// Non-object values cannot be merged; the patch replaces the state.
pub fn shallow_merge(state: &Value, patch: Value) -> Value {
    match (state, patch) {
        (Value::Object(current), Value::Object(patch)) => {
            let mut merged = current.clone();
            merged.extend(patch);
            Value::Object(merged)
        }
        (_, patch) => patch,
    }
}

/// One action registration, for bulk registration through [`Reducer::add_actions`].
pub struct ActionDef {
    name: String,
    payload: Option<PayloadConstructor>,
    transition: Transition,
}

impl ActionDef {
    pub fn new<F>(name: impl Into<String>, transition: F) -> Self
    where
        F: Fn(&Value, &Action) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            payload: None,
            transition: Arc::new(transition),
        }
    }

    /// Map the action creator's arguments to payload fields.
    pub fn with_payload<P>(mut self, payload: P) -> Self
    where
        P: Fn(&[Value]) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.payload = Some(Arc::new(payload));
        self
    }
}

/// A namespaced reducer.
///
/// Actions are registered under local names and stored under their
/// fully-qualified identifiers (`namespace/name`). Registering the same
/// name twice replaces the earlier creator and transition.
///
/// # Examples
///
/// ```
/// use radux::{Action, Reducer};
/// use serde_json::{json, Map, Value};
///
/// let counter = Reducer::new("jest", json!({"v": 0})).add_action_with(
///     "add",
///     |args: &[Value]| {
///         let mut payload = Map::new();
///         payload.insert("value".into(), args[0].clone());
///         payload
///     },
///     |state: &Value, action: &Action| {
///         json!({"v": state["v"].as_i64().unwrap_or(0) + action["value"].as_i64().unwrap_or(0)})
///     },
/// );
///
/// let action = counter.create_action("add", &[json!(10)]).unwrap();
/// assert_eq!(action.kind(), "jest/add");
/// assert_eq!(counter.reduce(None, &action), json!({"v": 10}));
/// ```
pub struct Reducer {
    namespace: String,
    initial_state: Value,
    action_creators: BTreeMap<String, ActionCreator>,
    transitions: HashMap<String, Transition>,
    dispatch_extensions: BTreeMap<String, DispatchExtension>,
}

impl Reducer {
    /// Create a reducer with no actions.
    pub fn new(namespace: impl Into<String>, initial_state: Value) -> Self {
        Self {
            namespace: namespace.into(),
            initial_state,
            action_creators: BTreeMap::new(),
            transitions: HashMap::new(),
            dispatch_extensions: BTreeMap::new(),
        }
    }

    /// Register an action whose creator carries no payload.
    pub fn add_action<F>(self, name: &str, transition: F) -> Self
    where
        F: Fn(&Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.add_actions([ActionDef::new(name, transition)])
    }

    /// Register an action with a payload constructor.
    pub fn add_action_with<P, F>(self, name: &str, payload: P, transition: F) -> Self
    where
        P: Fn(&[Value]) -> Map<String, Value> + Send + Sync + 'static,
        F: Fn(&Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.add_actions([ActionDef::new(name, transition).with_payload(payload)])
    }

    pub fn add_actions(mut self, actions: impl IntoIterator<Item = ActionDef>) -> Self {
        for def in actions {
            let identifier = qualify(&self.namespace, &def.name);
            self.action_creators.insert(
                identifier.clone(),
                ActionCreator::from_payload(identifier.clone(), def.payload),
            );
            self.transitions.insert(identifier, def.transition);
        }
        self
    }

    /// Run `extension` after the named action is dispatched through a connector.
    pub fn add_dispatch_extension<F>(mut self, name: &str, extension: F) -> Self
    where
        F: Fn(&crate::action::Dispatch, &[Value]) + Send + Sync + 'static,
    {
        self.dispatch_extensions
            .insert(qualify(&self.namespace, name), Arc::new(extension));
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn initial_state(&self) -> &Value {
        &self.initial_state
    }

    /// Action creators keyed by fully-qualified identifier.
    pub fn action_creators(&self) -> &BTreeMap<String, ActionCreator> {
        &self.action_creators
    }

    /// Look up a creator by local or fully-qualified name.
    pub fn action_creator(&self, name: &str) -> Option<&ActionCreator> {
        self.action_creators.get(&qualify(&self.namespace, name))
    }

    /// Build an action by local or fully-qualified name.
    pub fn create_action(&self, name: &str, args: &[Value]) -> Option<Action> {
        self.action_creator(name).map(|creator| creator.create(args))
    }

    pub fn dispatch_extensions(&self) -> &BTreeMap<String, DispatchExtension> {
        &self.dispatch_extensions
    }

    /// Whether this reducer has a transition for an action type.
    pub fn handles(&self, kind: &str) -> bool {
        self.transitions.contains_key(&qualify(&self.namespace, kind))
    }

    /// Apply one action to this reducer's slice.
    ///
    /// A missing slice starts from the initial state. Actions without a
    /// registered transition leave the state unchanged.
    pub fn reduce(&self, state: Option<&Value>, action: &Action) -> Value {
        let state = state.unwrap_or(&self.initial_state);
        match self.transitions.get(&qualify(&self.namespace, action.kind())) {
            Some(transition) => shallow_merge(state, transition(state, action)),
            None => {
                tracing::trace!(
                    namespace = %self.namespace,
                    action = action.kind(),
                    "no transition registered"
                );
                state.clone()
            }
        }
    }

    /// Reduction function for store combination.
    pub fn to_reduce_fn(self: &Arc<Self>) -> ReduceFn {
        let reducer = Arc::clone(self);
        Arc::new(move |state: Option<&Value>, action: &Action| {
            reducer.reduce(state, action)
        })
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("namespace", &self.namespace)
            .field("initial_state", &self.initial_state)
            .field("actions", &self.action_creators.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value_payload(args: &[Value]) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert(
            "value".to_string(),
            args.first().cloned().unwrap_or(Value::Null),
        );
        payload
    }

    fn add(state: &Value, action: &Action) -> Value {
        json!({"v": state["v"].as_i64().unwrap() + action["value"].as_i64().unwrap()})
    }

    fn counter() -> Reducer {
        Reducer::new("jest", json!({"v": 0})).add_action_with("add", value_payload, add)
    }

    #[test]
    fn registers_qualified_creators() {
        let reducer = counter();
        assert!(reducer.action_creators().contains_key("jest/add"));
        assert!(reducer.action_creator("add").is_some());
        assert!(reducer.action_creator("jest/add").is_some());

        let action = reducer.create_action("add", &[json!(3)]).unwrap();
        assert_eq!(action.to_value(), json!({"type": "jest/add", "value": 3}));
    }

    #[test]
    fn first_call_seeds_initial_state() {
        let reducer = counter();
        let action = reducer.create_action("add", &[json!(10)]).unwrap();
        assert_eq!(reducer.reduce(None, &action), json!({"v": 10}));
    }

    #[test]
    fn unknown_action_is_identity() {
        let reducer = counter();
        let state = json!({"v": 7, "extra": [1, 2]});
        assert_eq!(reducer.reduce(Some(&state), &Action::new("other/add")), state);
        assert_eq!(reducer.reduce(None, &Action::new("nope")), json!({"v": 0}));
    }

    #[test]
    fn bare_action_names_are_accepted() {
        let reducer = counter();
        let action = Action::new("add").with("value", 2);
        assert_eq!(reducer.reduce(None, &action), json!({"v": 2}));
        assert!(reducer.handles("add"));
        assert!(reducer.handles("jest/add"));
        assert!(!reducer.handles("jest/sub"));
    }

    #[test]
    fn transition_result_is_shallow_merged() {
        let reducer = Reducer::new("form", json!({"name": "", "touched": false}))
            .add_action("touch", |_, _| json!({"touched": true}));
        let next = reducer.reduce(None, &Action::new("form/touch"));
        assert_eq!(next, json!({"name": "", "touched": true}));
    }

    #[test]
    fn later_registration_wins() {
        let reducer = counter().add_action("add", |_, _| json!({"v": -1}));
        let action = reducer.create_action("add", &[json!(5)]).unwrap();
        assert_eq!(action.payload().len(), 0);
        assert_eq!(reducer.reduce(None, &action), json!({"v": -1}));
    }

    #[test]
    fn sequential_dispatch_folds_left() {
        let reducer = Arc::new(counter());
        let reduce = reducer.to_reduce_fn();
        let state = [1, 2, 3, 4].iter().fold(None, |state: Option<Value>, n| {
            let action = reducer.create_action("add", &[json!(n)]).unwrap();
            Some(reduce(state.as_ref(), &action))
        });
        assert_eq!(state, Some(json!({"v": 10})));
    }

    #[test]
    fn add_actions_registers_all() {
        let reducer = Reducer::new("flags", json!({})).add_actions([
            ActionDef::new("on", |_, _| json!({"on": true})),
            ActionDef::new("off", |_, _| json!({"on": false})),
            ActionDef::new("set", |_, action| json!({"on": action["on"]}))
                .with_payload(|args| {
                    let mut payload = Map::new();
                    payload.insert("on".into(), args[0].clone());
                    payload
                }),
        ]);
        assert_eq!(reducer.action_creators().len(), 3);
        let action = reducer.create_action("set", &[json!(true)]).unwrap();
        assert_eq!(reducer.reduce(None, &action), json!({"on": true}));
    }

    #[test]
    fn shallow_merge_replaces_non_objects() {
        assert_eq!(shallow_merge(&json!(1), json!({"a": 1})), json!({"a": 1}));
        assert_eq!(shallow_merge(&json!({"a": 1}), json!(2)), json!(2));
        assert_eq!(
            shallow_merge(&json!({"a": {"x": 1}, "b": 2}), json!({"a": {"y": 2}})),
            json!({"a": {"y": 2}, "b": 2})
        );
    }
}
