//! Plain actions, action creators and their dispatch-bound forms.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which an action's type tag is serialized.
pub const TYPE_KEY: &str = "type";

static NULL: Value = Value::Null;

/// A plain action: a type tag plus a flat payload.
///
/// Serializes to `{ "type": <kind>, ...payload }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Action {
    /// Create an action carrying only its type tag.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Map::new(),
        }
    }

    /// Replace the payload. A `type` field in the payload is dropped.
    pub fn with_payload(mut self, mut payload: Map<String, Value>) -> Self {
        payload.remove(TYPE_KEY);
        self.payload = payload;
        self
    }

    /// Add one payload field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != TYPE_KEY {
            self.payload.insert(key, value.into());
        }
        self
    }

    /// The action's type tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Look up one payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// The action as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.payload.len() + 1);
        object.insert(TYPE_KEY.to_string(), Value::String(self.kind.clone()));
        object.extend(self.payload.iter().map(|(k, v)| (k.clone(), v.clone())));
        Value::Object(object)
    }
}

/// Missing payload fields index as `null`, like `serde_json::Value`.
impl Index<&str> for Action {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.payload.get(key).unwrap_or(&NULL)
    }
}

/// A store's dispatch function. Returns the action as it left the middleware chain.
pub type Dispatch = Arc<dyn Fn(Action) -> Action + Send + Sync>;

/// Maps an action creator's arguments to payload fields.
pub type PayloadConstructor = Arc<dyn Fn(&[Value]) -> Map<String, Value> + Send + Sync>;

/// Follow-up run after a bound action has been dispatched.
pub type DispatchExtension = Arc<dyn Fn(&Dispatch, &[Value]) + Send + Sync>;

/// Builds plain actions for one fully-qualified identifier.
#[derive(Clone)]
pub struct ActionCreator {
    identifier: Arc<str>,
    build: Arc<dyn Fn(&[Value]) -> Action + Send + Sync>,
}

impl ActionCreator {
    /// Creator with an arbitrary build function.
    pub fn new<F>(identifier: impl Into<String>, build: F) -> Self
    where
        F: Fn(&[Value]) -> Action + Send + Sync + 'static,
    {
        Self {
            identifier: Arc::from(identifier.into()),
            build: Arc::new(build),
        }
    }

    /// Creator whose actions carry `identifier` as their type and the
    /// constructor's output (if any) as payload.
    pub fn from_payload(identifier: impl Into<String>, payload: Option<PayloadConstructor>) -> Self {
        let identifier: Arc<str> = Arc::from(identifier.into());
        let kind = Arc::clone(&identifier);
        Self {
            identifier,
            build: Arc::new(move |args: &[Value]| {
                let action = Action::new(&*kind);
                match &payload {
                    Some(payload) => action.with_payload(payload(args)),
                    None => action,
                }
            }),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Build an action from call arguments.
    pub fn create(&self, args: &[Value]) -> Action {
        (self.build)(args)
    }

    /// Bind this creator to a dispatch function.
    pub fn bind(&self, dispatch: Dispatch) -> BoundAction {
        BoundAction {
            creator: self.clone(),
            dispatch,
            extension: None,
        }
    }
}

impl fmt::Debug for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// An action creator bound to a store: calling it dispatches.
#[derive(Clone)]
pub struct BoundAction {
    creator: ActionCreator,
    dispatch: Dispatch,
    extension: Option<DispatchExtension>,
}

impl BoundAction {
    pub(crate) fn with_extension(mut self, extension: Option<DispatchExtension>) -> Self {
        self.extension = extension;
        self
    }

    pub fn identifier(&self) -> &str {
        self.creator.identifier()
    }

    /// Build and dispatch the action, then run the dispatch extension if any.
    pub fn call(&self, args: &[Value]) -> Action {
        let dispatched = (self.dispatch)(self.creator.create(args));
        if let Some(extension) = &self.extension {
            extension(&self.dispatch, args);
        }
        dispatched
    }
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("identifier", &self.creator.identifier)
            .field("extended", &self.extension.is_some())
            .finish_non_exhaustive()
    }
}

/// Bind every creator in a mapping to `dispatch`.
pub fn bind_action_creators<'a, I>(creators: I, dispatch: &Dispatch) -> BTreeMap<String, BoundAction>
where
    I: IntoIterator<Item = (&'a String, &'a ActionCreator)>,
{
    creators
        .into_iter()
        .map(|(key, creator)| (key.clone(), creator.bind(Arc::clone(dispatch))))
        .collect()
}
