use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::action::{ActionCreator, Dispatch, DispatchExtension};
use crate::connector::{ActionProps, Connection, MapDispatchToProps, MapStateToProps};
use crate::error::Result;
use crate::filter::{apply_filters, custom, include, StateFilter};
use crate::namespace::nest;
use crate::reducer::Reducer;
use crate::registry::Registry;

/// Collects what one view needs from the store: action creators to bind
/// and filters deciding which state it sees.
///
/// Starts with a restrictive filter, so only global reducer state is
/// visible until filters are added.
///
/// # Examples
///
/// ```
/// use radux::{Registry, Reducer, StateConnector, StoreConfig};
/// use serde_json::json;
///
/// let registry = Registry::new();
/// let todos = std::sync::Arc::new(
///     Reducer::new("todos", json!({"items": []}))
///         .add_action("clear", |_, _| json!({"items": []})),
/// );
/// registry.register_reducer("todos", todos.clone()).unwrap();
/// let store = registry.create_store(StoreConfig::new()).unwrap();
///
/// let connection = StateConnector::with_registry(registry)
///     .use_reducer(todos)
///     .connect()
///     .unwrap();
/// let props = connection.props(&store);
/// assert!(props.state.contains_key("todos"));
/// assert!(props.actions.get("todos", "clear").is_some());
/// ```
#[derive(Clone)]
pub struct StateConnector {
    registry: Arc<Registry>,
    filters: Vec<StateFilter>,
    action_creators: BTreeMap<String, ActionCreator>,
    reducers: Vec<Arc<Reducer>>,
}

impl StateConnector {
    /// Connector reading the current registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::current())
    }

    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            filters: vec![StateFilter::Restrictive],
            action_creators: BTreeMap::new(),
            reducers: Vec::new(),
        }
    }

    /// Merge in action creators; later calls win per key.
    pub fn add_action_creators<I>(mut self, creators: I) -> Self
    where
        I: IntoIterator<Item = (String, ActionCreator)>,
    {
        self.action_creators.extend(creators);
        self
    }

    /// Append a filter to the stack.
    pub fn add_state_filter(mut self, filter: impl Into<StateFilter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Append a filter accepting the keys `predicate` accepts.
    pub fn add_state_predicate<F>(self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.add_state_filter(custom(predicate))
    }

    /// Append a filter given as a dynamic shorthand.
    ///
    /// See [`StateFilter::from_shorthand`] for the accepted forms.
    pub fn try_add_state_filter(self, shorthand: &Value) -> Result<Self> {
        Ok(self.add_state_filter(StateFilter::from_shorthand(shorthand)?))
    }

    #[deprecated(note = "use `add_state_filter`")]
    pub fn set_state_filter(self, filter: impl Into<StateFilter>) -> Self {
        tracing::warn!(
            "set_state_filter is deprecated and will be removed; use add_state_filter instead"
        );
        self.add_state_filter(filter)
    }

    /// Take the reducer's action creators and make its slice visible.
    pub fn use_reducer(mut self, reducer: impl Into<Arc<Reducer>>) -> Self {
        let reducer = reducer.into();
        self = self
            .add_action_creators(reducer.action_creators().clone())
            .add_state_filter(include([reducer.namespace()]));
        self.reducers.push(reducer);
        self
    }

    pub fn state_filters(&self) -> &[StateFilter] {
        &self.filters
    }

    pub fn action_creators(&self) -> &BTreeMap<String, ActionCreator> {
        &self.action_creators
    }

    /// Build the dispatch mapping for this connector's creators.
    pub fn build_dispatch_to_props(&self) -> Result<MapDispatchToProps> {
        self.build_dispatch_to_props_with(BTreeMap::new())
    }

    /// Build the dispatch mapping over global creators, this connector's
    /// creators and `extra`, later sources winning per key.
    ///
    /// Fails if any identifier nests deeper than `namespace/action`.
    pub fn build_dispatch_to_props_with(
        &self,
        extra: BTreeMap<String, ActionCreator>,
    ) -> Result<MapDispatchToProps> {
        let mut creators = self.registry.global_action_creators();
        creators.extend(self.action_creators.clone());
        creators.extend(extra);

        let tree = nest(creators)?;
        let extensions: BTreeMap<String, DispatchExtension> = self
            .reducers
            .iter()
            .flat_map(|reducer| reducer.dispatch_extensions().clone())
            .collect();

        Ok(Arc::new(move |dispatch: Dispatch| {
            ActionProps::new(
                tree.iter()
                    .map(|(key, node)| {
                        let bound = node.map(|creator| {
                            creator
                                .bind(Arc::clone(&dispatch))
                                .with_extension(extensions.get(creator.identifier()).cloned())
                        });
                        (key.clone(), bound)
                    })
                    .collect(),
            )
        }))
    }

    /// Build the state mapping for this connector's filters.
    ///
    /// State owned by global reducers is always visible.
    pub fn build_state_to_props(&self) -> MapStateToProps {
        let registry = Arc::clone(&self.registry);
        let filters = self.filters.clone();
        Arc::new(move |state: &Value| {
            let Value::Object(state) = state else {
                return Map::new();
            };
            let mut visible = apply_filters(&filters, state);
            for name in registry.global_reducer_names() {
                if let Some(slice) = state.get(&name) {
                    visible.insert(name, slice.clone());
                }
            }
            visible
        })
    }

    /// Both mappings, bundled.
    pub fn connect(&self) -> Result<Connection> {
        Ok(Connection::new(
            self.build_state_to_props(),
            self.build_dispatch_to_props()?,
        ))
    }
}

impl Default for StateConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateConnector")
            .field("filters", &self.filters)
            .field("action_creators", &self.action_creators.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
