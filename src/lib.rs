//! # Radux
//!
//! Namespaced reducers, named stores and filtered state connections.
//!
//! Radux keeps the bookkeeping around a reducer/store architecture in one
//! place:
//!
//! ## Reducers
//!
//! - [`Reducer`] - one namespace's initial state, action creators and transitions
//! - Actions are identified as `namespace/action` (see [`namespace`])
//! - Transition results are shallow-merged onto the current slice
//!
//! ## Stores
//!
//! - [`Registry`] - reducers registered per store name, plus global reducers
//!   merged into every store
//! - [`Store`] - combined state with dispatch, subscription and middleware
//!
//! ## Connections
//!
//! - [`StateConnector`] - builds state-to-props and dispatch-to-props
//!   mappings for a view
//! - [`StateFilter`] - decides which top-level state keys a view sees
//!
//! The free functions below act on [`Registry::current`], which is the
//! process-wide registry unless a [`Registry::scope`] is active.
//!
//! ```
//! use radux::{Registry, StoreConfig};
//! use serde_json::{json, Map, Value};
//!
//! Registry::scope(|| {
//!     let counter = radux::reducer("jest", json!({"v": 0})).add_action_with(
//!         "add",
//!         |args: &[Value]| Map::from_iter([("value".to_string(), args[0].clone())]),
//!         |state: &Value, action: &radux::Action| {
//!             json!({"v": state["v"].as_i64().unwrap_or(0) + action["value"].as_i64().unwrap_or(0)})
//!         },
//!     );
//!     let add = counter.action_creator("add").unwrap().clone();
//!
//!     radux::register_reducer("jest", counter).unwrap();
//!     radux::create_store(StoreConfig::new()).unwrap();
//!     radux::dispatch(add.create(&[json!(10)])).unwrap();
//!
//!     let state = radux::get_store().unwrap().get_state();
//!     assert_eq!(state["jest"]["v"], json!(10));
//! });
//! ```

pub mod action;
pub mod connector;
pub mod error;
pub mod filter;
pub mod namespace;
pub mod reducer;
pub mod registry;
pub mod store;

use std::sync::Arc;

use serde_json::Value;

// Re-export main types for convenience
pub use action::{bind_action_creators, Action, ActionCreator, BoundAction, Dispatch};
pub use connector::{ActionProps, Connection, Props, StateConnector};
pub use error::{RaduxError, Result};
pub use filter::{custom, exclude, include, permissive, restrictive, StateFilter};
pub use reducer::{ActionDef, Reducer};
pub use registry::{ReducerEntry, Registry, StoreConfig, DEFAULT_STORE};
pub use store::{ActionLogger, Middleware, Store};

/// Create a reducer for `namespace`.
pub fn reducer(namespace: impl Into<String>, initial_state: Value) -> Reducer {
    Reducer::new(namespace, initial_state)
}

/// Create a connector bound to the current registry.
pub fn state_connector() -> StateConnector {
    StateConnector::new()
}

/// Register a reducer with the default store.
pub fn register_reducer(name: &str, reducer: impl Into<Arc<Reducer>>) -> Result<()> {
    Registry::current().register_reducer(name, reducer)
}

/// Register a reducer with a named store.
pub fn register_named_reducer(
    store_name: &str,
    name: &str,
    reducer: impl Into<Arc<Reducer>>,
) -> Result<()> {
    Registry::current().register_named_reducer(store_name, name, reducer)
}

/// Register several reducers with the default store.
pub fn register_reducers<I, R>(reducers: I) -> Result<()>
where
    I: IntoIterator<Item = (String, R)>,
    R: Into<Arc<Reducer>>,
{
    Registry::current().register_reducers(reducers)
}

/// Register several reducers with a named store.
pub fn register_named_reducers<I, R>(store_name: &str, reducers: I) -> Result<()>
where
    I: IntoIterator<Item = (String, R)>,
    R: Into<Arc<Reducer>>,
{
    Registry::current().register_named_reducers(store_name, reducers)
}

/// Register a reducer with every store.
pub fn register_global_reducer(reducer: impl Into<Arc<Reducer>>) -> Result<()> {
    Registry::current().register_global_reducer(reducer)
}

/// Create the default store.
pub fn create_store(config: StoreConfig) -> Result<Store> {
    Registry::current().create_store(config)
}

/// Create a named store.
pub fn create_named_store(store_name: &str, config: StoreConfig) -> Result<Store> {
    Registry::current().create_named_store(store_name, config)
}

/// The default store, if created.
pub fn get_store() -> Option<Store> {
    Registry::current().get_store()
}

/// A named store, if created.
pub fn get_named_store(store_name: &str) -> Option<Store> {
    Registry::current().get_named_store(store_name)
}

/// Dispatch to the default store.
pub fn dispatch(action: Action) -> Result<Action> {
    Registry::current().dispatch(action)
}

/// Dispatch to a named store.
pub fn dispatch_to(store_name: &str, action: Action) -> Result<Action> {
    Registry::current().dispatch_to(store_name, action)
}
