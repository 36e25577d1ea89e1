use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::action::{Action, BoundAction, Dispatch};
use crate::namespace::{ActionNode, ActionTree};
use crate::store::Store;

/// Builds the visible state for a view from the full store state.
pub type MapStateToProps = Arc<dyn Fn(&Value) -> Map<String, Value> + Send + Sync>;

/// Binds a view's action creators to a dispatch function.
pub type MapDispatchToProps = Arc<dyn Fn(Dispatch) -> ActionProps + Send + Sync>;

/// Bound action creators grouped by namespace.
#[derive(Debug, Clone, Default)]
pub struct ActionProps {
    actions: ActionTree<BoundAction>,
}

impl ActionProps {
    pub(crate) fn new(actions: ActionTree<BoundAction>) -> Self {
        Self { actions }
    }

    /// A namespaced bound action.
    pub fn get(&self, namespace: &str, name: &str) -> Option<&BoundAction> {
        self.group(namespace)?.get(name)
    }

    /// Every bound action of one namespace.
    pub fn group(&self, namespace: &str) -> Option<&BTreeMap<String, BoundAction>> {
        match self.actions.get(namespace)? {
            ActionNode::Group(group) => Some(group),
            ActionNode::Action(_) => None,
        }
    }

    /// A bound action registered without a namespace.
    pub fn root(&self, name: &str) -> Option<&BoundAction> {
        match self.actions.get(name)? {
            ActionNode::Action(action) => Some(action),
            ActionNode::Group(_) => None,
        }
    }

    /// Call a namespaced bound action, if it exists.
    pub fn call(&self, namespace: &str, name: &str, args: &[Value]) -> Option<Action> {
        self.get(namespace, name).map(|action| action.call(args))
    }

    pub fn tree(&self) -> &ActionTree<BoundAction> {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// What a connected view receives.
#[derive(Debug, Clone)]
pub struct Props {
    pub state: Map<String, Value>,
    pub actions: ActionProps,
}

/// The two mapping functions for one view, ready to apply to a store.
#[derive(Clone)]
pub struct Connection {
    map_state: MapStateToProps,
    map_dispatch: MapDispatchToProps,
}

impl Connection {
    pub(crate) fn new(map_state: MapStateToProps, map_dispatch: MapDispatchToProps) -> Self {
        Self {
            map_state,
            map_dispatch,
        }
    }

    pub fn map_state_to_props(&self) -> &MapStateToProps {
        &self.map_state
    }

    pub fn map_dispatch_to_props(&self) -> &MapDispatchToProps {
        &self.map_dispatch
    }

    /// Props for `store`'s current state, with actions bound to it.
    pub fn props(&self, store: &Store) -> Props {
        Props {
            state: store.read(|state| (self.map_state)(state)),
            actions: (self.map_dispatch)(store.dispatcher()),
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").finish_non_exhaustive()
    }
}
