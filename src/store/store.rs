use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::action::{Action, Dispatch};
use crate::reducer::ReduceFn;
use crate::store::Middleware;

/// Type of the action a store dispatches to seed its state.
pub const INIT_ACTION: &str = "@@radux/INIT";

type Subscriber = Arc<dyn Fn(&Value) + Send + Sync>;

/// A thread-safe store holding combined reducer state.
///
/// Clones share the same state, subscribers and middleware.
///
/// Reducers run while the state is locked and must not touch the same
/// store. Subscribers run with no lock held and may dispatch or subscribe.
pub struct Store {
    name: Arc<str>,
    reducer: ReduceFn,
    middleware: Arc<[Arc<dyn Middleware>]>,
    state: Arc<RwLock<Value>>,
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
}

impl Store {
    /// Create a store and seed its state from `preloaded`.
    ///
    /// Slices missing from `preloaded` start at their reducer's initial state.
    pub fn new(
        name: impl Into<String>,
        reducer: ReduceFn,
        preloaded: Map<String, Value>,
        middleware: Vec<Arc<dyn Middleware>>,
    ) -> Self {
        let initial = reducer(Some(&Value::Object(preloaded)), &Action::new(INIT_ACTION));
        Self {
            name: Arc::from(name.into()),
            reducer,
            middleware: middleware.into(),
            state: Arc::new(RwLock::new(initial)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a clone of the current state.
    pub fn get_state(&self) -> Value {
        self.read(Value::clone)
    }

    /// Read state without cloning.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Value) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&*state)
    }

    /// Send an action through the middleware chain and the reducer.
    ///
    /// Returns the action as it left the middleware chain.
    pub fn dispatch(&self, action: Action) -> Action {
        tracing::trace!(store = %self.name, action = action.kind(), "dispatch");
        self.run_middleware(0, action)
    }

    /// This store's dispatch as a shareable function.
    pub fn dispatcher(&self) -> Dispatch {
        let store = self.clone();
        Arc::new(move |action| store.dispatch(action))
    }

    /// Subscribe to state changes.
    ///
    /// The callback will be called with the new state after every reduced action.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(callback));
    }

    fn run_middleware(&self, index: usize, action: Action) -> Action {
        match self.middleware.get(index) {
            Some(middleware) => {
                middleware.handle(self, action, &|action: Action| {
                    self.run_middleware(index + 1, action)
                })
            }
            None => self.reduce(action),
        }
    }

    fn reduce(&self, action: Action) -> Action {
        let next = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = (self.reducer)(Some(&*state), &action);
            state.clone()
        };
        self.notify(&next);
        action
    }

    /// Notify all subscribers of a state change.
    ///
    /// Subscribers added during notification are first called on the next
    /// change.
    fn notify(&self, state: &Value) {
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for subscriber in &subscribers {
            subscriber(state);
        }
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            reducer: Arc::clone(&self.reducer),
            middleware: Arc::clone(&self.middleware),
            state: Arc::clone(&self.state),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}
