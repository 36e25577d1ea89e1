use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};

use crate::action::{Action, ActionCreator};
use crate::error::{RaduxError, Result};
use crate::namespace::validate_name;
use crate::reducer::{ReduceFn, Reducer};
use crate::store::{combine_reducers, Middleware, Store};

/// Name of the store used when none is given.
pub const DEFAULT_STORE: &str = "default";

/// A reducer as a store combines it.
#[derive(Clone)]
pub enum ReducerEntry {
    /// A namespaced [`Reducer`], registered alongside the store.
    Managed(Arc<Reducer>),
    /// A plain reduction function, passed through untouched.
    Raw(ReduceFn),
}

impl ReducerEntry {
    /// Wrap a plain reduction function.
    pub fn raw<F>(reduce: F) -> Self
    where
        F: Fn(Option<&Value>, &Action) -> Value + Send + Sync + 'static,
    {
        ReducerEntry::Raw(Arc::new(reduce))
    }

    fn into_reduce_fn(self) -> ReduceFn {
        match self {
            ReducerEntry::Managed(reducer) => reducer.to_reduce_fn(),
            ReducerEntry::Raw(reduce) => reduce,
        }
    }
}

impl From<Reducer> for ReducerEntry {
    fn from(reducer: Reducer) -> Self {
        ReducerEntry::Managed(Arc::new(reducer))
    }
}

impl From<Arc<Reducer>> for ReducerEntry {
    fn from(reducer: Arc<Reducer>) -> Self {
        ReducerEntry::Managed(reducer)
    }
}

impl std::fmt::Debug for ReducerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReducerEntry::Managed(reducer) => f.debug_tuple("Managed").field(reducer).finish(),
            ReducerEntry::Raw(_) => f.write_str("Raw(..)"),
        }
    }
}

/// Settings for [`Registry::create_named_store`].
#[derive(Default)]
pub struct StoreConfig {
    reducers: BTreeMap<String, ReducerEntry>,
    initial_state: Map<String, Value>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reducer for this store only. Managed reducers are also
    /// registered under the store's name.
    pub fn reducer(mut self, name: impl Into<String>, reducer: impl Into<ReducerEntry>) -> Self {
        self.reducers.insert(name.into(), reducer.into());
        self
    }

    /// Preloaded state, keyed by reducer name.
    pub fn initial_state(mut self, state: Map<String, Value>) -> Self {
        self.initial_state = state;
        self
    }

    /// Append a middleware to the dispatch chain.
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }
}

#[derive(Default)]
struct RegistryState {
    reducers: HashMap<String, BTreeMap<String, Arc<Reducer>>>,
    globals: BTreeMap<String, Arc<Reducer>>,
    stores: HashMap<String, Store>,
}

/// Registry of reducers and the stores built from them.
///
/// Supports both a global registry (default) and scoped registries for
/// isolation, the same way the free functions in the crate root pick
/// [`Registry::current`].
///
/// # Examples
///
/// ```
/// use radux::{Reducer, Registry, StoreConfig};
/// use serde_json::json;
///
/// let registry = Registry::new();
/// registry
///     .register_reducer("todos", Reducer::new("todos", json!({"items": []})))
///     .unwrap();
/// let store = registry.create_store(StoreConfig::new()).unwrap();
/// assert_eq!(store.get_state(), json!({"todos": {"items": []}}));
/// ```
pub struct Registry {
    inner: RwLock<RegistryState>,
}

// Thread-local stack for scoped registries
thread_local! {
    static REGISTRY_STACK: RefCell<Vec<Arc<Registry>>> = const { RefCell::new(Vec::new()) };
}

impl Registry {
    /// Create a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Registry {
            inner: RwLock::new(RegistryState::default()),
        })
    }

    /// Run a function with a fresh isolated registry.
    ///
    /// The registry and every store it created are dropped when the
    /// function returns, unless handles escape it.
    ///
    /// ```
    /// use radux::{Reducer, Registry};
    /// use serde_json::json;
    ///
    /// Registry::scope(|| {
    ///     radux::register_reducer("todos", Reducer::new("todos", json!({}))).unwrap();
    ///     assert_eq!(Registry::current().reducer_names(radux::DEFAULT_STORE), ["todos"]);
    /// });
    /// ```
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        Self::with_registry(Self::new(), f)
    }

    /// The process-wide registry used when no scoped registry is active.
    pub fn global() -> Arc<Self> {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();
        Arc::clone(REGISTRY.get_or_init(Self::new))
    }

    /// The innermost scoped registry on this thread, or the global one.
    pub fn current() -> Arc<Self> {
        REGISTRY_STACK.with(|stack| stack.borrow().last().cloned().unwrap_or_else(Self::global))
    }

    /// Run a function with `registry` as the current registry.
    pub fn with_registry<F, R>(registry: Arc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        REGISTRY_STACK.with(|stack| {
            stack.borrow_mut().push(registry);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        REGISTRY_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    /// Forget every reducer and store.
    pub fn clear(&self) {
        *self.write() = RegistryState::default();
    }

    /// Register a reducer with the default store.
    pub fn register_reducer(&self, name: &str, reducer: impl Into<Arc<Reducer>>) -> Result<()> {
        self.register_named_reducer(DEFAULT_STORE, name, reducer)
    }

    /// Register a reducer with a named store. A later registration under
    /// the same name replaces the earlier one.
    pub fn register_named_reducer(
        &self,
        store_name: &str,
        name: &str,
        reducer: impl Into<Arc<Reducer>>,
    ) -> Result<()> {
        let reducer = reducer.into();
        validate_name(name)?;
        validate_reducer(name, &reducer)?;

        let mut inner = self.write();
        let replaced = inner
            .reducers
            .entry(store_name.to_string())
            .or_default()
            .insert(name.to_string(), reducer)
            .is_some();
        if replaced {
            tracing::warn!(store = store_name, reducer = name, "replacing registered reducer");
        } else {
            tracing::debug!(store = store_name, reducer = name, "registered reducer");
        }
        Ok(())
    }

    pub fn register_reducers<I, R>(&self, reducers: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, R)>,
        R: Into<Arc<Reducer>>,
    {
        self.register_named_reducers(DEFAULT_STORE, reducers)
    }

    /// Register several reducers with a named store.
    ///
    /// Stops at the first invalid entry; earlier entries stay registered.
    pub fn register_named_reducers<I, R>(&self, store_name: &str, reducers: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, R)>,
        R: Into<Arc<Reducer>>,
    {
        reducers
            .into_iter()
            .try_for_each(|(name, reducer)| self.register_named_reducer(store_name, &name, reducer))
    }

    /// Register a reducer with every store, under its own namespace.
    ///
    /// Its state is always visible to connectors and its action creators
    /// are always bound.
    pub fn register_global_reducer(&self, reducer: impl Into<Arc<Reducer>>) -> Result<()> {
        let reducer = reducer.into();
        let name = reducer.namespace().to_string();
        validate_name(&name)?;
        validate_reducer(&name, &reducer)?;

        if self.write().globals.insert(name.clone(), reducer).is_some() {
            tracing::warn!(reducer = %name, "replacing global reducer");
        } else {
            tracing::debug!(reducer = %name, "registered global reducer");
        }
        Ok(())
    }

    /// Create the default store.
    pub fn create_store(&self, config: StoreConfig) -> Result<Store> {
        self.create_named_store(DEFAULT_STORE, config)
    }

    /// Create (or replace) the store called `store_name`.
    ///
    /// Its reducers are the global reducers, then those registered for
    /// `store_name`, then the config's own; later sources win on a name
    /// collision.
    pub fn create_named_store(&self, store_name: &str, config: StoreConfig) -> Result<Store> {
        let StoreConfig {
            reducers: extra,
            initial_state,
            middleware,
        } = config;

        for (name, entry) in &extra {
            validate_name(name)?;
            if let ReducerEntry::Managed(reducer) = entry {
                validate_reducer(name, reducer)?;
            }
        }

        let entries = {
            let mut inner = self.write();
            let registered = inner.reducers.entry(store_name.to_string()).or_default();
            for (name, entry) in &extra {
                if let ReducerEntry::Managed(reducer) = entry {
                    registered.insert(name.clone(), Arc::clone(reducer));
                }
            }

            let mut entries: BTreeMap<String, ReducerEntry> = inner
                .globals
                .iter()
                .map(|(name, reducer)| (name.clone(), ReducerEntry::Managed(Arc::clone(reducer))))
                .collect();
            if let Some(registered) = inner.reducers.get(store_name) {
                entries.extend(
                    registered
                        .iter()
                        .map(|(name, reducer)| (name.clone(), ReducerEntry::Managed(Arc::clone(reducer)))),
                );
            }
            entries.extend(extra);
            entries
        };

        tracing::debug!(
            store = store_name,
            reducers = ?entries.keys().collect::<Vec<_>>(),
            "creating store"
        );

        let reducer = combine_reducers(
            entries
                .into_iter()
                .map(|(name, entry)| (name, entry.into_reduce_fn()))
                .collect(),
        );
        let store = Store::new(store_name, reducer, initial_state, middleware);

        if self
            .write()
            .stores
            .insert(store_name.to_string(), store.clone())
            .is_some()
        {
            tracing::debug!(store = store_name, "replaced existing store");
        }
        Ok(store)
    }

    /// The default store, if it was created.
    pub fn get_store(&self) -> Option<Store> {
        self.get_named_store(DEFAULT_STORE)
    }

    pub fn get_named_store(&self, store_name: &str) -> Option<Store> {
        self.read().stores.get(store_name).cloned()
    }

    /// Current state of a store.
    pub fn get_state(&self, store_name: &str) -> Result<Value> {
        Ok(self.require_store(store_name)?.get_state())
    }

    /// Dispatch to the default store.
    pub fn dispatch(&self, action: Action) -> Result<Action> {
        self.dispatch_to(DEFAULT_STORE, action)
    }

    /// Dispatch to a named store.
    pub fn dispatch_to(&self, store_name: &str, action: Action) -> Result<Action> {
        Ok(self.require_store(store_name)?.dispatch(action))
    }

    /// Names of the reducers registered for a store, excluding globals.
    pub fn reducer_names(&self, store_name: &str) -> Vec<String> {
        self.read()
            .reducers
            .get(store_name)
            .map(|reducers| reducers.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Names (namespaces) of the global reducers.
    pub fn global_reducer_names(&self) -> Vec<String> {
        self.read().globals.keys().cloned().collect()
    }

    /// Action creators of every global reducer.
    pub fn global_action_creators(&self) -> BTreeMap<String, ActionCreator> {
        self.read()
            .globals
            .values()
            .flat_map(|reducer| reducer.action_creators().clone())
            .collect()
    }

    fn require_store(&self, store_name: &str) -> Result<Store> {
        self.get_named_store(store_name)
            .ok_or_else(|| RaduxError::MissingStore {
                name: store_name.to_string(),
            })
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_reducer(name: &str, reducer: &Reducer) -> Result<()> {
    if reducer.initial_state().is_object() {
        return Ok(());
    }
    Err(RaduxError::InvalidReducerType {
        name: name.to_string(),
        reason: "initial state must be a JSON object",
    })
}
