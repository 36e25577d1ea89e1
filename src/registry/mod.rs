//! Reducer registration and named stores.
//!
//! A [`Registry`] maps store names to the reducers registered for them,
//! keeps the global reducers merged into every store, and holds the
//! stores it has created.

mod registry;

pub use registry::{ReducerEntry, Registry, StoreConfig, DEFAULT_STORE};
