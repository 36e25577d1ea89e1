//! Namespaced reducers.
//!
//! A [`Reducer`] owns one slice of store state: its initial value, the
//! action creators for its namespace and the transitions those actions
//! trigger.

mod reducer;

pub use reducer::{shallow_merge, ActionDef, ReduceFn, Reducer, Transition};
