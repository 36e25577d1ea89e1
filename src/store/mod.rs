//! Stores: combined state, dispatch and subscription.
//!
//! A [`Store`] owns the state produced by a combined reduction function
//! and runs every dispatched action through its middleware chain.

mod combine;
mod middleware;
mod store;

pub use combine::combine_reducers;
pub use middleware::{ActionLogger, Middleware, Next};
pub use store::{Store, INIT_ACTION};
