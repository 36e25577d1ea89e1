//! State visibility filters.
//!
//! Filters decide which top-level state keys a connected view may see.
//! Stacked filters only ever widen visibility.

mod filter;

pub use filter::{
    apply_filters, custom, exclude, include, permissive, restrictive, KeyPredicate, StateFilter,
};
