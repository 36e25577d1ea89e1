//! Crate-level error type.

/// Errors raised by registration, store access and connector building.
///
/// Every variant is reported at the call that detects it. Dispatching an
/// action no reducer handles is not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RaduxError {
    /// An action identifier, namespace or registry name has the wrong shape.
    ///
    /// Identifiers support at most one separator (`namespace/action`).
    #[error("malformed action identifier `{identifier}`: {reason}")]
    MalformedIdentifier {
        identifier: String,
        reason: &'static str,
    },

    /// A dynamic filter shorthand could not be turned into a state filter.
    #[error("invalid state filter argument: {found}")]
    InvalidFilterArgument { found: String },

    /// Dispatch or state access targeted a store that was never created.
    #[error("no store named `{name}` has been created")]
    MissingStore { name: String },

    /// A reducer cannot be combined into a store.
    #[error("reducer `{name}` cannot be combined into a store: {reason}")]
    InvalidReducerType { name: String, reason: &'static str },
}

impl RaduxError {
    pub(crate) fn malformed(identifier: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.into(),
            reason,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = RaduxError> = std::result::Result<T, E>;
