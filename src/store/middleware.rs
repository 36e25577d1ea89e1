use crate::action::Action;
use crate::store::Store;

/// The rest of a middleware chain.
pub type Next<'a> = &'a dyn Fn(Action) -> Action;

/// A link in a store's dispatch chain.
///
/// Middleware may inspect the store, rewrite the action, forward it with
/// `next` or swallow it by returning without calling `next`.
pub trait Middleware: Send + Sync {
    fn handle(&self, store: &Store, action: Action, next: Next<'_>) -> Action;
}

impl<F> Middleware for F
where
    F: Fn(&Store, Action, Next<'_>) -> Action + Send + Sync,
{
    fn handle(&self, store: &Store, action: Action, next: Next<'_>) -> Action {
        self(store, action, next)
    }
}

/// Logs every action and the resulting state at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionLogger;

impl Middleware for ActionLogger {
    fn handle(&self, store: &Store, action: Action, next: Next<'_>) -> Action {
        tracing::debug!(store = store.name(), action = action.kind(), "dispatching");
        let action = next(action);
        store.read(|state| {
            tracing::debug!(store = store.name(), action = action.kind(), %state, "next state");
        });
        action
    }
}
