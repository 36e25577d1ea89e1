//! Action identifier namespacing.
//!
//! Every action a [`Reducer`](crate::Reducer) handles is known process-wide
//! by a fully-qualified identifier of the form `namespace/action`. This
//! module builds, splits and regroups those identifiers.

use std::collections::BTreeMap;

use crate::error::{RaduxError, Result};

/// Separator between a namespace and a local action name.
pub const SEPARATOR: char = '/';

/// Qualify a local action name with a namespace.
///
/// Names that already contain a separator are returned unchanged, so
/// qualifying twice is harmless.
///
/// ```
/// use radux::namespace::qualify;
///
/// assert_eq!(qualify("todos", "add"), "todos/add");
/// assert_eq!(qualify("todos", "todos/add"), "todos/add");
/// ```
pub fn qualify(namespace: &str, local: &str) -> String {
    if local.contains(SEPARATOR) {
        return local.to_string();
    }
    format!("{namespace}{SEPARATOR}{local}")
}

/// The part of an identifier after its last separator.
pub fn local_part(identifier: &str) -> &str {
    identifier
        .rsplit_once(SEPARATOR)
        .map_or(identifier, |(_, local)| local)
}

/// Split an identifier into its namespace (if any) and local name.
///
/// Fails when the identifier nests deeper than `namespace/action` or has
/// an empty segment.
pub fn split(identifier: &str) -> Result<(Option<&str>, &str)> {
    let Some((namespace, local)) = identifier.split_once(SEPARATOR) else {
        return Ok((None, identifier));
    };
    if local.contains(SEPARATOR) {
        return Err(RaduxError::malformed(
            identifier,
            "action identifiers deeper than two levels are not supported",
        ));
    }
    if namespace.is_empty() || local.is_empty() {
        return Err(RaduxError::malformed(identifier, "empty identifier segment"));
    }
    Ok((Some(namespace), local))
}

/// Check that a name can serve as a namespace or registry key.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RaduxError::malformed(name, "names must not be empty"));
    }
    if name.contains(SEPARATOR) {
        return Err(RaduxError::malformed(
            name,
            "names must not contain the namespace separator",
        ));
    }
    Ok(())
}

/// One entry of an [`ActionTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionNode<T> {
    /// An identifier without a namespace.
    Action(T),
    /// All actions sharing one namespace, keyed by local name.
    Group(BTreeMap<String, T>),
}

impl<T> ActionNode<T> {
    /// Transform every value held by this node.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> ActionNode<U> {
        match self {
            ActionNode::Action(value) => ActionNode::Action(f(value)),
            ActionNode::Group(group) => ActionNode::Group(
                group
                    .iter()
                    .map(|(local, value)| (local.clone(), f(value)))
                    .collect(),
            ),
        }
    }
}

/// Two-level view of a flat `namespace/action` keyed mapping.
pub type ActionTree<T> = BTreeMap<String, ActionNode<T>>;

/// Regroup a flat mapping keyed by identifiers into `{ namespace: { local: value } }`.
///
/// Keys without a separator stay at the top level. A key that nests deeper
/// than two levels, or a bare key that collides with a namespace group,
/// is rejected.
///
/// ```
/// use radux::namespace::{nest, ActionNode};
///
/// let tree = nest([("a/x".to_string(), 1), ("a/y".to_string(), 2)]).unwrap();
/// let ActionNode::Group(group) = &tree["a"] else { panic!() };
/// assert_eq!(group.len(), 2);
///
/// assert!(nest([("a/b/c".to_string(), 1)]).is_err());
/// ```
pub fn nest<T>(flat: impl IntoIterator<Item = (String, T)>) -> Result<ActionTree<T>> {
    let mut tree = ActionTree::new();
    for (key, value) in flat {
        match split(&key)? {
            (None, name) => {
                if let Some(ActionNode::Group(_)) = tree.get(name) {
                    return Err(RaduxError::malformed(
                        key.as_str(),
                        "collides with an action namespace of the same name",
                    ));
                }
                tree.insert(name.to_string(), ActionNode::Action(value));
            }
            (Some(namespace), local) => {
                let node = tree
                    .entry(namespace.to_string())
                    .or_insert_with(|| ActionNode::Group(BTreeMap::new()));
                match node {
                    ActionNode::Group(group) => {
                        group.insert(local.to_string(), value);
                    }
                    ActionNode::Action(_) => {
                        return Err(RaduxError::malformed(
                            key.as_str(),
                            "collides with an action namespace of the same name",
                        ));
                    }
                }
            }
        }
    }
    Ok(tree)
}
