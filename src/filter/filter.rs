use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{RaduxError, Result};

/// Caller-supplied key test.
pub type KeyPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A rule selecting which top-level state keys are visible.
#[derive(Clone, Default)]
pub enum StateFilter {
    /// Accepts nothing.
    #[default]
    Restrictive,
    /// Accepts every key.
    Permissive,
    /// Accepts the listed keys.
    Include(BTreeSet<String>),
    /// Accepts every key except the listed ones.
    Exclude(BTreeSet<String>),
    /// Accepts keys the predicate accepts.
    Custom(KeyPredicate),
    /// Accepts a key if any inner filter does.
    Any(Vec<StateFilter>),
}

impl StateFilter {
    /// Whether `key` passes this filter.
    pub fn test(&self, key: &str) -> bool {
        match self {
            StateFilter::Restrictive => false,
            StateFilter::Permissive => true,
            StateFilter::Include(keys) => keys.contains(key),
            StateFilter::Exclude(keys) => !keys.contains(key),
            StateFilter::Custom(predicate) => predicate(key),
            StateFilter::Any(filters) => filters.iter().any(|filter| filter.test(key)),
        }
    }

    /// Copy the accepted top-level entries of `state`.
    pub fn apply(&self, state: &Map<String, Value>) -> Map<String, Value> {
        state
            .iter()
            .filter(|(key, _)| self.test(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Combine with another filter; the result accepts what either accepts.
    pub fn or(self, other: StateFilter) -> StateFilter {
        match self {
            StateFilter::Any(mut filters) => {
                filters.push(other);
                StateFilter::Any(filters)
            }
            filter => StateFilter::Any(vec![filter, other]),
        }
    }

    /// Parse a dynamic filter shorthand.
    ///
    /// Accepts `"permissive"`, `"restrictive"`, an array of key strings
    /// (include), or an object with a single `include` or `exclude` array.
    ///
    /// ```
    /// use radux::StateFilter;
    /// use serde_json::json;
    ///
    /// let filter = StateFilter::from_shorthand(&json!(["todos"])).unwrap();
    /// assert!(filter.test("todos"));
    /// assert!(StateFilter::from_shorthand(&json!(42)).is_err());
    /// ```
    pub fn from_shorthand(shorthand: &Value) -> Result<StateFilter> {
        match shorthand {
            Value::String(marker) if marker == "permissive" => Ok(StateFilter::Permissive),
            Value::String(marker) if marker == "restrictive" => Ok(StateFilter::Restrictive),
            Value::Array(_) => key_list(shorthand).map(StateFilter::Include),
            Value::Object(object) if object.len() == 1 => {
                if let Some(keys) = object.get("include") {
                    key_list(keys).map(StateFilter::Include)
                } else if let Some(keys) = object.get("exclude") {
                    key_list(keys).map(StateFilter::Exclude)
                } else {
                    Err(invalid(shorthand))
                }
            }
            _ => Err(invalid(shorthand)),
        }
    }
}

fn invalid(found: &Value) -> RaduxError {
    RaduxError::InvalidFilterArgument {
        found: found.to_string(),
    }
}

fn key_list(value: &Value) -> Result<BTreeSet<String>> {
    let Value::Array(items) = value else {
        return Err(invalid(value));
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(item)))
        .collect()
}

impl fmt::Debug for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateFilter::Restrictive => f.write_str("Restrictive"),
            StateFilter::Permissive => f.write_str("Permissive"),
            StateFilter::Include(keys) => f.debug_tuple("Include").field(keys).finish(),
            StateFilter::Exclude(keys) => f.debug_tuple("Exclude").field(keys).finish(),
            StateFilter::Custom(_) => f.write_str("Custom(..)"),
            StateFilter::Any(filters) => f.debug_tuple("Any").field(filters).finish(),
        }
    }
}

impl From<Vec<String>> for StateFilter {
    fn from(keys: Vec<String>) -> Self {
        StateFilter::Include(keys.into_iter().collect())
    }
}

impl From<Vec<&str>> for StateFilter {
    fn from(keys: Vec<&str>) -> Self {
        include(keys)
    }
}

impl From<&[&str]> for StateFilter {
    fn from(keys: &[&str]) -> Self {
        include(keys.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for StateFilter {
    fn from(keys: [&str; N]) -> Self {
        include(keys)
    }
}

/// Filter accepting only `keys`.
pub fn include<I, S>(keys: I) -> StateFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    StateFilter::Include(keys.into_iter().map(Into::into).collect())
}

/// Filter accepting everything but `keys`.
pub fn exclude<I, S>(keys: I) -> StateFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    StateFilter::Exclude(keys.into_iter().map(Into::into).collect())
}

/// Filter driven by a predicate over keys.
pub fn custom<F>(predicate: F) -> StateFilter
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    StateFilter::Custom(Arc::new(predicate))
}

pub fn permissive() -> StateFilter {
    StateFilter::Permissive
}

pub fn restrictive() -> StateFilter {
    StateFilter::Restrictive
}

/// Union of every filter's output over `state`.
pub fn apply_filters(filters: &[StateFilter], state: &Map<String, Value>) -> Map<String, Value> {
    let mut visible = Map::new();
    for filter in filters {
        visible.extend(filter.apply(state));
    }
    visible
}
