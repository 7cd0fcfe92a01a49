//! Per-call options and routed validator parameters
//!
//! A validation run receives one [`Options`] bag. Each validator declares the
//! parameter names it understands, with defaults, when it is registered. At
//! call time the engine routes the intersection: a declared name present in
//! the options gets the caller's value, a declared name absent from the
//! options gets the registered default, and undeclared options are never
//! passed.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ParamError;

// ============================================================================
// OPTIONS
// ============================================================================

/// Caller-supplied options for one validation run, in insertion order.
///
/// # Examples
///
/// ```rust
/// use arbor_validator::Options;
///
/// let options = Options::new().with("min_count", 2).with("min_lat", 40.5);
/// assert_eq!(options.len(), 2);
/// assert!(options.contains("min_lat"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(IndexMap<String, JsonValue>);

impl Options {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option, replacing any earlier value under the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts an option in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Looks up an option.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.0.get(name)
    }

    /// Returns `true` if the option is set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Option names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<JsonValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

// ============================================================================
// PARAMETER DECLARATIONS
// ============================================================================

/// A parameter a validator accepts, with the value it receives when the
/// caller does not supply one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Default value.
    pub default: JsonValue,
}

/// The parameters routed to one validator invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(IndexMap<String, JsonValue>);

impl Params {
    /// Routes `options` through `specs`.
    pub(crate) fn route(specs: &[ParamSpec], options: &Options) -> Self {
        Self(
            specs
                .iter()
                .map(|spec| {
                    let value = options.get(&spec.name).unwrap_or(&spec.default);
                    (spec.name.clone(), value.clone())
                })
                .collect(),
        )
    }

    /// Reads a parameter as `T`.
    ///
    /// # Errors
    ///
    /// [`ParamError::Undeclared`] when the validator did not declare `name`,
    /// [`ParamError::Type`] when the value does not fit `T`. Both convert
    /// into [`Failure::Fault`](crate::Failure::Fault) with `?`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, ParamError> {
        let value = self
            .0
            .get(name)
            .ok_or_else(|| ParamError::Undeclared(name.to_owned()))?;
        T::deserialize(value).map_err(|source| ParamError::Type {
            name: name.to_owned(),
            source,
        })
    }

    /// The raw routed value.
    pub fn raw(&self, name: &str) -> Option<&JsonValue> {
        self.0.get(name)
    }

    /// Returns `true` if `name` was routed.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of routed parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was routed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Routed names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
