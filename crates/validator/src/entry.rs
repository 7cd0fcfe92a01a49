//! Validator callables and registry entries
//!
//! A [`ValidatorFn`] is the unregistered form: a name, a callable, and the
//! parameters it declares. [`Registry::register`](crate::Registry::register)
//! turns it into an immutable [`ValidatorEntry`] bound to a namespace and a
//! target kind.

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use arbor_core::{Kind, Node, NodeRef, read_as, write_as};
use serde_json::Value as JsonValue;

use crate::error::Failure;
use crate::params::{Options, ParamSpec, Params};

/// The erased callable stored in an entry.
pub(crate) type Callable = dyn Fn(&NodeRef, &Params) -> Result<(), Failure> + Send + Sync;

/// What makes two registrations of the same name the same validator.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Identity {
    /// A function item or non-capturing closure: its type is the callable.
    Stateless(TypeId),
    /// A capturing closure. Its type says nothing about the captured state,
    /// so it never matches another registration.
    Stateful,
    /// Caller-supplied key, set with [`ValidatorFn::with_key`].
    Key(String),
}

impl Identity {
    fn of<F: 'static>() -> Self {
        if size_of::<F>() == 0 {
            Self::Stateless(TypeId::of::<F>())
        } else {
            Self::Stateful
        }
    }

    fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Stateless(a), Self::Stateless(b)) => a == b,
            (Self::Key(a), Self::Key(b)) => a == b,
            _ => false,
        }
    }
}

// ============================================================================
// VALIDATOR FN
// ============================================================================

/// A validator ready to be registered.
///
/// Re-registering a validator under a taken name is a no-op only when it is
/// provably the same validator: the same declared parameters and defaults,
/// and either the same function item (or non-capturing closure) or the same
/// key given to [`with_key`](Self::with_key). A closure that captures state
/// has no identity of its own; give it a key, or a distinct name per
/// captured value.
///
/// # Examples
///
/// ```rust,ignore
/// use arbor_validator::{Failure, Params, ValidatorFn, ensure};
///
/// fn has_min_children(group: &Group, params: &Params) -> Result<(), Failure> {
///     let min_count: usize = params.get("min_count")?;
///     ensure!(group.children.len() >= min_count, "expected at least {min_count} children");
///     Ok(())
/// }
///
/// let validator = ValidatorFn::typed("has_min_children", has_min_children).param("min_count", 1);
/// ```
pub struct ValidatorFn {
    name: String,
    params: Vec<ParamSpec>,
    callable: Arc<Callable>,
    identity: Identity,
}

impl ValidatorFn {
    /// Wraps a callable that receives the node handle itself.
    ///
    /// Use this form when the validator inspects the node through
    /// [`Node::attributes`] or needs to choose its own locking.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&NodeRef, &Params) -> Result<(), Failure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            callable: Arc::new(func),
            identity: Identity::of::<F>(),
        }
    }

    /// Wraps a callable over a concrete record type, run under a read lock.
    ///
    /// A node that is not a `T` yields a [`Failure::Fault`].
    pub fn typed<T, F>(name: impl Into<String>, func: F) -> Self
    where
        T: Node,
        F: Fn(&T, &Params) -> Result<(), Failure> + Send + Sync + 'static,
    {
        let callable = move |node: &NodeRef, params: &Params| match read_as::<T>(node) {
            Some(record) => func(&*record, params),
            None => Err(wrong_type::<T>(node)),
        };
        Self {
            name: name.into(),
            params: Vec::new(),
            callable: Arc::new(callable),
            identity: Identity::of::<F>(),
        }
    }

    /// Wraps a repairing callable over a concrete record type, run under a
    /// write lock.
    pub fn typed_mut<T, F>(name: impl Into<String>, func: F) -> Self
    where
        T: Node,
        F: Fn(&mut T, &Params) -> Result<(), Failure> + Send + Sync + 'static,
    {
        let callable = move |node: &NodeRef, params: &Params| match write_as::<T>(node) {
            Some(mut record) => func(&mut *record, params),
            None => Err(wrong_type::<T>(node)),
        };
        Self {
            name: name.into(),
            params: Vec::new(),
            callable: Arc::new(callable),
            identity: Identity::of::<F>(),
        }
    }

    /// Declares an optional parameter and the default it takes when the
    /// caller does not pass it.
    #[must_use = "builder methods must be chained or built"]
    pub fn param(mut self, name: impl Into<String>, default: impl Into<JsonValue>) -> Self {
        let name = name.into();
        let default = default.into();
        match self.params.iter_mut().find(|spec| spec.name == name) {
            Some(spec) => spec.default = default,
            None => self.params.push(ParamSpec { name, default }),
        }
        self
    }

    /// Sets the key that identifies this validator on re-registration.
    ///
    /// Two registrations under the same name with equal keys and equal
    /// parameters are the same validator; the second is a no-op.
    ///
    /// ```rust
    /// use arbor_core::{Kind, NodeRef};
    /// use arbor_validator::{Failure, Params, Registry, RegistryError, ValidatorFn};
    ///
    /// fn below(limit: usize) -> ValidatorFn {
    ///     ValidatorFn::new("below", move |_: &NodeRef, _: &Params| {
    ///         if limit > 0 { Ok(()) } else { Err(Failure::violation("no room")) }
    ///     })
    ///     .with_key(format!("below/{limit}"))
    /// }
    ///
    /// let registry = Registry::new();
    /// registry.register("limits", Kind::ANY, below(10))?;
    /// registry.register("limits", Kind::ANY, below(10))?;
    /// assert_eq!(registry.len(), 1);
    /// assert!(matches!(
    ///     registry.register("limits", Kind::ANY, below(1)),
    ///     Err(RegistryError::Duplicate { .. })
    /// ));
    /// # Ok::<(), RegistryError>(())
    /// ```
    #[must_use = "builder methods must be chained or built"]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.identity = Identity::Key(key.into());
        self
    }

    /// The validator's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_entry(self, namespace: String, kind: Kind) -> ValidatorEntry {
        ValidatorEntry {
            namespace,
            kind,
            name: self.name,
            params: self.params,
            callable: self.callable,
            identity: self.identity,
        }
    }
}

impl fmt::Debug for ValidatorFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorFn")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn wrong_type<T: Node>(node: &NodeRef) -> Failure {
    let found = node.try_read().map(|inner| inner.kind());
    match found {
        Some(kind) => Failure::fault(format!(
            "expected a `{}` record, found kind `{kind}`",
            short_name(type_name::<T>())
        )),
        None => Failure::fault(format!(
            "expected a `{}` record, node is locked",
            short_name(type_name::<T>())
        )),
    }
}

/// The last path segment of a Rust path, as rendered by `stringify!` or
/// `type_name`.
#[doc(hidden)]
pub fn short_name(path: &str) -> &str {
    let path = path.split('<').next().unwrap_or(path);
    path.rsplit("::").next().unwrap_or(path).trim()
}

// ============================================================================
// VALIDATOR ENTRY
// ============================================================================

/// A registered validator. Immutable once created.
pub struct ValidatorEntry {
    namespace: String,
    kind: Kind,
    name: String,
    params: Vec<ParamSpec>,
    callable: Arc<Callable>,
    identity: Identity,
}

impl ValidatorEntry {
    /// Namespace the validator belongs to.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Kind the validator was declared for.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The validator's name, used as its identity in reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters with their defaults.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Returns `true` if the validator declares `name`.
    pub fn accepts(&self, name: &str) -> bool {
        self.params.iter().any(|spec| spec.name == name)
    }

    /// Routes `options` and invokes the validator on `node`.
    pub fn call(&self, node: &NodeRef, options: &Options) -> Result<(), Failure> {
        let params = Params::route(&self.params, options);
        (self.callable)(node, &params)
    }

    pub(crate) fn same_identity(&self, kind: Kind, name: &str) -> bool {
        self.kind == kind && self.name == name
    }

    /// Returns `true` if `validator` is provably the validator this entry
    /// was registered from.
    pub(crate) fn same_validator(&self, validator: &ValidatorFn) -> bool {
        self.params == validator.params && self.identity.matches(&validator.identity)
    }
}

impl fmt::Debug for ValidatorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorEntry")
            .field("namespace", &self.namespace)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
