//! Validator registry
//!
//! Maps namespaces to ordered lists of [`ValidatorEntry`]. Insertion order
//! is execution order. The registry is an ordinary value so tests can build
//! isolated instances; [`Registry::global`] provides the process-wide
//! default.

use std::sync::{Arc, LazyLock};

use arbor_core::Kind;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::entry::{ValidatorEntry, ValidatorFn};
use crate::error::{RegistryError, ValidateError};

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Registry of validators grouped by namespace.
///
/// Writes are serialized by one lock. Reads hand out snapshots of the
/// entry list, so no lock is held while validators run.
///
/// # Example
///
/// ```rust
/// use arbor_core::{Kind, NodeRef};
/// use arbor_validator::{Params, Registry, ValidatorFn};
///
/// let registry = Registry::new();
/// registry
///     .register("demo", Kind::ANY, ValidatorFn::new("always_ok", |_: &NodeRef, _: &Params| Ok(())))
///     .unwrap();
///
/// assert!(registry.contains("demo"));
/// assert_eq!(registry.lookup("demo", Kind::root("Anything")).len(), 1);
/// ```
#[derive(Default)]
pub struct Registry {
    namespaces: RwLock<IndexMap<String, Vec<Arc<ValidatorEntry>>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default registry.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Register `validator` for nodes of `kind` (and its subkinds) under
    /// `namespace`.
    ///
    /// Re-registering the same (namespace, kind, name) with the same
    /// validator returns the existing entry and changes nothing. See
    /// [`ValidatorFn`] for what counts as the same validator.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Duplicate`] when the name is taken by any other
    /// validator, including the same function with different parameter
    /// defaults; [`RegistryError::InvalidName`] for an empty namespace or
    /// validator name.
    pub fn register(
        &self,
        namespace: impl Into<String>,
        kind: Kind,
        validator: ValidatorFn,
    ) -> Result<Arc<ValidatorEntry>, RegistryError> {
        let namespace = namespace.into();
        if namespace.trim().is_empty() {
            return Err(RegistryError::InvalidName { what: "namespace" });
        }
        if validator.name().trim().is_empty() {
            return Err(RegistryError::InvalidName {
                what: "validator name",
            });
        }

        let mut namespaces = self.namespaces.write();
        let entries = namespaces.entry(namespace.clone()).or_default();

        if let Some(existing) = entries
            .iter()
            .find(|entry| entry.same_identity(kind, validator.name()))
        {
            if existing.same_validator(&validator) {
                debug!(namespace = %namespace, kind = %kind, validator = validator.name(), "validator already registered");
                return Ok(Arc::clone(existing));
            }
            return Err(RegistryError::Duplicate {
                namespace,
                kind,
                name: validator.name().to_owned(),
            });
        }

        let entry = Arc::new(validator.into_entry(namespace.clone(), kind));
        entries.push(Arc::clone(&entry));
        debug!(
            namespace = %namespace,
            kind = %kind,
            validator = entry.name(),
            params = entry.params().len(),
            "registered validator"
        );
        Ok(entry)
    }

    /// Every entry under `namespace` whose target kind `kind` satisfies,
    /// in registration order. Entries for supertypes are included.
    pub fn lookup(&self, namespace: &str, kind: Kind) -> Vec<Arc<ValidatorEntry>> {
        self.filtered(namespace, |entry| kind.matches(entry.kind()))
    }

    /// Entries registered for exactly `kind`, in registration order.
    pub fn entries_for(&self, namespace: &str, kind: Kind) -> Vec<Arc<ValidatorEntry>> {
        self.filtered(namespace, |entry| entry.kind() == kind)
    }

    /// All entries under `namespace`, in registration order.
    pub fn entries(&self, namespace: &str) -> Vec<Arc<ValidatorEntry>> {
        self.filtered(namespace, |_| true)
    }

    /// Distinct target kinds under `namespace`, in first-registration order.
    ///
    /// # Errors
    ///
    /// [`ValidateError::UnknownNamespace`] when the namespace has no entries.
    pub fn kinds_in_namespace(&self, namespace: &str) -> Result<Vec<Kind>, ValidateError> {
        Ok(self.plan(namespace)?.into_iter().map(|(kind, _)| kind).collect())
    }

    /// Snapshot of the namespace grouped by exact target kind, kinds in
    /// first-registration order and entries in registration order.
    pub(crate) fn plan(
        &self,
        namespace: &str,
    ) -> Result<Vec<(Kind, Vec<Arc<ValidatorEntry>>)>, ValidateError> {
        let namespaces = self.namespaces.read();
        let entries = namespaces
            .get(namespace)
            .filter(|entries| !entries.is_empty())
            .ok_or_else(|| ValidateError::UnknownNamespace(namespace.to_owned()))?;

        let mut plan: IndexMap<Kind, Vec<Arc<ValidatorEntry>>> = IndexMap::new();
        for entry in entries {
            plan.entry(entry.kind()).or_default().push(Arc::clone(entry));
        }
        Ok(plan.into_iter().collect())
    }

    /// Returns `true` if `namespace` has at least one entry.
    pub fn contains(&self, namespace: &str) -> bool {
        self.namespaces
            .read()
            .get(namespace)
            .is_some_and(|entries| !entries.is_empty())
    }

    /// Namespaces with entries, in first-registration order.
    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces
            .read()
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Total number of entries across namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.read().values().map(Vec::len).sum()
    }

    /// Returns `true` if no validators are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry. Intended for test isolation.
    pub fn clear(&self) {
        self.namespaces.write().clear();
    }

    /// Remove one namespace, returning how many entries it held.
    pub fn clear_namespace(&self, namespace: &str) -> usize {
        self.namespaces
            .write()
            .shift_remove(namespace)
            .map_or(0, |entries| entries.len())
    }

    fn filtered(
        &self,
        namespace: &str,
        keep: impl Fn(&ValidatorEntry) -> bool,
    ) -> Vec<Arc<ValidatorEntry>> {
        self.namespaces
            .read()
            .get(namespace)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| keep(entry))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// [`Registry::register`] on the global registry.
pub fn register(
    namespace: impl Into<String>,
    kind: Kind,
    validator: ValidatorFn,
) -> Result<Arc<ValidatorEntry>, RegistryError> {
    Registry::global().register(namespace, kind, validator)
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let namespaces = self.namespaces.read();
        f.debug_struct("Registry")
            .field("count", &namespaces.values().map(Vec::len).sum::<usize>())
            .field("namespaces", &namespaces.keys().collect::<Vec<_>>())
            .finish()
    }
}
