//! Kind descriptors and the type matcher.
//!
//! Every node in an arbor graph reports a [`Kind`]. Kinds form a
//! single-inheritance tree: a kind declared with a parent is a subkind of
//! that parent and of every ancestor above it. A validator declared for a
//! kind applies to nodes of that kind and of all of its subkinds.
//!
//! # Examples
//!
//! ```rust
//! use arbor_core::{Kind, define_kind};
//!
//! define_kind!(pub RECORD = "Record");
//! define_kind!(pub EVENT = "Event": RECORD);
//!
//! assert!(EVENT.matches(RECORD));
//! assert!(!RECORD.matches(EVENT));
//! assert!(EVENT.matches(Kind::ANY));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// A static descriptor for the runtime kind of a node.
///
/// Kinds are compared by name. Names must be unique within a process; two
/// descriptors sharing a name are treated as the same kind. The name
/// `"<any>"` belongs to [`Kind::ANY`] and must not be used for other kinds.
#[derive(Clone, Copy)]
pub struct Kind {
    name: &'static str,
    parent: Option<&'static Kind>,
}

impl Kind {
    /// The supertype of every kind. Targeting `ANY` matches all nodes.
    pub const ANY: Self = Self::root("<any>");

    /// Creates a kind with no parent.
    pub const fn root(name: &'static str) -> Self {
        Self { name, parent: None }
    }

    /// Creates a subkind of `parent`.
    pub const fn derived(name: &'static str, parent: &'static Kind) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    /// The kind's name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The direct parent kind, if any.
    pub fn parent(&self) -> Option<Kind> {
        self.parent.copied()
    }

    /// Returns `true` if this is [`Kind::ANY`].
    pub fn is_any(&self) -> bool {
        *self == Self::ANY
    }

    /// Iterates from this kind up to its root, this kind first.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors { next: Some(*self) }
    }

    /// Returns `true` if a node of this kind satisfies `target`.
    ///
    /// That holds when `target` is this kind, any of its ancestors, or
    /// [`Kind::ANY`].
    pub fn matches(&self, target: Kind) -> bool {
        target.is_any() || self.ancestors().any(|kind| kind == target)
    }
}

/// Free-function form of [`Kind::matches`].
pub fn matches(node_kind: Kind, target_kind: Kind) -> bool {
    node_kind.matches(target_kind)
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent {
            Some(parent) => write!(f, "Kind({} < {})", self.name, parent.name),
            None => write!(f, "Kind({})", self.name),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Iterator returned by [`Kind::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<Kind>,
}

impl Iterator for Ancestors {
    type Item = Kind;

    fn next(&mut self) -> Option<Kind> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

impl std::iter::FusedIterator for Ancestors {}

/// Declares a `static` [`Kind`], optionally as a subkind of another.
///
/// ```rust
/// use arbor_core::define_kind;
///
/// define_kind!(pub BASE = "Base");
/// define_kind!(
///     /// A specialised record.
///     pub SPECIAL = "Special": BASE
/// );
///
/// assert_eq!(SPECIAL.parent(), Some(BASE));
/// ```
#[macro_export]
macro_rules! define_kind {
    ($(#[$meta:meta])* $vis:vis $ident:ident = $name:literal : $parent:path) => {
        $(#[$meta])*
        $vis static $ident: $crate::Kind = $crate::Kind::derived($name, &$parent);
    };
    ($(#[$meta:meta])* $vis:vis $ident:ident = $name:literal) => {
        $(#[$meta])*
        $vis static $ident: $crate::Kind = $crate::Kind::root($name);
    };
}
