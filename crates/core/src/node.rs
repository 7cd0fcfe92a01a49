//! Node introspection.
//!
//! The engine never inspects domain records through reflection. A record
//! takes part in traversal by implementing [`Node`]: it reports its
//! [`Kind`] and enumerates its named attributes in declaration order.
//! Child records are exposed as shared handles ([`NodeRef`]) so the engine
//! can follow containment edges and track node identity.

use std::any::Any;
use std::sync::{Arc, Weak};

use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use crate::kind::Kind;

/// A shared, lockable handle to a concrete record.
pub type Shared<T> = Arc<RwLock<T>>;

/// A shared, lockable handle to any record in the graph.
///
/// `Shared<T>` coerces into `NodeRef` for every `T: Node`.
pub type NodeRef = Arc<RwLock<dyn Node>>;

/// Wraps a record into a [`Shared`] handle.
pub fn share<T: Node>(node: T) -> Shared<T> {
    Arc::new(RwLock::new(node))
}

/// The introspection capability every record in a validated graph exposes.
///
/// # Examples
///
/// ```rust
/// use arbor_core::{Attribute, Node, Shared, Value, define_kind, share};
///
/// define_kind!(pub GROUP = "Group");
/// define_kind!(pub LEAF = "Leaf");
///
/// struct Leaf;
///
/// impl Node for Leaf {
///     fn kind(&self) -> arbor_core::Kind {
///         LEAF
///     }
///     fn attributes(&self) -> Vec<Attribute> {
///         Vec::new()
///     }
/// }
///
/// struct Group {
///     name: String,
///     children: Vec<Shared<Leaf>>,
/// }
///
/// impl Node for Group {
///     fn kind(&self) -> arbor_core::Kind {
///         GROUP
///     }
///     fn attributes(&self) -> Vec<Attribute> {
///         vec![
///             Attribute::scalar("name"),
///             Attribute::new("children", Value::seq(&self.children)),
///         ]
///     }
///     fn label(&self) -> String {
///         format!("Group({})", self.name)
///     }
/// }
///
/// let group = share(Group { name: "a".into(), children: vec![share(Leaf)] });
/// assert_eq!(group.read().attributes().len(), 2);
/// ```
pub trait Node: Any + Send + Sync {
    /// The runtime kind used for validator matching.
    fn kind(&self) -> Kind;

    /// Named attributes in declaration order.
    fn attributes(&self) -> Vec<Attribute>;

    /// Short human-readable rendering used in reports.
    fn label(&self) -> String {
        self.kind().name().to_owned()
    }
}

impl dyn Node {
    /// Returns `true` if the record is a `T`.
    pub fn is<T: Node>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// Downcasts to a concrete record type.
    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Mutable form of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<T: Node>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }

    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes()
            .into_iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value)
    }

    /// Returns `true` if the record exposes `name` with a non-null value.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(|value| !value.is_null())
    }
}

/// Read-locks `node` and downcasts it to `T`.
///
/// Returns `None` when the record is not a `T`.
pub fn read_as<T: Node>(node: &NodeRef) -> Option<MappedRwLockReadGuard<'_, T>> {
    RwLockReadGuard::try_map(node.read(), |inner| inner.downcast_ref::<T>()).ok()
}

/// Write-locks `node` and downcasts it to `T`.
pub fn write_as<T: Node>(node: &NodeRef) -> Option<MappedRwLockWriteGuard<'_, T>> {
    RwLockWriteGuard::try_map(node.write(), |inner| inner.downcast_mut::<T>()).ok()
}

/// Renders a node's label without blocking.
///
/// A node that is write-locked elsewhere renders as `<locked>`.
pub fn label_of(node: &NodeRef) -> String {
    match node.try_read() {
        Some(guard) => guard.label(),
        None => "<locked>".to_owned(),
    }
}

/// Identity of a node: the address of its shared allocation.
///
/// Two handles have the same `NodeId` exactly when they point at the same
/// record, regardless of the record's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Identity of the node behind `node`.
    pub fn of(node: &NodeRef) -> Self {
        Self(Arc::as_ptr(node).cast::<()>().addr())
    }
}

/// Returns `true` when both handles point at the same record.
pub fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    NodeId::of(a) == NodeId::of(b)
}

/// A named attribute of a node.
#[derive(Clone)]
pub struct Attribute {
    /// Attribute name as declared on the record.
    pub name: &'static str,
    /// Attribute value.
    pub value: Value,
}

impl Attribute {
    /// Creates an attribute.
    pub fn new(name: &'static str, value: Value) -> Self {
        Self { name, value }
    }

    /// An attribute holding plain data the walker does not descend into.
    pub fn scalar(name: &'static str) -> Self {
        Self::new(name, Value::Scalar)
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

/// The shape of an attribute value, as far as traversal is concerned.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent or null.
    #[default]
    Null,
    /// Plain data with no child records.
    Scalar,
    /// A directly contained child record.
    Node(NodeRef),
    /// An ordered sequence.
    Seq(Vec<Value>),
    /// A mapping; only values are traversed.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// A child record.
    pub fn node<T: Node>(node: &Shared<T>) -> Self {
        let node: NodeRef = node.clone();
        Self::Node(node)
    }

    /// An optional child record; `None` becomes [`Value::Null`].
    pub fn optional<T: Node>(node: Option<&Shared<T>>) -> Self {
        node.map_or(Self::Null, Self::node)
    }

    /// A back-reference held weakly; a dropped target becomes [`Value::Null`].
    pub fn weak<T: Node>(node: &Weak<RwLock<T>>) -> Self {
        node.upgrade().map_or(Self::Null, |strong| Self::node(&strong))
    }

    /// A sequence of child records.
    pub fn seq<'a, T: Node>(nodes: impl IntoIterator<Item = &'a Shared<T>>) -> Self {
        Self::Seq(nodes.into_iter().map(Self::node).collect())
    }

    /// A mapping from keys to child records, in iteration order.
    pub fn map<'a, K, T>(entries: impl IntoIterator<Item = (K, &'a Shared<T>)>) -> Self
    where
        K: ToString,
        T: Node,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, node)| (key.to_string(), Self::node(node)))
                .collect(),
        )
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The child record, if this value is one.
    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Every child record reachable through this value, in native order.
    pub fn nodes(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        self.collect_nodes(&mut out);
        out
    }

    fn collect_nodes(&self, out: &mut Vec<NodeRef>) {
        match self {
            Self::Null | Self::Scalar => {}
            Self::Node(node) => out.push(node.clone()),
            Self::Seq(items) => items.iter().for_each(|item| item.collect_nodes(out)),
            Self::Map(entries) => entries.iter().for_each(|(_, item)| item.collect_nodes(out)),
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Scalar => f.write_str("Scalar"),
            Self::Node(node) => write!(f, "Node({})", label_of(node)),
            Self::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            Self::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
        }
    }
}
