//! Cycle-safe tree traversal
//!
//! [`walk`] yields every node of a target kind reachable from a root, in
//! depth-first pre-order, together with the parent it was reached from and
//! the attribute that holds it.
//!
//! A node is expanded (its attributes read) only when the iterator is
//! advanced past it, so a validator that repairs a node in place before the
//! next call to [`Iterator::next`] is seen by the rest of the traversal.

use std::collections::HashSet;
use std::fmt;
use std::iter::FusedIterator;

use arbor_core::{Kind, NodeId, NodeRef, label_of};

/// One emitted node.
#[derive(Clone)]
pub struct Visit {
    /// The matching node.
    pub node: NodeRef,
    /// The node it was reached from; `None` for the root.
    pub parent: Option<NodeRef>,
    /// Name of the parent's attribute holding the node; `None` for the root.
    pub attribute: Option<&'static str>,
}

impl fmt::Debug for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visit")
            .field("node", &label_of(&self.node))
            .field("parent", &self.parent.as_ref().map(label_of))
            .field("attribute", &self.attribute)
            .finish()
    }
}

/// Lazy traversal cursor returned by [`walk`].
///
/// Each cursor owns its visited set, so calling [`walk`] again restarts the
/// traversal from scratch.
pub struct Walk {
    target: Kind,
    stack: Vec<Visit>,
    pending: Option<NodeRef>,
    visited: HashSet<NodeId>,
    attribute_name: Option<String>,
    having: Option<String>,
}

/// Walks `root` for nodes whose kind matches `target`.
///
/// # Examples
///
/// ```rust
/// use arbor_core::{Attribute, Kind, Node, NodeRef, Shared, Value, define_kind, share};
/// use arbor_validator::walk;
///
/// define_kind!(SHELF = "Shelf");
/// define_kind!(BOOK = "Book");
///
/// struct Book(&'static str);
///
/// impl Node for Book {
///     fn kind(&self) -> Kind {
///         BOOK
///     }
///     fn attributes(&self) -> Vec<Attribute> {
///         vec![Attribute::scalar("title")]
///     }
///     fn label(&self) -> String {
///         format!("Book({})", self.0)
///     }
/// }
///
/// struct Shelf {
///     books: Vec<Shared<Book>>,
/// }
///
/// impl Node for Shelf {
///     fn kind(&self) -> Kind {
///         SHELF
///     }
///     fn attributes(&self) -> Vec<Attribute> {
///         vec![Attribute::new("books", Value::seq(&self.books))]
///     }
/// }
///
/// let dune = share(Book("Dune"));
/// let shelf: NodeRef = share(Shelf {
///     books: vec![dune.clone(), share(Book("Emma")), dune],
/// });
///
/// let found: Vec<_> = walk(&shelf, BOOK)
///     .map(|visit| (visit.node.read().label(), visit.attribute))
///     .collect();
/// assert_eq!(
///     found,
///     vec![
///         ("Book(Dune)".to_owned(), Some("books")),
///         ("Book(Emma)".to_owned(), Some("books")),
///     ]
/// );
/// ```
pub fn walk(root: &NodeRef, target: Kind) -> Walk {
    Walk {
        target,
        stack: vec![Visit {
            node: root.clone(),
            parent: None,
            attribute: None,
        }],
        pending: None,
        visited: HashSet::new(),
        attribute_name: None,
        having: None,
    }
}

/// Walks every node reachable from `root`.
pub fn walk_all(root: &NodeRef) -> Walk {
    walk(root, Kind::ANY)
}

impl Walk {
    /// Only emit nodes held by an attribute called `name`.
    ///
    /// The root has no attribute and is never emitted under this filter.
    #[must_use = "iterator adaptors are lazy"]
    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = Some(name.into());
        self
    }

    /// Only emit nodes exposing a non-null attribute called `name`.
    #[must_use = "iterator adaptors are lazy"]
    pub fn having_attribute(mut self, name: impl Into<String>) -> Self {
        self.having = Some(name.into());
        self
    }

    /// The kind this walk looks for.
    pub fn target(&self) -> Kind {
        self.target
    }

    /// Number of distinct nodes reached so far.
    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    /// Pushes the children of `node` so the first attribute's first child
    /// is popped next.
    fn expand(&mut self, node: &NodeRef) {
        let mut children = Vec::new();
        {
            let guard = node.read();
            for attribute in guard.attributes() {
                for child in attribute.value.nodes() {
                    if !self.visited.contains(&NodeId::of(&child)) {
                        children.push((child, attribute.name));
                    }
                }
            }
        }
        self.stack
            .extend(children.into_iter().rev().map(|(child, name)| Visit {
                node: child,
                parent: Some(node.clone()),
                attribute: Some(name),
            }));
    }

    fn emits(&self, visit: &Visit) -> bool {
        let guard = visit.node.read();
        if !guard.kind().matches(self.target) {
            return false;
        }
        let attribute_ok = self
            .attribute_name
            .as_deref()
            .is_none_or(|name| visit.attribute == Some(name));
        attribute_ok && self.having.as_deref().is_none_or(|name| guard.has_attribute(name))
    }
}

impl Iterator for Walk {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        if let Some(node) = self.pending.take() {
            self.expand(&node);
        }
        while let Some(visit) = self.stack.pop() {
            if !self.visited.insert(NodeId::of(&visit.node)) {
                continue;
            }
            if self.emits(&visit) {
                self.pending = Some(visit.node.clone());
                return Some(visit);
            }
            self.expand(&visit.node);
        }
        None
    }
}

impl FusedIterator for Walk {}

impl fmt::Debug for Walk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walk")
            .field("target", &self.target)
            .field("queued", &self.stack.len())
            .field("visited", &self.visited.len())
            .field("attribute_name", &self.attribute_name)
            .field("having", &self.having)
            .finish()
    }
}
