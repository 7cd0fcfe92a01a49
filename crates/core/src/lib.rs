//! # arbor-core
//!
//! Building blocks shared by every arbor crate:
//!
//! - **Kinds**: [`Kind`] descriptors with single inheritance and the
//!   [`matches`] type matcher used for validator dispatch.
//! - **Nodes**: the [`Node`] introspection trait, [`Attribute`] / [`Value`]
//!   for enumerating children, and [`NodeRef`] handles with identity
//!   ([`NodeId`]).
//!
//! ## Usage
//!
//! ```rust
//! use arbor_core::{Attribute, Kind, Node, NodeRef, define_kind, share};
//!
//! define_kind!(pub PICK = "Pick");
//!
//! struct Pick {
//!     phase: String,
//! }
//!
//! impl Node for Pick {
//!     fn kind(&self) -> Kind {
//!         PICK
//!     }
//!     fn attributes(&self) -> Vec<Attribute> {
//!         vec![Attribute::scalar("phase")]
//!     }
//! }
//!
//! let pick: NodeRef = share(Pick { phase: "P".into() });
//! assert!(pick.read().kind().matches(PICK));
//! ```

pub mod kind;
pub mod node;

pub use kind::{Ancestors, Kind, matches};
pub use node::{
    Attribute, Node, NodeId, NodeRef, Shared, Value, label_of, read_as, same_node, share,
    write_as,
};
