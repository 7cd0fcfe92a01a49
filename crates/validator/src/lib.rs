//! # arbor-validator
//!
//! Runtime invariants over heterogeneous object graphs.
//!
//! Validators are plain functions registered against a namespace and a
//! target [`Kind`](arbor_core::Kind). Running a namespace walks a root node,
//! dispatches every validator to each node whose kind matches its target
//! (subkinds included), and either fails on the first problem or collects
//! every failure into a [`Report`].
//!
//! ## Quick Start
//!
//! ```rust
//! use arbor_core::{Attribute, Kind, Node, NodeRef, Shared, Value, define_kind, share};
//! use arbor_validator::{Failure, Options, Params, Registry, ensure, register};
//!
//! define_kind!(pub GROUP = "Group");
//! define_kind!(pub LEAF = "Leaf");
//!
//! struct Leaf;
//!
//! impl Node for Leaf {
//!     fn kind(&self) -> Kind { LEAF }
//!     fn attributes(&self) -> Vec<Attribute> { Vec::new() }
//! }
//!
//! struct Group {
//!     children: Vec<Shared<Leaf>>,
//! }
//!
//! impl Node for Group {
//!     fn kind(&self) -> Kind { GROUP }
//!     fn attributes(&self) -> Vec<Attribute> {
//!         vec![Attribute::new("children", Value::seq(&self.children))]
//!     }
//! }
//!
//! fn has_min_children(group: &Group, params: &Params) -> Result<(), Failure> {
//!     let min_count: usize = params.get("min_count")?;
//!     ensure!(group.children.len() >= min_count, "too few children");
//!     Ok(())
//! }
//!
//! let registry = Registry::new();
//! register!(registry, "tree", GROUP, has_min_children as Group, min_count = 1).unwrap();
//!
//! let root: NodeRef = share(Group { children: Vec::new() });
//! assert!(registry.validate(&root, "tree", &Options::new()).is_err());
//!
//! let report = registry.report(&root, "tree", &Options::new()).unwrap();
//! assert_eq!(report.len(), 1);
//! assert!(registry.validate(&root, "tree", &Options::new().with("min_count", 0)).is_ok());
//! ```
//!
//! ## Modes
//!
//! - [`Registry::validate`]: fail-fast, returns the first failure as a
//!   [`ValidateError`].
//! - [`Registry::report`]: records violations, faults and panics and keeps
//!   going.
//! - [`Registry::run`] / [`Registry::run_with`]: mode chosen at runtime.
//!
//! The free functions [`validate`], [`report`] and [`run`] use
//! [`Registry::global`].

mod config;
mod engine;
mod entry;
mod error;
mod macros;
mod params;
pub mod prelude;
mod registry;
mod report;
pub mod walk;

pub use config::ValidationConfig;
pub use engine::{Mode, Outcome, report, run, validate};
#[doc(hidden)]
pub use entry::short_name;
pub use entry::{ValidatorEntry, ValidatorFn};
pub use error::{Failure, FailureKind, ParamError, RegistryError, ValidateError};
pub use params::{Options, ParamSpec, Params};
pub use registry::{Registry, register};
pub use report::{FailureRecord, Report, ReportRow};
pub use walk::{Visit, Walk, walk, walk_all};
