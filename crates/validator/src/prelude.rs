//! Prelude module for convenient imports.
//!
//! Provides a single `use arbor_validator::prelude::*;` import that brings
//! in what validator authors and callers usually need.
//!
//! # Examples
//!
//! ```rust,ignore
//! use arbor_validator::prelude::*;
//!
//! fn has_origin(event: &Event, _: &Params) -> Result<(), Failure> {
//!     ensure!(!event.origins.is_empty(), "event has no origin");
//!     Ok(())
//! }
//! ```

// ============================================================================
// CORE: kinds and nodes
// ============================================================================

pub use arbor_core::{Attribute, Kind, Node, NodeRef, Shared, Value, define_kind, share};

// ============================================================================
// VALIDATORS: authoring and registration
// ============================================================================

pub use crate::{
    Failure, Options, Params, Registry, ValidatorFn, ensure, fail, register,
};

// ============================================================================
// RUNS: modes and results
// ============================================================================

pub use crate::{Mode, Outcome, Report, ValidateError, ValidationConfig};
