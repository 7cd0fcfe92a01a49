//! Error types for registration and validation runs
//!
//! Three layers, matching who sees them:
//!
//! - [`Failure`] is what a validator callable returns.
//! - [`RegistryError`] is returned to code that registers validators.
//! - [`ValidateError`] is returned to code that runs a namespace.

use arbor_core::Kind;
use serde::{Deserialize, Serialize};

use crate::report::FailureRecord;

// ============================================================================
// VALIDATOR FAILURE
// ============================================================================

/// The outcome of a failing validator invocation.
///
/// `Violation` means the checked invariant does not hold. `Fault` means the
/// validator could not check the invariant at all (a missing attribute, an
/// ill-typed parameter, a node of the wrong type). Callers keep the two apart
/// through [`FailureKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// The invariant was violated.
    #[error("{0}")]
    Violation(String),
    /// The validator itself could not run to completion.
    #[error("{0}")]
    Fault(String),
}

impl Failure {
    /// Creates a [`Failure::Violation`].
    pub fn violation(message: impl Into<String>) -> Self {
        Self::Violation(message.into())
    }

    /// Creates a [`Failure::Fault`].
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        match self {
            Self::Violation(message) | Self::Fault(message) => message,
        }
    }

    /// The kind of failure, as recorded in reports.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Violation(_) => FailureKind::Violation,
            Self::Fault(_) => FailureKind::Fault,
        }
    }
}

/// Classification of a recorded failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The validator reported a violated invariant.
    Violation,
    /// The validator returned a fault.
    Fault,
    /// The validator panicked (reporting mode only).
    Panic,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Violation => "violation",
            Self::Fault => "fault",
            Self::Panic => "panic",
        })
    }
}

// ============================================================================
// PARAMETER ERRORS
// ============================================================================

/// Errors raised while reading a routed parameter inside a validator.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// The validator asked for a parameter it never declared.
    #[error("parameter `{0}` is not declared by this validator")]
    Undeclared(String),

    /// The routed value does not deserialize into the requested type.
    #[error("parameter `{name}` has an unexpected type: {source}")]
    Type {
        /// Parameter name.
        name: String,
        /// Deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl From<ParamError> for Failure {
    fn from(err: ParamError) -> Self {
        Self::Fault(err.to_string())
    }
}

// ============================================================================
// REGISTRY ERRORS
// ============================================================================

/// Errors returned by [`Registry::register`](crate::Registry::register).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Another validator is already registered under the same identity.
    #[error(
        "validator `{name}` for kind `{kind}` is already registered in namespace `{namespace}` \
         as a different validator"
    )]
    Duplicate {
        /// Namespace of the existing entry.
        namespace: String,
        /// Target kind of the existing entry.
        kind: Kind,
        /// Validator name shared by both registrations.
        name: String,
    },

    /// A namespace or validator name was empty.
    #[error("{what} must not be empty")]
    InvalidName {
        /// Which name was rejected.
        what: &'static str,
    },
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Errors returned by a validation run.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// Nothing is registered under the namespace; no work was done.
    #[error("no validators registered under namespace `{0}`")]
    UnknownNamespace(String),

    /// Fail-fast run aborted on a violated invariant.
    #[error("{0}")]
    Violation(Box<FailureRecord>),

    /// Fail-fast run aborted on a faulting validator.
    #[error("{0}")]
    Fault(Box<FailureRecord>),
}

impl ValidateError {
    /// The failure that aborted the run, if any.
    pub fn record(&self) -> Option<&FailureRecord> {
        match self {
            Self::UnknownNamespace(_) => None,
            Self::Violation(record) | Self::Fault(record) => Some(record),
        }
    }

    /// Returns `true` for [`ValidateError::Violation`].
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::Violation(_))
    }

    pub(crate) fn from_record(record: FailureRecord) -> Self {
        match record.kind {
            FailureKind::Violation => Self::Violation(Box::new(record)),
            FailureKind::Fault | FailureKind::Panic => Self::Fault(Box::new(record)),
        }
    }
}
