//! Validation orchestrator
//!
//! Runs a namespace against a root node. The namespace's kinds are taken in
//! first-registration order; for each kind the root is walked once and every
//! entry registered for that kind runs on each visit, in registration order.
//! Walks match subkinds, so a validator declared for a supertype runs on
//! every subtype node, once per node.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use arbor_core::{NodeRef, label_of};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, trace, warn};

use crate::config::ValidationConfig;
use crate::entry::ValidatorEntry;
use crate::error::{FailureKind, ValidateError};
use crate::params::Options;
use crate::registry::Registry;
use crate::report::{FailureRecord, Report};
use crate::walk::{Visit, walk};

/// How a run treats failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Abort on the first failure. Panics propagate.
    #[default]
    FailFast,
    /// Record every failure and keep going. Panics are caught and recorded.
    Report,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FailFast => "fail_fast",
            Self::Report => "report",
        })
    }
}

/// Result of [`Registry::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A fail-fast run found nothing.
    Passed,
    /// A reporting run finished; the report may be empty.
    Report(Report),
}

impl Outcome {
    /// Returns `true` when nothing failed.
    pub fn is_clean(&self) -> bool {
        match self {
            Self::Passed => true,
            Self::Report(report) => report.is_empty(),
        }
    }

    /// The report of a reporting run.
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Passed => None,
            Self::Report(report) => Some(report),
        }
    }

    /// The report, empty for a passed fail-fast run.
    pub fn into_report(self) -> Report {
        match self {
            Self::Passed => Report::default(),
            Self::Report(report) => report,
        }
    }
}

impl Registry {
    /// Runs `namespace` against `root`, failing on the first failure.
    ///
    /// # Errors
    ///
    /// [`ValidateError::UnknownNamespace`] before any work when nothing is
    /// registered under `namespace`; otherwise the first
    /// [`ValidateError::Violation`] or [`ValidateError::Fault`].
    pub fn validate(
        &self,
        root: &NodeRef,
        namespace: &str,
        options: &Options,
    ) -> Result<(), ValidateError> {
        self.execute(root, namespace, Mode::FailFast, options)
            .map(drop)
    }

    /// Runs `namespace` against `root`, collecting every failure.
    ///
    /// # Errors
    ///
    /// Only [`ValidateError::UnknownNamespace`]; failures go in the report.
    pub fn report(
        &self,
        root: &NodeRef,
        namespace: &str,
        options: &Options,
    ) -> Result<Report, ValidateError> {
        self.execute(root, namespace, Mode::Report, options)
            .map(Report::new)
    }

    /// Runs `namespace` against `root` in the given mode.
    pub fn run(
        &self,
        root: &NodeRef,
        namespace: &str,
        mode: Mode,
        options: &Options,
    ) -> Result<Outcome, ValidateError> {
        match mode {
            Mode::FailFast => self
                .validate(root, namespace, options)
                .map(|()| Outcome::Passed),
            Mode::Report => self.report(root, namespace, options).map(Outcome::Report),
        }
    }

    /// [`run`](Self::run) with mode and options from a [`ValidationConfig`].
    pub fn run_with(
        &self,
        root: &NodeRef,
        namespace: &str,
        config: &ValidationConfig,
    ) -> Result<Outcome, ValidateError> {
        self.run(root, namespace, config.mode, &config.options)
    }

    /// Runs every validator under `namespace` whose kind matches `node`,
    /// without descending into its attributes. Fail-fast.
    pub fn validate_node(
        &self,
        node: &NodeRef,
        namespace: &str,
        options: &Options,
    ) -> Result<(), ValidateError> {
        if !self.contains(namespace) {
            return Err(ValidateError::UnknownNamespace(namespace.to_owned()));
        }
        let kind = node.read().kind();
        let visit = Visit {
            node: node.clone(),
            parent: None,
            attribute: None,
        };
        for entry in self.lookup(namespace, kind) {
            if let Err((kind, message)) = invoke(&entry, &visit.node, options, Mode::FailFast) {
                return Err(ValidateError::from_record(failure_record(
                    &entry, &visit, kind, message,
                )));
            }
        }
        Ok(())
    }

    fn execute(
        &self,
        root: &NodeRef,
        namespace: &str,
        mode: Mode,
        options: &Options,
    ) -> Result<Vec<FailureRecord>, ValidateError> {
        let span = info_span!("validate", namespace, mode = %mode);
        let _enter = span.enter();

        let plan = self.plan(namespace)?;
        let mut records = Vec::new();
        let mut visits = 0_usize;
        let mut calls = 0_usize;

        for (kind, entries) in &plan {
            debug!(kind = %kind, validators = entries.len(), "walking");
            for visit in walk(root, *kind) {
                visits += 1;
                for entry in entries {
                    calls += 1;
                    trace!(validator = entry.name(), node = %label_of(&visit.node), "dispatch");
                    let Err((failure, message)) = invoke(entry, &visit.node, options, mode) else {
                        continue;
                    };
                    let record = failure_record(entry, &visit, failure, message);
                    if mode == Mode::FailFast {
                        debug!(validator = entry.name(), kind = %failure, "aborting run");
                        return Err(ValidateError::from_record(record));
                    }
                    warn!(
                        validator = entry.name(),
                        kind = %failure,
                        node = %label_of(&record.object),
                        message = %record.message,
                        "validator failed"
                    );
                    records.push(record);
                }
            }
        }

        info!(
            kinds = plan.len(),
            visits,
            calls,
            failures = records.len(),
            "validation finished"
        );
        Ok(records)
    }
}

/// Calls one entry, catching panics in reporting mode.
fn invoke(
    entry: &ValidatorEntry,
    node: &NodeRef,
    options: &Options,
    mode: Mode,
) -> Result<(), (FailureKind, String)> {
    let outcome = match mode {
        Mode::FailFast => entry.call(node, options),
        Mode::Report => match catch_unwind(AssertUnwindSafe(|| entry.call(node, options))) {
            Ok(outcome) => outcome,
            Err(payload) => return Err((FailureKind::Panic, panic_message(payload.as_ref()))),
        },
    };
    outcome.map_err(|failure| (failure.kind(), failure.message().to_owned()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "validator panicked".to_owned()
    }
}

fn failure_record(
    entry: &Arc<ValidatorEntry>,
    visit: &Visit,
    kind: FailureKind,
    message: String,
) -> FailureRecord {
    FailureRecord {
        object: visit.node.clone(),
        namespace: entry.namespace().to_owned(),
        validator: entry.name().to_owned(),
        kind,
        message,
        parent: visit.parent.clone(),
        attribute: visit.attribute,
    }
}

// ============================================================================
// GLOBAL REGISTRY SHORTCUTS
// ============================================================================

/// [`Registry::validate`] on the global registry.
pub fn validate(root: &NodeRef, namespace: &str, options: &Options) -> Result<(), ValidateError> {
    Registry::global().validate(root, namespace, options)
}

/// [`Registry::report`] on the global registry.
pub fn report(root: &NodeRef, namespace: &str, options: &Options) -> Result<Report, ValidateError> {
    Registry::global().report(root, namespace, options)
}

/// [`Registry::run`] on the global registry.
pub fn run(
    root: &NodeRef,
    namespace: &str,
    mode: Mode,
    options: &Options,
) -> Result<Outcome, ValidateError> {
    Registry::global().run(root, namespace, mode, options)
}
