//! Failure reports
//!
//! A [`Report`] is the ordered result of a reporting run: one
//! [`FailureRecord`] per failed validator invocation, in traversal order.
//! Records keep live handles to the failing node and its parent so callers
//! can inspect or repair them after the run.

use std::fmt;

use arbor_core::{NodeRef, label_of, same_node};
use serde::Serialize;

use crate::error::{FailureKind, ValidateError};

/// One failed validator invocation.
#[derive(Clone)]
pub struct FailureRecord {
    /// The node the validator ran on.
    pub object: NodeRef,
    /// Namespace of the run.
    pub namespace: String,
    /// Name of the failing validator.
    pub validator: String,
    /// How the validator failed.
    pub kind: FailureKind,
    /// Failure message.
    pub message: String,
    /// Node the object was reached from; `None` for the root.
    pub parent: Option<NodeRef>,
    /// Attribute of `parent` holding the object; `None` for the root.
    pub attribute: Option<&'static str>,
}

impl FailureRecord {
    /// A serialisable copy with nodes rendered by label.
    pub fn row(&self) -> ReportRow {
        ReportRow {
            object: label_of(&self.object),
            namespace: self.namespace.clone(),
            validator: self.validator.clone(),
            kind: self.kind,
            message: self.message.clone(),
            parent: self.parent.as_ref().map(label_of),
            attribute: self.attribute,
        }
    }
}

impl PartialEq for FailureRecord {
    fn eq(&self, other: &Self) -> bool {
        let same_parent = match (&self.parent, &other.parent) {
            (Some(a), Some(b)) => same_node(a, b),
            (None, None) => true,
            _ => false,
        };
        same_node(&self.object, &other.object)
            && same_parent
            && self.namespace == other.namespace
            && self.validator == other.validator
            && self.kind == other.kind
            && self.message == other.message
            && self.attribute == other.attribute
    }
}

impl fmt::Debug for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureRecord")
            .field("object", &label_of(&self.object))
            .field("namespace", &self.namespace)
            .field("validator", &self.validator)
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("parent", &self.parent.as_ref().map(label_of))
            .field("attribute", &self.attribute)
            .finish()
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{} failed on {}",
            self.namespace,
            self.validator,
            label_of(&self.object)
        )?;
        if let Some(attribute) = self.attribute {
            write!(f, " (at `{attribute}`)")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Serialisable rendering of a [`FailureRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Label of the failing node.
    pub object: String,
    /// Namespace of the run.
    pub namespace: String,
    /// Validator name.
    pub validator: String,
    /// Failure kind.
    pub kind: FailureKind,
    /// Failure message.
    pub message: String,
    /// Label of the parent node.
    pub parent: Option<String>,
    /// Attribute of the parent holding the node.
    pub attribute: Option<&'static str>,
}

// ============================================================================
// REPORT
// ============================================================================

/// Ordered collection of failures from one reporting run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    records: Vec<FailureRecord>,
}

impl Report {
    pub(crate) fn new(records: Vec<FailureRecord>) -> Self {
        Self { records }
    }

    /// Number of failures.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when nothing failed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, FailureRecord> {
        self.records.iter()
    }

    /// Records as a slice.
    pub fn records(&self) -> &[FailureRecord] {
        &self.records
    }

    /// Records produced by the validator called `name`.
    pub fn by_validator<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FailureRecord> {
        self.iter().filter(move |record| record.validator == name)
    }

    /// Records produced under `namespace`.
    pub fn by_namespace<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = &'a FailureRecord> {
        self.iter().filter(move |record| record.namespace == namespace)
    }

    /// Records of one failure kind.
    pub fn by_kind(&self, kind: FailureKind) -> impl Iterator<Item = &FailureRecord> {
        self.iter().filter(move |record| record.kind == kind)
    }

    /// Failing nodes in report order. A node failing several validators
    /// appears once per failure.
    pub fn objects(&self) -> Vec<NodeRef> {
        self.iter().map(|record| record.object.clone()).collect()
    }

    /// Failure counts per validator, in first-seen order.
    pub fn counts(&self) -> Vec<(&str, usize)> {
        let mut counts: indexmap::IndexMap<&str, usize> = indexmap::IndexMap::new();
        for record in &self.records {
            *counts.entry(record.validator.as_str()).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Serialisable rows.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.iter().map(FailureRecord::row).collect()
    }

    /// `Ok(())` when empty, otherwise the first failure as an error.
    pub fn into_result(self) -> Result<(), ValidateError> {
        match self.records.into_iter().next() {
            Some(record) => Err(ValidateError::from_record(record)),
            None => Ok(()),
        }
    }
}

impl IntoIterator for Report {
    type Item = FailureRecord;
    type IntoIter = std::vec::IntoIter<FailureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a FailureRecord;
    type IntoIter = std::slice::Iter<'a, FailureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

const COLUMNS: [&str; 6] = ["object", "namespace", "validator", "message", "parent", "attribute"];

impl fmt::Display for Report {
    /// Renders an aligned table, one row per failure.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[String; 6]> = self
            .rows()
            .into_iter()
            .map(|row| {
                [
                    row.object,
                    row.namespace,
                    row.validator,
                    row.message,
                    row.parent.unwrap_or_default(),
                    row.attribute.unwrap_or_default().to_owned(),
                ]
            })
            .collect();

        let mut widths = COLUMNS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_row(f, &COLUMNS.map(str::to_owned), &widths)?;
        for row in &rows {
            writeln!(f)?;
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String; 6], widths: &[usize; 6]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    f.write_str(line.trim_end())
}
