use arbor_core::{NodeRef, same_node};
use arbor_validator::{FailureKind, Options, Registry, ReportRow, register};
use pretty_assertions::assert_eq;

use crate::fixture::*;

fn broken_catalog_report() -> (NodeRef, arbor_validator::Report) {
    let registry = Registry::new();
    register!(registry, "catalog", IDENTIFIED, has_resource_id).unwrap();
    register!(registry, "catalog", EVENT, has_preferred_origin as Event).unwrap();

    let catalog = catalog();
    let first = event_at(&catalog, 0);
    first.write().resource_id = None;
    first.write().preferred_origin_id = None;
    let root = catalog_node(&catalog);
    let report = registry.report(&root, "catalog", &Options::new()).unwrap();
    (root, report)
}

#[test]
fn rows_serialise_with_labels() {
    let (_, report) = broken_catalog_report();
    assert_eq!(
        report.rows(),
        vec![
            ReportRow {
                object: "Event(?)".into(),
                namespace: "catalog".into(),
                validator: "has_resource_id".into(),
                kind: FailureKind::Violation,
                message: "Event has no resource_id".into(),
                parent: Some("Catalog(cat)".into()),
                attribute: Some("events"),
            },
            ReportRow {
                object: "Event(?)".into(),
                namespace: "catalog".into(),
                validator: "has_preferred_origin".into(),
                kind: FailureKind::Fault,
                message: "event has no preferred_origin_id to check".into(),
                parent: Some("Catalog(cat)".into()),
                attribute: Some("events"),
            },
        ]
    );

    let json = serde_json::to_value(report.rows()).unwrap();
    assert_eq!(json[1]["kind"], "fault");
    assert_eq!(json[0]["attribute"], "events");
}

#[test]
fn records_point_back_into_the_tree() {
    let (root, report) = broken_catalog_report();
    for record in &report {
        assert!(record.parent.as_ref().is_some_and(|parent| same_node(parent, &root)));
    }
    let objects = report.objects();
    assert_eq!(objects.len(), 2);
    assert!(same_node(&objects[0], &objects[1]));
}

#[test]
fn table_lists_every_failure() {
    let (_, report) = broken_catalog_report();
    let table = report.to_string();
    let lines: Vec<_> = table.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("object"));
    assert!(lines[1].contains("has_resource_id"));
    assert!(lines[2].contains("event has no preferred_origin_id to check"));
}

#[test]
fn by_namespace_and_into_result() {
    let (_, report) = broken_catalog_report();
    assert_eq!(report.by_namespace("catalog").count(), 2);
    assert_eq!(report.by_kind(FailureKind::Violation).count(), 1);

    let err = report.into_result().unwrap_err();
    assert_eq!(err.record().map(|r| r.validator.as_str()), Some("has_resource_id"));
}
