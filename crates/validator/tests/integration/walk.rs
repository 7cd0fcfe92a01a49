use arbor_core::{Kind, label_of, same_node};
use arbor_validator::{walk, walk_all};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::fixture::*;

fn labels(iter: impl Iterator<Item = arbor_validator::Visit>) -> Vec<String> {
    iter.map(|visit| label_of(&visit.node)).collect()
}

#[rstest]
#[case::picks(PICK, vec!["Pick(p1)", "Pick(p2)", "Pick(p3)"])]
#[case::origins(ORIGIN, vec!["Origin(ev1/origin)", "Origin(ev2/origin)"])]
#[case::events(EVENT, vec!["Event(ev1)", "Event(ev2)"])]
#[case::arrivals(ARRIVAL, vec!["Arrival(p1)", "Arrival(p2)", "Arrival(p3)"])]
fn finds_every_node_of_a_kind(#[case] kind: Kind, #[case] expected: Vec<&str>) {
    let catalog = catalog();
    assert_eq!(labels(walk(&catalog_node(&catalog), kind)), expected);
}

#[test]
fn supertype_walk_covers_subtypes_in_pre_order() {
    let catalog = catalog();
    assert_eq!(
        labels(walk(&catalog_node(&catalog), IDENTIFIED)),
        vec![
            "Catalog(cat)",
            "Event(ev1)",
            "Origin(ev1/origin)",
            "Pick(p1)",
            "Pick(p2)",
            "Event(ev2)",
            "Origin(ev2/origin)",
            "Pick(p3)",
        ]
    );
}

#[test]
fn back_references_are_not_revisited() {
    let catalog = catalog();
    let root = catalog_node(&catalog);
    let visits: Vec<_> = walk_all(&root).collect();

    assert_eq!(visits.len(), ALL_NODES);
    let catalogs = visits.iter().filter(|visit| same_node(&visit.node, &root)).count();
    assert_eq!(catalogs, 1);
}

#[test]
fn visits_carry_parent_and_attribute() {
    let catalog = catalog();
    let visits: Vec<_> = walk(&catalog_node(&catalog), PICK).collect();

    let event = event_at(&catalog, 0);
    let event: arbor_core::NodeRef = event;
    assert!(same_node(visits[0].parent.as_ref().unwrap(), &event));
    assert_eq!(visits[0].attribute, Some("picks"));
}

#[test]
fn attribute_filters() {
    let catalog = catalog();
    let root = catalog_node(&catalog);

    assert_eq!(
        labels(walk_all(&root).with_attribute_name("origins")),
        vec!["Origin(ev1/origin)", "Origin(ev2/origin)"]
    );
    assert_eq!(labels(walk(&root, ORIGIN).having_attribute("depth")).len(), 2);

    event_at(&catalog, 1).read().origins[0].write().depth = None;
    assert_eq!(
        labels(walk(&root, ORIGIN).having_attribute("depth")),
        vec!["Origin(ev1/origin)"]
    );
}

#[test]
fn diamond_map_values_are_visited_once() {
    let folder = folder();
    let root: arbor_core::NodeRef = folder;
    let visits: Vec<_> = walk(&root, GROUP).collect();

    assert_eq!(labels(visits.iter().cloned()), vec!["Group(full)", "Group(empty)"]);
    assert!(visits.iter().all(|visit| visit.attribute == Some("groups")));
}
