use std::sync::Arc;

use arbor_core::NodeRef;
use arbor_validator::{Options, Params, Registry, RegistryError, ValidatorFn, ensure, register};
use pretty_assertions::assert_eq;

use crate::fixture::*;

#[test]
fn macro_registration_names_entries_after_functions() {
    let registry = Registry::new();
    register!(registry, "catalog", IDENTIFIED, has_resource_id).unwrap();
    register!(registry, "catalog", EVENT, arrivals_reference_picks as Event).unwrap();
    register!(registry, "catalog", ORIGIN, origin_in_bounds as Origin, min_lat = -90.0, max_lat = 90.0)
        .unwrap();
    register!(registry, "repair", PICK, fill_missing_resource_id as mut Pick).unwrap();

    let names: Vec<_> = registry
        .entries("catalog")
        .iter()
        .map(|entry| entry.name().to_owned())
        .collect();
    assert_eq!(
        names,
        vec!["has_resource_id", "arrivals_reference_picks", "origin_in_bounds"]
    );
    assert_eq!(registry.namespaces(), vec!["catalog".to_owned(), "repair".to_owned()]);
}

#[test]
fn lookup_follows_the_kind_hierarchy() {
    let registry = Registry::new();
    register!(registry, "catalog", IDENTIFIED, has_resource_id).unwrap();
    register!(registry, "catalog", EVENT, arrivals_reference_picks as Event).unwrap();
    register!(registry, "catalog", EVENT, has_preferred_origin as Event).unwrap();

    assert_eq!(registry.lookup("catalog", EVENT).len(), 3);
    assert_eq!(registry.lookup("catalog", PICK).len(), 1);
    assert_eq!(registry.lookup("catalog", ARRIVAL).len(), 0);
    assert_eq!(registry.entries_for("catalog", EVENT).len(), 2);
    assert_eq!(
        registry.kinds_in_namespace("catalog").unwrap(),
        vec![IDENTIFIED, EVENT]
    );
}

#[test]
fn reregistering_the_same_function_is_idempotent() {
    let registry = Registry::new();
    let first = register!(registry, "catalog", EVENT, has_preferred_origin as Event).unwrap();
    let second = register!(registry, "catalog", EVENT, has_preferred_origin as Event).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
}

#[test]
fn another_function_under_a_taken_name_is_rejected() {
    let registry = Registry::new();
    register!(registry, "catalog", EVENT, has_preferred_origin as Event).unwrap();

    let impostor = ValidatorFn::typed("has_preferred_origin", arrivals_reference_picks);
    let err = registry.register("catalog", EVENT, impostor).unwrap_err();
    assert!(matches!(err, RegistryError::Duplicate { ref name, .. } if name == "has_preferred_origin"));
}

#[test]
fn same_function_with_other_defaults_is_rejected() {
    let registry = Registry::new();
    register!(registry, "catalog", ORIGIN, origin_in_bounds as Origin, min_lat = -90.0, max_lat = 90.0)
        .unwrap();
    let err = register!(registry, "catalog", ORIGIN, origin_in_bounds as Origin, min_lat = -90.0, max_lat = 41.0)
        .unwrap_err();
    assert!(matches!(err, RegistryError::Duplicate { ref name, .. } if name == "origin_in_bounds"));

    let catalog = catalog();
    registry
        .validate(&catalog_node(&catalog), "catalog", &Options::new())
        .unwrap();
}

#[test]
fn factory_closures_need_distinct_keys() {
    fn deeper_than(min_depth: f64) -> ValidatorFn {
        ValidatorFn::typed::<Origin, _>("deeper_than", move |origin: &Origin, _: &Params| {
            ensure!(origin.depth.is_some_and(|depth| depth > min_depth), "origin too shallow");
            Ok(())
        })
        .with_key(format!("deeper_than/{min_depth}"))
    }

    let registry = Registry::new();
    let first = registry.register("catalog", ORIGIN, deeper_than(1_000.0)).unwrap();
    let again = registry.register("catalog", ORIGIN, deeper_than(1_000.0)).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let err = registry
        .register("catalog", ORIGIN, deeper_than(10_000.0))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Duplicate { .. }));

    let catalog = catalog();
    registry
        .validate(&catalog_node(&catalog), "catalog", &Options::new())
        .unwrap();
}

#[test]
fn global_registry_is_shared() {
    let namespace = "integration::global_registry_is_shared";
    register(
        namespace,
        CATALOG,
        ValidatorFn::new("noop", |_: &NodeRef, _: &Params| Ok(())),
    )
    .unwrap();

    assert!(Registry::global().contains(namespace));
    let catalog = catalog();
    arbor_validator::validate(&catalog_node(&catalog), namespace, &Default::default()).unwrap();
    assert_eq!(Registry::global().clear_namespace(namespace), 1);
}
