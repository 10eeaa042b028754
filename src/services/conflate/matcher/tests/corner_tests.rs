use super::*;
use crate::test_utils::{init_logger, mirror, point_id, root, way_id};
use crate::types::address::TargetAddress;

/// `100` (12 Main Street) is mapped; `101` (3 Side Road) shares its parcel.
fn corner_pair() -> Registry {
    let mut mapped = root("12");
    mapped.parcel_id = Some("P1".to_string());
    let mut unmapped = root("3");
    unmapped.street = "Side Road".to_string();
    unmapped.parcel_id = Some("P1".to_string());

    let mut registry = Registry::new();
    registry.insert("100".to_string(), mapped);
    registry.insert("101".to_string(), unmapped);
    registry
}

fn snapshot_with(feature: TargetAddress) -> TargetSnapshot {
    let mut target = TargetSnapshot::default();
    target.linz.insert("100".to_string(), feature);
    target
}

fn run(registry: &Registry, target: &TargetSnapshot) -> Option<Diagnostics> {
    let parcels = ParcelIndex::build(registry);
    corner_merge("101", &registry["101"], registry, &parcels, target)
}

#[test]
fn test_building_sibling_gets_alternate_address() {
    init_logger();
    let registry = corner_pair();
    let target = snapshot_with(mirror(&registry["100"], way_id(7)));

    let diagnostics = run(&registry, &target).expect("corner merge");

    assert_eq!(
        diagnostics,
        Diagnostics::ExistsButWrongData {
            suburb: registry["101"].suburb.clone(),
            target_id: way_id(7),
            issues: vec![
                AttributeIssue::AltRefs {
                    expected: vec!["101".to_string()],
                    actual: Vec::new(),
                },
                AttributeIssue::HousenumberAlt {
                    expected: Some("3".to_string()),
                    actual: None,
                },
                AttributeIssue::StreetAlt {
                    expected: "Side Road".to_string(),
                    actual: None,
                },
            ],
            needs_review: false,
        }
    );
}

#[test]
fn test_bare_point_sibling_is_left_alone() {
    let registry = corner_pair();
    let target = snapshot_with(mirror(&registry["100"], point_id(7)));

    assert!(run(&registry, &target).is_none());
}

#[test]
fn test_point_with_alternate_tags_is_accepted() {
    let registry = corner_pair();
    let mut feature = mirror(&registry["100"], point_id(7));
    feature.alt_refs = vec!["050".to_string()];
    feature.housenumber_alt = Some("3".to_string());
    feature.street_alt = Some("Side Road".to_string());
    feature.edited_by_other = true;
    let target = snapshot_with(feature);

    let Some(Diagnostics::ExistsButWrongData {
        issues,
        needs_review,
        ..
    }) = run(&registry, &target)
    else {
        panic!("expected a corner merge");
    };

    assert!(needs_review);
    assert_eq!(
        issues,
        vec![AttributeIssue::AltRefs {
            expected: vec!["050".to_string(), "101".to_string()],
            actual: vec!["050".to_string()],
        }]
    );
}

#[test]
fn test_same_street_needs_no_street_alt() {
    let mut registry = corner_pair();
    if let Some(record) = registry.get_mut("101") {
        record.street = "Main Street".to_string();
    }
    let target = snapshot_with(mirror(&registry["100"], way_id(7)));

    let Some(Diagnostics::ExistsButWrongData { issues, .. }) = run(&registry, &target) else {
        panic!("expected a corner merge");
    };
    let fields: Vec<_> = issues.iter().map(AttributeIssue::field_name).collect();
    assert_eq!(fields, vec!["alt_refs", "housenumber_alt"]);
}

#[test]
fn test_requires_exactly_two_records_on_parcel() {
    let mut registry = corner_pair();
    let mut third = root("5");
    third.parcel_id = Some("P1".to_string());
    registry.insert("102".to_string(), third);
    let target = snapshot_with(mirror(&registry["100"], way_id(7)));

    assert!(run(&registry, &target).is_none());
}

#[test]
fn test_unmapped_sibling_gives_nothing() {
    let registry = corner_pair();
    assert!(run(&registry, &TargetSnapshot::default()).is_none());
}

#[test]
fn test_manual_alternate_or_flat_blocks_merge() {
    let mut registry = corner_pair();
    if let Some(record) = registry.get_mut("100") {
        record.housenumber_alt = Some("3".to_string());
    }
    let target = snapshot_with(mirror(&registry["100"], way_id(7)));
    assert!(run(&registry, &target).is_none());

    let mut registry = corner_pair();
    if let Some(record) = registry.get_mut("101") {
        record.housenumber = "1/3".to_string();
    }
    assert!(run(&registry, &target).is_none());
}
