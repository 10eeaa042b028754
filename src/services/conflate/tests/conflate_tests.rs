use super::*;
use crate::test_utils::{
    flat, init_logger, linked_point, mirror, north_of, point_id, root, BASE_LAT,
};
use crate::types::errors::ConflateError;
use crate::types::report::{Confidence, Diagnostics};

fn run(
    registry: &Registry,
    target: &TargetSnapshot,
    config: &ConflationConfig,
) -> ConflationReport {
    init_logger();
    conflate(registry, target, &RegionalThresholds::default(), config).expect("conflation succeeds")
}

#[test]
fn test_unreferenced_match_fifty_metres_away() {
    let mut registry = Registry::new();
    let mut record = root("12");
    record.street = "Main St".to_string();
    registry.insert("A".to_string(), record);
    let mut target = TargetSnapshot::default();
    let mut feature = linked_point(1, "12", "Main St");
    feature.lat = north_of(BASE_LAT, 50.0);
    target.no_ref.push(feature.clone());

    let report = run(&registry, &target, &ConflationConfig::default());

    assert_eq!(report.total(), 1);
    assert_eq!(
        report.entry_for(Status::ExistsButNoLinzRef, "A"),
        Some(&Diagnostics::ExistsButNoLinzRef {
            suburb: registry["A"].suburb.clone(),
            confidence: Confidence::Certain,
            target: feature,
        })
    );
}

#[test]
fn test_every_record_gets_exactly_one_status() {
    let mut registry = Registry::new();
    registry.insert("100".to_string(), root("12"));
    registry.insert("101".to_string(), root("14"));
    registry.insert("102".to_string(), root("16"));
    let mut target = TargetSnapshot::default();
    target
        .linz
        .insert("100".to_string(), mirror(&registry["100"], point_id(1)));
    target
        .semi
        .insert("101".to_string(), linked_point(2, "14", "Main Street"));

    let report = run(&registry, &target, &ConflationConfig::default());

    assert_eq!(report.total(), 3);
    assert_eq!(report.status_of("100"), Some(Status::Perfect));
    assert_eq!(report.status_of("101"), Some(Status::Corrupt));
    assert_eq!(report.status_of("102"), Some(Status::TotallyMissing));
}

#[test]
fn test_renumbered_record_is_not_also_missing() {
    let mut registry = Registry::new();
    registry.insert("200".to_string(), root("12"));
    let mut target = TargetSnapshot::default();
    target
        .linz
        .insert("100".to_string(), mirror(&registry["200"], point_id(1)));

    let report = run(&registry, &target, &ConflationConfig::default());

    assert_eq!(report.total(), 1);
    assert_eq!(report.status_of("100"), Some(Status::LinzRefChanged));
    assert_eq!(report.status_of("200"), None);
}

#[test]
fn test_stacked_members_become_deletions_and_stack_is_classified() {
    let mut registry = Registry::new();
    for unit in 1..=3 {
        registry.insert((100 + unit).to_string(), flat(&format!("{unit}/12"), "12"));
    }
    let mut target = TargetSnapshot::default();
    target.linz.insert(
        "101".to_string(),
        mirror(&registry["101"], point_id(1)),
    );
    let config = ConflationConfig {
        test_mode: true,
        ..ConflationConfig::default()
    };

    let report = run(&registry, &target, &config);

    assert_eq!(report.status_of("stack(101-103)"), Some(Status::TotallyMissing));
    assert_eq!(report.status_of("101"), Some(Status::NeedsDelete));
    assert_eq!(report.total(), 2);
}

#[test]
fn test_grown_stack_inherits_old_stack_feature() {
    let mut registry = Registry::new();
    for unit in 1..=3 {
        registry.insert(unit.to_string(), flat(&format!("{unit}/12"), "12"));
    }
    let mut feature = linked_point(1, "12", "Main Street");
    feature.flat_count = Some(2);
    let mut target = TargetSnapshot::default();
    target.linz.insert("stack(1-2)".to_string(), feature);
    let config = ConflationConfig {
        test_mode: true,
        ..ConflationConfig::default()
    };

    let report = run(&registry, &target, &config);

    let Some(Diagnostics::LinzRefChanged { new_id, .. }) =
        report.entry_for(Status::LinzRefChanged, "stack(1-2)")
    else {
        panic!("expected the old stack key to be renumbered, got {report:?}");
    };
    assert_eq!(new_id, "stack(1-3)");
    assert_eq!(report.status_of("stack(1-3)"), None);
    assert_eq!(report.total(), 1);
}

#[test]
fn test_advisories_share_member_ids() {
    let mut registry = Registry::new();
    let mut target = TargetSnapshot::default();
    for unit in 1..=4 {
        let id = (100 + unit).to_string();
        let record = flat(&format!("{unit}/12"), "12");
        if unit <= 3 {
            target
                .linz
                .insert(id.clone(), mirror(&record, point_id(unit as i64)));
        }
        registry.insert(id, record);
    }
    let config = ConflationConfig {
        test_mode: true,
        ..ConflationConfig::default()
    };

    let report = run(&registry, &target, &config);

    assert_eq!(report.count(Status::CouldBeStacked), 3);
    assert_eq!(report.status_of("101"), Some(Status::Perfect));
    assert_eq!(report.status_of("104"), Some(Status::TotallyMissing));
    assert_eq!(report.total(), 7);
}

#[test]
fn test_report_is_deterministic() {
    let mut registry = Registry::new();
    for n in 0..20 {
        registry.insert(format!("{}", 500 + n), root(&(n * 2).to_string()));
    }
    let mut target = TargetSnapshot::default();
    for n in 0..10 {
        let mut feature = linked_point(n, &(n * 2).to_string(), "Main Street");
        feature.lat = north_of(BASE_LAT, n as f64 * 3.0);
        target.no_ref.push(feature);
    }

    let config = ConflationConfig::default();
    let first = run(&registry, &target, &config);
    let second = run(&registry, &target, &config);

    let first_json = serde_json::to_string(&first).expect("serialize");
    let second_json = serde_json::to_string(&second).expect("serialize");
    assert_eq!(first_json, second_json);
    assert_eq!(first.total(), 20);
}

#[test]
fn test_invalid_config_aborts() {
    let config = ConflationConfig {
        tight_drift_m: 500.0,
        ..ConflationConfig::default()
    };
    let result = conflate(
        &Registry::new(),
        &TargetSnapshot::default(),
        &RegionalThresholds::default(),
        &config,
    );

    assert!(matches!(result, Err(ConflateError::InvalidConfig(_))));
}

#[test]
fn test_malformed_stack_key_aborts_run() {
    let mut registry = Registry::new();
    registry.insert("stack(1".to_string(), root("12"));

    let err = conflate(
        &registry,
        &TargetSnapshot::default(),
        &RegionalThresholds::default(),
        &ConflationConfig::default(),
    )
    .expect_err("must fail fast");

    assert_eq!(err.record_id(), Some("stack(1"));
}
