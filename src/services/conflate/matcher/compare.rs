//! Field-by-field comparison of a registry record with its linked feature.

use std::collections::BTreeSet;

use crate::services::conflate::core::names::names_match;
use crate::services::conflate::snapshot::Registry;
use crate::types::address::{RegistryAddress, RegistryId, TargetAddress};
use crate::types::report::AttributeIssue;

/// Registry-side alternate house number, falling back to the number of the
/// first live record merged onto the feature.
pub fn expected_housenumber_alt(
    record: &RegistryAddress,
    feature: &TargetAddress,
    registry: &Registry,
) -> Option<String> {
    record.housenumber_alt.clone().or_else(|| {
        feature
            .alt_refs
            .iter()
            .find_map(|alt| registry.get(alt))
            .map(|alt| alt.housenumber.clone())
    })
}

/// Every disagreement between `record` and `feature`. `merged` lists the
/// registry IDs folded into this record as alternates.
pub fn compare_attributes(
    record: &RegistryAddress,
    feature: &TargetAddress,
    merged: &[&RegistryId],
    registry: &Registry,
) -> Vec<AttributeIssue> {
    let mut issues = Vec::new();

    if feature.housenumber.as_deref() != Some(record.housenumber.as_str()) {
        issues.push(AttributeIssue::Housenumber {
            expected: record.housenumber.clone(),
            actual: feature.housenumber.clone(),
        });
    }

    let expected_alt = expected_housenumber_alt(record, feature, registry);
    if expected_alt != feature.housenumber_alt {
        issues.push(AttributeIssue::HousenumberAlt {
            expected: expected_alt,
            actual: feature.housenumber_alt.clone(),
        });
    }

    let street_ok = feature
        .street
        .as_deref()
        .is_some_and(|street| names_match(&record.street, street));
    if !street_ok {
        issues.push(AttributeIssue::Street {
            expected: record.street.clone(),
            actual: feature.street.clone(),
        });
    }

    if feature.suburb.as_ref() != Some(&record.suburb) {
        issues.push(AttributeIssue::Suburb {
            expected: record.suburb.clone(),
            actual: feature.suburb.clone(),
        });
    }

    // Town is only checked when the map already has one, and never when it
    // would just repeat the suburb.
    if let Some(actual) = &feature.town {
        if record.town != record.suburb.name() && !names_match(&record.town, actual) {
            issues.push(AttributeIssue::Town {
                expected: record.town.clone(),
                actual: Some(actual.clone()),
            });
        }
    }

    if record.water != feature.water {
        issues.push(AttributeIssue::Water {
            expected: record.water,
        });
    }

    if record.flat_count != feature.flat_count {
        issues.push(AttributeIssue::FlatCount {
            expected: record.flat_count,
            actual: feature.flat_count,
        });
    }

    if record.level != feature.level {
        issues.push(AttributeIssue::Level {
            expected: record.level.clone(),
            actual: feature.level.clone(),
        });
    }

    if let Some(issue) = alt_ref_issue(feature, merged, registry) {
        issues.push(issue);
    }

    if feature.double_suburb {
        issues.push(AttributeIssue::DoubleSuburb);
    }

    issues
}

/// The feature must name every merged duplicate, and may otherwise only
/// name live registry records.
fn alt_ref_issue(
    feature: &TargetAddress,
    merged: &[&RegistryId],
    registry: &Registry,
) -> Option<AttributeIssue> {
    let actual: BTreeSet<&RegistryId> = feature.alt_refs.iter().collect();
    let missing = merged.iter().any(|id| !actual.contains(id));
    let stale = actual
        .iter()
        .any(|id| !merged.contains(id) && !registry.contains_key(*id));
    if !missing && !stale {
        return None;
    }

    let expected: BTreeSet<&RegistryId> = actual
        .iter()
        .copied()
        .filter(|id| registry.contains_key(*id))
        .chain(merged.iter().copied())
        .collect();
    Some(AttributeIssue::AltRefs {
        expected: expected.into_iter().cloned().collect(),
        actual: feature.alt_refs.clone(),
    })
}

#[cfg(test)]
#[path = "tests/compare_tests.rs"]
mod tests;
