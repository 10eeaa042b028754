//! Corner sections: two root addresses on one parcel, usually one per
//! street frontage. When only one of them is mapped, the other belongs on
//! the same feature as an alternate address rather than as a new point.

use std::collections::{BTreeMap, BTreeSet};

use crate::services::conflate::core::names::names_match;
use crate::services::conflate::snapshot::{Registry, TargetSnapshot};
use crate::types::address::{RegistryAddress, RegistryId};
use crate::types::report::{AttributeIssue, Diagnostics};

/// Registry IDs grouped by cadastral parcel.
#[derive(Debug, Clone, Default)]
pub struct ParcelIndex {
    parcels: BTreeMap<String, Vec<RegistryId>>,
}

impl ParcelIndex {
    pub fn build(registry: &Registry) -> Self {
        let mut parcels: BTreeMap<String, Vec<RegistryId>> = BTreeMap::new();
        for (id, record) in registry {
            if let Some(parcel) = &record.parcel_id {
                parcels.entry(parcel.clone()).or_default().push(id.clone());
            }
        }
        Self { parcels }
    }

    /// The one other record on `record`'s parcel, if there is exactly one.
    pub fn sibling_of<'a>(&'a self, id: &str, record: &RegistryAddress) -> Option<&'a RegistryId> {
        let members = self.parcels.get(record.parcel_id.as_deref()?)?;
        match members.as_slice() {
            [a, b] if a == id => Some(b),
            [a, b] if b == id => Some(a),
            _ => None,
        }
    }
}

/// Propose merging an unmapped record onto its parcel sibling's feature.
pub fn corner_merge(
    id: &str,
    record: &RegistryAddress,
    registry: &Registry,
    parcels: &ParcelIndex,
    target: &TargetSnapshot,
) -> Option<Diagnostics> {
    let sibling_id = parcels.sibling_of(id, record)?;
    let sibling = registry.get(sibling_id)?;

    if record.housenumber_alt.is_some() || sibling.housenumber_alt.is_some() {
        return None;
    }
    if record.is_flat() || sibling.is_flat() {
        return None;
    }

    let feature = target.linked(sibling_id)?;
    // Bare address points stay single-address.
    if feature.is_point() && !feature.has_alternate_tags() {
        return None;
    }

    let mut issues = Vec::new();

    let expected_refs: BTreeSet<RegistryId> = feature
        .alt_refs
        .iter()
        .cloned()
        .chain(std::iter::once(id.to_string()))
        .collect();
    issues.push(AttributeIssue::AltRefs {
        expected: expected_refs.into_iter().collect(),
        actual: feature.alt_refs.clone(),
    });

    if feature.housenumber_alt.as_deref() != Some(record.housenumber.as_str()) {
        issues.push(AttributeIssue::HousenumberAlt {
            expected: Some(record.housenumber.clone()),
            actual: feature.housenumber_alt.clone(),
        });
    }

    let same_street = names_match(&sibling.street, &record.street);
    let alt_street_ok = feature
        .street_alt
        .as_deref()
        .is_some_and(|street| names_match(&record.street, street));
    if !same_street && !alt_street_ok {
        issues.push(AttributeIssue::StreetAlt {
            expected: record.street.clone(),
            actual: feature.street_alt.clone(),
        });
    }

    #[cfg(feature = "debug_conflate")]
    log::debug!(
        "Corner section: {} joins {} on {} ({} issues)",
        id,
        sibling_id,
        feature.id,
        issues.len()
    );

    Some(Diagnostics::ExistsButWrongData {
        suburb: record.suburb.clone(),
        target_id: feature.id,
        issues,
        needs_review: feature.edited_by_other,
    })
}

#[cfg(test)]
#[path = "tests/corner_tests.rs"]
mod tests;
