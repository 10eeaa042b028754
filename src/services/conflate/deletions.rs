//! Linked map features whose registry record is gone: either a genuine
//! deletion, or the registry renumbered the same address.

use std::collections::{BTreeMap, BTreeSet};

use super::snapshot::{Registry, TargetSnapshot};
use crate::types::address::{CheckedState, RegistryId, Suburb, TargetAddress};
use crate::types::report::{Diagnostics, ReportEntry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletionOutcome {
    /// Entries keyed by the orphaned registry ID.
    pub entries: Vec<ReportEntry>,
    /// New IDs that took over an orphaned feature; the classifier skips them.
    pub claimed: BTreeSet<RegistryId>,
}

type AddressKey<'a> = (&'a Suburb, &'a str, &'a str);

pub fn reconcile(registry: &Registry, target: &TargetSnapshot) -> DeletionOutcome {
    let mut by_address: BTreeMap<AddressKey<'_>, Vec<&RegistryId>> = BTreeMap::new();
    for (id, record) in registry {
        by_address
            .entry((&record.suburb, record.housenumber.as_str(), record.street.as_str()))
            .or_default()
            .push(id);
    }

    let mut outcome = DeletionOutcome::default();
    let mut renumbered = 0;

    let orphans = target
        .linz
        .iter()
        .filter(|(id, _)| !registry.contains_key(*id))
        .filter(|(_, feature)| feature.checked != CheckedState::Recent);

    for (old_id, feature) in orphans {
        let replacement = address_key(feature)
            .and_then(|key| by_address.get(&key))
            .and_then(|ids| {
                ids.iter()
                    .copied()
                    .find(|id| !target.is_linked(id) && !outcome.claimed.contains(*id))
            });

        let replacement = replacement.and_then(|id| registry.get(id).map(|record| (id, record)));
        let diagnostics = match replacement {
            Some((new_id, record)) => {
                outcome.claimed.insert(new_id.clone());
                renumbered += 1;
                Diagnostics::LinzRefChanged {
                    suburb: record.suburb.clone(),
                    new_id: new_id.clone(),
                    target: feature.clone(),
                    registry: record.clone(),
                }
            }
            None => deletion_for(feature),
        };
        outcome.entries.push(ReportEntry {
            id: old_id.clone(),
            diagnostics,
        });
    }

    log::info!(
        "Reconciled {} orphaned features ({} renumbered)",
        outcome.entries.len(),
        renumbered
    );
    outcome
}

fn address_key(feature: &TargetAddress) -> Option<AddressKey<'_>> {
    Some((
        feature.suburb.as_ref()?,
        feature.housenumber.as_deref()?,
        feature.street.as_deref()?,
    ))
}

/// Feature kind decides who reviews the deletion.
fn deletion_for(feature: &TargetAddress) -> Diagnostics {
    let suburb = feature.suburb.clone();
    let target = feature.clone();
    if feature.is_non_trivial {
        Diagnostics::NeedsDeleteNonTrivial { suburb, target }
    } else if feature.id.is_building_like() {
        Diagnostics::NeedsDeleteOnBuilding { suburb, target }
    } else {
        Diagnostics::NeedsDelete { suburb, target }
    }
}

#[cfg(test)]
#[path = "tests/deletions_tests.rs"]
mod tests;
