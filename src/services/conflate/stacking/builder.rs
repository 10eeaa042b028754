//! Collapse groups of flats sharing a parent number into one stack record.

use std::collections::{BTreeMap, BTreeSet};

use super::alternates::{apply_alternates, find_alternates, AlternateMatches};
use super::codec;
use crate::services::config::ConflationConfig;
use crate::services::conflate::core::spatial;
use crate::services::conflate::snapshot::{RegionalThresholds, Registry, TargetSnapshot};
use crate::types::address::{RegistryAddress, RegistryId, Suburb};
use crate::types::report::{Diagnostics, ReportEntry};

/// Parent number + street + suburb.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    parent: String,
    street: String,
    suburb: Suburb,
}

impl GroupKey {
    fn of(record: &RegistryAddress) -> Self {
        Self {
            parent: record.housenumber_msb.clone(),
            street: record.street.clone(),
            suburb: record.suburb.clone(),
        }
    }
}

/// Working registry after stacking, plus what the stage decided on the way.
#[derive(Debug, Clone, Default)]
pub struct StackOutcome {
    pub registry: Registry,
    pub alternates: AlternateMatches,
    /// Advisory `CouldBeStacked` entries, one per already-mapped member.
    pub advisories: Vec<ReportEntry>,
    pub stacks_created: usize,
}

/// Explicit stacking overrides found on either dataset.
#[derive(Debug, Clone, Copy, Default)]
struct Overrides {
    unstacked: bool,
    stack_requested: bool,
    keep_separate: bool,
}

impl Overrides {
    fn collect(
        stack_id: &str,
        members: &[(&RegistryId, &RegistryAddress)],
        target: &TargetSnapshot,
    ) -> Self {
        let stack_tag = target.linked(stack_id).and_then(|feature| feature.stack_request);
        let member_tags: Vec<Option<bool>> = members
            .iter()
            .flat_map(|(id, record)| {
                [
                    record.stack_request,
                    target.linked(id).and_then(|feature| feature.stack_request),
                ]
            })
            .collect();

        Self {
            unstacked: stack_tag == Some(false),
            stack_requested: stack_tag == Some(true) || member_tags.contains(&Some(true)),
            keep_separate: member_tags.contains(&Some(false)),
        }
    }
}

pub fn build_stacks(
    registry: &Registry,
    target: &TargetSnapshot,
    regions: &RegionalThresholds,
    config: &ConflationConfig,
) -> StackOutcome {
    let mut working = registry.clone();
    let mut outcome = StackOutcome::default();

    let mut groups: BTreeMap<GroupKey, Vec<&RegistryId>> = BTreeMap::new();
    let mut roots: BTreeMap<GroupKey, &RegistryId> = BTreeMap::new();
    for (id, record) in registry {
        if record.is_stack() {
            continue;
        }
        if record.is_flat() {
            groups.entry(GroupKey::of(record)).or_default().push(id);
        } else {
            roots.entry(GroupKey::of(record)).or_insert(id);
        }
    }

    for (key, ids) in &groups {
        let flats: Vec<(&RegistryId, &RegistryAddress)> =
            ids.iter().map(|id| (*id, &registry[*id])).collect();

        let alternates = find_alternates(&key.parent, &flats, target, config);
        if !alternates.is_empty() {
            log::debug!(
                "{} alternate duplicates under {} {}",
                alternates.duplicates.len(),
                key.parent,
                key.street
            );
            apply_alternates(&mut working, &alternates);
        }
        let members: Vec<(&RegistryId, &RegistryAddress)> = flats
            .iter()
            .filter(|(id, _)| !alternates.is_duplicate(id))
            .filter_map(|(id, _)| working.get(*id).map(|record| (*id, record)))
            .collect();
        let decision = decide(key, &members, target, regions, config);
        outcome.alternates.extend(alternates);

        match decision {
            Decision::Leave => {}
            Decision::Advise(entries) => outcome.advisories.extend(entries),
            Decision::Stack(stack_id, record) => {
                let member_ids: Vec<RegistryId> =
                    members.iter().map(|(id, _)| (*id).clone()).collect();
                merge_group(&mut working, roots.get(key).copied(), stack_id, record, &member_ids);
                outcome.stacks_created += 1;
            }
        }
    }

    log::info!(
        "Stacking: {} flat groups, {} stacks, {} alternate duplicates, {} advisories",
        groups.len(),
        outcome.stacks_created,
        outcome.alternates.duplicates.len(),
        outcome.advisories.len()
    );
    outcome.registry = working;
    outcome
}

enum Decision {
    Leave,
    Advise(Vec<ReportEntry>),
    Stack(RegistryId, RegistryAddress),
}

fn decide(
    key: &GroupKey,
    members: &[(&RegistryId, &RegistryAddress)],
    target: &TargetSnapshot,
    regions: &RegionalThresholds,
    config: &ConflationConfig,
) -> Decision {
    let Some((_, representative)) = members.first() else {
        return Decision::Leave;
    };
    let size = members.len();
    let member_ids: Vec<&str> = members.iter().map(|(id, _)| id.as_str()).collect();
    let stack_id = codec::encode(&member_ids, config.stack_id_budget);
    let overrides = Overrides::collect(&stack_id, members, target);

    if overrides.unstacked {
        return Decision::Leave;
    }

    let mapped: Vec<&RegistryId> = members
        .iter()
        .filter(|(id, _)| target.is_linked(id))
        .map(|(id, _)| *id)
        .collect();
    let already_mapped_separately =
        mapped.len() > 2 && mapped.len() * 2 >= size && !target.is_linked(&stack_id);

    let distinct: BTreeSet<String> = members
        .iter()
        .map(|(_, record)| spatial::coord_key(record.lat, record.lng, config.coord_precision_deg))
        .collect();
    let mostly_coincident = distinct.len() as f64 / size as f64 <= config.coincident_ratio;

    let threshold = regions.effective_threshold(
        config.default_stack_threshold(),
        representative.lat,
        representative.lng,
    );
    let would_stack = size > threshold && mostly_coincident;

    #[cfg(feature = "debug_conflate")]
    log::debug!(
        "[STACK] {} {} {}: size={size} threshold={threshold} distinct={} mapped={} overrides={overrides:?}",
        key.parent,
        key.street,
        key.suburb,
        distinct.len(),
        mapped.len()
    );

    if (already_mapped_separately || overrides.keep_separate) && !overrides.stack_requested {
        if !would_stack {
            return Decision::Leave;
        }
        let summary = format!("{}+{}", mapped.len(), size - mapped.len());
        let entries = mapped
            .iter()
            .filter_map(|id| {
                let feature = target.linked(id)?;
                Some(ReportEntry {
                    id: (*id).clone(),
                    diagnostics: Diagnostics::CouldBeStacked {
                        suburb: key.suburb.clone(),
                        stack_id: stack_id.clone(),
                        summary: summary.clone(),
                        target_id: feature.id,
                    },
                })
            })
            .collect();
        return Decision::Advise(entries);
    }

    if !(would_stack || overrides.stack_requested) {
        return Decision::Leave;
    }

    let record = RegistryAddress {
        housenumber: key.parent.clone(),
        housenumber_msb: key.parent.clone(),
        flat_count: Some(size as u32),
        level: None,
        housenumber_alt: None,
        stack_request: None,
        parcel_id: None,
        ..(*representative).clone()
    };
    Decision::Stack(stack_id, record)
}

/// Replace the members with one record. A root address at the same key
/// takes the flat count instead, so two records never share an address.
fn merge_group(
    working: &mut Registry,
    root: Option<&RegistryId>,
    stack_id: RegistryId,
    record: RegistryAddress,
    members: &[RegistryId],
) {
    for id in members {
        working.remove(id);
    }

    let flat_count = record.flat_count;
    match root.and_then(|id| working.get_mut(id)) {
        Some(root_record) => root_record.flat_count = flat_count,
        None => {
            working.insert(stack_id, record);
        }
    }
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
