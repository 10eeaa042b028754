//! Detect flats numbered twice: `12A` and `1/12` for the same unit, where
//! one of the pair came in from the secondary source dataset.

use std::collections::{BTreeMap, BTreeSet};

use crate::services::config::ConflationConfig;
use crate::services::conflate::core::house_number::{unit_letter, HouseNumber};
use crate::services::conflate::snapshot::{Registry, TargetSnapshot};
use crate::types::address::{RegistryAddress, RegistryId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlternateMatches {
    /// Duplicate ID → canonical ID it merges into.
    pub duplicates: BTreeMap<RegistryId, RegistryId>,
}

impl AlternateMatches {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }

    /// True when `id` was merged into another record.
    pub fn is_duplicate(&self, id: &str) -> bool {
        self.duplicates.contains_key(id)
    }

    pub fn extend(&mut self, other: AlternateMatches) {
        self.duplicates.extend(other.duplicates);
    }

    /// Canonical ID → the duplicates merged into it.
    pub fn by_canonical(&self) -> BTreeMap<&RegistryId, Vec<&RegistryId>> {
        let mut out: BTreeMap<&RegistryId, Vec<&RegistryId>> = BTreeMap::new();
        for (duplicate, canonical) in &self.duplicates {
            out.entry(canonical).or_default().push(duplicate);
        }
        out
    }
}

/// Find alternate-numbered pairs among the flats sharing `parent`.
///
/// Returns nothing unless every flat is accounted for: paired, carrying a
/// manual alternate number, or the bare parent number itself.
pub fn find_alternates(
    parent: &str,
    flats: &[(&RegistryId, &RegistryAddress)],
    target: &TargetSnapshot,
    config: &ConflationConfig,
) -> AlternateMatches {
    if flats.len() < config.min_alternate_group {
        return AlternateMatches::default();
    }

    let parsed: Vec<(&RegistryId, Option<HouseNumber>)> = flats
        .iter()
        .map(|(id, record)| (*id, HouseNumber::parse(&record.housenumber)))
        .collect();

    let mut consumed: BTreeSet<&RegistryId> = BTreeSet::new();
    let mut duplicates = BTreeMap::new();

    for unit in 1.. {
        let Some(letter) = unit_letter(unit) else {
            break;
        };
        let letter_side = parsed.iter().find(|(_, hn)| {
            hn.as_ref()
                .is_some_and(|hn| hn.is_letter_form(parent, letter))
        });
        let slash_side = parsed
            .iter()
            .find(|(_, hn)| hn.as_ref().is_some_and(|hn| hn.is_slash_form(parent, unit)));
        let (Some((letter_id, _)), Some((slash_id, _))) = (letter_side, slash_side) else {
            break;
        };

        let letter_secondary = config.is_secondary_source(letter_id);
        let slash_secondary = config.is_secondary_source(slash_id);
        if !letter_secondary && !slash_secondary {
            // Both from the primary source: two real addresses
            continue;
        }

        let (canonical, duplicate) = if slash_secondary && !letter_secondary {
            (*letter_id, *slash_id)
        } else {
            (*slash_id, *letter_id)
        };
        consumed.insert(canonical);
        consumed.insert(duplicate);
        duplicates.insert(duplicate.clone(), canonical.clone());
    }

    if duplicates.is_empty() {
        return AlternateMatches::default();
    }

    let unaccounted = flats.iter().find(|(id, record)| {
        !consumed.contains(id)
            && !has_manual_alternate(id, record, target)
            && record.housenumber != parent
    });
    if let Some((id, record)) = unaccounted {
        log::debug!(
            "Alternate pairs under {parent} rejected: {id} ({}) has no partner",
            record.housenumber
        );
        return AlternateMatches::default();
    }

    AlternateMatches { duplicates }
}

fn has_manual_alternate(id: &str, record: &RegistryAddress, target: &TargetSnapshot) -> bool {
    record.housenumber_alt.is_some()
        || target
            .linked(id)
            .is_some_and(|feature| feature.housenumber_alt.is_some())
}

/// Drop each duplicate and carry its number onto the canonical record as
/// the alternate house number.
pub fn apply_alternates(registry: &mut Registry, matches: &AlternateMatches) {
    for (duplicate, canonical) in &matches.duplicates {
        let Some(removed) = registry.remove(duplicate) else {
            continue;
        };
        if let Some(survivor) = registry.get_mut(canonical) {
            if survivor.housenumber_alt.is_none() {
                survivor.housenumber_alt = Some(removed.housenumber);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/alternates_tests.rs"]
mod tests;
