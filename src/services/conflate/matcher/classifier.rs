//! Per-record classification against the map.
//!
//! Each live registry record gets exactly one status, decided in priority
//! order: linked feature, duplicate links, malformed links, alternate
//! reference, then candidate search over unreferenced features.

use std::collections::{BTreeMap, BTreeSet};

use super::candidates::{preferred, CandidatePool};
use super::compare::compare_attributes;
use super::corner::{corner_merge, ParcelIndex};
use crate::services::config::ConflationConfig;
use crate::services::conflate::core::spatial::{self, OverlapIndex};
use crate::services::conflate::snapshot::{Registry, TargetSnapshot};
use crate::services::conflate::stacking::alternates::AlternateMatches;
use crate::services::conflate::stacking::codec::{self, StackDecode};
use crate::types::address::{
    CheckedState, RegistryAddress, RegistryId, TargetAddress, TargetFeatureId,
};
use crate::types::errors::{ConflateError, ConflateResult};
use crate::types::report::{ConflationReport, Diagnostics};

/// Read-only view of everything classification needs, built once per run.
pub struct Classifier<'a> {
    registry: &'a Registry,
    target: &'a TargetSnapshot,
    config: &'a ConflationConfig,
    overlaps: OverlapIndex,
    pool: CandidatePool<'a>,
    /// Only populated in slow mode.
    buildings: Option<CandidatePool<'a>>,
    parcels: ParcelIndex,
    /// Canonical ID → alternates merged into it during stacking.
    merged_into: BTreeMap<&'a str, Vec<&'a RegistryId>>,
    /// Registry ID → linked feature naming it in `alt_refs`.
    alt_referenced: BTreeMap<&'a str, TargetFeatureId>,
}

impl<'a> Classifier<'a> {
    pub fn new(
        registry: &'a Registry,
        target: &'a TargetSnapshot,
        alternates: &'a AlternateMatches,
        config: &'a ConflationConfig,
    ) -> Self {
        let overlaps = OverlapIndex::build(
            registry.values().map(|record| (record.lat, record.lng)),
            config.coord_precision_deg,
        );

        let buildings = config
            .slow_mode
            .then(|| CandidatePool::buildings(&target.no_ref));

        let merged_into = alternates
            .by_canonical()
            .into_iter()
            .map(|(canonical, duplicates)| (canonical.as_str(), duplicates))
            .collect();

        let mut alt_referenced = BTreeMap::new();
        for feature in target.linz.values() {
            for alt in &feature.alt_refs {
                alt_referenced.entry(alt.as_str()).or_insert(feature.id);
            }
        }

        Self {
            registry,
            target,
            config,
            overlaps,
            pool: CandidatePool::new(&target.no_ref),
            buildings,
            parcels: ParcelIndex::build(registry),
            merged_into,
            alt_referenced,
        }
    }

    /// Classify every record not in `skip`, in registry key order.
    pub fn classify_all(
        &self,
        skip: &BTreeSet<RegistryId>,
        report: &mut ConflationReport,
    ) -> ConflateResult<usize> {
        let mut classified = 0;
        for (id, record) in self.registry {
            if skip.contains(id) {
                continue;
            }
            let diagnostics = self.classify(id, record)?;
            report.push(id.clone(), diagnostics);
            classified += 1;
        }
        log::info!(
            "Classified {} records ({} skipped as renumbered)",
            classified,
            skip.len()
        );
        Ok(classified)
    }

    /// Classify one record. Fails only on a stack key that does not decode.
    pub fn classify(&self, id: &str, record: &RegistryAddress) -> ConflateResult<Diagnostics> {
        let diagnostics = self.decide(id, record);

        #[cfg(feature = "debug_conflate")]
        log::debug!("{} -> {}", id, diagnostics.status());

        if codec::is_stack_id(id) && codec::decode(id) == StackDecode::Invalid {
            return Err(ConflateError::MalformedStackId {
                id: id.to_string(),
                status: diagnostics.status().to_string(),
            });
        }
        Ok(diagnostics)
    }

    fn decide(&self, id: &str, record: &RegistryAddress) -> Diagnostics {
        if let Some(feature) = self.target.linked(id) {
            return self.classify_linked(id, record, feature);
        }

        if let Some(targets) = self.target.duplicate_linz_ids.get(id) {
            return Diagnostics::MultipleExist {
                suburb: record.suburb.clone(),
                targets: targets.clone(),
            };
        }

        if let Some(feature) = self.target.semi.get(id) {
            return Diagnostics::Corrupt {
                suburb: record.suburb.clone(),
                target: feature.clone(),
            };
        }

        if let Some(feature_id) = self.alt_referenced.get(id) {
            return Diagnostics::Perfect {
                target_id: Some(*feature_id),
            };
        }

        self.classify_unlinked(id, record)
    }

    fn classify_linked(
        &self,
        id: &str,
        record: &RegistryAddress,
        feature: &TargetAddress,
    ) -> Diagnostics {
        if feature.checked == CheckedState::Recent {
            return Diagnostics::Perfect {
                target_id: Some(feature.id),
            };
        }

        let merged = self.merged_into.get(id).map_or(&[][..], Vec::as_slice);
        let issues = compare_attributes(record, feature, merged, self.registry);
        if !issues.is_empty() {
            return Diagnostics::ExistsButWrongData {
                suburb: record.suburb.clone(),
                target_id: feature.id,
                issues,
                needs_review: feature.edited_by_other,
            };
        }

        let distance_m =
            spatial::rounded_distance(record.lat, record.lng, feature.lat, feature.lng);
        let limit = if self.tight_drift_applies(id, record, feature) {
            self.config.tight_drift_m
        } else {
            self.config.loose_drift_m
        };
        if distance_m > limit {
            return Diagnostics::ExistsButLocationWrong {
                suburb: record.suburb.clone(),
                target_id: feature.id,
                distance_m,
                lat: record.lat,
                lng: record.lng,
            };
        }

        if let Some(building) = self.replacing_building(record, feature) {
            return Diagnostics::ReplacedByBuilding {
                suburb: record.suburb.clone(),
                target_id: feature.id,
                building,
            };
        }

        Diagnostics::Perfect {
            target_id: Some(feature.id),
        }
    }

    /// Import-only simple points on a unique location are held to the
    /// tight threshold.
    fn tight_drift_applies(
        &self,
        id: &str,
        record: &RegistryAddress,
        feature: &TargetAddress,
    ) -> bool {
        feature.is_simple_point()
            && !feature.edited_by_other
            && self.overlaps.count(record.lat, record.lng) <= 1
            && !self.config.is_secondary_source(id)
    }

    /// Slow mode only: a single unreferenced building carrying the same
    /// address supersedes a plain point.
    fn replacing_building(
        &self,
        record: &RegistryAddress,
        feature: &TargetAddress,
    ) -> Option<TargetAddress> {
        let buildings = self.buildings.as_ref()?;
        if !feature.is_simple_point() {
            return None;
        }
        match buildings.find(record, self.config.candidate_radius_m).as_slice() {
            [only] => Some(only.target.clone()),
            _ => None,
        }
    }

    fn classify_unlinked(&self, id: &str, record: &RegistryAddress) -> Diagnostics {
        let candidates = self.pool.find(record, self.config.candidate_radius_m);
        match candidates.as_slice() {
            [] => corner_merge(id, record, self.registry, &self.parcels, self.target)
                .unwrap_or_else(|| Diagnostics::TotallyMissing {
                    suburb: record.suburb.clone(),
                    registry: record.clone(),
                }),
            [only] => Diagnostics::ExistsButNoLinzRef {
                suburb: record.suburb.clone(),
                confidence: only.confidence,
                target: only.target.clone(),
            },
            [first, ..] => {
                let chosen = preferred(&candidates).unwrap_or(first);
                Diagnostics::MultipleExistButNoLinzRef {
                    suburb: record.suburb.clone(),
                    preferred: chosen.target.clone(),
                    candidates: candidates.iter().map(|candidate| candidate.target.id).collect(),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
