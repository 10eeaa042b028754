//! Find unreferenced map features that plausibly represent a registry
//! record.

use std::collections::BTreeMap;

use crate::services::conflate::core::spatial;
use crate::types::address::{RegistryAddress, TargetAddress};
use crate::types::report::Confidence;

/// A possible match. Owns a copy of the feature so callers never alias the
/// snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub target: TargetAddress,
    pub confidence: Confidence,
    pub distance_m: f64,
}

/// Unreferenced features indexed by house number + street.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool<'a> {
    by_address: BTreeMap<(&'a str, &'a str), Vec<&'a TargetAddress>>,
}

impl<'a> CandidatePool<'a> {
    pub fn new<I>(features: I) -> Self
    where
        I: IntoIterator<Item = &'a TargetAddress>,
    {
        let mut by_address: BTreeMap<(&'a str, &'a str), Vec<&'a TargetAddress>> = BTreeMap::new();
        for feature in features {
            let (Some(housenumber), Some(street)) = (&feature.housenumber, &feature.street) else {
                continue;
            };
            by_address
                .entry((housenumber.as_str(), street.as_str()))
                .or_default()
                .push(feature);
        }
        Self { by_address }
    }

    /// Only building-like (non-point) features.
    pub fn buildings<I>(features: I) -> Self
    where
        I: IntoIterator<Item = &'a TargetAddress>,
    {
        Self::new(
            features
                .into_iter()
                .filter(|feature| feature.id.is_building_like()),
        )
    }

    pub fn len(&self) -> usize {
        self.by_address.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }

    /// Candidates ranked by confidence, then distance, then feature ID.
    ///
    /// A single same-suburb match is returned alone at `Certain`. Several
    /// same-suburb matches come first at `HighButMultiple`, followed by every
    /// other match within `radius_m` at `Normal`.
    pub fn find(&self, record: &RegistryAddress, radius_m: f64) -> Vec<Candidate> {
        let Some(matches) = self
            .by_address
            .get(&(record.housenumber.as_str(), record.street.as_str()))
        else {
            return Vec::new();
        };

        let measure = |feature: &TargetAddress, confidence: Confidence| Candidate {
            target: feature.clone(),
            confidence,
            distance_m: spatial::rounded_distance(record.lat, record.lng, feature.lat, feature.lng),
        };

        let (same_suburb, other): (Vec<&TargetAddress>, Vec<&TargetAddress>) = matches
            .iter()
            .copied()
            .partition(|feature| feature.suburb.as_ref() == Some(&record.suburb));

        if let [only] = same_suburb.as_slice() {
            return vec![measure(*only, Confidence::Certain)];
        }

        let mut high: Vec<Candidate> = same_suburb
            .iter()
            .map(|feature| measure(*feature, Confidence::HighButMultiple))
            .collect();
        sort_by_distance(&mut high);

        let mut normal: Vec<Candidate> = other
            .iter()
            .map(|feature| measure(*feature, Confidence::Normal))
            .filter(|candidate| candidate.distance_m <= radius_m)
            .collect();
        sort_by_distance(&mut normal);

        high.extend(normal);
        high
    }
}

fn sort_by_distance(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then_with(|| a.target.id.cmp(&b.target.id))
    });
}

/// Pick the candidate to report when there are several: the first building
/// or non-trivial feature, else the first candidate.
pub fn preferred(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates
        .iter()
        .find(|candidate| !candidate.target.is_simple_point())
        .or_else(|| candidates.first())
}

#[cfg(test)]
#[path = "tests/candidates_tests.rs"]
mod tests;
