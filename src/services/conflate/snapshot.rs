//! Immutable input snapshots and their JSON loaders.

use geo::Polygon;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

use super::core::spatial;
use crate::types::address::{RegistryAddress, RegistryId, TargetAddress};
use crate::types::errors::{ConflateError, ConflateResult};

/// Registry snapshot, ordered by ID so every pass is deterministic.
pub type Registry = BTreeMap<RegistryId, RegistryAddress>;

/// Target snapshot split by how each feature references the registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSnapshot {
    /// Features with exactly one, unique registry reference.
    #[serde(default)]
    pub linz: BTreeMap<RegistryId, TargetAddress>,
    /// Registry IDs referenced by more than one feature.
    #[serde(default, alias = "duplicateLinzIds")]
    pub duplicate_linz_ids: BTreeMap<RegistryId, Vec<TargetAddress>>,
    /// Features whose reference is a semicolon-joined list, keyed by each
    /// listed ID.
    #[serde(default)]
    pub semi: BTreeMap<RegistryId, TargetAddress>,
    /// Address features with no registry reference at all.
    #[serde(default, alias = "noRef")]
    pub no_ref: Vec<TargetAddress>,
}

impl TargetSnapshot {
    pub fn from_json(json: &str) -> ConflateResult<Self> {
        serde_json::from_str(json).map_err(|e| ConflateError::snapshot("target snapshot", e))
    }

    pub fn linked(&self, id: &str) -> Option<&TargetAddress> {
        self.linz.get(id)
    }

    pub fn is_linked(&self, id: &str) -> bool {
        self.linz.contains_key(id)
    }
}

pub fn registry_from_json(json: &str) -> ConflateResult<Registry> {
    serde_json::from_str(json).map_err(|e| ConflateError::snapshot("registry", e))
}

/// One polygon lowering the stacking threshold for a dense area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionThreshold {
    pub name: String,
    pub threshold: usize,
    /// Written as `[lng, lat]` vertices.
    #[serde(with = "lng_lat_ring")]
    pub polygon: Polygon<f64>,
}

impl RegionThreshold {
    pub fn new(name: &str, threshold: usize, vertices: &[[f64; 2]]) -> Self {
        Self {
            name: name.to_string(),
            threshold,
            polygon: spatial::polygon_from_vertices(vertices),
        }
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        spatial::polygon_contains(&self.polygon, lat, lng)
    }
}

mod lng_lat_ring {
    use super::*;

    pub fn serialize<S: Serializer>(
        polygon: &Polygon<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        spatial::polygon_vertices(polygon).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Polygon<f64>, D::Error> {
        let vertices = Vec::<[f64; 2]>::deserialize(deserializer)?;
        Ok(spatial::polygon_from_vertices(&vertices))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionalThresholds {
    pub regions: Vec<RegionThreshold>,
}

impl RegionalThresholds {
    pub fn new(regions: Vec<RegionThreshold>) -> Self {
        Self { regions }
    }

    pub fn from_json(json: &str) -> ConflateResult<Self> {
        let thresholds: Self = serde_json::from_str(json)
            .map_err(|e| ConflateError::snapshot("regional thresholds", e))?;
        for region in &thresholds.regions {
            let vertices = spatial::polygon_vertices(&region.polygon).len();
            if vertices < 3 {
                log::warn!(
                    "Region {:?} has {} vertices and will never match",
                    region.name,
                    vertices
                );
            }
        }
        Ok(thresholds)
    }

    pub fn load(path: &Path) -> ConflateResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConflateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// First region (in file order) containing the point.
    pub fn region_at(&self, lat: f64, lng: f64) -> Option<&RegionThreshold> {
        self.regions.iter().find(|region| region.contains(lat, lng))
    }

    /// Regions can only lower the default.
    pub fn effective_threshold(&self, default: usize, lat: f64, lng: f64) -> usize {
        match self.region_at(lat, lng) {
            Some(region) => default.min(region.threshold),
            None => default,
        }
    }
}

/// Read and parse a JSON input file.
pub fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> ConflateResult<T> {
    let json = std::fs::read_to_string(path).map_err(|source| ConflateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|e| ConflateError::snapshot(what, e))
}

#[cfg(test)]
#[path = "tests/snapshot_tests.rs"]
mod tests;
