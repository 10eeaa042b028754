use serde::{Deserialize, Serialize};

/// Predicate recognising IDs that originate from the secondary source
/// dataset: a fixed prefix plus a minimum length.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SecondarySourceRule {
    pub prefix: String,
    pub min_len: usize,
}

impl Default for SecondarySourceRule {
    fn default() -> Self {
        Self {
            prefix: "3".into(),
            min_len: 7,
        }
    }
}

impl SecondarySourceRule {
    pub fn matches(&self, id: &str) -> bool {
        !self.prefix.is_empty() && id.starts_with(&self.prefix) && id.len() >= self.min_len
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConflationConfig {
    /// Run the quadratic superseded-by-building check on perfect matches.
    pub slow_mode: bool,
    /// Use `test_stack_threshold` instead of `stack_threshold`.
    pub test_mode: bool,
    pub stack_threshold: usize,
    pub test_stack_threshold: usize,
    /// Max ratio of distinct coordinates to group size for a group to count
    /// as mostly coincident.
    pub coincident_ratio: f64,
    /// Rounding step (degrees) for coordinate keys. 0.00005° is about 5 m.
    pub coord_precision_deg: f64,
    pub candidate_radius_m: f64,
    pub tight_drift_m: f64,
    pub loose_drift_m: f64,
    pub min_alternate_group: usize,
    pub secondary_source: SecondarySourceRule,
    /// Stack keys at or above this length are hashed.
    pub stack_id_budget: usize,
}

impl Default for ConflationConfig {
    fn default() -> Self {
        Self {
            slow_mode: false,
            test_mode: false,
            stack_threshold: 9,
            test_stack_threshold: 2,
            coincident_ratio: 0.5,
            coord_precision_deg: 0.00005,
            candidate_radius_m: 200.0,
            tight_drift_m: 10.0,
            loose_drift_m: 300.0,
            min_alternate_group: 4,
            secondary_source: SecondarySourceRule::default(),
            stack_id_budget: 248,
        }
    }
}
