//! Engine configuration: thresholds, mode toggles and the secondary-source
//! predicate. Every field has a default, so an empty JSON object is valid.

pub mod models;

pub use models::*;

use crate::types::errors::{ConflateError, ConflateResult};
use std::path::Path;

impl ConflationConfig {
    /// Default stacking threshold before regional overrides.
    pub fn default_stack_threshold(&self) -> usize {
        if self.test_mode {
            self.test_stack_threshold
        } else {
            self.stack_threshold
        }
    }

    pub fn is_secondary_source(&self, id: &str) -> bool {
        self.secondary_source.matches(id)
    }

    pub fn validate(&self) -> ConflateResult<()> {
        if self.stack_threshold == 0 || self.test_stack_threshold == 0 {
            return Err(ConflateError::InvalidConfig(
                "stack thresholds must be positive".to_string(),
            ));
        }
        if !(self.coincident_ratio > 0.0 && self.coincident_ratio <= 1.0) {
            return Err(ConflateError::InvalidConfig(format!(
                "coincident_ratio must be in (0, 1], got {}",
                self.coincident_ratio
            )));
        }
        if self.coord_precision_deg <= 0.0 {
            return Err(ConflateError::InvalidConfig(
                "coord_precision_deg must be positive".to_string(),
            ));
        }
        if self.tight_drift_m <= 0.0 || self.loose_drift_m < self.tight_drift_m {
            return Err(ConflateError::InvalidConfig(format!(
                "drift thresholds must satisfy 0 < tight ({}) <= loose ({})",
                self.tight_drift_m, self.loose_drift_m
            )));
        }
        if self.candidate_radius_m <= 0.0 {
            return Err(ConflateError::InvalidConfig(
                "candidate_radius_m must be positive".to_string(),
            ));
        }
        // "stack()" alone is 7 characters
        if self.stack_id_budget < 8 {
            return Err(ConflateError::InvalidConfig(format!(
                "stack_id_budget too small: {}",
                self.stack_id_budget
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> ConflateResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConflateError::snapshot("config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ConflateResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConflateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
