//! Registry/map conflation pipeline.
//!
//! Stages run in a fixed order over in-memory snapshots:
//! stacking (with alternate detection) → deletion reconciliation →
//! per-record classification. The result depends only on the inputs.

pub mod core;
pub mod deletions;
pub mod matcher;
pub mod snapshot;
pub mod stacking;

use crate::services::config::ConflationConfig;
use crate::types::errors::ConflateResult;
use crate::types::report::{ConflationReport, Status};
use matcher::Classifier;
use snapshot::{RegionalThresholds, Registry, TargetSnapshot};

/// Classify every registry record against the map.
///
/// Fails only on invalid configuration or a stack key that does not decode;
/// bad data in individual records always ends up in some status.
pub fn conflate(
    registry: &Registry,
    target: &TargetSnapshot,
    regions: &RegionalThresholds,
    config: &ConflationConfig,
) -> ConflateResult<ConflationReport> {
    config.validate()?;
    log::info!(
        "Conflating {} registry records against {} linked / {} unreferenced features",
        registry.len(),
        target.linz.len(),
        target.no_ref.len()
    );

    let stacked = stacking::build_stacks(registry, target, regions, config);
    let deletions = deletions::reconcile(&stacked.registry, target);

    let mut report = ConflationReport::new();
    for entry in deletions.entries {
        report.push(entry.id, entry.diagnostics);
    }

    let classifier = Classifier::new(&stacked.registry, target, &stacked.alternates, config);
    classifier.classify_all(&deletions.claimed, &mut report)?;

    for advisory in stacked.advisories {
        report.push(advisory.id, advisory.diagnostics);
    }

    for status in Status::ALL {
        let count = report.count(status);
        if count > 0 {
            log::debug!("{status}: {count}");
        }
    }
    log::info!("Conflation produced {} entries", report.total());
    Ok(report)
}

#[cfg(test)]
#[path = "tests/conflate_tests.rs"]
mod tests;
