pub mod address;
pub mod errors;
pub mod report;

pub use address::{
    CheckedState, FeatureKind, RegistryAddress, RegistryId, Suburb, SuburbKind, TargetAddress,
    TargetFeatureId,
};
pub use errors::{ConflateError, ConflateResult};
pub use report::{AttributeIssue, Confidence, ConflationReport, Diagnostics, ReportEntry, Status};

#[cfg(test)]
#[path = "tests/address_tests.rs"]
mod address_tests;
