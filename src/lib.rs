pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

pub use services::config::ConflationConfig;
pub use services::conflate::conflate;
pub use services::conflate::snapshot::{RegionalThresholds, Registry, TargetSnapshot};
pub use types::errors::{ConflateError, ConflateResult};
pub use types::report::{ConflationReport, Diagnostics, Status};
