//! Report persistence with atomic replace.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::errors::{ConflateError, ConflateResult};
use crate::types::report::ConflationReport;

fn temp_path_for(file_path: &Path) -> PathBuf {
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report.json".to_string());
    file_path.with_file_name(format!("{}.tmp", file_name))
}

fn io_error(path: &Path, source: std::io::Error) -> ConflateError {
    ConflateError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write the report as pretty JSON. The destination is only replaced once
/// the whole document is on disk.
pub fn write_report(report: &ConflationReport, path: &Path) -> ConflateResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| ConflateError::snapshot("report", e))?;

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, json).map_err(|e| io_error(&temp_path, e))?;

    match fs::rename(&temp_path, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            if path.exists() {
                fs::remove_file(path).map_err(|e| io_error(path, e))?;
            }
            fs::rename(&temp_path, path).map_err(|e| io_error(path, e))
        }
    }
}

#[cfg(test)]
#[path = "tests/output_tests.rs"]
mod tests;
