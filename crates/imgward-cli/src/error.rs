//! Error conversion utilities for CLI.
//!
//! Converts imgward-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use imgward_core::ScanError;

/// Converts `ScanError` to user-friendly anyhow error with context
pub fn convert_scan_error(err: ScanError) -> anyhow::Error {
    match err {
        ScanError::InputDirectory { path, source } => {
            anyhow!(
                "Cannot read input directory '{}': {source}\n\
                 HINT: Create the directory or pass another one as INPUT_DIR.",
                path.display()
            )
        }
        ScanError::OutputDirectory { path, source } => {
            anyhow!(
                "Cannot create report directory '{}': {source}\n\
                 HINT: Check permissions, or choose another location with --output.",
                path.display()
            )
        }
        ScanError::ReportWrite { path, source } => {
            anyhow!(
                "Cannot write report '{}': {source}\n\
                 HINT: Check that the location is writable, or choose another with --output.",
                path.display()
            )
        }
        ScanError::InvalidPattern(reason) => {
            anyhow!(
                "Invalid code pattern list: {reason}\n\
                 HINT: Every --pattern value must be a non-empty token."
            )
        }
    }
}

/// Converts the error of a core result into a contextual CLI error
pub fn add_scan_context<T>(result: Result<T, ScanError>) -> anyhow::Result<T> {
    result.map_err(convert_scan_error)
}
