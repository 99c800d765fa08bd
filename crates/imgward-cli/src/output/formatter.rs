//! Output formatter trait for CLI results.

use anyhow::Result;
use imgward_core::ScanOutcome;
use imgward_core::Verdict;
use serde::Serialize;
use std::process::ExitCode;

/// Warnings and the `--strict` failure attached to a command's result.
///
/// Formatters report these together with the result, so JSON output stays a
/// single document.
#[derive(Debug, Default)]
pub struct Notices {
    pub warnings: Vec<String>,
    pub failure: Option<String>,
}

impl Notices {
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    pub const fn exit_code(&self) -> ExitCode {
        if self.failure.is_some() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    const fn status(&self) -> Status {
        if self.failure.is_some() {
            Status::Error
        } else if self.warnings.is_empty() {
            Status::Success
        } else {
            Status::Warning
        }
    }
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a directory scan
    fn format_scan_result(&self, outcome: &ScanOutcome, notices: &Notices) -> Result<()>;

    /// Format the verdict for a single file
    fn format_verdict(&self, verdict: &Verdict, notices: &Notices) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
            warnings: Vec::new(),
        }
    }

    /// Result envelope whose status reflects the notices.
    pub fn with_notices(operation: impl Into<String>, data: T, notices: &Notices) -> Self {
        Self {
            status: notices.status(),
            error: notices.failure.clone(),
            warnings: notices.warnings.clone(),
            ..Self::success(operation, data)
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
            warnings: Vec::new(),
        }
    }
}
