//! Error types for scan operations.
//!
//! Only run-level failures are errors. Problems with an individual file
//! (undecodable image, missing scanner binary) are recorded in that file's
//! [`Verdict`](crate::Verdict) instead.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ScanError`.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that abort a scan run.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The input directory could not be listed.
    #[error("cannot read input directory {path}: {source}")]
    InputDirectory {
        /// Directory that was being enumerated.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The report's parent directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDirectory {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The report file could not be written.
    #[error("cannot write report {path}: {source}")]
    ReportWrite {
        /// Destination report path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The code-token denylist could not be compiled into a matcher.
    #[error("invalid code pattern list: {0}")]
    InvalidPattern(String),
}

impl ScanError {
    /// Returns `true` if the error concerns reading the scan input rather
    /// than writing the report.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgward_core::ScanError;
    /// use std::io;
    ///
    /// let err = ScanError::InputDirectory {
    ///     path: "images".into(),
    ///     source: io::Error::from(io::ErrorKind::NotFound),
    /// };
    /// assert!(err.is_input_error());
    /// ```
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InputDirectory { .. })
    }

    /// Returns the filesystem path involved in the error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InputDirectory { path, .. }
            | Self::OutputDirectory { path, .. }
            | Self::ReportWrite { path, .. } => Some(path),
            Self::InvalidPattern(_) => None,
        }
    }
}
