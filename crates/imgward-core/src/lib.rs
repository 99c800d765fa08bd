//! Per-file image security classification with Markdown reporting.
//!
//! `imgward-core` walks a directory of images and classifies each file with
//! four independent checks: a magic-byte header check, an image decode, an
//! EXIF heuristic scan for overlong or code-like values, and an external
//! antivirus scan. Results are collected into a [`Report`] and rendered as a
//! Markdown table.
//!
//! # Examples
//!
//! ```no_run
//! use imgward_core::ScanConfig;
//! use imgward_core::scan_directory;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig::default();
//! let outcome = scan_directory(&config)?;
//! println!("Flagged {} of {} files", outcome.report.summary().flagged, outcome.report.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod report;
pub mod reporter;
#[doc(hidden)]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::ScanOutcome;
pub use api::classify_file;
pub use api::scan_directory;
pub use api::scan_directory_with_progress;
pub use api::scan_with_classifier;
pub use classify::Classifier;
pub use config::AntivirusConfig;
pub use config::ScanConfig;
pub use error::Result;
pub use error::ScanError;
pub use report::NoopProgress;
pub use report::Report;
pub use report::ReportEntry;
pub use report::ReportSummary;
pub use report::ScanProgress;
pub use report::render_markdown;
pub use report::write_report;
pub use reporter::Reporter;

// Re-export types module for easier access
pub use types::Anomaly;
pub use types::AvStatus;
pub use types::DeclaredFormat;
pub use types::Integrity;
pub use types::Verdict;
