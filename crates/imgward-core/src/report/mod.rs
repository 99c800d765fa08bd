//! Scan reports.
//!
//! A [`Report`] is the ordered list of per-file verdicts from one run. It is
//! built once by the [`Reporter`](crate::Reporter), rendered with
//! [`render_markdown`] and written with [`write_report`].

pub mod markdown;
pub mod writer;

use std::path::Path;

use crate::types::Verdict;

pub use markdown::render_markdown;
pub use writer::write_report;

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// File name as listed in the input directory.
    pub file_name: String,

    /// Classification result for the file.
    pub verdict: Verdict,
}

/// Verdicts for every scanned file, in directory-listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Creates a report from its entries.
    #[must_use]
    pub fn new(entries: Vec<ReportEntry>) -> Self {
        Self { entries }
    }

    /// Returns the entries in scan order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Returns the number of scanned files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no file was scanned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the verdict for a file name.
    #[must_use]
    pub fn verdict(&self, file_name: &str) -> Option<&Verdict> {
        self.entries
            .iter()
            .find(|e| e.file_name == file_name)
            .map(|e| &e.verdict)
    }

    /// Counts verdicts by outcome.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.entries.len(),
            ..ReportSummary::default()
        };

        for entry in &self.entries {
            let v = &entry.verdict;
            if v.av_status.is_clean() {
                summary.av_clean += 1;
            }
            if v.av_status.is_malicious() {
                summary.malicious += 1;
            }
            if v.av_status.is_error() {
                summary.av_errors += 1;
            }
            if !v.integrity_ok() {
                summary.integrity_failures += 1;
            }
            if v.has_metadata_findings() {
                summary.metadata_flagged += 1;
            }
            if v.is_flagged() {
                summary.flagged += 1;
            }
        }

        summary
    }
}

/// Aggregate counts over a [`Report`].
///
/// The categories overlap: one file can be malicious, undecodable and carry
/// suspicious metadata at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Number of scanned files.
    pub total: usize,

    /// Files the antivirus reported clean.
    pub av_clean: usize,

    /// Files the antivirus reported malicious.
    pub malicious: usize,

    /// Files the antivirus could not scan.
    pub av_errors: usize,

    /// Files that failed to decode.
    pub integrity_failures: usize,

    /// Files with at least one metadata finding.
    pub metadata_flagged: usize,

    /// Files with any of the above problems (AV errors excluded).
    pub flagged: usize,
}

impl ReportSummary {
    /// Returns whether any file was flagged.
    #[must_use]
    pub const fn has_findings(&self) -> bool {
        self.flagged > 0
    }
}

/// Callback trait for progress reporting during a scan.
///
/// # Examples
///
/// ```
/// use imgward_core::ScanProgress;
/// use imgward_core::types::Verdict;
/// use std::path::Path;
///
/// struct PrintProgress;
///
/// impl ScanProgress for PrintProgress {
///     fn on_file_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_file_complete(&mut self, _path: &Path, verdict: &Verdict) {
///         println!("  -> {}", verdict.av_status.as_str());
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ScanProgress: Send {
    /// Called before a file is classified.
    ///
    /// # Arguments
    ///
    /// * `path` - File about to be classified
    /// * `total` - Number of files in this scan
    /// * `current` - Position of this file (1-indexed)
    fn on_file_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called after a file has been classified.
    fn on_file_complete(&mut self, path: &Path, verdict: &Verdict);

    /// Called once every file has been classified.
    fn on_complete(&mut self);
}

/// No-op implementation of [`ScanProgress`].
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ScanProgress for NoopProgress {
    fn on_file_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_file_complete(&mut self, _path: &Path, _verdict: &Verdict) {}

    fn on_complete(&mut self) {}
}
