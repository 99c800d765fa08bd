//! High-level public API for scanning.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use tracing::info;

use crate::Result;
use crate::ScanConfig;
use crate::classify::Classifier;
use crate::report::NoopProgress;
use crate::report::Report;
use crate::report::ScanProgress;
use crate::report::render_markdown;
use crate::report::write_report;
use crate::reporter::Reporter;
use crate::types::Verdict;

/// Result of a completed directory scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Verdicts for every scanned file.
    pub report: Report,

    /// Where the Markdown report was written.
    pub output_path: PathBuf,

    /// Wall-clock time for the whole run.
    pub duration: Duration,
}

/// Scans the configured input directory and writes the Markdown report.
///
/// Every accepted file is classified in directory-listing order; the report
/// is written once, after the last file.
///
/// # Errors
///
/// Returns an error if:
/// - The code-token denylist is invalid
/// - The input directory cannot be listed
/// - The report cannot be written
///
/// Problems with individual files never fail the scan; they are recorded in
/// the file's verdict.
///
/// # Examples
///
/// ```no_run
/// use imgward_core::ScanConfig;
/// use imgward_core::scan_directory;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = scan_directory(&ScanConfig::default())?;
/// println!(
///     "Scanned {} files, report at {}",
///     outcome.report.len(),
///     outcome.output_path.display()
/// );
/// # Ok(())
/// # }
/// ```
pub fn scan_directory(config: &ScanConfig) -> Result<ScanOutcome> {
    scan_directory_with_progress(config, &mut NoopProgress)
}

/// Like [`scan_directory`], reporting per-file progress.
///
/// # Errors
///
/// See [`scan_directory`].
pub fn scan_directory_with_progress(
    config: &ScanConfig,
    progress: &mut dyn ScanProgress,
) -> Result<ScanOutcome> {
    let classifier = Classifier::new(config)?;
    scan_with_classifier(config, &classifier, progress)
}

/// Like [`scan_directory_with_progress`], using a caller-built classifier.
///
/// Useful for swapping the antivirus or image collaborators.
///
/// # Errors
///
/// Returns an error if the input directory cannot be listed or the report
/// cannot be written.
pub fn scan_with_classifier(
    config: &ScanConfig,
    classifier: &Classifier,
    progress: &mut dyn ScanProgress,
) -> Result<ScanOutcome> {
    let start = Instant::now();
    let reporter = Reporter::new(config);

    let targets = reporter.collect_targets()?;
    let report = reporter.generate_report(&targets, classifier, progress);
    write_report(&render_markdown(&report), &config.output_path)?;

    let duration = start.elapsed();
    info!(
        files = report.len(),
        output = %config.output_path.display(),
        elapsed_ms = duration.as_millis(),
        "scan complete"
    );

    Ok(ScanOutcome {
        report,
        output_path: config.output_path.clone(),
        duration,
    })
}

/// Classifies a single file without writing a report.
///
/// # Errors
///
/// Returns an error only if the configuration is invalid; problems with the
/// file itself are recorded in the verdict.
///
/// # Examples
///
/// ```no_run
/// use imgward_core::ScanConfig;
/// use imgward_core::classify_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let verdict = classify_file("images/cat.jpg", &ScanConfig::default())?;
/// assert!(!verdict.anomalies.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn classify_file<P: AsRef<Path>>(path: P, config: &ScanConfig) -> Result<Verdict> {
    let classifier = Classifier::new(config)?;
    Ok(classifier.classify(path.as_ref()))
}
