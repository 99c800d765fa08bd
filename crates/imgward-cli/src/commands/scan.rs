//! Scan command implementation.

use crate::cli::ScanArgs;
use crate::error::add_scan_context;
use crate::output::Notices;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use imgward_core::ReportSummary;
use imgward_core::scan_directory;
use imgward_core::scan_directory_with_progress;
use std::process::ExitCode;

pub fn execute(
    args: &ScanArgs,
    formatter: &dyn OutputFormatter,
    interactive: bool,
) -> Result<ExitCode> {
    let config = args.to_config();

    // Use progress bar if TTY is detected (not quiet, not JSON, is terminal)
    let outcome = if interactive && CliProgress::should_show() {
        let mut progress = CliProgress::new("Scanning");
        add_scan_context(scan_directory_with_progress(&config, &mut progress))?
    } else {
        add_scan_context(scan_directory(&config))?
    };

    let notices = notices_for(&outcome.report.summary(), args.strict);
    formatter.format_scan_result(&outcome, &notices)?;
    Ok(notices.exit_code())
}

fn notices_for(summary: &ReportSummary, strict: bool) -> Notices {
    let mut notices = Notices::default();
    if summary.av_errors > 0 {
        notices.warn(format!(
            "Antivirus could not scan {} of {} files; see the report for details",
            summary.av_errors, summary.total
        ));
    }
    if strict && summary.has_findings() {
        notices.fail(format!(
            "{} of {} files flagged (--strict)",
            summary.flagged, summary.total
        ));
    }
    notices
}
