//! Progress bar implementation for CLI scans.

use console::Term;
use imgward_core::ScanProgress;
use imgward_core::Verdict;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;

/// CLI progress bar wrapper implementing `ScanProgress`.
///
/// Displays a progress bar with the file count, flagged count and elapsed
/// time when running in a TTY. Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    flagged: u64,
}

impl CliProgress {
    /// Creates a new CLI progress bar. The length is set once the first file
    /// starts.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new(0);

        // Template: "Scanning [████████░░░░] 42/100 files (3 flagged, 12s)"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix} [{bar:40.cyan/blue}] {pos}/{len} files ({msg}, {elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.set_prefix(message.to_string());
        bar.set_message("0 flagged");

        Self { bar, flagged: 0 }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ScanProgress for CliProgress {
    fn on_file_start(&mut self, _path: &Path, total: usize, _current: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_file_complete(&mut self, _path: &Path, verdict: &Verdict) {
        if verdict.is_flagged() {
            self.flagged += 1;
            self.bar.set_message(format!("{} flagged", self.flagged));
        }
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}
