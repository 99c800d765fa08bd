//! Target enumeration and report assembly.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::Result;
use crate::ScanConfig;
use crate::ScanError;
use crate::classify::Classifier;
use crate::report::Report;
use crate::report::ReportEntry;
use crate::report::ScanProgress;

/// Lists candidate files and collects their verdicts into a [`Report`].
///
/// Enumeration is non-recursive and keeps directory-listing order, which the
/// platform does not guarantee to be sorted.
#[derive(Debug, Clone, Copy)]
pub struct Reporter<'a> {
    config: &'a ScanConfig,
}

impl<'a> Reporter<'a> {
    /// Creates a reporter over the configured input directory.
    #[must_use]
    pub const fn new(config: &'a ScanConfig) -> Self {
        Self { config }
    }

    /// Returns the regular files in the input directory whose extension is
    /// accepted. Everything else, subdirectories included, is skipped, as is
    /// any entry the platform fails to read.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InputDirectory`] if the directory cannot be
    /// listed.
    pub fn collect_targets(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.input_dir;
        let entries = fs::read_dir(dir).map_err(|source| ScanError::InputDirectory {
            path: dir.clone(),
            source,
        })?;

        let targets = self.filter_entries(entries.map(|entry| entry.map(|e| e.path())));
        debug!(dir = %dir.display(), count = targets.len(), "collected scan targets");
        Ok(targets)
    }

    fn filter_entries(
        &self,
        entries: impl IntoIterator<Item = io::Result<PathBuf>>,
    ) -> Vec<PathBuf> {
        let mut targets = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(
                        dir = %self.config.input_dir.display(),
                        error = %e,
                        "skipping unreadable directory entry"
                    );
                    continue;
                }
            };

            if !path.is_file() {
                debug!(path = %path.display(), "skipping non-file entry");
                continue;
            }
            if !self.is_accepted(&path) {
                debug!(path = %path.display(), "skipping unaccepted extension");
                continue;
            }
            targets.push(path);
        }
        targets
    }

    fn is_accepted(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.config.is_extension_accepted(ext))
    }

    /// Classifies every target in order and assembles the report.
    ///
    /// Each file is classified to completion before the next begins.
    pub fn generate_report(
        &self,
        targets: &[PathBuf],
        classifier: &Classifier,
        progress: &mut dyn ScanProgress,
    ) -> Report {
        let total = targets.len();
        let mut entries = Vec::with_capacity(total);

        for (index, path) in targets.iter().enumerate() {
            progress.on_file_start(path, total, index + 1);
            let verdict = classifier.classify(path);
            progress.on_file_complete(path, &verdict);

            let file_name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            entries.push(ReportEntry { file_name, verdict });
        }

        progress.on_complete();
        Report::new(entries)
    }
}
