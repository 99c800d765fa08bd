//! Atomic report output.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::Result;
use crate::ScanError;

/// Writes the report to `path`, replacing any previous report.
///
/// The parent directory is created if missing. Contents go to a temporary
/// file in the same directory which is then renamed over `path`, so an
/// interrupted run leaves the previous report untouched.
///
/// # Errors
///
/// Returns [`ScanError::OutputDirectory`] if the parent directory cannot be
/// created and [`ScanError::ReportWrite`] if the file cannot be written or
/// moved into place.
pub fn write_report(contents: &str, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent).map_err(|source| ScanError::OutputDirectory {
        path: parent.to_path_buf(),
        source,
    })?;

    let write_err = |source| ScanError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    debug!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(())
}
