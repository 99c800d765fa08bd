//! Scan configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default threshold above which a metadata value is considered suspicious.
pub const DEFAULT_MAX_TAG_LENGTH: usize = 500;

/// Configuration for a directory scan.
///
/// Every threshold, folder name and denylist used by the classifier and the
/// reporter lives here, so tests can override any of them without global
/// state.
///
/// # Examples
///
/// ```
/// use imgward_core::ScanConfig;
///
/// // Use the documented defaults
/// let config = ScanConfig::default();
/// assert_eq!(config.max_tag_length, 500);
///
/// // Point the scan somewhere else
/// let custom = ScanConfig {
///     input_dir: "uploads".into(),
///     max_tag_length: 128,
///     ..Default::default()
/// };
/// assert!(custom.is_extension_accepted("JPG"));
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory scanned (non-recursively) for candidate images.
    pub input_dir: PathBuf,

    /// Path of the Markdown report written after the scan.
    pub output_path: PathBuf,

    /// Metadata values longer than this many characters are flagged.
    pub max_tag_length: usize,

    /// Tokens whose presence (in any letter casing) marks a metadata value as
    /// containing code.
    pub code_patterns: Vec<String>,

    /// File extensions (without the dot) accepted for scanning. Compared
    /// case-insensitively.
    pub accepted_extensions: Vec<String>,

    /// External antivirus invocation.
    pub antivirus: AntivirusConfig,
}

impl Default for ScanConfig {
    /// Creates a `ScanConfig` with the default settings.
    ///
    /// Default values:
    /// - `input_dir`: `images`
    /// - `output_path`: `reports/image_scan_report.md`
    /// - `max_tag_length`: 500
    /// - `code_patterns`: `["powershell", "cmd.exe", "<script>", "php"]`
    /// - `accepted_extensions`: `["jpg", "jpeg", "png"]`
    /// - `antivirus`: [`AntivirusConfig::default`]
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("images"),
            output_path: PathBuf::from("reports").join("image_scan_report.md"),
            max_tag_length: DEFAULT_MAX_TAG_LENGTH,
            code_patterns: vec![
                "powershell".to_string(),
                "cmd.exe".to_string(),
                "<script>".to_string(),
                "php".to_string(),
            ],
            accepted_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            antivirus: AntivirusConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Returns whether a file extension is accepted for scanning.
    ///
    /// Comparison is case-insensitive so `photo.JPG` is scanned like
    /// `photo.jpg`.
    #[must_use]
    pub fn is_extension_accepted(&self, extension: &str) -> bool {
        self.accepted_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// How the external antivirus scanner is invoked.
///
/// The scanner is run as `<program> [args..] <file>` and its standard output
/// is parsed line by line.
#[derive(Debug, Clone)]
pub struct AntivirusConfig {
    /// Scanner executable, resolved through `PATH` when not absolute.
    pub program: PathBuf,

    /// Extra arguments placed before the file path.
    pub args: Vec<String>,

    /// Upper bound on how long a single scan may run.
    ///
    /// `None` (the default) waits indefinitely, so a hung scanner hangs the
    /// whole run. When set, the child is killed on expiry and the file gets
    /// an error verdict.
    pub timeout: Option<Duration>,
}

impl Default for AntivirusConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("clamscan"),
            args: Vec::new(),
            timeout: None,
        }
    }
}
