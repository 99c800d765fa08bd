//! Per-file classification results.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use super::DeclaredFormat;

/// Text of the sentinel entry recorded when no metadata anomaly is found.
pub const NO_INDICATORS: &str = "✅ No obvious steganography";

/// One finding from the metadata heuristics.
///
/// # Examples
///
/// ```
/// use imgward_core::types::Anomaly;
///
/// let finding = Anomaly::ContainsCode {
///     tag: "Image ImageDescription".to_string(),
///     token: "<script>".to_string(),
/// };
/// assert_eq!(finding.to_string(), "Image ImageDescription: contains code");
/// assert!(finding.is_finding());
/// assert!(!Anomaly::NoIndicators.is_finding());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Value is longer than the configured threshold.
    SuspiciousLength {
        /// Tag the value belongs to.
        tag: String,
        /// Value length in characters.
        length: usize,
    },

    /// Value contains a denylisted token.
    ContainsCode {
        /// Tag the value belongs to.
        tag: String,
        /// First denylisted token found, as configured.
        token: String,
    },

    /// Sentinel for "nothing found", so the list is never empty.
    NoIndicators,
}

impl Anomaly {
    /// Returns `true` for real findings, `false` for the sentinel.
    #[must_use]
    pub const fn is_finding(&self) -> bool {
        !matches!(self, Self::NoIndicators)
    }

    /// Returns the tag name the finding refers to.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::SuspiciousLength { tag, .. } | Self::ContainsCode { tag, .. } => Some(tag),
            Self::NoIndicators => None,
        }
    }

    /// Short machine-friendly kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SuspiciousLength { .. } => "suspicious_length",
            Self::ContainsCode { .. } => "contains_code",
            Self::NoIndicators => "none",
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuspiciousLength { tag, .. } => write!(f, "{tag}: suspicious length"),
            Self::ContainsCode { tag, .. } => write!(f, "{tag}: contains code"),
            Self::NoIndicators => f.write_str(NO_INDICATORS),
        }
    }
}

/// Outcome of decoding the file as an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integrity {
    /// The image decoded successfully.
    Ok,

    /// Decoding failed; holds the decoder's reason.
    Failed(String),
}

impl Integrity {
    /// Returns `true` if the image decoded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Returns the failure reason, if decoding failed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

/// Antivirus verdict for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvStatus {
    /// Scanner reported the file clean.
    Clean,

    /// Scanner reported a detection.
    Malicious {
        /// Signature name, when the scanner reports one.
        signature: Option<String>,
    },

    /// Scanner ran but its output could not be classified; holds the raw
    /// output.
    Unknown(String),

    /// Scanner could not be run or did not finish.
    Error(String),
}

impl AvStatus {
    /// Returns `true` if the scanner reported the file clean.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    /// Returns `true` if the scanner reported a detection.
    #[must_use]
    pub const fn is_malicious(&self) -> bool {
        matches!(self, Self::Malicious { .. })
    }

    /// Returns `true` if the scanner could not be run.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Short machine-friendly status name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Malicious { .. } => "malicious",
            Self::Unknown(_) => "unknown",
            Self::Error(_) => "error",
        }
    }

    /// Diagnostic text carried by the status (signature, raw output or
    /// error reason).
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Clean => None,
            Self::Malicious { signature } => signature.as_deref(),
            Self::Unknown(raw) => Some(raw),
            Self::Error(reason) => Some(reason),
        }
    }
}

/// Complete classification result for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// File that was classified.
    pub path: PathBuf,

    /// Format declared by the leading bytes.
    pub declared_format: DeclaredFormat,

    /// Image decode outcome.
    pub integrity: Integrity,

    /// Metadata findings in tag order. Never empty.
    pub anomalies: Vec<Anomaly>,

    /// Antivirus verdict.
    pub av_status: AvStatus,
}

impl Verdict {
    /// Builds a verdict, substituting the sentinel for an empty anomaly list.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        declared_format: DeclaredFormat,
        integrity: Integrity,
        mut anomalies: Vec<Anomaly>,
        av_status: AvStatus,
    ) -> Self {
        if anomalies.is_empty() {
            anomalies.push(Anomaly::NoIndicators);
        }
        Self {
            path: path.into(),
            declared_format,
            integrity,
            anomalies,
            av_status,
        }
    }

    /// Path of the classified file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the file decoded as an image.
    #[must_use]
    pub const fn integrity_ok(&self) -> bool {
        self.integrity.is_ok()
    }

    /// Returns `true` if any metadata heuristic fired.
    #[must_use]
    pub fn has_metadata_findings(&self) -> bool {
        self.anomalies.iter().any(Anomaly::is_finding)
    }

    /// Iterates over real findings, skipping the sentinel.
    pub fn findings(&self) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter().filter(|a| a.is_finding())
    }

    /// Returns `true` if anything about the file deserves attention:
    /// an antivirus detection, a failed decode or a metadata finding.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.av_status.is_malicious() || !self.integrity_ok() || self.has_metadata_findings()
    }
}
