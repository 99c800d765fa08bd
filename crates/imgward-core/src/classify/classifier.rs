//! Per-file classification pipeline.

use std::path::Path;

use tracing::debug;
use tracing::debug_span;

use super::AntivirusScanner;
use super::ClamScan;
use super::ExifMetadata;
use super::ImageDecoder;
use super::ImageVerifier;
use super::MetadataSource;
use super::TagScanner;
use super::header::detect_header;
use crate::Result;
use crate::ScanConfig;
use crate::types::Verdict;

/// Runs the four checks on a file and assembles a [`Verdict`].
///
/// The checks are isolated from one another: a file that fails to decode is
/// still scanned for metadata and by the antivirus, and nothing a single
/// file does can make [`classify`](Self::classify) fail.
///
/// The external collaborators default to the `image` decoder, EXIF
/// extraction and `clamscan`, and can each be replaced.
///
/// # Examples
///
/// ```no_run
/// use imgward_core::ScanConfig;
/// use imgward_core::classify::Classifier;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let classifier = Classifier::new(&ScanConfig::default())?;
/// let verdict = classifier.classify(Path::new("images/cat.jpg"));
/// println!("{} -> {}", verdict.declared_format, verdict.av_status.as_str());
/// # Ok(())
/// # }
/// ```
pub struct Classifier {
    tag_scanner: TagScanner,
    verifier: Box<dyn ImageVerifier>,
    metadata: Box<dyn MetadataSource>,
    antivirus: Box<dyn AntivirusScanner>,
}

impl Classifier {
    /// Creates a classifier with the default collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the code-token denylist is invalid.
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            tag_scanner: TagScanner::from_config(config)?,
            verifier: Box::new(ImageDecoder::new()),
            metadata: Box::new(ExifMetadata::new()),
            antivirus: Box::new(ClamScan::new(&config.antivirus)),
        })
    }

    /// Replaces the image verifier.
    pub fn with_verifier(mut self, verifier: impl ImageVerifier + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    /// Replaces the metadata source.
    pub fn with_metadata_source(mut self, metadata: impl MetadataSource + 'static) -> Self {
        self.metadata = Box::new(metadata);
        self
    }

    /// Replaces the antivirus scanner.
    pub fn with_antivirus(mut self, antivirus: impl AntivirusScanner + 'static) -> Self {
        self.antivirus = Box::new(antivirus);
        self
    }

    /// Classifies one file. Never fails.
    pub fn classify(&self, path: &Path) -> Verdict {
        let _span = debug_span!("classify", path = %path.display()).entered();

        let declared_format = detect_header(path);
        let integrity = self.verifier.verify(path);
        if let Some(reason) = integrity.reason() {
            debug!(%reason, "integrity check failed");
        }

        let tags = self.metadata.extract_tags(path).unwrap_or_else(|reason| {
            debug!(%reason, "metadata unreadable, treating as no tags");
            Vec::new()
        });
        let anomalies = self.tag_scanner.scan_tags(&tags);

        let av_status = self.antivirus.scan(path);

        debug!(
            format = %declared_format,
            tags = tags.len(),
            av = av_status.as_str(),
            "classified"
        );
        Verdict::new(path, declared_format, integrity, anomalies, av_status)
    }
}
