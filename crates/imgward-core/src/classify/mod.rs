//! Per-file security classification.
//!
//! A [`Classifier`] combines four independent checks:
//!
//! - header: magic-byte prefix match ([`detect_header`])
//! - integrity: decode the image ([`ImageVerifier`])
//! - metadata: EXIF tag heuristics ([`MetadataSource`] + [`TagScanner`])
//! - antivirus: external scanner process ([`AntivirusScanner`])

pub mod antivirus;
pub mod classifier;
pub mod header;
pub mod integrity;
pub mod metadata;

pub use antivirus::AntivirusScanner;
pub use antivirus::ClamScan;
pub use antivirus::parse_scan_output;
pub use classifier::Classifier;
pub use header::detect_header;
pub use integrity::ImageDecoder;
pub use integrity::ImageVerifier;
pub use metadata::ExifMetadata;
pub use metadata::MetadataSource;
pub use metadata::MetadataTag;
pub use metadata::TagScanner;
