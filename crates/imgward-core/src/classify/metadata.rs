//! Metadata extraction and anomaly heuristics.
//!
//! Tags are pulled out by a [`MetadataSource`] and then run through a
//! [`TagScanner`], which applies two independent checks: a length threshold
//! on text values and a case-insensitive token denylist on every value.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use aho_corasick::AhoCorasick;
use exif::Context;
use exif::In;
use exif::Tag;
use exif::Value;

use crate::Result;
use crate::ScanConfig;
use crate::ScanError;
use crate::types::Anomaly;

/// One embedded metadata entry, stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTag {
    /// Tag name, e.g. `Image ImageDescription` or `EXIF UserComment`.
    pub name: String,

    /// Tag value as text.
    pub value: String,

    /// Whether the value is free text rather than numbers or a binary blob.
    ///
    /// Only text values are subject to the length check.
    pub is_text: bool,
}

impl MetadataTag {
    /// Creates a text tag from a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_text: true,
        }
    }

    /// Creates a tag whose value is a rendering of numbers or raw bytes.
    pub fn binary(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            is_text: false,
            ..Self::new(name, value)
        }
    }
}

/// Extracts embedded metadata tags from a file.
pub trait MetadataSource {
    /// Returns every tag found in the file, in container order.
    ///
    /// A file without a metadata block yields an empty list. `Err` carries a
    /// human-readable reason for an unreadable block.
    fn extract_tags(&self, path: &Path) -> std::result::Result<Vec<MetadataTag>, String>;
}

/// [`MetadataSource`] reading EXIF from JPEG, PNG and other containers
/// supported by `kamadak-exif`.
///
/// Tag names follow the `<group> <TagName>` convention with groups `Image`,
/// `Thumbnail`, `EXIF`, `GPS` and `Interoperability`; tags without a known
/// name are shown by number, e.g. `Image 0xC4A5`. ASCII values and
/// `UserComment` are text. Everything else is rendered but marked non-text.
/// Maker notes are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifMetadata;

impl ExifMetadata {
    /// Creates a new EXIF metadata source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MetadataSource for ExifMetadata {
    fn extract_tags(&self, path: &Path) -> std::result::Result<Vec<MetadataTag>, String> {
        let file = File::open(path).map_err(|e| e.to_string())?;
        let mut reader = BufReader::new(file);

        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.to_string()),
        };

        Ok(exif
            .fields()
            .filter(|field| field.tag != Tag::MakerNote)
            .map(metadata_tag)
            .collect())
    }
}

fn metadata_tag(field: &exif::Field) -> MetadataTag {
    let name = tag_name(field);
    match &field.value {
        Value::Ascii(parts) => MetadataTag::new(
            name,
            parts
                .iter()
                .map(|part| String::from_utf8_lossy(part))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Value::Undefined(bytes, _) if field.tag == Tag::UserComment => {
            let text = bytes.get(USER_COMMENT_PREFIX_LEN..).unwrap_or(bytes.as_slice());
            MetadataTag::new(name, lossy_text(text))
        }
        Value::Undefined(bytes, _) => MetadataTag::binary(name, lossy_text(bytes)),
        _ => MetadataTag::binary(name, field.display_value().to_string()),
    }
}

fn tag_name(field: &exif::Field) -> String {
    #[allow(unreachable_patterns)]
    let group = match field.tag.context() {
        Context::Tiff if field.ifd_num == In::THUMBNAIL => "Thumbnail",
        Context::Tiff => "Image",
        Context::Exif => "EXIF",
        Context::Gps => "GPS",
        Context::Interop => "Interoperability",
        _ => "Other",
    };
    if field.tag.description().is_some() {
        format!("{group} {}", field.tag)
    } else {
        format!("{group} 0x{:04X}", field.tag.number())
    }
}

/// Length of the character-code prefix on `UserComment` values.
const USER_COMMENT_PREFIX_LEN: usize = 8;

fn lossy_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}

/// Applies the length and code-token heuristics to metadata values.
///
/// # Examples
///
/// ```
/// use imgward_core::classify::MetadataTag;
/// use imgward_core::classify::TagScanner;
///
/// let scanner = TagScanner::new(500, &["<script>".to_string()])?;
/// let tags = vec![MetadataTag::new("Image Artist", "<SCRIPT>alert(1)</SCRIPT>")];
/// let anomalies = scanner.scan_tags(&tags);
/// assert_eq!(anomalies[0].to_string(), "Image Artist: contains code");
/// # Ok::<(), imgward_core::ScanError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TagScanner {
    max_length: usize,
    patterns: Vec<String>,
    matcher: AhoCorasick,
}

impl TagScanner {
    /// Builds a scanner from a length threshold and a token denylist.
    ///
    /// Tokens are matched as literal substrings, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidPattern`] if a token is empty (it would
    /// match every value) or the matcher cannot be built.
    pub fn new(max_length: usize, patterns: &[String]) -> Result<Self> {
        if patterns.iter().any(String::is_empty) {
            return Err(ScanError::InvalidPattern(
                "empty token would match every value".to_string(),
            ));
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(patterns)
            .map_err(|e| ScanError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            max_length,
            patterns: patterns.to_vec(),
            matcher,
        })
    }

    /// Builds a scanner from the thresholds in a [`ScanConfig`].
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        Self::new(config.max_tag_length, &config.code_patterns)
    }

    /// Appends the findings for a single text value to `out`.
    ///
    /// Length is checked before content, so a value that is both long and
    /// code-like yields two entries in that order.
    pub fn scan_value(&self, tag: &str, value: &str, out: &mut Vec<Anomaly>) {
        let length = value.chars().count();
        if length > self.max_length {
            out.push(Anomaly::SuspiciousLength {
                tag: tag.to_string(),
                length,
            });
        }
        self.scan_content(tag, value, out);
    }

    fn scan_content(&self, tag: &str, value: &str, out: &mut Vec<Anomaly>) {
        if let Some(m) = self.matcher.find(value) {
            out.push(Anomaly::ContainsCode {
                tag: tag.to_string(),
                token: self.patterns[m.pattern().as_usize()].clone(),
            });
        }
    }

    /// Appends the findings for a tag to `out`.
    ///
    /// Non-text tags only get the content check.
    pub fn scan_tag(&self, tag: &MetadataTag, out: &mut Vec<Anomaly>) {
        if tag.is_text {
            self.scan_value(&tag.name, &tag.value, out);
        } else {
            self.scan_content(&tag.name, &tag.value, out);
        }
    }

    /// Scans every tag and returns the findings in tag order.
    ///
    /// The result is never empty: with no findings it holds the single
    /// [`Anomaly::NoIndicators`] sentinel.
    pub fn scan_tags(&self, tags: &[MetadataTag]) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();
        for tag in tags {
            self.scan_tag(tag, &mut anomalies);
        }
        if anomalies.is_empty() {
            anomalies.push(Anomaly::NoIndicators);
        }
        anomalies
    }
}
