//! Declared image format from magic bytes.

use std::fmt;

/// Image format declared by a file's leading bytes.
///
/// This is a pure prefix match and says nothing about whether the rest of
/// the file is a valid image of that format.
///
/// # Examples
///
/// ```
/// use imgward_core::types::DeclaredFormat;
///
/// assert_eq!(DeclaredFormat::from_header(&[0xFF, 0xD8, 0x00]), DeclaredFormat::Jpeg);
/// assert_eq!(DeclaredFormat::from_header(b"\x89PNG\r\n"), DeclaredFormat::Png);
/// assert_eq!(DeclaredFormat::from_header(b"GIF89a"), DeclaredFormat::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredFormat {
    /// Starts with the JPEG start-of-image marker `FF D8`.
    Jpeg,

    /// Starts with the PNG signature prefix `89 50 4E 47`.
    Png,

    /// Anything else, including empty and very short files.
    Unknown,
}

/// JPEG start-of-image marker.
pub const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

/// Leading four bytes of the PNG signature (`\x89PNG`).
pub const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

/// Number of leading bytes read for header classification.
pub const HEADER_LEN: usize = 16;

impl DeclaredFormat {
    /// Classifies a header by prefix match.
    #[must_use]
    pub fn from_header(header: &[u8]) -> Self {
        if header.starts_with(&JPEG_MAGIC) {
            Self::Jpeg
        } else if header.starts_with(&PNG_MAGIC) {
            Self::Png
        } else {
            Self::Unknown
        }
    }

    /// Returns `true` if the header matched a known image format.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Short machine-friendly name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeclaredFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
