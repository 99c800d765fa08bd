//! Test utilities for building image fixtures.
//!
//! Generates small JPEG/PNG files and hand-assembled EXIF blocks so tests do
//! not depend on binary fixtures checked into the repository.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use image::ImageFormat;
use image::Rgb;
use image::RgbImage;

#[allow(clippy::cast_possible_truncation)]
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 17) as u8, (y * 29) as u8, 128])
    })
}

/// Writes a valid baseline JPEG of the given size to `dir/name`.
///
/// # Examples
///
/// ```
/// use imgward_core::test_utils::write_test_jpeg;
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let path = write_test_jpeg(dir.path(), "cat.jpg", 10, 10);
/// assert!(path.exists());
/// ```
#[must_use]
pub fn write_test_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient(width, height)
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();
    path
}

/// Writes a valid PNG of the given size to `dir/name`.
#[must_use]
pub fn write_test_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient(width, height)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

/// Inserts a raw TIFF/EXIF block as an APP1 segment right after the JPEG
/// start-of-image marker.
pub fn embed_exif_in_jpeg(path: &Path, tiff: &[u8]) {
    let jpeg = fs::read(path).unwrap();
    assert!(jpeg.starts_with(&[0xFF, 0xD8]), "not a JPEG: {}", path.display());

    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[2..]);
    fs::write(path, out).unwrap();
}

/// Writes a JPEG carrying the given EXIF block.
#[must_use]
pub fn write_jpeg_with_exif(dir: &Path, name: &str, tiff: &[u8]) -> PathBuf {
    let path = write_test_jpeg(dir, name, 10, 10);
    embed_exif_in_jpeg(&path, tiff);
    path
}

/// Builder for little-endian TIFF blocks holding EXIF tags.
///
/// ASCII tags go in IFD0 (reported under the `Image` group). A user comment
/// goes in the EXIF sub-IFD (reported as `EXIF UserComment`).
///
/// # Examples
///
/// ```
/// use imgward_core::test_utils::ExifBuilder;
///
/// let tiff = ExifBuilder::new()
///     .ascii(ExifBuilder::IMAGE_DESCRIPTION, "holiday")
///     .user_comment("nice view")
///     .build();
/// assert!(tiff.starts_with(b"II*\0"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ExifBuilder {
    ascii: Vec<(u16, Vec<u8>)>,
    user_comment: Option<Vec<u8>>,
}

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TYPE_UNDEFINED: u16 = 7;
const EXIF_IFD_POINTER: u16 = 0x8769;
const USER_COMMENT: u16 = 0x9286;

impl ExifBuilder {
    /// `ImageDescription` tag number.
    pub const IMAGE_DESCRIPTION: u16 = 0x010E;
    /// `Make` tag number.
    pub const MAKE: u16 = 0x010F;
    /// `Software` tag number.
    pub const SOFTWARE: u16 = 0x0131;
    /// `Artist` tag number.
    pub const ARTIST: u16 = 0x013B;
    /// `Copyright` tag number.
    pub const COPYRIGHT: u16 = 0x8298;

    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ASCII tag to IFD0.
    #[must_use]
    pub fn ascii(mut self, tag: u16, value: &str) -> Self {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        self.ascii.push((tag, bytes));
        self
    }

    /// Sets an ASCII-coded `UserComment` in the EXIF sub-IFD.
    #[must_use]
    pub fn user_comment(mut self, text: &str) -> Self {
        let mut bytes = b"ASCII\0\0\0".to_vec();
        bytes.extend_from_slice(text.as_bytes());
        self.user_comment = Some(bytes);
        self
    }

    /// Assembles the TIFF block.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut ifd0: Vec<(u16, u16, Vec<u8>)> = self
            .ascii
            .iter()
            .map(|(tag, bytes)| (*tag, TYPE_ASCII, bytes.clone()))
            .collect();

        let ifd0_len = ifd_len(ifd0.len() + usize::from(self.user_comment.is_some()));
        let exif_ifd_offset = 8 + ifd0_len;
        if self.user_comment.is_some() {
            let offset = u32::try_from(exif_ifd_offset).unwrap();
            ifd0.push((EXIF_IFD_POINTER, TYPE_LONG, offset.to_le_bytes().to_vec()));
        }
        ifd0.sort_by_key(|(tag, _, _)| *tag);

        let exif_ifd: Vec<(u16, u16, Vec<u8>)> = self
            .user_comment
            .iter()
            .map(|bytes| (USER_COMMENT, TYPE_UNDEFINED, bytes.clone()))
            .collect();
        let exif_ifd_len = if exif_ifd.is_empty() {
            0
        } else {
            ifd_len(exif_ifd.len())
        };

        let data_offset = exif_ifd_offset + exif_ifd_len;
        let mut data = Vec::new();

        let mut out = Vec::new();
        out.extend_from_slice(b"II*\0");
        out.extend_from_slice(&8u32.to_le_bytes());
        write_ifd(&mut out, &ifd0, data_offset, &mut data);
        if !exif_ifd.is_empty() {
            write_ifd(&mut out, &exif_ifd, data_offset, &mut data);
        }
        out.extend_from_slice(&data);
        out
    }
}

fn ifd_len(entries: usize) -> usize {
    2 + entries * 12 + 4
}

fn write_ifd(
    out: &mut Vec<u8>,
    entries: &[(u16, u16, Vec<u8>)],
    data_offset: usize,
    data: &mut Vec<u8>,
) {
    out.extend_from_slice(&u16::try_from(entries.len()).unwrap().to_le_bytes());
    for (tag, kind, bytes) in entries {
        // Each type used here has a one-byte unit, except LONG which is
        // always a single value.
        let count = if *kind == TYPE_LONG { 1 } else { bytes.len() };
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&u32::try_from(count).unwrap().to_le_bytes());
        if bytes.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..bytes.len()].copy_from_slice(bytes);
            out.extend_from_slice(&inline);
        } else {
            let offset = u32::try_from(data_offset + data.len()).unwrap();
            out.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(bytes);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());
}
