//! Image integrity check.

use std::path::Path;

use image::ImageReader;

use crate::types::Integrity;

/// Decodes and structurally verifies a file as an image.
///
/// Implementations must not panic; every failure becomes
/// [`Integrity::Failed`].
pub trait ImageVerifier {
    /// Verifies the file at `path`.
    fn verify(&self, path: &Path) -> Integrity;
}

/// [`ImageVerifier`] backed by the `image` crate's JPEG and PNG decoders.
///
/// The format is guessed from content first and falls back to the file
/// extension, so a text file named `fake.png` fails in the PNG decoder with
/// a signature error.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl ImageDecoder {
    /// Creates a new decoder-backed verifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn decode_dimensions(path: &Path) -> Result<(u32, u32), String> {
        let reader = ImageReader::open(path)
            .map_err(|e| e.to_string())?
            .with_guessed_format()
            .map_err(|e| format!("format detection failed: {e}"))?;
        let img = reader.decode().map_err(|e| e.to_string())?;
        Ok((img.width(), img.height()))
    }
}

impl ImageVerifier for ImageDecoder {
    fn verify(&self, path: &Path) -> Integrity {
        match Self::decode_dimensions(path) {
            Ok((w, h)) if w == 0 || h == 0 => {
                Integrity::Failed("decoded image has zero dimensions".to_string())
            }
            Ok(_) => Integrity::Ok,
            Err(reason) => Integrity::Failed(reason),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::write_test_jpeg;
    use crate::test_utils::write_test_png;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_valid_jpeg_passes() {
        let temp = TempDir::new().unwrap();
        let path = write_test_jpeg(temp.path(), "ok.jpg", 10, 10);
        assert_eq!(ImageDecoder::new().verify(&path), Integrity::Ok);
    }

    #[test]
    fn test_valid_png_passes() {
        let temp = TempDir::new().unwrap();
        let path = write_test_png(temp.path(), "ok.png", 4, 3);
        assert!(ImageDecoder::new().verify(&path).is_ok());
    }

    #[test]
    fn test_text_named_png_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fake.png");
        fs::write(&path, "definitely not a png").unwrap();

        let integrity = ImageDecoder::new().verify(&path);
        assert!(!integrity.is_ok());
        assert!(!integrity.reason().unwrap().is_empty());
    }

    #[test]
    fn test_truncated_jpeg_fails() {
        let temp = TempDir::new().unwrap();
        let full = write_test_jpeg(temp.path(), "full.jpg", 16, 16);
        let bytes = fs::read(&full).unwrap();
        let path = temp.path().join("cut.jpg");
        fs::write(&path, &bytes[..20]).unwrap();

        assert!(!ImageDecoder::new().verify(&path).is_ok());
    }

    #[test]
    fn test_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let integrity = ImageDecoder::new().verify(&temp.path().join("missing.jpg"));
        assert!(matches!(integrity, Integrity::Failed(_)));
    }
}
