//! Magic-byte header check.

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::types::DeclaredFormat;
use crate::types::format::HEADER_LEN;

/// Reads up to the first [`HEADER_LEN`] bytes of a file.
///
/// Shorter files yield a shorter buffer; an empty file yields an empty one.
pub fn read_header(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    Ok(header)
}

/// Classifies a file by its leading bytes.
///
/// A file that cannot be read is reported as [`DeclaredFormat::Unknown`];
/// the integrity check surfaces the underlying I/O error.
pub fn detect_header(path: &Path) -> DeclaredFormat {
    match read_header(path) {
        Ok(header) => DeclaredFormat::from_header(&header),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "header read failed");
            DeclaredFormat::Unknown
        }
    }
}
