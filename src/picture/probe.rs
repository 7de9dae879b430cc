//! # Header Probing
//!
//! Reads just enough of a payload to tell what kind of picture it is.

use std::io::Cursor;

use image::io::Reader;
use image::ImageFormat;

/// Format and pixel size read from a payload header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PictureInfo {
    /// Detected container format
    pub format: ImageFormat,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

impl PictureInfo {
    /// Estimated size once decoded to RGBA (width × height × 4 bytes).
    pub fn decoded_size(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * 4
    }
}

/// Sniffs the format from magic bytes, then decodes only the header.
pub(crate) fn probe(payload: &[u8]) -> Option<PictureInfo> {
    let format = image::guess_format(payload).ok()?;
    let (width, height) = Reader::with_format(Cursor::new(payload), format)
        .into_dimensions()
        .map_err(|e| log::debug!("Header probe failed for {:?}: {}", format, e))
        .ok()?;

    Some(PictureInfo {
        format,
        width,
        height,
    })
}

// ============================================
// TESTS
// ============================================
