//! Image insertion policy shared by the docx, xlsx and pptx renderers.
//!
//! Writers are handed an [`ImageSource`] and either accept it or return an
//! [`EmbedError`]. [`embed_image`] tries the in-memory payload first and, if
//! the writer rejects it, retries once from a temporary file written beside
//! the output. [`embed_via_temp_file`] is the file-only variant for writers
//! that cannot take bytes.
//!
//! Temporary files are `tempfile::NamedTempFile`s: they are removed when the
//! attempt ends, whether it succeeded, failed, or unwound.

use crate::error::EmbedError;
use crate::model::ImageAsset;
use crate::output::ImageOutcome;
use image::DynamicImage;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::debug;

/// Prefix of temporary image files, so strays are easy to spot.
const TEMP_PREFIX: &str = ".pdf2office-img-";

/// Where a writer should read an image from.
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// Encoded image bytes.
    Memory(&'a [u8]),
    /// A file holding the encoded image; the extension names its format.
    File(&'a Path),
}

/// Insert `asset` with `insert`, in memory first, then from a temporary file
/// created in `temp_dir`.
///
/// Never fails: a rejected image becomes [`ImageOutcome::Skipped`] carrying
/// the last error.
pub fn embed_image<F>(asset: &ImageAsset, temp_dir: &Path, mut insert: F) -> ImageOutcome
where
    F: FnMut(ImageSource<'_>) -> Result<(), EmbedError>,
{
    match insert(ImageSource::Memory(&asset.bytes)) {
        Ok(()) => return ImageOutcome::EmbeddedFromMemory,
        Err(e) => debug!("In-memory insert rejected ({}), retrying from file", e),
    }

    match with_temp_file(asset, temp_dir, |path| insert(ImageSource::File(path))) {
        Ok(()) => ImageOutcome::EmbeddedFromFile,
        Err(e) => {
            debug!("Image skipped: {}", e);
            ImageOutcome::Skipped(e.to_string())
        }
    }
}

/// Insert `asset` from a temporary file only.
pub fn embed_via_temp_file<F>(asset: &ImageAsset, temp_dir: &Path, insert: F) -> ImageOutcome
where
    F: FnOnce(&Path) -> Result<(), EmbedError>,
{
    match with_temp_file(asset, temp_dir, insert) {
        Ok(()) => ImageOutcome::EmbeddedFromFile,
        Err(e) => {
            debug!("Image skipped: {}", e);
            ImageOutcome::Skipped(e.to_string())
        }
    }
}

/// Write `asset` to a fresh temporary file in `dir`, run `f` on its path,
/// then delete the file.
///
/// A failed delete is logged, not returned: the insertion result is what
/// the caller cares about.
fn with_temp_file<F>(asset: &ImageAsset, dir: &Path, f: F) -> Result<(), EmbedError>
where
    F: FnOnce(&Path) -> Result<(), EmbedError>,
{
    let suffix = format!(".{}", asset.extension);
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(&suffix)
        .tempfile_in(dir)?;
    tmp.write_all(&asset.bytes)?;
    tmp.flush()?;

    let result = f(tmp.path());

    let path = tmp.path().to_path_buf();
    if let Err(e) = tmp.close() {
        debug!("Could not remove temporary image {}: {}", path.display(), e);
    }
    result
}

/// Decode an image from `source`, the check every writer runs before
/// accepting a picture.
///
/// Memory payloads are sniffed by their magic bytes; files are decoded by
/// extension.
pub fn decode_source(source: ImageSource<'_>) -> Result<DynamicImage, EmbedError> {
    let decoded = match source {
        ImageSource::Memory(bytes) => image::load_from_memory(bytes),
        ImageSource::File(path) => image::open(path),
    };
    decoded.map_err(|e| EmbedError::Rejected(e.to_string()))
}

/// Encode a decoded image as PNG.
///
/// Colour types PNG cannot store (e.g. 32-bit float) are converted to RGBA8
/// first.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    match img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png) {
        Ok(()) => Ok(buf),
        Err(_) => {
            buf.clear();
            DynamicImage::ImageRgba8(img.to_rgba8())
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
            Ok(buf)
        }
    }
}
