//! Word-processing renderer.
//!
//! Each page becomes one paragraph per text line followed by the page's
//! images as inline pictures. Pictures go through
//! [`embed_image`](crate::pipeline::embed::embed_image): bytes first, then a
//! temporary file beside the output.

use crate::config::ConversionConfig;
use crate::error::{EmbedError, Pdf2OfficeError};
use crate::format::OutputFormat;
use crate::model::PageRecord;
use crate::output::ConversionReport;
use crate::pipeline::embed::{embed_image, ImageSource};
use crate::render::{progress, record_image, temp_dir_for};
use std::path::Path;
use tracing::{debug, info};

/// Printable width of a default page: 8.5 in minus two 1.25 in margins.
pub const MAX_PICTURE_WIDTH_EMU: u64 = 6 * crate::render::EMU_PER_INCH;

/// Minimal document-building surface the renderer needs.
pub trait DocumentWriter {
    /// Append a paragraph holding `text` (may be empty).
    fn add_paragraph(&mut self, text: &str);

    /// Append an inline picture read from `source`.
    fn add_picture(&mut self, source: ImageSource<'_>) -> Result<(), EmbedError>;

    /// Write the document to `path`.
    fn save(&mut self, path: &Path) -> Result<(), Pdf2OfficeError>;
}

/// Render `pages` into a word-processing document at `output_path`.
pub fn render_docx<W: DocumentWriter>(
    writer: &mut W,
    pages: &[PageRecord],
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionReport, Pdf2OfficeError> {
    let cb = progress(config);
    let temp_dir = temp_dir_for(output_path);
    let total = pages.len();
    let mut report = ConversionReport::new(OutputFormat::Docx, output_path, total);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        cb.on_page_start(page_num, total);

        let mut paragraphs = 0;
        for line in page.text.lines() {
            writer.add_paragraph(line);
            paragraphs += 1;
        }

        for (img_idx, image) in page.images.iter().enumerate() {
            let outcome = embed_image(image, &temp_dir, |src| writer.add_picture(src));
            record_image(&mut report, cb, page_num, img_idx, outcome);
        }

        debug!(
            "Page {}: {} paragraphs, {} images",
            page_num,
            paragraphs,
            page.images.len()
        );
        cb.on_page_complete(page_num, total, paragraphs);
    }

    writer.save(output_path)?;
    info!(
        "Document saved: {} ({} images, {} skipped)",
        output_path.display(),
        report.images_embedded,
        report.images_skipped
    );
    Ok(report)
}

/// Inline picture extent in EMUs for an image of `width_px` × `height_px`.
///
/// Pixels map to EMUs at 96 DPI; anything wider than
/// [`MAX_PICTURE_WIDTH_EMU`] is scaled down, keeping the aspect ratio.
pub fn picture_extent(width_px: u32, height_px: u32) -> (u64, u64) {
    let cx = u64::from(width_px) * crate::render::EMU_PER_PIXEL;
    let cy = u64::from(height_px) * crate::render::EMU_PER_PIXEL;
    if cx <= MAX_PICTURE_WIDTH_EMU || cx == 0 {
        return (cx, cy);
    }
    (MAX_PICTURE_WIDTH_EMU, cy * MAX_PICTURE_WIDTH_EMU / cx)
}

#[cfg(feature = "docx")]
pub use self::docx_rs_writer::DocxRsWriter;

#[cfg(feature = "docx")]
mod docx_rs_writer {
    use super::*;
    use crate::pipeline::embed::{decode_source, encode_png};
    use crate::render::xml_safe;
    use docx_rs::{Docx, Paragraph, Pic, Run};
    use image::GenericImageView;

    /// [`DocumentWriter`] backed by `docx-rs`.
    ///
    /// Paragraphs are buffered and the `Docx` is assembled on save.
    #[derive(Debug, Default)]
    pub struct DocxRsWriter {
        paragraphs: Vec<Paragraph>,
    }

    impl DocxRsWriter {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DocumentWriter for DocxRsWriter {
        fn add_paragraph(&mut self, text: &str) {
            let run = Run::new().add_text(xml_safe(text).into_owned());
            self.paragraphs.push(Paragraph::new().add_run(run));
        }

        fn add_picture(&mut self, source: ImageSource<'_>) -> Result<(), EmbedError> {
            // docx-rs panics on undecodable input, so decode here and hand
            // it a known-good PNG.
            let img = decode_source(source)?;
            let (width, height) = img.dimensions();
            if width == 0 || height == 0 {
                return Err(EmbedError::Rejected("image has no pixels".into()));
            }
            let png = encode_png(&img).map_err(|e| EmbedError::Rejected(e.to_string()))?;

            let (cx, cy) = picture_extent(width, height);
            let (cx, cy) = (
                u32::try_from(cx).map_err(|_| EmbedError::Rejected("image too large".into()))?,
                u32::try_from(cy).map_err(|_| EmbedError::Rejected("image too large".into()))?,
            );
            let pic = Pic::new_with_dimensions(png, width, height).size(cx, cy);
            self.paragraphs.push(Paragraph::new().add_run(Run::new().add_image(pic)));
            Ok(())
        }

        fn save(&mut self, path: &Path) -> Result<(), Pdf2OfficeError> {
            let mut docx = Docx::new();
            for paragraph in self.paragraphs.drain(..) {
                docx = docx.add_paragraph(paragraph);
            }

            let file = std::fs::File::create(path).map_err(|e| {
                Pdf2OfficeError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
            docx.build()
                .pack(file)
                .map_err(|e| Pdf2OfficeError::RenderFailed {
                    format: "docx",
                    detail: format!("{:?}", e),
                })
        }
    }
}
