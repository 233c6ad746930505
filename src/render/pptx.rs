//! Slide-deck renderer.
//!
//! Per page, in order:
//!
//! 1. one image slide per image, the picture scaled to a fixed width with
//!    its aspect ratio kept;
//! 2. one text slide per chunk from [`split_text_chunks`], a single
//!    word-wrapped text box with one paragraph per unit;
//! 3. if the page produced neither, one blank slide so the deck keeps one
//!    slide per page at minimum.
//!
//! A slide whose picture could not be embedded stays in the deck, empty.

use crate::config::ConversionConfig;
use crate::error::{EmbedError, Pdf2OfficeError};
use crate::format::OutputFormat;
use crate::model::PageRecord;
use crate::output::ConversionReport;
use crate::pipeline::chunk::{split_text_chunks, truncate_chars};
use crate::pipeline::embed::{embed_image, ImageSource};
use crate::render::{inches_to_emu, progress, record_image, temp_dir_for};
use std::path::Path;
use tracing::{debug, info};

/// Layout preferences, most preferred first.
pub const IMAGE_SLIDE_LAYOUTS: &[usize] = &[6, 5, 0];
pub const TEXT_SLIDE_LAYOUTS: &[usize] = &[5, 0];
pub const BLANK_SLIDE_LAYOUTS: &[usize] = &[6, 0];

/// Height of the text box, in inches.
const TEXT_BOX_HEIGHT_IN: f64 = 6.0;

/// Where a picture goes on its slide. The height follows from the image's
/// aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PicturePlacement {
    pub left: u64,
    pub top: u64,
    pub width: u64,
}

/// Geometry and font of a slide text box, lengths in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBoxSpec {
    pub left: u64,
    pub top: u64,
    pub width: u64,
    pub height: u64,
    pub font_size_pt: u32,
}

/// Minimal presentation-building surface the renderer needs.
pub trait PresentationWriter {
    /// Number of slide layouts the template offers.
    fn layout_count(&self) -> usize;

    /// Append a slide using layout `layout`; returns the slide's index.
    fn add_slide(&mut self, layout: usize) -> usize;

    fn add_picture(
        &mut self,
        slide: usize,
        source: ImageSource<'_>,
        placement: PicturePlacement,
    ) -> Result<(), EmbedError>;

    /// Add a word-wrapped text box; each entry of `paragraphs` is one
    /// paragraph and may contain single line breaks.
    fn add_text_box(&mut self, slide: usize, paragraphs: &[String], spec: TextBoxSpec);

    fn save(&mut self, path: &Path) -> Result<(), Pdf2OfficeError>;
}

/// First preferred layout the template actually has, else layout 0.
pub fn pick_layout(layout_count: usize, preferences: &[usize]) -> usize {
    preferences
        .iter()
        .copied()
        .find(|&idx| idx < layout_count)
        .unwrap_or(0)
}

/// Render `pages` into a slide deck at `output_path`.
pub fn render_pptx<W: PresentationWriter>(
    writer: &mut W,
    pages: &[PageRecord],
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionReport, Pdf2OfficeError> {
    let cb = progress(config);
    let temp_dir = temp_dir_for(output_path);
    let total = pages.len();
    let mut report = ConversionReport::new(OutputFormat::Pptx, output_path, total);

    let layouts = writer.layout_count();
    let image_layout = pick_layout(layouts, IMAGE_SLIDE_LAYOUTS);
    let text_layout = pick_layout(layouts, TEXT_SLIDE_LAYOUTS);
    let blank_layout = pick_layout(layouts, BLANK_SLIDE_LAYOUTS);

    let margin = inches_to_emu(config.slide_margin_in);
    let placement = PicturePlacement {
        left: margin,
        top: margin,
        width: inches_to_emu(config.slide_image_width_in),
    };
    let text_box = TextBoxSpec {
        left: margin,
        top: margin,
        width: inches_to_emu(config.slide_image_width_in),
        height: inches_to_emu(TEXT_BOX_HEIGHT_IN),
        font_size_pt: config.slide_font_size_pt,
    };

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        cb.on_page_start(page_num, total);
        let mut slides = 0;

        for (img_idx, image) in page.images.iter().enumerate() {
            let slide = writer.add_slide(image_layout);
            slides += 1;
            let outcome = embed_image(image, &temp_dir, |src| {
                writer.add_picture(slide, src, placement)
            });
            record_image(&mut report, cb, page_num, img_idx, outcome);
        }

        let chunks = split_text_chunks(&page.text, config.slide_char_budget);
        for chunk in &chunks {
            let slide = writer.add_slide(text_layout);
            slides += 1;
            let paragraphs: Vec<String> = chunk
                .paragraphs
                .iter()
                .map(|p| truncate_chars(p, config.slide_paragraph_limit).to_string())
                .collect();
            writer.add_text_box(slide, &paragraphs, text_box);
        }

        if slides == 0 {
            writer.add_slide(blank_layout);
            slides = 1;
        }

        debug!(
            "Page {}: {} image slides, {} text slides",
            page_num,
            page.images.len(),
            chunks.len()
        );
        report.slides += slides;
        cb.on_page_complete(page_num, total, slides);
    }

    writer.save(output_path)?;
    info!(
        "Deck saved: {} ({} slides, {} images, {} skipped)",
        output_path.display(),
        report.slides,
        report.images_embedded,
        report.images_skipped
    );
    Ok(report)
}
