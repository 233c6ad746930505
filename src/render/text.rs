//! Plain-text renderer.

use crate::config::ConversionConfig;
use crate::error::Pdf2OfficeError;
use crate::format::OutputFormat;
use crate::model::{joined_text, PageRecord};
use crate::output::ConversionReport;
use crate::render::progress;
use std::path::Path;
use tracing::debug;

/// Write every page's text, joined by a blank line, to `output_path`.
///
/// Images are ignored. The file is overwritten.
pub fn render_text(
    pages: &[PageRecord],
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionReport, Pdf2OfficeError> {
    let cb = progress(config);
    let total = pages.len();
    for (idx, page) in pages.iter().enumerate() {
        cb.on_page_start(idx + 1, total);
        cb.on_page_complete(idx + 1, total, page.text.chars().count());
    }

    let text = joined_text(pages);
    std::fs::write(output_path, text.as_bytes()).map_err(|e| {
        Pdf2OfficeError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        }
    })?;
    debug!("Wrote {} bytes to {}", text.len(), output_path.display());

    Ok(ConversionReport::new(OutputFormat::Txt, output_path, total))
}
