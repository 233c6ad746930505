//! Output renderers, one per [`OutputFormat`].
//!
//! Every office renderer is generic over a small writer trait
//! ([`docx::DocumentWriter`], [`xlsx::WorkbookWriter`],
//! [`pptx::PresentationWriter`]) so the page-walking logic is tested against
//! recording fakes, while the production writers live behind the `docx`,
//! `xlsx` and `pptx` Cargo features.
//!
//! Renderers consume the whole page list, save exactly once at the end, and
//! return a [`ConversionReport`] describing what was written.

pub mod docx;
pub mod pptx;
#[cfg(feature = "pptx")]
pub mod pptx_package;
pub mod text;
pub mod xlsx;

use crate::config::ConversionConfig;
use crate::error::Pdf2OfficeError;
use crate::format::OutputFormat;
use crate::model::PageRecord;
use crate::output::{ConversionReport, ImageOutcome};
use crate::progress::{ConversionProgressCallback, NoopProgressCallback};
use std::path::{Path, PathBuf};

/// English Metric Units per inch, the DrawingML length unit.
pub const EMU_PER_INCH: u64 = 914_400;

/// EMUs per pixel at 96 DPI.
pub const EMU_PER_PIXEL: u64 = 9_525;

/// Convert inches to EMUs, rounding to the nearest unit.
pub fn inches_to_emu(inches: f64) -> u64 {
    (inches * EMU_PER_INCH as f64).round().max(0.0) as u64
}

/// Render `pages` as `format` into `output_path` with the built-in writer.
pub fn render(
    format: OutputFormat,
    pages: &[PageRecord],
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionReport, Pdf2OfficeError> {
    format.ensure_available()?;

    match format {
        OutputFormat::Txt => text::render_text(pages, output_path, config),
        #[cfg(feature = "docx")]
        OutputFormat::Docx => {
            docx::render_docx(&mut docx::DocxRsWriter::new(), pages, output_path, config)
        }
        #[cfg(feature = "xlsx")]
        OutputFormat::Xlsx => {
            xlsx::render_xlsx(&mut xlsx::XlsxWorkbookWriter::new(), pages, output_path, config)
        }
        #[cfg(feature = "pptx")]
        OutputFormat::Pptx => {
            pptx::render_pptx(&mut pptx_package::PptxPackage::new(), pages, output_path, config)
        }
        #[allow(unreachable_patterns)]
        other => Err(Pdf2OfficeError::Internal(format!(
            "no {} writer compiled in",
            other
        ))),
    }
}

/// The configured progress observer, or a no-op.
pub(crate) fn progress(config: &ConversionConfig) -> &dyn ConversionProgressCallback {
    match config.progress_callback.as_deref() {
        Some(cb) => cb,
        None => &NoopProgressCallback,
    }
}

/// Directory for temporary image files: the output's parent, or `.` for a
/// bare file name.
pub(crate) fn temp_dir_for(output_path: &Path) -> PathBuf {
    match output_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Record an image outcome in `report` and tell the progress observer about
/// skips.
pub(crate) fn record_image(
    report: &mut ConversionReport,
    cb: &dyn ConversionProgressCallback,
    page_num: usize,
    index: usize,
    outcome: ImageOutcome,
) {
    if let ImageOutcome::Skipped(reason) = &outcome {
        cb.on_image_skipped(page_num, index, reason);
    }
    report.record_image(page_num, index, outcome);
}

/// Drop characters XML 1.0 cannot carry.
///
/// Extracted text regularly contains form feeds and other C0 controls,
/// which would make the written part unreadable. Tab, line feed and
/// carriage return are kept.
pub fn xml_safe(text: &str) -> std::borrow::Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r')
            || ('\u{20}'..='\u{D7FF}').contains(&c)
            || ('\u{E000}'..='\u{FFFD}').contains(&c)
            || c >= '\u{10000}'
    }

    if text.chars().all(allowed) {
        std::borrow::Cow::Borrowed(text)
    } else {
        std::borrow::Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn xml_safe_strips_control_characters() {
        assert_eq!(xml_safe("a\u{c}b\u{0}c"), "abc");
        assert_eq!(xml_safe("tab\tline\r\n"), "tab\tline\r\n");
        assert_eq!(xml_safe("\u{FFFE}x"), "x");
    }

    #[test]
    fn xml_safe_borrows_clean_text() {
        assert!(matches!(xml_safe("plain ünïcode 漢字 🙂"), Cow::Borrowed(_)));
    }

    #[test]
    fn inches_convert_to_emu() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(0.5), 457_200);
        assert_eq!(inches_to_emu(9.0), 8_229_600);
    }

    #[test]
    fn temp_dir_is_output_parent() {
        assert_eq!(temp_dir_for(Path::new("out.docx")), PathBuf::from("."));
        assert_eq!(
            temp_dir_for(Path::new("/tmp/x/out.docx")),
            PathBuf::from("/tmp/x")
        );
    }

    #[test]
    fn record_image_notifies_skips() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Skips(AtomicUsize);
        impl ConversionProgressCallback for Skips {
            fn on_image_skipped(&self, _page: usize, _index: usize, _reason: &str) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let cb = Skips(AtomicUsize::new(0));
        let mut report = ConversionReport::new(OutputFormat::Docx, "o.docx", 1);
        record_image(&mut report, &cb, 1, 0, ImageOutcome::EmbeddedFromMemory);
        record_image(&mut report, &cb, 1, 1, ImageOutcome::Skipped("bad".into()));

        assert_eq!(cb.0.load(Ordering::SeqCst), 1);
        assert_eq!(report.images_embedded, 1);
        assert_eq!(report.images_skipped, 1);
    }
}
