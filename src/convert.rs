//! Conversion entry points.
//!
//! [`convert`] is the whole pipeline: validate the input, check the chosen
//! writer is compiled in, bind PDFium, extract, render. [`convert_with`]
//! skips the binding step and runs against any [`PdfEngine`], which is how
//! the tests drive the pipeline without PDFium installed.

use crate::config::ConversionConfig;
use crate::error::Pdf2OfficeError;
use crate::format::OutputFormat;
use crate::output::ConversionReport;
use crate::pipeline::extract::{self, PdfEngine};
use crate::pipeline::input;
use crate::pipeline::pdfium::PdfiumEngine;
use crate::render;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert the PDF at `input_path` to `format`, writing `output_path`.
///
/// Checks run in a fixed order, and none of them touch the output path:
/// input existence ([`Pdf2OfficeError::FileNotFound`]), writer availability
/// and then PDFium ([`Pdf2OfficeError::MissingCapability`]).
///
/// # Errors
/// Any fatal error. Images that fail to embed are not errors; they are
/// listed in [`ConversionReport::skipped`].
pub fn convert(
    input_path: impl AsRef<Path>,
    format: OutputFormat,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Pdf2OfficeError> {
    let input_path = input_path.as_ref();
    input::validate_input(input_path)?;
    format.ensure_available()?;

    let engine = PdfiumEngine::bind(config.pdfium_library.as_deref())?;
    convert_with(&engine, input_path, format, output_path, config)
}

/// Like [`convert`], but with an already-bound PDF engine.
pub fn convert_with(
    engine: &dyn PdfEngine,
    input_path: impl AsRef<Path>,
    format: OutputFormat,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Pdf2OfficeError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    input::validate_input(input_path)?;
    format.ensure_available()?;
    info!(
        "Starting conversion: {} → {} ({})",
        input_path.display(),
        output_path.display(),
        format
    );

    // ── Step 1: Extract ──────────────────────────────────────────────────
    let extract_start = Instant::now();
    let pages = extract::extract(engine, input_path)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    debug!("Extraction took {} ms", extract_duration_ms);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(pages.len());
    }

    // ── Step 2: Render ───────────────────────────────────────────────────
    let render_start = Instant::now();
    let mut report = render::render(format, &pages, output_path, config)?;
    report.extract_duration_ms = extract_duration_ms;
    report.render_duration_ms = render_start.elapsed().as_millis() as u64;
    report.total_duration_ms = total_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(report.pages, report.images_skipped);
    }

    info!(
        "Conversion complete: {} pages, {} images embedded, {} skipped, {} ms",
        report.pages, report.images_embedded, report.images_skipped, report.total_duration_ms
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageAsset, PageRecord};
    use crate::pipeline::embed::testing::png_bytes;
    use crate::pipeline::extract::fake::FakeEngine;
    use crate::progress::ConversionProgressCallback;
    use std::sync::{Arc, Mutex};

    fn scratch_input(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("in.pdf");
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();
        path
    }

    #[test]
    fn text_conversion_joins_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = scratch_input(dir.path());
        let out = dir.path().join("out.txt");
        let engine = FakeEngine::new(vec![
            PageRecord::text_only("alpha"),
            PageRecord::text_only("beta"),
        ]);

        let report =
            convert_with(&engine, &input, OutputFormat::Txt, &out, &ConversionConfig::default())
                .unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "alpha\n\nbeta");
        assert_eq!(report.format, OutputFormat::Txt);
        assert_eq!(report.pages, 2);
        assert!(report.total_duration_ms >= report.render_duration_ms);
    }

    #[test]
    fn extraction_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let input = scratch_input(dir.path());
        let engine = FakeEngine::new(vec![PageRecord::text_only("same every time")]);
        let (a, b) = (dir.path().join("a.txt"), dir.path().join("b.txt"));

        convert_with(&engine, &input, OutputFormat::Txt, &a, &ConversionConfig::default()).unwrap();
        convert_with(&engine, &input, OutputFormat::Txt, &b, &ConversionConfig::default()).unwrap();

        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let engine = FakeEngine::new(vec![PageRecord::text_only("x")]);

        let err = convert_with(
            &engine,
            dir.path().join("missing.pdf"),
            OutputFormat::Txt,
            &out,
            &ConversionConfig::default(),
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(!out.exists());
    }

    #[test]
    fn corrupt_pdf_is_fatal_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = scratch_input(dir.path());
        let out = dir.path().join("out.docx");
        let mut engine = FakeEngine::new(Vec::new());
        engine.refuse_open = true;

        let err = convert_with(&engine, &input, OutputFormat::Docx, &out, &ConversionConfig::default())
            .unwrap_err();

        assert!(matches!(err, Pdf2OfficeError::CorruptPdf { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(!out.exists());
    }

    #[test]
    fn missing_pdfium_library_is_reported_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let input = scratch_input(dir.path());
        let out = dir.path().join("out.txt");
        let config = ConversionConfig::builder()
            .pdfium_library(dir.path().join("libpdfium-missing.so"))
            .build()
            .unwrap();

        let err = convert(&input, OutputFormat::Txt, &out, &config).unwrap_err();

        assert_eq!(err.diagnostic_tag().as_deref(), Some("MISSING:pdfium"));
        assert!(!out.exists());
    }

    #[derive(Default)]
    struct EventLog(Mutex<Vec<String>>);

    impl ConversionProgressCallback for EventLog {
        fn on_conversion_start(&self, total: usize) {
            self.0.lock().unwrap().push(format!("start {total}"));
        }
        fn on_page_complete(&self, page: usize, total: usize, _units: usize) {
            self.0.lock().unwrap().push(format!("page {page}/{total}"));
        }
        fn on_image_skipped(&self, page: usize, index: usize, _reason: &str) {
            self.0.lock().unwrap().push(format!("skip {page}:{index}"));
        }
        fn on_conversion_complete(&self, total: usize, skipped: usize) {
            self.0.lock().unwrap().push(format!("done {total} {skipped}"));
        }
    }

    #[cfg(feature = "pptx")]
    #[test]
    fn progress_events_arrive_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = scratch_input(dir.path());
        let log = Arc::new(EventLog::default());
        let config = ConversionConfig::builder()
            .progress_callback(log.clone())
            .build()
            .unwrap();
        let engine = FakeEngine::new(vec![
            PageRecord::new(
                "text",
                vec![
                    ImageAsset::png(png_bytes(2, 2)),
                    ImageAsset::new(b"broken".to_vec(), Some("png")),
                ],
            ),
            PageRecord::text_only(""),
        ]);

        let report = convert_with(
            &engine,
            &input,
            OutputFormat::Pptx,
            dir.path().join("deck.pptx"),
            &config,
        )
        .unwrap();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec!["start 2", "skip 1:1", "page 1/2", "page 2/2", "done 2 1"]
        );
        assert_eq!(report.slides, 4);
        assert_eq!(report.images_embedded, 1);
        assert_eq!(report.images_skipped, 1);
    }
}
