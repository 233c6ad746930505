//! Spreadsheet renderer.
//!
//! Layout:
//!
//! * sheet `Text`, cell `A1`: every page's text joined by a blank line
//! * sheet `Page_N` for each page with images: image `k` anchored in column
//!   `A` at row `k * stride` (rows 1, 21, 41, … with the default stride)
//!
//! The spreadsheet image API takes files, so every image goes through a
//! temporary file that is removed right after anchoring.

use crate::config::ConversionConfig;
use crate::error::{EmbedError, Pdf2OfficeError};
use crate::format::OutputFormat;
use crate::model::{joined_text, PageRecord};
use crate::output::ConversionReport;
use crate::pipeline::chunk::truncate_chars;
use crate::pipeline::embed::embed_via_temp_file;
use crate::render::{progress, record_image, temp_dir_for};
use std::path::Path;
use tracing::{info, warn};

/// Name of the first sheet.
pub const TEXT_SHEET: &str = "Text";

/// Longest string a spreadsheet cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Minimal workbook-building surface the renderer needs.
///
/// Sheets are addressed by the index [`add_sheet`](Self::add_sheet)
/// returned; rows and columns are 0-based.
pub trait WorkbookWriter {
    fn add_sheet(&mut self, name: &str) -> Result<usize, Pdf2OfficeError>;

    fn write_text(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        text: &str,
    ) -> Result<(), Pdf2OfficeError>;

    /// Anchor the image stored at `path` with its top-left corner in the
    /// given cell.
    fn insert_image_file(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        path: &Path,
    ) -> Result<(), EmbedError>;

    fn save(&mut self, path: &Path) -> Result<(), Pdf2OfficeError>;
}

/// Render `pages` into a workbook at `output_path`.
pub fn render_xlsx<W: WorkbookWriter>(
    writer: &mut W,
    pages: &[PageRecord],
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionReport, Pdf2OfficeError> {
    let cb = progress(config);
    let temp_dir = temp_dir_for(output_path);
    let total = pages.len();
    let mut report = ConversionReport::new(OutputFormat::Xlsx, output_path, total);

    let text_sheet = writer.add_sheet(TEXT_SHEET)?;
    let full_text = joined_text(pages);
    if !full_text.is_empty() {
        let cell = truncate_chars(&full_text, MAX_CELL_CHARS);
        if cell.len() < full_text.len() {
            warn!(
                "Text is {} chars; cell A1 keeps the first {}",
                full_text.chars().count(),
                MAX_CELL_CHARS
            );
        }
        writer.write_text(text_sheet, 0, 0, cell)?;
    }

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        cb.on_page_start(page_num, total);

        if !page.images.is_empty() {
            let sheet = writer.add_sheet(&format!("Page_{}", page_num))?;
            let mut row = 0u32;
            for (img_idx, image) in page.images.iter().enumerate() {
                let outcome = embed_via_temp_file(image, &temp_dir, |path| {
                    writer.insert_image_file(sheet, row, 0, path)
                });
                record_image(&mut report, cb, page_num, img_idx, outcome);
                row = row.saturating_add(config.sheet_image_row_stride);
            }
        }

        cb.on_page_complete(page_num, total, page.images.len());
    }

    writer.save(output_path)?;
    info!(
        "Workbook saved: {} ({} images, {} skipped)",
        output_path.display(),
        report.images_embedded,
        report.images_skipped
    );
    Ok(report)
}

#[cfg(feature = "xlsx")]
pub use self::xlsxwriter::XlsxWorkbookWriter;

#[cfg(feature = "xlsx")]
mod xlsxwriter {
    use super::*;
    use rust_xlsxwriter::{Image, Workbook, XlsxError};

    fn render_failed(e: XlsxError) -> Pdf2OfficeError {
        Pdf2OfficeError::RenderFailed {
            format: "xlsx",
            detail: e.to_string(),
        }
    }

    /// [`WorkbookWriter`] backed by `rust_xlsxwriter`.
    pub struct XlsxWorkbookWriter {
        workbook: Workbook,
        sheets: usize,
    }

    impl XlsxWorkbookWriter {
        pub fn new() -> Self {
            Self {
                workbook: Workbook::new(),
                sheets: 0,
            }
        }
    }

    impl Default for XlsxWorkbookWriter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WorkbookWriter for XlsxWorkbookWriter {
        fn add_sheet(&mut self, name: &str) -> Result<usize, Pdf2OfficeError> {
            self.workbook
                .add_worksheet()
                .set_name(name)
                .map_err(render_failed)?;
            self.sheets += 1;
            Ok(self.sheets - 1)
        }

        fn write_text(
            &mut self,
            sheet: usize,
            row: u32,
            col: u16,
            text: &str,
        ) -> Result<(), Pdf2OfficeError> {
            self.workbook
                .worksheet_from_index(sheet)
                .map_err(render_failed)?
                .write_string(row, col, text)
                .map_err(render_failed)?;
            Ok(())
        }

        fn insert_image_file(
            &mut self,
            sheet: usize,
            row: u32,
            col: u16,
            path: &Path,
        ) -> Result<(), EmbedError> {
            // Image::new reads the file into memory, so the caller may
            // delete it as soon as this returns.
            let image = Image::new(path).map_err(|e| EmbedError::Rejected(e.to_string()))?;
            self.workbook
                .worksheet_from_index(sheet)
                .map_err(|e| EmbedError::Rejected(e.to_string()))?
                .insert_image(row, col, &image)
                .map_err(|e| EmbedError::Rejected(e.to_string()))?;
            Ok(())
        }

        fn save(&mut self, path: &Path) -> Result<(), Pdf2OfficeError> {
            self.workbook.save(path).map_err(|e| match e {
                XlsxError::IoError(source) => Pdf2OfficeError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source,
                },
                other => render_failed(other),
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::RecordingWorkbook;
    use super::*;
    use crate::model::ImageAsset;
    use crate::pipeline::embed::testing::png_bytes;

    fn render(pages: &[PageRecord]) -> (RecordingWorkbook, ConversionReport, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RecordingWorkbook::default();
        let report = render_xlsx(
            &mut writer,
            pages,
            &dir.path().join("out.xlsx"),
            &ConversionConfig::default(),
        )
        .unwrap();
        (writer, report, dir)
    }

    #[test]
    fn text_sheet_holds_all_text_in_a1() {
        let (wb, _, _dir) = render(&[
            PageRecord::text_only("one\ntwo"),
            PageRecord::text_only("three"),
        ]);
        assert_eq!(wb.sheets, vec!["Text"]);
        assert_eq!(wb.cells, vec![(0, 0, 0, "one\ntwo\n\nthree".to_string())]);
        assert!(wb.saved);
    }

    #[test]
    fn image_pages_get_their_own_sheets() {
        let img = || ImageAsset::png(png_bytes(2, 2));
        let (wb, report, dir) = render(&[
            PageRecord::new("a", vec![img(), img(), img()]),
            PageRecord::text_only("b"),
            PageRecord::new("c", vec![img()]),
        ]);

        assert_eq!(wb.sheets, vec!["Text", "Page_1", "Page_3"]);
        assert_eq!(wb.images, vec![(1, 0, 0), (1, 20, 0), (1, 40, 0), (2, 0, 0)]);
        assert_eq!(report.images_embedded, 4);
        assert!(wb.image_paths.iter().all(|p| !p.exists()), "temp files removed");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn rejected_image_keeps_its_row_slot() {
        let (wb, report, _dir) = render(&[PageRecord::new(
            "",
            vec![
                ImageAsset::new(b"junk".to_vec(), Some("png")),
                ImageAsset::png(png_bytes(2, 2)),
            ],
        )]);
        assert_eq!(wb.images, vec![(1, 20, 0)]);
        assert_eq!(report.images_skipped, 1);
        assert!(wb.image_paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn zero_pages_yield_an_empty_text_sheet() {
        let (wb, report, _dir) = render(&[]);
        assert_eq!(wb.sheets, vec!["Text"]);
        assert!(wb.cells.is_empty());
        assert!(wb.saved);
        assert_eq!(report.pages, 0);
    }

    #[test]
    fn oversized_text_is_truncated_to_cell_limit() {
        let long = "x".repeat(MAX_CELL_CHARS + 100);
        let (wb, _, _dir) = render(&[PageRecord::text_only(long)]);
        assert_eq!(wb.cells[0].3.chars().count(), MAX_CELL_CHARS);
    }
}
