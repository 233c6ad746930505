//! # edgequake-pdf2office
//!
//! Extract the text and embedded images of a PDF and re-render them as plain
//! text, a word-processing document, a spreadsheet, or a slide deck.
//!
//! PDF parsing is delegated to PDFium (through `pdfium-render`); this crate
//! is the glue between the page list PDFium yields and the office writers.
//! There is no OCR and no layout reconstruction: what the engine reports as
//! page text is what ends up in the output.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    check the path names an existing file
//!  ├─ 2. Extract  PDFium → Vec<PageRecord> (text + PNG images per page)
//!  ├─ 3. Render   txt | docx | xlsx | pptx, one writer per run
//!  └─ 4. Report   ConversionReport: counts, skipped images, timings
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2office::{convert, ConversionConfig, OutputFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let report = convert("document.pdf", OutputFormat::Pptx, "document.pptx", &config)?;
//!     eprintln!(
//!         "{} pages → {} slides ({} images skipped)",
//!         report.pages, report.slides, report.images_skipped
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2office` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `docx`  | on      | Word-processing writer (docx-rs) |
//! | `xlsx`  | on      | Spreadsheet writer (rust_xlsxwriter) |
//! | `pptx`  | on      | Slide-deck writer (zip + quick-xml) |
//!
//! A build without a writer feature still accepts that format name but
//! fails with [`Pdf2OfficeError::MissingCapability`] (`MISSING:<format>`).
//! PDFium itself is always bound at runtime.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod render;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_with};
pub use error::{EmbedError, Pdf2OfficeError};
pub use format::{Capability, OutputFormat};
pub use model::{ImageAsset, PageRecord};
pub use output::{ConversionReport, ImageOutcome, ImageSkip};
pub use pipeline::extract::{PdfDocumentSource, PdfEngine};
pub use pipeline::pdfium::PdfiumEngine;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
