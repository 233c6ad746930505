//! Error types for the edgequake-pdf2office library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2OfficeError`] — **Fatal**: the conversion cannot proceed at all
//!   (input missing, engine not installed, unreadable PDF, save failed).
//!   Returned as `Err(Pdf2OfficeError)` from [`crate::convert()`].
//!
//! * [`EmbedError`] — **Non-fatal**: a single image could not be embedded
//!   into the output document. It is recorded in
//!   [`crate::output::ConversionReport::skipped`] and the run continues.
//!
//! Every fatal variant maps onto one process exit code via
//! [`Pdf2OfficeError::exit_code`], so the CLI never has to pattern-match on
//! error messages.

use crate::format::Capability;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2office library.
#[derive(Debug, Error)]
pub enum Pdf2OfficeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// The format argument is not one of txt, docx, xlsx, pptx.
    #[error("Unsupported output format '{format}' (expected txt, docx, xlsx or pptx)")]
    UnsupportedFormat { format: String },

    // ── Environment errors ────────────────────────────────────────────────
    /// A capability the chosen conversion needs is not available.
    #[error("Required capability '{capability}' is not available: {detail}")]
    MissingCapability {
        capability: Capability,
        detail: String,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The engine could not open the input as a PDF.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// The engine opened the document but failed on a specific page.
    #[error("Extraction failed for page {page}: {detail}")]
    PageExtractionFailed { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output library failed while assembling or saving the document.
    #[error("Failed to render {format} output: {detail}")]
    RenderFailed {
        format: &'static str,
        detail: String,
    },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2OfficeError {
    /// Process exit code for this error.
    ///
    /// | Code | Category |
    /// |------|----------|
    /// | 2 | required capability missing |
    /// | 3 | input file not found |
    /// | 4 | unsupported format |
    /// | 1 | everything else |
    pub fn exit_code(&self) -> u8 {
        match self {
            Pdf2OfficeError::MissingCapability { .. } => 2,
            Pdf2OfficeError::FileNotFound { .. } => 3,
            Pdf2OfficeError::UnsupportedFormat { .. } => 4,
            _ => 1,
        }
    }

    /// Short machine-readable stderr tag for the expected failure categories.
    ///
    /// Returns `None` for unexpected failures, which are reported with the
    /// full error chain instead.
    pub fn diagnostic_tag(&self) -> Option<String> {
        match self {
            Pdf2OfficeError::MissingCapability { capability, .. } => {
                Some(format!("MISSING:{}", capability.tag()))
            }
            Pdf2OfficeError::FileNotFound { .. } => Some("INPUT_NOT_FOUND".to_string()),
            Pdf2OfficeError::UnsupportedFormat { .. } => Some("UNSUPPORTED_FORMAT".to_string()),
            _ => None,
        }
    }
}

/// A non-fatal failure to embed one image.
///
/// Returned by the output writers' picture methods and collected into
/// [`crate::output::ImageSkip`] once both insertion paths have failed.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The writer could not decode or accept the image payload.
    #[error("image rejected: {0}")]
    Rejected(String),

    /// Writing or reading the temporary fallback file failed.
    #[error("temporary image file: {0}")]
    TempFile(#[from] std::io::Error),
}
