//! Output formats and the capabilities they depend on.
//!
//! A conversion needs two capabilities: the PDF engine (PDFium, bound at
//! runtime) and the writer for the chosen format (compiled in through a
//! Cargo feature). [`OutputFormat::ensure_available`] answers the second
//! question up front so a build without, say, the `xlsx` feature fails with
//! `MISSING:xlsx` before the input is even opened.

use crate::error::Pdf2OfficeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain UTF-8 text.
    Txt,
    /// Word-processing document.
    Docx,
    /// Spreadsheet workbook.
    Xlsx,
    /// Slide deck.
    Pptx,
}

impl OutputFormat {
    /// Every supported format, in CLI help order.
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Txt,
        OutputFormat::Docx,
        OutputFormat::Xlsx,
        OutputFormat::Pptx,
    ];

    /// Lowercase name as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Docx => "docx",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Pptx => "pptx",
        }
    }

    /// The writer capability this format needs, if any.
    ///
    /// Plain text is written with `std::fs` and needs nothing beyond the
    /// PDF engine.
    pub fn capability(&self) -> Option<Capability> {
        match self {
            OutputFormat::Txt => None,
            OutputFormat::Docx => Some(Capability::Docx),
            OutputFormat::Xlsx => Some(Capability::Xlsx),
            OutputFormat::Pptx => Some(Capability::Pptx),
        }
    }

    /// Fail with [`Pdf2OfficeError::MissingCapability`] if this build does
    /// not include the writer for this format.
    pub fn ensure_available(&self) -> Result<(), Pdf2OfficeError> {
        match self.capability() {
            Some(cap) if !cap.is_compiled_in() => Err(Pdf2OfficeError::MissingCapability {
                capability: cap,
                detail: format!(
                    "this binary was built without the `{}` feature",
                    cap.tag()
                ),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Pdf2OfficeError;

    /// Parse a format name case-insensitively (`"PPTX"` → `Pptx`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "docx" => Ok(OutputFormat::Docx),
            "xlsx" => Ok(OutputFormat::Xlsx),
            "pptx" => Ok(OutputFormat::Pptx),
            _ => Err(Pdf2OfficeError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// An external library the conversion delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// PDFium shared library, bound at runtime.
    Pdfium,
    /// docx-rs writer (`docx` feature).
    Docx,
    /// rust_xlsxwriter writer (`xlsx` feature).
    Xlsx,
    /// OOXML presentation package writer (`pptx` feature).
    Pptx,
}

impl Capability {
    /// Short name used in the `MISSING:<tag>` stderr marker.
    pub fn tag(&self) -> &'static str {
        match self {
            Capability::Pdfium => "pdfium",
            Capability::Docx => "docx",
            Capability::Xlsx => "xlsx",
            Capability::Pptx => "pptx",
        }
    }

    /// Whether the writer for this capability is part of the current build.
    ///
    /// PDFium is never "compiled in"; its presence is decided when binding
    /// (see [`crate::pipeline::pdfium::PdfiumEngine::bind`]).
    pub fn is_compiled_in(&self) -> bool {
        match self {
            Capability::Pdfium => false,
            Capability::Docx => cfg!(feature = "docx"),
            Capability::Xlsx => cfg!(feature = "xlsx"),
            Capability::Pptx => cfg!(feature = "pptx"),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
