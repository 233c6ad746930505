//! Configuration types for PDF-to-office conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults are the stock layout
//! (900-character slide chunks, 18 pt text, 9-inch images, images every 20
//! rows in spreadsheets); the CLI never changes them.

use crate::error::Pdf2OfficeError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for a PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2office::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .slide_char_budget(600)
///     .build()
///     .unwrap();
/// assert_eq!(config.slide_char_budget, 600);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Explicit path to the PDFium shared library.
    ///
    /// When `None`, the engine is looked up next to the working directory
    /// first and then through the system library search path.
    pub pdfium_library: Option<PathBuf>,

    /// Maximum characters per slide text chunk. Default: 900.
    ///
    /// Chunks only break between paragraphs, so a single paragraph longer
    /// than this still lands on one slide.
    pub slide_char_budget: usize,

    /// Characters kept per slide paragraph; the rest is cut. Default: 10 000.
    pub slide_paragraph_limit: usize,

    /// Font size of slide text boxes, in points. Default: 18.
    pub slide_font_size_pt: u32,

    /// Display width of slide images, in inches. Default: 9.0.
    pub slide_image_width_in: f64,

    /// Left/top offset of slide images and text boxes, in inches. Default: 0.5.
    pub slide_margin_in: f64,

    /// Rows between consecutive images on a `Page_N` sheet. Default: 20.
    ///
    /// Spreadsheet rows do not grow around pictures, so images are spaced
    /// far enough apart that typical extracted figures do not overlap.
    pub sheet_image_row_stride: u32,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            pdfium_library: None,
            slide_char_budget: 900,
            slide_paragraph_limit: 10_000,
            slide_font_size_pt: 18,
            slide_image_width_in: 9.0,
            slide_margin_in: 0.5,
            sheet_image_row_stride: 20,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("pdfium_library", &self.pdfium_library)
            .field("slide_char_budget", &self.slide_char_budget)
            .field("slide_paragraph_limit", &self.slide_paragraph_limit)
            .field("slide_font_size_pt", &self.slide_font_size_pt)
            .field("slide_image_width_in", &self.slide_image_width_in)
            .field("slide_margin_in", &self.slide_margin_in)
            .field("sheet_image_row_stride", &self.sheet_image_row_stride)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn slide_char_budget(mut self, chars: usize) -> Self {
        self.config.slide_char_budget = chars;
        self
    }

    pub fn slide_paragraph_limit(mut self, chars: usize) -> Self {
        self.config.slide_paragraph_limit = chars;
        self
    }

    pub fn slide_font_size_pt(mut self, pt: u32) -> Self {
        self.config.slide_font_size_pt = pt;
        self
    }

    pub fn slide_image_width_in(mut self, inches: f64) -> Self {
        self.config.slide_image_width_in = inches;
        self
    }

    pub fn slide_margin_in(mut self, inches: f64) -> Self {
        self.config.slide_margin_in = inches;
        self
    }

    pub fn sheet_image_row_stride(mut self, rows: u32) -> Self {
        self.config.sheet_image_row_stride = rows;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2OfficeError> {
        let c = &self.config;
        if c.slide_char_budget == 0 {
            return Err(Pdf2OfficeError::InvalidConfig(
                "Slide character budget must be ≥ 1".into(),
            ));
        }
        if c.slide_paragraph_limit == 0 {
            return Err(Pdf2OfficeError::InvalidConfig(
                "Slide paragraph limit must be ≥ 1".into(),
            ));
        }
        if c.slide_font_size_pt == 0 || c.slide_font_size_pt > 400 {
            return Err(Pdf2OfficeError::InvalidConfig(format!(
                "Slide font size must be 1–400 pt, got {}",
                c.slide_font_size_pt
            )));
        }
        if !(c.slide_image_width_in.is_finite() && c.slide_image_width_in > 0.0) {
            return Err(Pdf2OfficeError::InvalidConfig(format!(
                "Slide image width must be positive, got {}",
                c.slide_image_width_in
            )));
        }
        if !(c.slide_margin_in.is_finite() && c.slide_margin_in >= 0.0) {
            return Err(Pdf2OfficeError::InvalidConfig(format!(
                "Slide margin must be ≥ 0, got {}",
                c.slide_margin_in
            )));
        }
        if c.sheet_image_row_stride == 0 {
            return Err(Pdf2OfficeError::InvalidConfig(
                "Sheet image row stride must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
