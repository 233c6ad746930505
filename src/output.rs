//! Per-run results: what was written and which images were dropped.

use crate::format::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How an image ended up in the output, or why it did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Inserted straight from the in-memory payload.
    EmbeddedFromMemory,
    /// Inserted from a temporary file after the in-memory attempt failed
    /// (or, for spreadsheets, because files are the only accepted form).
    EmbeddedFromFile,
    /// Both paths failed; the image is missing from the output.
    Skipped(String),
}

impl ImageOutcome {
    pub fn is_embedded(&self) -> bool {
        !matches!(self, ImageOutcome::Skipped(_))
    }
}

/// An image that could not be embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSkip {
    /// 1-indexed page number.
    pub page: usize,
    /// 0-indexed position of the image on its page.
    pub index: usize,
    /// Last error seen while trying to embed it.
    pub reason: String,
}

/// Summary of one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub format: OutputFormat,
    pub output_path: PathBuf,
    /// Pages in the source document.
    pub pages: usize,
    /// Slides emitted (pptx only; 0 for other formats).
    pub slides: usize,
    pub images_embedded: usize,
    pub images_skipped: usize,
    /// Details for every skipped image.
    pub skipped: Vec<ImageSkip>,
    pub extract_duration_ms: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl ConversionReport {
    /// Empty report for `format` writing to `output_path`.
    pub fn new(format: OutputFormat, output_path: impl Into<PathBuf>, pages: usize) -> Self {
        Self {
            format,
            output_path: output_path.into(),
            pages,
            slides: 0,
            images_embedded: 0,
            images_skipped: 0,
            skipped: Vec::new(),
            extract_duration_ms: 0,
            render_duration_ms: 0,
            total_duration_ms: 0,
        }
    }

    /// Record the outcome of one image-insertion attempt.
    pub fn record_image(&mut self, page: usize, index: usize, outcome: ImageOutcome) {
        match outcome {
            ImageOutcome::EmbeddedFromMemory | ImageOutcome::EmbeddedFromFile => {
                self.images_embedded += 1;
            }
            ImageOutcome::Skipped(reason) => {
                self.images_skipped += 1;
                self.skipped.push(ImageSkip {
                    page,
                    index,
                    reason,
                });
            }
        }
    }
}
