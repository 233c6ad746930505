//! Input validation: make sure the user-supplied path names an existing file.
//!
//! Existence is checked once, up front, before the PDF engine is bound or
//! any output is touched, so a typo in the path always yields exit code 3
//! and never a half-written output file. Whether the file is really a PDF is
//! left to the engine: an unreadable document surfaces later as
//! [`Pdf2OfficeError::CorruptPdf`].

use crate::error::Pdf2OfficeError;
use std::path::Path;
use tracing::debug;

/// Check that `path` exists and is not a directory.
pub fn validate_input(path: &Path) -> Result<(), Pdf2OfficeError> {
    if !path.is_file() {
        return Err(Pdf2OfficeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(())
}
