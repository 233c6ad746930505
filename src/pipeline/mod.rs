//! Pipeline stages shared by every output format.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ (renderer) ──▶ file
//! (path)    (pdfium)     chunk / embed
//! ```
//!
//! 1. [`input`]   — check the user-supplied path names an existing file
//! 2. [`extract`] — open the PDF through a [`extract::PdfEngine`] and read
//!    every page into a [`crate::model::PageRecord`]
//! 3. [`pdfium`]  — the production engine, bound to PDFium at runtime
//! 4. [`chunk`]   — cut page text into slide-sized chunks
//! 5. [`embed`]   — memory-first, temp-file-fallback image insertion used by
//!    the office renderers

pub mod chunk;
pub mod embed;
pub mod extract;
pub mod input;
pub mod pdfium;
