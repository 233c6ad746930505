//! PDFium-backed [`PdfEngine`]: binding, text extraction, image extraction.
//!
//! ## Binding
//!
//! PDFium is a shared library loaded at runtime. [`PdfiumEngine::bind`] is
//! the startup availability check: it tries an explicit library path when
//! one is configured, otherwise the platform library name in the working
//! directory, then the system library search path. Failure is reported as
//! [`Pdf2OfficeError::MissingCapability`] (`MISSING:pdfium`, exit code 2)
//! rather than a panic, which is what `Pdfium::default()` would do.
//!
//! ## Images
//!
//! pdfium hands back decoded pixels for each image object, not the original
//! compressed stream, so every extracted image is re-encoded as PNG with the
//! `image` crate. Images drawn inside form XObjects are included.

use crate::error::Pdf2OfficeError;
use crate::format::Capability;
use crate::model::{ImageAsset, PageRecord};
use crate::pipeline::embed::encode_png;
use crate::pipeline::extract::{PdfDocumentSource, PdfEngine};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PDF extraction capability backed by a bound PDFium library.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind to PDFium.
    ///
    /// With `library = Some(path)` only that file is tried. Otherwise the
    /// platform library name in `./` is tried first, then the system library.
    pub fn bind(library: Option<&Path>) -> Result<Self, Pdf2OfficeError> {
        let bindings = match library {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| Pdf2OfficeError::MissingCapability {
            capability: Capability::Pdfium,
            detail: format!("{:?}", e),
        })?;

        info!("PDFium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PdfEngine for PdfiumEngine {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfDocumentSource + 'a>, Pdf2OfficeError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Pdf2OfficeError::CorruptPdf {
                path: path.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

        Ok(Box::new(PdfiumDocument {
            document,
            path: path.to_path_buf(),
        }))
    }
}

/// An open PDFium document. Dropping it closes the document.
struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
}

impl PdfDocumentSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn read_page(&self, index: usize) -> Result<PageRecord, Pdf2OfficeError> {
        let page_num = index + 1;
        let page_failed = |e: PdfiumError| Pdf2OfficeError::PageExtractionFailed {
            page: page_num,
            detail: format!("{:?}", e),
        };

        let page_index = PdfPageIndex::try_from(index).map_err(|_| {
            Pdf2OfficeError::PageExtractionFailed {
                page: page_num,
                detail: format!("page index out of range for '{}'", self.path.display()),
            }
        })?;
        let page = self.document.pages().get(page_index).map_err(page_failed)?;

        let text = page.text().map_err(page_failed)?.all();

        let mut images = Vec::new();
        for object in page.objects().iter() {
            collect_images(&object, page_num, 0, &mut images);
        }

        Ok(PageRecord::new(text, images))
    }
}

/// Form XObjects nested deeper than this are not searched for images.
const MAX_FORM_DEPTH: usize = 16;

/// Append the images drawn by `object` to `images`, in drawing order.
///
/// Image objects are re-encoded as PNG. Form XObjects are walked
/// recursively.
fn collect_images(
    object: &PdfPageObject<'_>,
    page_num: usize,
    depth: usize,
    images: &mut Vec<ImageAsset>,
) {
    if let Some(image_object) = object.as_image_object() {
        match image_object.get_raw_image() {
            Ok(raw) => match encode_png(&raw) {
                Ok(bytes) => images.push(ImageAsset::png(bytes)),
                Err(e) => debug!("Page {}: image could not be PNG-encoded: {}", page_num, e),
            },
            Err(e) => debug!("Page {}: image has no decodable pixels: {:?}", page_num, e),
        }
    } else if let Some(form) = object.as_x_object_form_object() {
        if depth >= MAX_FORM_DEPTH {
            debug!("Page {}: form XObjects nested too deep, skipping", page_num);
            return;
        }
        for child in form.iter() {
            collect_images(&child, page_num, depth + 1, images);
        }
    }
}
