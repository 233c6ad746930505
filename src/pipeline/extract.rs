//! Page extraction: turn an opened PDF into an ordered list of [`PageRecord`]s.
//!
//! The PDF engine is reached only through the two traits below, so the
//! extraction loop can run against an in-memory fake in tests and against
//! PDFium ([`crate::pipeline::pdfium::PdfiumEngine`]) in production.
//!
//! Opening returns a boxed [`PdfDocumentSource`]; dropping it closes the
//! document. Because the box lives on the stack of [`extract`], the handle
//! is released on every exit path, including a page failing half-way.

use crate::error::Pdf2OfficeError;
use crate::model::PageRecord;
use std::path::Path;
use tracing::{debug, info};

/// A PDF extraction capability: something that can open documents.
pub trait PdfEngine {
    /// Open the document at `path`.
    ///
    /// Errors are fatal and reported as [`Pdf2OfficeError::CorruptPdf`].
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfDocumentSource + 'a>, Pdf2OfficeError>;
}

/// An opened document. Dropping it releases the underlying handle.
pub trait PdfDocumentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Read page `index` (0-based): its text verbatim and every embedded
    /// raster image in the order the engine reports them.
    fn read_page(&self, index: usize) -> Result<PageRecord, Pdf2OfficeError>;
}

/// Extract every page of `pdf_path`, in document order.
pub fn extract(
    engine: &dyn PdfEngine,
    pdf_path: &Path,
) -> Result<Vec<PageRecord>, Pdf2OfficeError> {
    let document = engine.open(pdf_path)?;
    let total = document.page_count();
    info!("PDF loaded: {} pages", total);

    let mut pages = Vec::with_capacity(total);
    for idx in 0..total {
        let page = document.read_page(idx)?;
        debug!(
            "Extracted page {} → {} chars, {} images",
            idx + 1,
            page.text.chars().count(),
            page.images.len()
        );
        pages.push(page);
    }

    Ok(pages)
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory engine used by unit tests across the crate.

    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Serves a fixed list of pages; optionally fails on one page.
    pub struct FakeEngine {
        pub pages: Vec<PageRecord>,
        pub fail_on_page: Option<usize>,
        pub refuse_open: bool,
        pub open_handles: Rc<Cell<usize>>,
    }

    impl FakeEngine {
        pub fn new(pages: Vec<PageRecord>) -> Self {
            Self {
                pages,
                fail_on_page: None,
                refuse_open: false,
                open_handles: Rc::new(Cell::new(0)),
            }
        }
    }

    struct FakeDocument<'a> {
        engine: &'a FakeEngine,
    }

    impl Drop for FakeDocument<'_> {
        fn drop(&mut self) {
            let handles = &self.engine.open_handles;
            handles.set(handles.get() - 1);
        }
    }

    impl PdfEngine for FakeEngine {
        fn open<'a>(
            &'a self,
            path: &Path,
        ) -> Result<Box<dyn PdfDocumentSource + 'a>, Pdf2OfficeError> {
            if self.refuse_open {
                return Err(Pdf2OfficeError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: "not a PDF".into(),
                });
            }
            self.open_handles.set(self.open_handles.get() + 1);
            Ok(Box::new(FakeDocument { engine: self }))
        }
    }

    impl PdfDocumentSource for FakeDocument<'_> {
        fn page_count(&self) -> usize {
            self.engine.pages.len()
        }

        fn read_page(&self, index: usize) -> Result<PageRecord, Pdf2OfficeError> {
            if self.engine.fail_on_page == Some(index) {
                return Err(Pdf2OfficeError::PageExtractionFailed {
                    page: index + 1,
                    detail: "text layer unreadable".into(),
                });
            }
            Ok(self.engine.pages[index].clone())
        }
    }
}
