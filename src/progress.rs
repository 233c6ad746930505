//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the renderer walks through the extracted pages.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2office::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, units: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} done ({} units)", page_num, total_pages, units);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the renderers as they process each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Conversion is single-threaded, but the trait is
/// `Send + Sync` so one callback can be shared with a UI thread.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first page is rendered.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page is rendered.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page is rendered.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages
    /// * `units`       — output units produced for the page: paragraphs for
    ///   docx, slides for pptx, images for xlsx, characters for txt
    fn on_page_complete(&self, page_num: usize, total_pages: usize, units: usize) {
        let _ = (page_num, total_pages, units);
    }

    /// Called when an image could not be embedded and was dropped.
    ///
    /// # Arguments
    /// * `page_num` — 1-indexed page number
    /// * `index`    — 0-indexed image position on the page
    /// * `reason`   — human-readable error description
    fn on_image_skipped(&self, page_num: usize, index: usize, reason: &str) {
        let _ = (page_num, index, reason);
    }

    /// Called once after the output file has been saved.
    fn on_conversion_complete(&self, total_pages: usize, images_skipped: usize) {
        let _ = (total_pages, images_skipped);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        skips: AtomicUsize,
        started_total: AtomicUsize,
        final_skipped: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _units: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_skipped(&self, _page_num: usize, _index: usize, _reason: &str) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _total_pages: usize, images_skipped: usize) {
            self.final_skipped.store(images_skipped, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_start(1, 5);
        cb.on_page_complete(1, 5, 42);
        cb.on_image_skipped(2, 0, "bad image");
        cb.on_conversion_complete(5, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(2);
        tracker.on_page_start(1, 2);
        tracker.on_page_complete(1, 2, 3);
        tracker.on_page_start(2, 2);
        tracker.on_image_skipped(2, 0, "decode failed");
        tracker.on_page_complete(2, 2, 1);
        tracker.on_conversion_complete(2, 1);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.skips.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.final_skipped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_page_start(1, 10);
        cb.on_page_complete(1, 10, 512);
    }
}
