//! Extracted document content: one [`PageRecord`] per source page.

use serde::{Deserialize, Serialize};

/// Extension reported when the engine gives no format hint.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// One raster image embedded in a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Encoded image payload.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Lowercase format hint such as `png` or `jpeg`.
    pub extension: String,
}

impl ImageAsset {
    /// Create an asset, normalising the extension hint.
    ///
    /// An empty or missing hint becomes [`DEFAULT_IMAGE_EXTENSION`]; a
    /// leading dot is dropped and the result is lowercased.
    pub fn new(bytes: Vec<u8>, extension: Option<&str>) -> Self {
        let extension = extension
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string());
        Self { bytes, extension }
    }

    /// PNG payload.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, Some("png"))
    }
}

/// Text and images of one source page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Plain text exactly as the engine produced it. May be empty.
    pub text: String,
    /// Images in order of appearance on the page. May be empty.
    pub images: Vec<ImageAsset>,
}

impl PageRecord {
    pub fn new(text: impl Into<String>, images: Vec<ImageAsset>) -> Self {
        Self {
            text: text.into(),
            images,
        }
    }

    /// A page with text and no images.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }
}

/// Join every page's text with a blank line, in page order.
///
/// Shared by the text and spreadsheet renderers.
pub fn joined_text(pages: &[PageRecord]) -> String {
    pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_defaults_to_png() {
        assert_eq!(ImageAsset::new(vec![1], None).extension, "png");
        assert_eq!(ImageAsset::new(vec![1], Some("")).extension, "png");
        assert_eq!(ImageAsset::new(vec![1], Some(".JPEG")).extension, "jpeg");
    }

    #[test]
    fn joined_text_uses_blank_line() {
        let pages = vec![
            PageRecord::text_only("first"),
            PageRecord::text_only(""),
            PageRecord::text_only("third"),
        ];
        assert_eq!(joined_text(&pages), "first\n\n\n\nthird");
        assert_eq!(joined_text(&[]), "");
    }
}
