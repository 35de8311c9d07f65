//! Per-page content handed to the defect rules.

use crate::geometry::BBox;

/// A word-level text token with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextToken {
    pub text: String,
    pub bbox: BBox,
}

impl TextToken {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// A distinct image drawn on a page.
///
/// The same image may be placed several times; every placement rectangle is
/// listed in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    /// XObject name (e.g., "Im0").
    pub name: String,
    /// Length of the encoded image stream in bytes, before any filter decoding.
    pub byte_len: usize,
    pub placements: Vec<BBox>,
}

/// Everything the rules need to know about one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    /// 0-based page index.
    pub index: usize,
    /// Display label, computed once per page.
    pub label: String,
    pub words: Vec<TextToken>,
    pub images: Vec<PageImage>,
}

impl PageContent {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            words: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn with_words(mut self, words: Vec<TextToken>) -> Self {
        self.words = words;
        self
    }

    pub fn with_images(mut self, images: Vec<PageImage>) -> Self {
        self.images = images;
        self
    }
}
