//! Defect records produced by the rules and consumed by the report writer and
//! the annotator.

use serde::{Deserialize, Serialize};

use crate::geometry::BBox;

/// `char_position` value marking a record that is not a text defect.
pub const NOT_A_TEXT_POSITION: i64 = -1;

/// A single detected defect.
///
/// Field names on the wire follow the legacy report format
/// (`page_index`, `nombre`, `text`, `position`, `found`, `rect`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectRecord {
    /// 0-based index of the page in the source document.
    pub page_index: usize,
    /// Human-readable page identifier (declared label or `"003/150"` fallback).
    #[serde(rename = "nombre")]
    pub display_label: String,
    /// The whole text token for text defects, the size description for images.
    #[serde(rename = "text")]
    pub source_text: String,
    /// 0-based character offset of the match, or `-1` for image defects.
    #[serde(rename = "position")]
    pub char_position: i64,
    /// The matched substring. Empty for image defects.
    #[serde(rename = "found")]
    pub matched_value: String,
    /// Token or placement rectangle on the page.
    #[serde(rename = "rect")]
    pub bounding_box: BBox,
}

impl DefectRecord {
    /// A defect found inside a text token at character offset `char_position`.
    pub fn text(
        page_index: usize,
        display_label: impl Into<String>,
        source_text: impl Into<String>,
        char_position: usize,
        matched_value: impl Into<String>,
        bounding_box: BBox,
    ) -> Self {
        Self {
            page_index,
            display_label: display_label.into(),
            source_text: source_text.into(),
            char_position: char_position as i64,
            matched_value: matched_value.into(),
            bounding_box,
        }
    }

    /// A defect attached to an image placement.
    pub fn image(
        page_index: usize,
        display_label: impl Into<String>,
        size_description: impl Into<String>,
        bounding_box: BBox,
    ) -> Self {
        Self {
            page_index,
            display_label: display_label.into(),
            source_text: size_description.into(),
            char_position: NOT_A_TEXT_POSITION,
            matched_value: String::new(),
            bounding_box,
        }
    }

    /// Returns `true` for defects found in extracted text.
    pub fn is_text_defect(&self) -> bool {
        self.char_position != NOT_A_TEXT_POSITION
    }
}
