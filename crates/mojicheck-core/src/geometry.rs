use serde::{Deserialize, Serialize};

/// Bounding box with top-left origin coordinate system.
///
/// Coordinates follow the extractor convention:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
///
/// Serialized as a `[x0, top, x1, bottom]` array, the shape the JSON report
/// uses for its `rect` field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Convert to PDF user space `[llx, lly, urx, ury]`.
    ///
    /// `page_height` is the MediaBox height the extractor flipped y against.
    pub fn to_pdf_rect(&self, page_height: f64) -> [f64; 4] {
        [
            self.x0,
            page_height - self.bottom,
            self.x1,
            page_height - self.top,
        ]
    }
}

impl From<[f64; 4]> for BBox {
    fn from(quad: [f64; 4]) -> Self {
        BBox::new(quad[0], quad[1], quad[2], quad[3])
    }
}

impl From<BBox> for [f64; 4] {
    fn from(bbox: BBox) -> Self {
        [bbox.x0, bbox.top, bbox.x1, bbox.bottom]
    }
}
