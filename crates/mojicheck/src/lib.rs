//! mojicheck: Find anomalous CJK characters and oversized images in PDF
//! documents and write an annotated copy of the offending pages.
//!
//! This is the PDF-facing crate. It reads documents through `pdfplumber`
//! (words and image placements) and `lopdf` (page labels, encoded image
//! sizes, page copying) and hands the pages to the rules in
//! [`mojicheck_core`].
//!
//! # Architecture
//!
//! - **mojicheck-core**: Backend-independent rules, records, report and
//!   annotation plan
//! - **mojicheck** (this crate): Document access, annotated output and the
//!   per-file scan
//! - **mojicheck-cli**: The `mojicheck` command

pub mod annotate;
pub mod document;
pub mod error;
pub mod images;
pub mod labels;
mod objects;
pub mod scan;

pub use annotate::{ANNOTATION_TITLE, render_plan, save_document};
pub use document::SourceDocument;
pub use error::BackendError;
pub use images::{ImageDraw, assign_placements, image_draws};
pub use labels::read_page_labels;
pub use mojicheck_core;
pub use mojicheck_core::{
    AnnotationPlan, BBox, DefectError, DefectRecord, OutputPaths, RuleSet, read_report,
};
pub use scan::{ScanOutcome, scan_file};
