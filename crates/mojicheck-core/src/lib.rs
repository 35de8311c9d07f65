//! mojicheck-core: Backend-independent defect rules, records and reporting.
//!
//! This crate provides the data model ([`DefectRecord`], [`PageContent`],
//! [`BBox`]), the defect rules ([`RuleSet`]), the page scanner
//! ([`collect_defects`]), the JSON report writer and the grouping of records
//! into annotated pages ([`AnnotationPlan`]). It knows nothing about PDF
//! files: a backend provides pages through [`DocumentSource`].

pub mod annotation;
pub mod error;
pub mod geometry;
pub mod label;
pub mod page;
pub mod record;
pub mod report;
pub mod rules;
pub mod scan;

pub use annotation::{AnnotationPlan, PageGroup, PlannedPage, RectAnnotation, Rgb, group_by_page};
pub use error::DefectError;
pub use geometry::BBox;
pub use label::{LabelRange, LabelStyle, PageLabels, display_label};
pub use page::{PageContent, PageImage, TextToken};
pub use record::{DefectRecord, NOT_A_TEXT_POSITION};
pub use report::{OutputPaths, read_report, report_to_string, write_report};
pub use rules::{
    DefectRule, KANGXI_RADICALS, KangxiRadicalMatcher, LiteralMatcher, MOJIBAKE_SEQUENCE,
    OVERSIZED_IMAGE_BYTES, OversizedImageRule, RuleSet, TextDefectRule, TokenMatch, TokenMatcher,
    size_description,
};
pub use scan::{DocumentSource, collect_defects};
