//! Grouping of defect records into annotated pages.
//!
//! The annotated document holds one page per distinct offending source page,
//! in the order the pages first appear in the record list. Because records
//! are already page-ordered, grouping is a run-length pass, not a sort: the
//! n-th group becomes the n-th page of the annotated document.

use crate::geometry::BBox;
use crate::record::DefectRecord;

/// Stroke colour as RGB components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
    pub const RED: Rgb = Rgb(1.0, 0.0, 0.0);
    pub const BLUE: Rgb = Rgb(0.0, 0.0, 1.0);

    pub fn components(&self) -> [f64; 3] {
        [self.0, self.1, self.2]
    }
}

/// A run of records sharing one `page_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup<'a> {
    pub page_index: usize,
    pub records: &'a [DefectRecord],
}

/// Split `records` into runs of equal `page_index`, preserving order.
pub fn group_by_page(records: &[DefectRecord]) -> Vec<PageGroup<'_>> {
    records
        .chunk_by(|a, b| a.page_index == b.page_index)
        .map(|run| PageGroup {
            page_index: run[0].page_index,
            records: run,
        })
        .collect()
}

/// One rectangle annotation to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RectAnnotation {
    pub rect: BBox,
    pub stroke: Rgb,
    pub note: String,
}

impl RectAnnotation {
    /// Derive the annotation for a record.
    ///
    /// Text defects are stroked red with the note
    /// `"{position+1}文字目「{found}」"`; image defects are stroked blue with
    /// the size description as note.
    pub fn for_record(record: &DefectRecord) -> Self {
        if record.is_text_defect() {
            Self {
                rect: record.bounding_box,
                stroke: Rgb::RED,
                note: format!(
                    "{}文字目「{}」",
                    record.char_position + 1,
                    record.matched_value
                ),
            }
        } else {
            Self {
                rect: record.bounding_box,
                stroke: Rgb::BLUE,
                note: record.source_text.clone(),
            }
        }
    }
}

/// A source page to copy, with the annotations to draw on the copy.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPage {
    /// 0-based index of the page in the source document.
    pub source_index: usize,
    pub annotations: Vec<RectAnnotation>,
}

/// The full content of the annotated document, page by page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPlan {
    pub pages: Vec<PlannedPage>,
}

impl AnnotationPlan {
    pub fn from_records(records: &[DefectRecord]) -> Self {
        let pages = group_by_page(records)
            .into_iter()
            .map(|group| PlannedPage {
                source_index: group.page_index,
                annotations: group.records.iter().map(RectAnnotation::for_record).collect(),
            })
            .collect();
        Self { pages }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of annotations across all pages.
    pub fn annotation_count(&self) -> usize {
        self.pages.iter().map(|p| p.annotations.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_record(page: usize, pos: usize, found: &str) -> DefectRecord {
        DefectRecord::text(page, "x", found, pos, found, BBox::new(1.0, 2.0, 3.0, 4.0))
    }

    fn image_record(page: usize) -> DefectRecord {
        DefectRecord::image(page, "x", "7.00MB", BBox::new(0.0, 0.0, 100.0, 80.0))
    }

    #[test]
    fn groups_contiguous_runs() {
        let records = vec![
            text_record(0, 0, "⼀"),
            text_record(0, 1, "判夕"),
            text_record(4, 0, "⼈"),
            image_record(7),
            image_record(7),
        ];
        let groups = group_by_page(&records);
        let shape: Vec<(usize, usize)> = groups.iter().map(|g| (g.page_index, g.records.len())).collect();
        assert_eq!(shape, vec![(0, 2), (4, 1), (7, 2)]);
    }

    #[test]
    fn empty_records_give_empty_plan() {
        assert!(group_by_page(&[]).is_empty());
        assert!(AnnotationPlan::from_records(&[]).is_empty());
    }

    #[test]
    fn text_note_is_one_based() {
        let a = RectAnnotation::for_record(&text_record(0, 1, "判夕"));
        assert_eq!(a.note, "2文字目「判夕」");
        assert_eq!(a.stroke, Rgb::RED);
    }

    #[test]
    fn image_note_is_size_description() {
        let a = RectAnnotation::for_record(&image_record(2));
        assert_eq!(a.note, "7.00MB");
        assert_eq!(a.stroke, Rgb::BLUE);
        assert_eq!(a.rect, BBox::new(0.0, 0.0, 100.0, 80.0));
    }

    #[test]
    fn plan_has_one_page_per_offending_page_in_order() {
        let records = vec![
            text_record(1, 0, "⼀"),
            text_record(3, 0, "⼀"),
            text_record(3, 2, "判夕"),
            image_record(9),
        ];
        let plan = AnnotationPlan::from_records(&records);
        let sources: Vec<usize> = plan.pages.iter().map(|p| p.source_index).collect();
        assert_eq!(sources, vec![1, 3, 9]);
        assert_eq!(plan.annotation_count(), records.len());
    }

    #[test]
    fn every_record_maps_to_one_annotation() {
        let records = vec![text_record(0, 0, "⼀"), text_record(0, 1, "判夕")];
        let plan = AnnotationPlan::from_records(&records);
        let flat: Vec<&RectAnnotation> = plan.pages.iter().flat_map(|p| &p.annotations).collect();
        assert_eq!(flat.len(), records.len());
        for (record, annot) in records.iter().zip(flat) {
            assert_eq!(annot.rect, record.bounding_box);
            assert_eq!(*annot, RectAnnotation::for_record(record));
        }
    }
}
