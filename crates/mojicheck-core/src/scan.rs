//! The page scanner: feeds every page of a document through a [`RuleSet`].

use crate::error::DefectError;
use crate::page::PageContent;
use crate::record::DefectRecord;
use crate::rules::RuleSet;

/// A document that can hand out the content of its pages.
///
/// Implemented by the PDF backend; tests use in-memory documents.
pub trait DocumentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Words, images and display label of the page at `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns [`DefectError`] if the index is out of range or the page
    /// content cannot be extracted.
    fn page(&self, index: usize) -> Result<PageContent, DefectError>;
}

/// Scan every page in document order and accumulate the defects found.
///
/// An empty result means the document is clean; it is not an error.
///
/// # Errors
///
/// Propagates the first page extraction failure.
pub fn collect_defects<D: DocumentSource + ?Sized>(
    doc: &D,
    rules: &RuleSet,
) -> Result<Vec<DefectRecord>, DefectError> {
    let mut records = Vec::new();
    for index in 0..doc.page_count() {
        let page = doc.page(index)?;
        records.extend(rules.inspect(&page));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;
    use crate::label::display_label;
    use crate::page::{PageImage, TextToken};
    use crate::rules::OVERSIZED_IMAGE_BYTES;

    struct MemoryDocument {
        pages: Vec<PageContent>,
    }

    impl MemoryDocument {
        fn from_words(pages: &[&[&str]]) -> Self {
            let total = pages.len();
            let pages = pages
                .iter()
                .enumerate()
                .map(|(i, words)| {
                    PageContent::new(i, display_label("", i, total)).with_words(
                        words
                            .iter()
                            .map(|w| TextToken::new(*w, BBox::new(10.0, 10.0, 60.0, 22.0)))
                            .collect(),
                    )
                })
                .collect();
            Self { pages }
        }
    }

    impl DocumentSource for MemoryDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page(&self, index: usize) -> Result<PageContent, DefectError> {
            self.pages
                .get(index)
                .cloned()
                .ok_or(DefectError::PageOutOfRange {
                    index,
                    count: self.pages.len(),
                })
        }
    }

    struct BrokenDocument;

    impl DocumentSource for BrokenDocument {
        fn page_count(&self) -> usize {
            2
        }

        fn page(&self, index: usize) -> Result<PageContent, DefectError> {
            Err(DefectError::Parse(format!("bad content stream on page {index}")))
        }
    }

    #[test]
    fn clean_document_yields_no_records() {
        let doc = MemoryDocument::from_words(&[&["hello"], &["world"]]);
        let records = collect_defects(&doc, &RuleSet::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn records_follow_page_order() {
        let doc = MemoryDocument::from_words(&[&["判夕"], &[], &["⼀", "判夕"]]);
        let records = collect_defects(&doc, &RuleSet::default()).unwrap();
        let pages: Vec<usize> = records.iter().map(|r| r.page_index).collect();
        assert_eq!(pages, vec![0, 2, 2]);
        assert_eq!(records[1].matched_value, "⼀");
        assert_eq!(records[2].matched_value, "判夕");
    }

    #[test]
    fn records_carry_display_label() {
        let doc = MemoryDocument::from_words(&[&[], &[], &["⼀判夕手"]]);
        let records = collect_defects(&doc, &RuleSet::default()).unwrap();
        assert!(records.iter().all(|r| r.display_label == "003/003"));
    }

    #[test]
    fn scenario_single_word_on_first_page() {
        let doc = MemoryDocument::from_words(&[&["⼀判夕手"], &[], &[]]);
        let records = collect_defects(&doc, &RuleSet::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].matched_value.as_str(), records[0].char_position), ("⼀", 0));
        assert_eq!((records[1].matched_value.as_str(), records[1].char_position), ("判夕", 1));
        assert!(records.iter().all(|r| r.page_index == 0));
    }

    #[test]
    fn image_defects_are_collected() {
        let mut doc = MemoryDocument::from_words(&[&[], &[]]);
        doc.pages[1].images.push(PageImage {
            name: "Im1".to_string(),
            byte_len: OVERSIZED_IMAGE_BYTES + 1,
            placements: vec![BBox::new(0.0, 0.0, 100.0, 100.0)],
        });
        let records = collect_defects(&doc, &RuleSet::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].page_index, 1);
        assert!(!records[0].is_text_defect());
    }

    #[test]
    fn extraction_failure_propagates() {
        let result = collect_defects(&BrokenDocument, &RuleSet::default());
        assert!(matches!(result, Err(DefectError::Parse(_))));
    }
}
