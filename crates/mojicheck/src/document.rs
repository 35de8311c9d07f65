//! An opened PDF seen through both backends.
//!
//! Words and image placements come from `pdfplumber`; page labels, the image
//! streams each page draws and page object ids come from `lopdf`. Both parse
//! the same file and must agree on the page count.

use std::path::Path;

use lopdf::ObjectId;
use mojicheck_core::{
    BBox, DefectError, DocumentSource, PageContent, PageLabels, TextToken, display_label,
};
use pdfplumber::{Pdf, WordOptions};
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::images::{assign_placements, image_draws};
use crate::labels::read_page_labels;

/// A PDF opened for scanning.
pub struct SourceDocument {
    pdf: Pdf,
    raw: lopdf::Document,
    page_ids: Vec<ObjectId>,
    labels: PageLabels,
}

impl SourceDocument {
    /// Open and parse the PDF at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the file cannot be read, either backend
    /// rejects it, or the backends disagree on the number of pages.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let pdf = Pdf::open_file(path, None).map_err(|e| BackendError::Extract(e.to_string()))?;
        let raw = lopdf::Document::load(path)?;
        let page_ids: Vec<ObjectId> = raw.get_pages().into_values().collect();
        if page_ids.len() != pdf.page_count() {
            return Err(BackendError::Malformed(format!(
                "page tree lists {} pages but {} were extracted",
                page_ids.len(),
                pdf.page_count()
            )));
        }
        let labels = read_page_labels(&raw)?;
        debug!(
            path = %path.display(),
            pages = page_ids.len(),
            labelled = !labels.is_empty(),
            "opened document"
        );
        Ok(Self {
            pdf,
            raw,
            page_ids,
            labels,
        })
    }

    /// The object-level view of the document.
    pub fn raw(&self) -> &lopdf::Document {
        &self.raw
    }

    /// Page object ids in page order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    fn read_page(&self, index: usize) -> Result<PageContent, BackendError> {
        let page_id = *self
            .page_ids
            .get(index)
            .ok_or(DefectError::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            })?;
        let page = self
            .pdf
            .page(index)
            .map_err(|e| BackendError::Extract(e.to_string()))?;

        let words = page
            .extract_words(&WordOptions::default())
            .into_iter()
            .map(|w| {
                let bbox = BBox::new(w.bbox.x0, w.bbox.top, w.bbox.x1, w.bbox.bottom);
                TextToken::new(w.text, bbox)
            })
            .collect();

        let draws = image_draws(&self.raw, page_id)?;
        let placed = page.images();
        let (images, unresolved) = assign_placements(
            &draws,
            placed.iter().map(|img| {
                let placement = BBox::new(img.x0, img.top, img.x1, img.bottom);
                (img.name.as_str(), placement)
            }),
        );
        for name in &unresolved {
            warn!(
                page = index,
                image = %name,
                "image stream not found in page content, skipping"
            );
        }

        let label = display_label(&self.labels.declared(index), index, self.page_ids.len());
        debug!(page = index, %label, images = images.len(), "read page");
        Ok(PageContent::new(index, label)
            .with_words(words)
            .with_images(images))
    }
}

impl DocumentSource for SourceDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, index: usize) -> Result<PageContent, DefectError> {
        Ok(self.read_page(index)?)
    }
}
