//! Building and saving the annotated derivative document.
//!
//! The derivative is a copy of the source document whose page tree is
//! replaced by fresh copies of the planned pages. Objects the new tree no
//! longer reaches (other pages, outlines, forms) are pruned on save. Kept
//! annotations must not reach them either: links into pages that are not
//! copied and form field widgets are dropped.

use std::collections::HashMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, dictionary};
use mojicheck_core::{AnnotationPlan, DefectError, RectAnnotation};
use tracing::debug;

use crate::error::BackendError;
use crate::objects::{encode_text_string, inherited, media_box, resolve, resolve_dict};

/// Author shown by viewers in the annotation popup.
pub const ANNOTATION_TITLE: &str = "mojicheck";

/// Page attributes that may be inherited from the page tree and must be
/// copied onto a page once it hangs off a new parent.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Build the annotated document for `plan`.
///
/// `page_ids` are the source page object ids in page order, as returned by
/// [`Document::get_pages`]. The n-th planned page becomes page n of the
/// result, carrying its existing annotations plus one `/Square` annotation
/// per planned entry.
pub fn render_plan(
    source: &Document,
    page_ids: &[ObjectId],
    plan: &AnnotationPlan,
) -> Result<Document, BackendError> {
    let mut doc = source.clone();
    let pages_id = doc.new_object_id();
    let targets = plan
        .pages
        .iter()
        .map(|planned| -> Result<_, BackendError> {
            let source_id = *page_ids
                .get(planned.source_index)
                .ok_or(DefectError::PageOutOfRange {
                    index: planned.source_index,
                    count: page_ids.len(),
                })?;
            Ok((source_id, doc.new_object_id()))
        })
        .collect::<Result<Vec<(ObjectId, ObjectId)>, _>>()?;
    let copies: HashMap<ObjectId, ObjectId> = targets.iter().copied().collect();
    let mut kids = Vec::with_capacity(plan.pages.len());

    for (planned, &(source_id, page_id)) in plan.pages.iter().zip(&targets) {
        let page_height = {
            let [_, y0, _, y1] = media_box(source, source_id)?;
            y1 - y0
        };

        let mut page = detached_page(source, source_id)?;
        page.set("Parent", Object::Reference(pages_id));
        // Article beads thread through other pages.
        page.remove(b"B");

        let mut annots = carried_annotations(source, &mut doc, &page, &copies, page_id);
        for annotation in &planned.annotations {
            let annot = square_annotation(annotation, page_height, page_id);
            annots.push(Object::Reference(doc.add_object(annot)));
        }
        page.set("Annots", Object::Array(annots));

        debug!(
            source_page = planned.source_index,
            annotations = planned.annotations.len(),
            "copied page"
        );
        doc.objects.insert(page_id, Object::Dictionary(page));
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    Ok(doc)
}

/// Drop unreachable objects, renumber, compress and write `doc` to `path`.
pub fn save_document(mut doc: Document, path: &Path) -> Result<(), BackendError> {
    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();
    doc.save(path)?;
    Ok(())
}

/// A copy of the page dictionary with every inherited attribute made local.
fn detached_page(source: &Document, page_id: ObjectId) -> Result<Dictionary, BackendError> {
    let mut page = source.get_object(page_id)?.as_dict()?.clone();
    for key in INHERITABLE {
        if page.has(key) {
            continue;
        }
        if let Some(value) = inherited(source, page_id, key)? {
            page.set(key.to_vec(), value.clone());
        }
    }
    Ok(page)
}

fn existing_annotations(source: &Document, page: &Dictionary) -> Vec<Object> {
    page.get(b"Annots")
        .map(|annots| resolve(source, annots))
        .and_then(Object::as_array)
        .cloned()
        .unwrap_or_default()
}

/// The source page's annotations as they go onto the copy `page_id`.
///
/// Widgets belong to the interactive form, which is not copied. Links whose
/// destination is a page in `copies` are rewritten to the copy; links to any
/// other page of the document, or to a named destination, are dropped.
fn carried_annotations(
    source: &Document,
    doc: &mut Document,
    page: &Dictionary,
    copies: &HashMap<ObjectId, ObjectId>,
    page_id: ObjectId,
) -> Vec<Object> {
    let mut kept = Vec::new();
    for annot in existing_annotations(source, page) {
        let Some(dict) = resolve_dict(source, &annot) else {
            continue;
        };
        let subtype = dict.get(b"Subtype").and_then(Object::as_name).unwrap_or_default();
        match subtype {
            b"Widget" => debug!("dropping form field widget"),
            b"Link" => match relinked(source, dict, copies) {
                Some(mut link) => {
                    if link.has(b"P") {
                        link.set("P", Object::Reference(page_id));
                    }
                    kept.push(Object::Reference(doc.add_object(link)));
                }
                None => debug!("dropping link to a page that is not copied"),
            },
            _ => kept.push(annot),
        }
    }
    reparent_annotations(doc, &kept, page_id);
    kept
}

/// A copy of `link` pointing into the derivative, or `None` if it points at
/// a page that is not copied.
fn relinked(
    source: &Document,
    link: &Dictionary,
    copies: &HashMap<ObjectId, ObjectId>,
) -> Option<Dictionary> {
    let mut link = link.clone();
    let dest = match link.get(b"Dest") {
        Ok(dest) => Some(copied_destination(source, dest, copies)?),
        Err(_) => None,
    };
    if let Some(dest) = dest {
        link.set("Dest", dest);
    }

    let action = link
        .get(b"A")
        .ok()
        .and_then(|a| resolve_dict(source, a))
        .cloned();
    if let Some(mut action) = action {
        // Chained actions are not followed.
        action.remove(b"Next");
        if matches!(action.get(b"S").and_then(Object::as_name), Ok(b"GoTo")) {
            let dest = copied_destination(source, action.get(b"D").ok()?, copies)?;
            action.set("D", dest);
        }
        link.set("A", Object::Dictionary(action));
    }
    Some(link)
}

/// An explicit destination (`[page /XYZ ...]`) retargeted to the copied page.
fn copied_destination(
    source: &Document,
    dest: &Object,
    copies: &HashMap<ObjectId, ObjectId>,
) -> Option<Object> {
    let mut dest = resolve(source, dest).as_array().ok()?.clone();
    let target = dest.first()?.as_reference().ok()?;
    let copy = *copies.get(&target)?;
    dest[0] = Object::Reference(copy);
    Some(Object::Array(dest))
}

/// Point the `/P` entry of kept annotations at the copied page so the
/// original page becomes unreachable and is pruned.
fn reparent_annotations(doc: &mut Document, annots: &[Object], page_id: ObjectId) {
    for annot in annots {
        let Object::Reference(id) = annot else { continue };
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(*id) {
            if dict.has(b"P") {
                dict.set("P", Object::Reference(page_id));
            }
        }
    }
}

fn square_annotation(
    annotation: &RectAnnotation,
    page_height: f64,
    page_id: ObjectId,
) -> Dictionary {
    let reals = |values: &[f64]| -> Vec<Object> {
        values.iter().map(|v| Object::Real(*v as f32)).collect()
    };
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Square",
        "Rect" => reals(&annotation.rect.to_pdf_rect(page_height)),
        "C" => reals(&annotation.stroke.components()),
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(1)],
        // Print flag.
        "F" => Object::Integer(4),
        "P" => Object::Reference(page_id),
        "T" => Object::String(encode_text_string(ANNOTATION_TITLE), StringFormat::Hexadecimal),
        "Contents" => Object::String(encode_text_string(&annotation.note), StringFormat::Hexadecimal),
    }
}
