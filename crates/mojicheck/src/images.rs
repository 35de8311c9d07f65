//! Image XObjects drawn by a page, in drawing order.
//!
//! The same resource name can denote different images in different scopes:
//! each form XObject has its own `/Resources`, and producers commonly name
//! the image inside every form `/Im0`. Images are therefore identified by
//! the object id of their stream, found by walking the page content and the
//! forms it draws.

use std::collections::HashSet;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use mojicheck_core::{BBox, PageImage};
use tracing::warn;

use crate::error::BackendError;
use crate::objects::{inherited, resolve, resolve_dict};

/// Form XObjects nested deeper than this are not entered.
const MAX_FORM_DEPTH: usize = 8;

/// One `Do` of an image XObject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDraw {
    /// Resource name used by the `Do` operator.
    pub name: String,
    /// Object id of the image stream.
    pub id: ObjectId,
    /// Length of the encoded stream in bytes.
    pub byte_len: usize,
}

/// Every image XObject drawn by page `page_id`, including images drawn from
/// inside form XObjects, in drawing order.
///
/// Content streams lopdf cannot decode contribute no draws and are logged.
pub fn image_draws(doc: &Document, page_id: ObjectId) -> Result<Vec<ImageDraw>, BackendError> {
    let mut draws = Vec::new();
    let Some(resources) = inherited(doc, page_id, b"Resources")?.and_then(|r| resolve_dict(doc, r))
    else {
        return Ok(draws);
    };
    let page = doc.get_dictionary(page_id)?;
    let content = match page.get(b"Contents") {
        Ok(contents) => page_content(doc, contents),
        Err(_) => Vec::new(),
    };
    walk_content(doc, &content, resources, 0, &mut draws);
    Ok(draws)
}

/// Pair image placements (resource name and box, in drawing order) with the
/// draws of the same page.
///
/// Each placement takes the next unused draw with its name. Placements of
/// the same image stream are merged into one [`PageImage`], in first-seen
/// order. Names with no matching draw (inline images, unresolvable
/// resources) are returned once each, in first-seen order.
pub fn assign_placements<'a>(
    draws: &[ImageDraw],
    placements: impl IntoIterator<Item = (&'a str, BBox)>,
) -> (Vec<PageImage>, Vec<String>) {
    let mut images: Vec<(ObjectId, PageImage)> = Vec::new();
    let mut unresolved: Vec<String> = Vec::new();
    let mut seen_unresolved: HashSet<&str> = HashSet::new();
    let mut cursor = 0;

    for (name, bbox) in placements {
        let Some(offset) = draws[cursor..].iter().position(|d| d.name == name) else {
            if seen_unresolved.insert(name) {
                unresolved.push(name.to_string());
            }
            continue;
        };
        let draw = &draws[cursor + offset];
        cursor += offset + 1;
        match images.iter_mut().find(|(id, _)| *id == draw.id) {
            Some((_, known)) => known.placements.push(bbox),
            None => images.push((
                draw.id,
                PageImage {
                    name: draw.name.clone(),
                    byte_len: draw.byte_len,
                    placements: vec![bbox],
                },
            )),
        }
    }

    (images.into_iter().map(|(_, image)| image).collect(), unresolved)
}

fn walk_content(
    doc: &Document,
    content: &[u8],
    resources: &Dictionary,
    depth: usize,
    out: &mut Vec<ImageDraw>,
) {
    let operations = match Content::decode(content) {
        Ok(decoded) => decoded.operations,
        Err(e) => {
            warn!(error = %e, "cannot decode content stream, images in it are not sized");
            return;
        }
    };
    let xobjects = resources
        .get(b"XObject")
        .ok()
        .and_then(|x| resolve_dict(doc, x));

    for op in operations.iter().filter(|op| op.operator == "Do") {
        let Some(Object::Name(name)) = op.operands.first() else {
            continue;
        };
        let Some(Object::Reference(id)) = xobjects.and_then(|x| x.get(name).ok()) else {
            continue;
        };
        let Ok(stream) = doc.get_object(*id).and_then(Object::as_stream) else {
            continue;
        };
        match subtype(&stream.dict) {
            Some(b"Image") => out.push(ImageDraw {
                name: String::from_utf8_lossy(name).into_owned(),
                id: *id,
                byte_len: stream.content.len(),
            }),
            Some(b"Form") if depth < MAX_FORM_DEPTH => {
                let form_resources = stream
                    .dict
                    .get(b"Resources")
                    .ok()
                    .and_then(|r| resolve_dict(doc, r))
                    .unwrap_or(resources);
                walk_content(doc, &stream_bytes(stream), form_resources, depth + 1, out);
            }
            _ => {}
        }
    }
}

/// Concatenated bytes of the page's content stream(s).
fn page_content(doc: &Document, contents: &Object) -> Vec<u8> {
    match resolve(doc, contents) {
        Object::Stream(stream) => stream_bytes(stream),
        Object::Array(parts) => {
            let mut content = Vec::new();
            for part in parts {
                if let Ok(stream) = resolve(doc, part).as_stream() {
                    if !content.is_empty() {
                        content.push(b' ');
                    }
                    content.extend_from_slice(&stream_bytes(stream));
                }
            }
            content
        }
        _ => Vec::new(),
    }
}

/// Decoded stream data; undecodable filters leave the data as stored.
fn stream_bytes(stream: &Stream) -> Vec<u8> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone())
    } else {
        stream.content.clone()
    }
}

fn subtype(dict: &Dictionary) -> Option<&[u8]> {
    dict.get(b"Subtype").and_then(Object::as_name).ok()
}
