//! Small helpers for walking lopdf object graphs.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::BackendError;

/// Resolve an indirect reference, returning the referenced object.
///
/// Dangling references resolve to the reference itself.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Resolve `obj` and view it as a dictionary.
pub(crate) fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    resolve(doc, obj).as_dict().ok()
}

/// The document catalog (`/Root`).
pub(crate) fn catalog(doc: &Document) -> Result<&Dictionary, BackendError> {
    let root = doc
        .trailer
        .get(b"Root")
        .map_err(|_| BackendError::Malformed("trailer has no /Root".to_string()))?;
    resolve_dict(doc, root)
        .ok_or_else(|| BackendError::Malformed("/Root is not a dictionary".to_string()))
}

/// Look up a key in the page dictionary, walking up the page tree (via
/// /Parent) if the page does not carry it.
pub(crate) fn inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current = page_id;
    // Page trees deeper than this are treated as cyclic.
    for _ in 0..64 {
        let dict = doc.get_object(current)?.as_dict()?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent") {
            Ok(parent) => current = parent.as_reference()?,
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Malformed(format!(
        "page tree above object {} {} is too deep",
        page_id.0, page_id.1
    )))
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(*f as f64),
        _ => None,
    }
}

/// The page's MediaBox as `[x0, y0, x1, y1]`, normalized so x0 <= x1 and y0 <= y1.
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f64; 4], BackendError> {
    let obj = inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| BackendError::Malformed("page has no /MediaBox".to_string()))?;
    let values: Vec<f64> = resolve(doc, obj)
        .as_array()?
        .iter()
        .filter_map(|o| number(resolve(doc, o)))
        .collect();
    match values.as_slice() {
        [a, b, c, d] => Ok([a.min(*c), b.min(*d), a.max(*c), b.max(*d)]),
        _ => Err(BackendError::Malformed(format!(
            "expected 4 numbers in /MediaBox, got {}",
            values.len()
        ))),
    }
}

/// Decode a PDF text string: UTF-16BE when it starts with a BOM, otherwise
/// PDFDocEncoding (read as Latin-1).
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Encode a text string as UTF-16BE with BOM.
pub(crate) fn encode_text_string(text: &str) -> Vec<u8> {
    let mut out = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn text_string_round_trip_cjk() {
        let encoded = encode_text_string("2文字目「判夕」");
        assert_eq!(&encoded[..2], &[0xFE, 0xFF]);
        assert_eq!(decode_text_string(&encoded), "2文字目「判夕」");
    }

    #[test]
    fn text_string_latin1() {
        assert_eq!(decode_text_string(b"p."), "p.");
    }

    #[test]
    fn number_accepts_integer_and_real() {
        assert_eq!(number(&Object::Integer(7)), Some(7.0));
        assert_eq!(number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(number(&Object::Null), None);
    }

    #[test]
    fn media_box_is_inherited_from_parent() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ],
            }),
        );
        assert_eq!(media_box(&doc, page_id).unwrap(), [0.0, 0.0, 595.0, 842.0]);
    }

    #[test]
    fn missing_media_box_is_malformed() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! { "Type" => "Page" });
        assert!(matches!(
            media_box(&doc, page_id),
            Err(BackendError::Malformed(_))
        ));
    }
}
