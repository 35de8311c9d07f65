//! Reading the `/PageLabels` number tree of a document.

use lopdf::{Document, Object};
use mojicheck_core::{LabelRange, LabelStyle, PageLabels};
use tracing::warn;

use crate::error::BackendError;
use crate::objects::{catalog, decode_text_string, resolve, resolve_dict};

/// Number trees nested deeper than this are treated as cyclic.
const MAX_TREE_DEPTH: usize = 32;

/// Read the declared page labels of `doc`.
///
/// Returns empty labels when the catalog has no `/PageLabels` entry.
/// Malformed entries are skipped with a warning rather than failing the scan.
pub fn read_page_labels(doc: &Document) -> Result<PageLabels, BackendError> {
    let Ok(root) = catalog(doc)?.get(b"PageLabels") else {
        return Ok(PageLabels::default());
    };
    let mut ranges = Vec::new();
    walk_number_tree(doc, root, 0, &mut ranges);
    Ok(PageLabels::new(ranges))
}

fn walk_number_tree(doc: &Document, node: &Object, depth: usize, out: &mut Vec<LabelRange>) {
    if depth > MAX_TREE_DEPTH {
        warn!("/PageLabels tree deeper than {MAX_TREE_DEPTH} levels, ignoring the rest");
        return;
    }
    let Some(dict) = resolve_dict(doc, node) else {
        warn!("/PageLabels node is not a dictionary");
        return;
    };

    if let Ok(nums) = dict.get(b"Nums").map(|o| resolve(doc, o)) {
        if let Ok(nums) = nums.as_array() {
            for pair in nums.chunks_exact(2) {
                let start = resolve(doc, &pair[0]).as_i64().ok();
                match (start, resolve_dict(doc, &pair[1])) {
                    (Some(start), Some(label)) if start >= 0 => {
                        out.push(parse_label(doc, start as usize, label));
                    }
                    _ => warn!("skipping malformed /PageLabels entry"),
                }
            }
        }
    }

    if let Ok(kids) = dict.get(b"Kids").map(|o| resolve(doc, o)) {
        if let Ok(kids) = kids.as_array() {
            for kid in kids {
                walk_number_tree(doc, kid, depth + 1, out);
            }
        }
    }
}

fn parse_label(doc: &Document, start_page: usize, dict: &lopdf::Dictionary) -> LabelRange {
    let style = match dict.get(b"S").map(|o| resolve(doc, o)) {
        Ok(Object::Name(name)) => LabelStyle::from_name(&String::from_utf8_lossy(name)),
        _ => LabelStyle::None,
    };
    let mut range = LabelRange::new(start_page, style);
    if let Ok(Object::String(bytes, _)) = dict.get(b"P").map(|o| resolve(doc, o)) {
        range = range.with_prefix(decode_text_string(bytes));
    }
    if let Ok(start) = dict.get(b"St").and_then(|o| resolve(doc, o).as_i64()) {
        match u32::try_from(start) {
            Ok(start) if start > 0 => range = range.with_start_value(start),
            _ => warn!(start, "ignoring out-of-range /St in /PageLabels"),
        }
    }
    range
}
