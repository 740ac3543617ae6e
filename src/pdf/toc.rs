use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};

/// One node of the outline (bookmark) tree.
#[derive(Debug, Clone)]
pub struct OutlineItem {
    pub title: String,
    pub page: Option<u32>,
    pub depth: u32,
    pub children: Vec<OutlineItem>,
}

/// A flattened outline entry, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// 1 for top-level bookmarks.
    pub depth: u32,
    pub title: String,
    /// 1-based page number, `None` when the destination can't be resolved.
    pub page: Option<u32>,
}

impl TocEntry {
    pub fn new(depth: u32, title: impl Into<String>, page: Option<u32>) -> Self {
        TocEntry {
            depth,
            title: title.into(),
            page,
        }
    }
}

// Guards against reference chains that loop back on themselves.
const MAX_REFERENCE_HOPS: usize = 32;

/// Read the outline tree of a loaded document.
pub fn extract_outline(doc: &Document) -> Result<Vec<OutlineItem>> {
    let catalog = doc
        .catalog()
        .with_context(|| "Failed to get document catalog")?;

    let outlines = match catalog.get(b"Outlines") {
        Ok(obj) => match resolve(doc, obj) {
            Some(Object::Dictionary(d)) => d,
            _ => return Ok(Vec::new()),
        },
        Err(_) => return Ok(Vec::new()), // No outlines/bookmarks
    };

    let first_ref = match outlines.get(b"First") {
        Ok(Object::Reference(r)) => *r,
        _ => return Ok(Vec::new()),
    };

    let page_map = build_page_map(doc);
    let mut visited = HashSet::new();

    Ok(parse_outline_items(doc, first_ref, &page_map, 1, &mut visited))
}

/// Read the outline and flatten it depth-first, parents before children.
pub fn extract_toc(doc: &Document) -> Result<Vec<TocEntry>> {
    let items = extract_outline(doc)?;
    Ok(flatten_outline(&items))
}

fn parse_outline_items(
    doc: &Document,
    first_id: ObjectId,
    page_map: &HashMap<ObjectId, u32>,
    depth: u32,
    visited: &mut HashSet<ObjectId>,
) -> Vec<OutlineItem> {
    let mut items = Vec::new();
    let mut current_id = Some(first_id);

    while let Some(id) = current_id {
        if !visited.insert(id) {
            break;
        }

        let dict = match doc.get_dictionary(id) {
            Ok(d) => d,
            Err(_) => break,
        };

        let title = match dict.get(b"Title").ok().and_then(|t| resolve(doc, t)) {
            Some(Object::String(bytes, _)) => decode_pdf_string(bytes),
            _ => String::new(),
        };

        let page = get_destination_page(doc, dict, page_map);

        let children = match dict.get(b"First") {
            Ok(Object::Reference(child_ref)) => {
                parse_outline_items(doc, *child_ref, page_map, depth + 1, visited)
            }
            _ => Vec::new(),
        };

        items.push(OutlineItem {
            title,
            page,
            depth,
            children,
        });

        current_id = match dict.get(b"Next") {
            Ok(Object::Reference(r)) => Some(*r),
            _ => None,
        };
    }

    items
}

fn get_destination_page(
    doc: &Document,
    dict: &Dictionary,
    page_map: &HashMap<ObjectId, u32>,
) -> Option<u32> {
    if let Ok(dest) = dict.get(b"Dest") {
        return resolve_destination(doc, dest, page_map, 0);
    }

    // GoTo action, either inline or by reference
    let action = match dict.get(b"A").ok().and_then(|a| resolve(doc, a)) {
        Some(Object::Dictionary(action)) => action,
        _ => return None,
    };
    match action.get(b"S") {
        Ok(Object::Name(kind)) if kind == b"GoTo" => {
            let dest = action.get(b"D").ok()?;
            resolve_destination(doc, dest, page_map, 0)
        }
        _ => None,
    }
}

fn resolve_destination(
    doc: &Document,
    dest: &Object,
    page_map: &HashMap<ObjectId, u32>,
    hops: usize,
) -> Option<u32> {
    if hops > MAX_REFERENCE_HOPS {
        return None;
    }

    match dest {
        Object::String(name, _) | Object::Name(name) => {
            resolve_named_destination(doc, name, page_map, hops)
        }
        Object::Array(arr) => get_page_from_dest_array(arr, page_map),
        // Named destination values may be wrapped as << /D [...] >>
        Object::Dictionary(d) => {
            let inner = d.get(b"D").ok()?;
            resolve_destination(doc, inner, page_map, hops + 1)
        }
        Object::Reference(r) => {
            let obj = doc.get_object(*r).ok()?;
            resolve_destination(doc, obj, page_map, hops + 1)
        }
        _ => None,
    }
}

fn resolve_named_destination(
    doc: &Document,
    name: &[u8],
    page_map: &HashMap<ObjectId, u32>,
    hops: usize,
) -> Option<u32> {
    let catalog = doc.catalog().ok()?;

    // Names/Dests name tree (PDF 1.2+)
    if let Some(Object::Dictionary(names_dict)) =
        catalog.get(b"Names").ok().and_then(|n| resolve(doc, n))
    {
        if let Some(Object::Dictionary(root)) =
            names_dict.get(b"Dests").ok().and_then(|d| resolve(doc, d))
        {
            let mut seen = HashSet::new();
            if let Some(dest) = search_name_tree(doc, root, name, &mut seen) {
                return resolve_destination(doc, dest, page_map, hops + 1);
            }
        }
    }

    // Dests dictionary (PDF 1.1)
    if let Some(Object::Dictionary(dests)) =
        catalog.get(b"Dests").ok().and_then(|d| resolve(doc, d))
    {
        if let Ok(dest) = dests.get(name) {
            return resolve_destination(doc, dest, page_map, hops + 1);
        }
    }

    None
}

fn search_name_tree<'a>(
    doc: &'a Document,
    node: &'a Dictionary,
    name: &[u8],
    seen: &mut HashSet<ObjectId>,
) -> Option<&'a Object> {
    // Leaf node: [key1 value1 key2 value2 ...]
    if let Ok(Object::Array(names)) = node.get(b"Names") {
        for pair in names.chunks(2) {
            if let [Object::String(key, _), value] = pair {
                if key == name {
                    return Some(value);
                }
            }
        }
    }

    if let Ok(Object::Array(kids)) = node.get(b"Kids") {
        for kid in kids {
            let Object::Reference(kid_ref) = kid else {
                continue;
            };
            if !seen.insert(*kid_ref) {
                continue;
            }
            if let Ok(kid_dict) = doc.get_dictionary(*kid_ref) {
                if let Some(found) = search_name_tree(doc, kid_dict, name, seen) {
                    return Some(found);
                }
            }
        }
    }

    None
}

fn get_page_from_dest_array(arr: &[Object], page_map: &HashMap<ObjectId, u32>) -> Option<u32> {
    // [page_ref /XYZ left top zoom], or [page_index /Fit] in some producers
    match arr.first()? {
        Object::Reference(page_ref) => page_map.get(page_ref).copied(),
        Object::Integer(index) => {
            let page = u32::try_from(*index).ok()?.checked_add(1)?;
            (page as usize <= page_map.len()).then_some(page)
        }
        _ => None,
    }
}

fn build_page_map(doc: &Document) -> HashMap<ObjectId, u32> {
    doc.get_pages()
        .into_iter()
        .map(|(num, id)| (id, num))
        .collect()
}

fn resolve<'a>(doc: &'a Document, mut obj: &'a Object) -> Option<&'a Object> {
    for _ in 0..MAX_REFERENCE_HOPS {
        match obj {
            Object::Reference(r) => obj = doc.get_object(*r).ok()?,
            _ => return Some(obj),
        }
    }
    None
}

pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        // PDFDocEncoding / Latin-1 (simplified)
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Flatten outline items into `(depth, title, page)` entries.
pub fn flatten_outline(items: &[OutlineItem]) -> Vec<TocEntry> {
    let mut result = Vec::new();
    flatten_recursive(items, &mut result);
    result
}

fn flatten_recursive(items: &[OutlineItem], result: &mut Vec<TocEntry>) {
    for item in items {
        result.push(TocEntry::new(item.depth, item.title.clone(), item.page));
        flatten_recursive(&item.children, result);
    }
}
