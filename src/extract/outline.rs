//! Document outline (bookmarks) flattened into a table of contents.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use super::objects::{get, get_dict, get_text, resolve};
use super::types::TocEntry;

/// Guards against malformed outlines whose sibling or child chains loop.
const MAX_ENTRIES: usize = 10_000;
const MAX_DEPTH: usize = 64;

/// Read the outline tree depth-first into a flat list.
///
/// Returns an empty list when the document has no outline.
pub fn read_toc(doc: &Document) -> Vec<TocEntry> {
    let Ok(catalog) = doc.catalog() else {
        return Vec::new();
    };
    let Some(outlines) = get_dict(doc, catalog, b"Outlines") else {
        return Vec::new();
    };

    let page_numbers: HashMap<ObjectId, usize> = doc
        .get_pages()
        .into_iter()
        .map(|(number, id)| (id, number as usize))
        .collect();

    let mut toc = Vec::new();
    walk_siblings(doc, outlines, 1, &page_numbers, &mut toc);
    toc
}

fn walk_siblings(
    doc: &Document,
    parent: &Dictionary,
    level: usize,
    pages: &HashMap<ObjectId, usize>,
    out: &mut Vec<TocEntry>,
) {
    if level > MAX_DEPTH {
        return;
    }
    let mut next = get_dict(doc, parent, b"First");
    while let Some(item) = next {
        if out.len() >= MAX_ENTRIES {
            log::warn!("extract: outline truncated at {MAX_ENTRIES} entries");
            return;
        }
        out.push(TocEntry {
            level,
            title: get_text(doc, item, b"Title").unwrap_or_default(),
            page: destination_page(doc, item, pages),
        });
        walk_siblings(doc, item, level + 1, pages, out);
        next = get_dict(doc, item, b"Next");
    }
}

/// Resolve `/Dest` or the `/D` of a GoTo action to a 1-based page number.
fn destination_page(
    doc: &Document,
    item: &Dictionary,
    pages: &HashMap<ObjectId, usize>,
) -> Option<usize> {
    let dest = get(doc, item, b"Dest").or_else(|| {
        let action = get_dict(doc, item, b"A")?;
        get(doc, action, b"D")
    })?;

    let target = match dest {
        Object::Array(parts) => parts.first()?,
        // Named destinations would need the /Dests name tree; not resolved.
        _ => return None,
    };
    match target {
        Object::Reference(id) => pages.get(id).copied(),
        // Remote-style destinations carry a zero-based page index.
        other => match resolve(doc, other)? {
            Object::Integer(i) if *i >= 0 => Some(*i as usize + 1),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, StringFormat};

    fn title(text: &str) -> Object {
        Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
    }

    /// Two pages; outline "Intro" → page 1 with child "Details" → page 2,
    /// then sibling "End" without a destination.
    fn document_with_outline() -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page1 = doc.add_object(dictionary! { "Type" => "Page", "Parent" => pages_id });
        let page2 = doc.add_object(dictionary! { "Type" => "Page", "Parent" => pages_id });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page1.into(), page2.into()],
                "Count" => 2,
            }),
        );

        let outlines_id = doc.new_object_id();
        let intro_id = doc.new_object_id();
        let details_id = doc.new_object_id();
        let end_id = doc.new_object_id();

        doc.objects.insert(
            details_id,
            Object::Dictionary(dictionary! {
                "Title" => title("Details"),
                "Parent" => intro_id,
                "Dest" => vec![page2.into(), "Fit".into()],
            }),
        );
        doc.objects.insert(
            intro_id,
            Object::Dictionary(dictionary! {
                "Title" => title("Intro"),
                "Parent" => outlines_id,
                "First" => details_id,
                "Last" => details_id,
                "Next" => end_id,
                "A" => dictionary! { "S" => "GoTo", "D" => vec![page1.into(), "Fit".into()] },
            }),
        );
        doc.objects.insert(
            end_id,
            Object::Dictionary(dictionary! {
                "Title" => title("End"),
                "Parent" => outlines_id,
            }),
        );
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => intro_id,
                "Last" => end_id,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "Outlines" => outlines_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn flattens_outline_depth_first() {
        let toc = read_toc(&document_with_outline());
        assert_eq!(
            toc,
            vec![
                TocEntry { level: 1, title: "Intro".into(), page: Some(1) },
                TocEntry { level: 2, title: "Details".into(), page: Some(2) },
                TocEntry { level: 1, title: "End".into(), page: None },
            ]
        );
    }

    #[test]
    fn no_outline_is_empty() {
        let mut doc = Document::with_version("1.5");
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog" });
        doc.trailer.set("Root", catalog_id);
        assert!(read_toc(&doc).is_empty());
    }
}
