//! Output document assembly
//!
//! Walks the page model in order, copies each referenced page out of
//! its source document into one fresh output document, and stamps the
//! entry's rotation as the absolute `/Rotate` value. The session is
//! never mutated; a failed assembly leaves everything retryable.

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::session::Session;
use crate::types::{EditorError, Result, SourceIndex};

/// Deterministic name offered for the assembled output
pub const DEFAULT_OUTPUT_NAME: &str = "edited.pdf";

/// Assemble the whole page model into one document
pub fn assemble(session: &Session) -> Result<Document> {
    assemble_entries(session, 0..session.len())
}

/// Assemble the model into two documents, split before entry `at`.
/// Refused before any work when the split point is not strictly inside
/// the sequence.
pub fn split(session: &Session, at: usize) -> Result<(Document, Document)> {
    let len = session.len();
    if len < 2 {
        return Err(EditorError::Validation(
            "need at least two pages to split".to_string(),
        ));
    }
    if at == 0 || at >= len {
        return Err(EditorError::Validation(format!(
            "split point must be between 1 and {}",
            len - 1
        )));
    }
    Ok((
        assemble_entries(session, 0..at)?,
        assemble_entries(session, at..len)?,
    ))
}

fn assemble_entries(session: &Session, range: Range<usize>) -> Result<Document> {
    let entries = &session.entries()[range];
    if entries.is_empty() {
        return Err(EditorError::NoPages);
    }

    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();

    // Import each referenced source into the output's object space
    // once, remembering where its pages landed.
    let mut imported: HashMap<SourceIndex, std::collections::BTreeMap<u32, ObjectId>> =
        HashMap::new();
    let mut max_id = output.max_id;
    for entry in entries {
        if imported.contains_key(&entry.source()) {
            continue;
        }
        let source = session.source(entry.source()).ok_or_else(|| {
            EditorError::Assembly(format!("source document {} is gone", entry.source().0))
        })?;
        let mut doc = source.document().clone();
        doc.renumber_objects_with(max_id + 1);
        max_id = doc.max_id;
        let pages = doc.get_pages();
        output.objects.extend(doc.objects);
        imported.insert(entry.source(), pages);
    }
    output.max_id = max_id;

    // One fresh page object per entry, in model order. Cloning the page
    // dictionary keeps duplicates and per-entry rotation independent
    // while still sharing content streams and resources.
    let mut kids = Vec::with_capacity(entries.len());
    for entry in entries {
        let page_id = imported[&entry.source()]
            .get(&entry.page_number())
            .copied()
            .ok_or_else(|| {
                EditorError::Assembly(format!(
                    "page {} not found in source {}",
                    entry.page_number(),
                    entry.source().0
                ))
            })?;
        let mut page_dict = output
            .get_dictionary(page_id)
            .map_err(|e| EditorError::Assembly(e.to_string()))?
            .clone();

        // Pull attributes inherited from the old page tree down onto
        // the copy; its new parent will not carry them.
        for key in [b"MediaBox".as_slice(), b"Resources".as_slice()] {
            if page_dict.get(key).is_err() {
                if let Some(value) = inherited_entry(&output, &page_dict, key) {
                    page_dict.set(key, value);
                }
            }
        }

        page_dict.set("Parent", Object::Reference(pages_tree_id));
        // Absolute rotation: the entry's value replaces whatever the
        // source page carried, including an explicit 0.
        page_dict.set("Rotate", Object::Integer(entry.rotation().degrees() as i64));

        let new_id = output.add_object(Object::Dictionary(page_dict));
        kids.push(Object::Reference(new_id));
    }

    let count = kids.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    // Imported catalogs and page trees are unreachable from the new
    // root; drop them before renumbering for a dense object table.
    output.prune_objects();
    output.renumber_objects();

    Ok(output)
}

/// Walk the `Parent` chain for an inheritable page attribute
fn inherited_entry(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = dict.get(b"Parent").and_then(Object::as_reference).ok();
    while let Some(id) = parent {
        let Ok(parent_dict) = doc.get_dictionary(id) else {
            break;
        };
        if let Ok(value) = parent_dict.get(key) {
            return Some(value.clone());
        }
        parent = parent_dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .ok();
    }
    None
}

/// Serialize to bytes. Nothing touches the filesystem here, so a
/// failure cannot leave a partial file behind.
pub fn serialize(mut document: Document) -> Result<Vec<u8>> {
    document.compress();
    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| EditorError::Assembly(e.to_string()))?;
    Ok(bytes)
}

/// Serialize off the async thread, then write in one shot
pub async fn save_pdf(document: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || serialize(document)).await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}
