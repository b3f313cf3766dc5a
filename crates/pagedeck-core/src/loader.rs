//! Document ingestion
//!
//! Loading a file produces one [`SourceDocument`] and appends one page
//! entry per physical page, each with a thumbnail rendered once at a
//! fixed reduced width. Batches are processed sequentially so source
//! indices match upload order; a failing file contributes nothing, but
//! earlier successes in the same batch are kept.

use std::sync::Arc;

use lopdf::Document;

use crate::session::{Session, SourceDocument};
use crate::thumbnail::Thumbnail;
use crate::types::{EditorError, Result, SourceIndex};

/// The rendering collaborator: turns raw PDF bytes into preview
/// bitmaps. Kept behind a trait so the core never depends on a
/// particular rendering library.
pub trait PageRenderer {
    /// Render the 1-based `page_number` of `bytes` at thumbnail scale
    fn render_page(&self, bytes: &[u8], page_number: u32) -> Result<Thumbnail>;
}

/// Parse raw bytes into the assembly-side handle, returning the page
/// count alongside. Any parse failure is a load error.
pub fn parse_document(bytes: &[u8]) -> Result<(Document, u32)> {
    let document = Document::load_mem(bytes).map_err(|e| EditorError::Load(e.to_string()))?;
    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err(EditorError::Load("document contains no pages".to_string()));
    }
    Ok((document, page_count))
}

/// Load one file into the session: parse, render every page's
/// thumbnail, then append. The session is untouched unless every step
/// succeeds, so a failing file never leaves partial entries behind.
pub fn load_document(
    session: &mut Session,
    bytes: Vec<u8>,
    name: &str,
    renderer: &dyn PageRenderer,
) -> Result<SourceIndex> {
    let (document, page_count) = parse_document(&bytes)
        .map_err(|e| EditorError::Load(format!("{name}: {e}")))?;

    let mut thumbnails = Vec::with_capacity(page_count as usize);
    for page_number in 1..=page_count {
        thumbnails.push(Arc::new(renderer.render_page(&bytes, page_number)?));
    }

    let source = SourceDocument::from_parts(name.to_string(), Some(bytes), document)?;
    session.append_source(source, thumbnails)
}

/// Outcome of a multi-file load
pub struct BatchOutcome {
    pub loaded: Vec<SourceIndex>,
    pub failures: Vec<(String, EditorError)>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load several files in order. Not transactional across files: each
/// file either appends completely or not at all, and failures do not
/// roll back files loaded before them.
pub fn load_batch(
    session: &mut Session,
    files: Vec<(String, Vec<u8>)>,
    renderer: &dyn PageRenderer,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        loaded: Vec::new(),
        failures: Vec::new(),
    };
    for (name, bytes) in files {
        match load_document(session, bytes, &name, renderer) {
            Ok(index) => {
                log::info!(
                    "loaded {name} as source {} ({} pages)",
                    index.0,
                    session.source(index).map(|s| s.page_count()).unwrap_or(0)
                );
                outcome.loaded.push(index);
            }
            Err(e) => {
                log::warn!("skipping {name}: {e}");
                outcome.failures.push((name, e));
            }
        }
    }
    outcome
}
