use std::sync::Arc;

use lopdf::Document;

use crate::thumbnail::Thumbnail;
use crate::types::{EditorError, PageId, Result, Rotation, SourceIndex};

/// A loaded PDF held in its two collaborator representations: raw bytes
/// for the rendering library and a parsed [`Document`] for assembly.
/// Read-only once created; the assembler only ever derives copies.
pub struct SourceDocument {
    pub(crate) name: String,
    /// Bytes handed to the rendering collaborator. `None` for documents
    /// synthesized in-session (inserted blank pages).
    pub(crate) render_bytes: Option<Arc<[u8]>>,
    pub(crate) document: Document,
    pub(crate) page_count: u32,
}

impl SourceDocument {
    /// Build from an already-parsed document. Fails on zero-page input,
    /// which would otherwise produce an entry-less source.
    pub fn from_parts(name: String, render_bytes: Option<Vec<u8>>, document: Document) -> Result<Self> {
        let page_count = document.get_pages().len() as u32;
        if page_count == 0 {
            return Err(EditorError::Load(format!("{name}: document contains no pages")));
        }
        Ok(Self {
            name,
            render_bytes: render_bytes.map(Arc::from),
            document,
            page_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn render_bytes(&self) -> Option<Arc<[u8]>> {
        self.render_bytes.clone()
    }

    /// True for sources created in-session rather than loaded from a file
    pub fn is_synthetic(&self) -> bool {
        self.render_bytes.is_none()
    }
}

/// One logical page in the working sequence
pub struct PageEntry {
    pub(crate) id: PageId,
    pub(crate) source: SourceIndex,
    pub(crate) page_number: u32,
    pub(crate) rotation: Rotation,
    pub(crate) selected: bool,
    pub(crate) thumbnail: Arc<Thumbnail>,
}

impl PageEntry {
    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn source(&self) -> SourceIndex {
        self.source
    }

    /// 1-based page number within the source document's original page set
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn thumbnail(&self) -> &Arc<Thumbnail> {
        &self.thumbnail
    }
}

/// Immutable per-entry view handed to the presentation layer after
/// every mutation
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub id: PageId,
    pub label: String,
    pub rotation: Rotation,
    pub selected: bool,
    pub thumbnail: Arc<Thumbnail>,
}

/// One editing session: the loaded source documents plus the ordered
/// page model. Owned by a single worker; all mutations run to
/// completion before the next command is processed.
#[derive(Default)]
pub struct Session {
    pub(crate) sources: Vec<SourceDocument>,
    pub(crate) entries: Vec<PageEntry>,
    pub(crate) next_page_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn source(&self, index: SourceIndex) -> Option<&SourceDocument> {
        self.sources.get(index.0)
    }

    pub fn sources(&self) -> &[SourceDocument] {
        &self.sources
    }

    pub(crate) fn next_page_id(&mut self) -> PageId {
        let id = PageId(self.next_page_id);
        self.next_page_id += 1;
        id
    }

    pub(crate) fn position_of(&self, id: PageId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Register a source document and append one entry per physical
    /// page, in physical order, each starting unrotated. `thumbnails`
    /// must hold exactly one preview per page.
    pub fn append_source(
        &mut self,
        source: SourceDocument,
        thumbnails: Vec<Arc<Thumbnail>>,
    ) -> Result<SourceIndex> {
        if thumbnails.len() != source.page_count as usize {
            return Err(EditorError::Validation(format!(
                "{}: got {} thumbnails for {} pages",
                source.name,
                thumbnails.len(),
                source.page_count
            )));
        }

        let index = SourceIndex(self.sources.len());
        self.sources.push(source);
        for (i, thumbnail) in thumbnails.into_iter().enumerate() {
            let id = self.next_page_id();
            self.entries.push(PageEntry {
                id,
                source: index,
                page_number: i as u32 + 1,
                rotation: Rotation::None,
                selected: false,
                thumbnail,
            });
        }
        Ok(index)
    }

    /// Current page model in order, for the presentation layer
    pub fn snapshot(&self) -> Vec<PageSnapshot> {
        self.entries
            .iter()
            .map(|entry| {
                let label = match self.source(entry.source) {
                    Some(s) if s.is_synthetic() => s.name.clone(),
                    Some(s) => format!("{} p.{}", s.name, entry.page_number),
                    None => format!("p.{}", entry.page_number),
                };
                PageSnapshot {
                    id: entry.id,
                    label,
                    rotation: entry.rotation,
                    selected: entry.selected,
                    thumbnail: Arc::clone(&entry.thumbnail),
                }
            })
            .collect()
    }

    /// Tear down the page model and every source document together, and
    /// restart the id counter as in a fresh session.
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.sources.clear();
        self.next_page_id = 0;
    }
}
