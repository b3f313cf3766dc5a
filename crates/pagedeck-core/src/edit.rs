//! Structural edits on the page model
//!
//! Every operation is synchronous and atomic with respect to the
//! session; the caller re-renders from a fresh snapshot afterwards.
//! Stale ids (from clicks racing a re-render) and boundary moves are
//! deliberate no-ops rather than errors.

use std::sync::Arc;

use lopdf::{Dictionary, Document, Object, Stream};

use crate::session::{PageEntry, Session, SourceDocument};
use crate::thumbnail::{THUMBNAIL_WIDTH, Thumbnail};
use crate::types::{PageId, SourceIndex};

/// Blank page dimensions in points (US Letter)
const BLANK_PAGE_WIDTH_PT: f32 = 612.0;
const BLANK_PAGE_HEIGHT_PT: f32 = 792.0;

/// A user intent mapped onto one page-model transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    MoveUp(PageId),
    MoveDown(PageId),
    /// Drag-and-drop outcome: remove at `from`, reinsert at `to`
    Reorder {
        from: usize,
        to: usize,
    },
    Rotate(PageId),
    RotateAll,
    Delete(PageId),
    Duplicate(PageId),
    InsertBlank,
    ClearAll,
    SetSelected {
        id: PageId,
        on: bool,
    },
    RotateSelected,
    DeleteSelected,
}

impl Session {
    /// Dispatch one edit command
    pub fn apply(&mut self, command: EditCommand) {
        match command {
            EditCommand::MoveUp(id) => self.move_up(id),
            EditCommand::MoveDown(id) => self.move_down(id),
            EditCommand::Reorder { from, to } => self.reorder(from, to),
            EditCommand::Rotate(id) => self.rotate(id),
            EditCommand::RotateAll => self.rotate_all(),
            EditCommand::Delete(id) => self.delete(id),
            EditCommand::Duplicate(id) => self.duplicate(id),
            EditCommand::InsertBlank => self.insert_blank(),
            EditCommand::ClearAll => self.clear_all(),
            EditCommand::SetSelected { id, on } => self.set_selected(id, on),
            EditCommand::RotateSelected => self.rotate_selected(),
            EditCommand::DeleteSelected => self.delete_selected(),
        }
    }

    /// Swap the entry with its predecessor; no-op for the first entry
    pub fn move_up(&mut self, id: PageId) {
        if let Some(pos) = self.position_of(id) {
            if pos > 0 {
                self.entries.swap(pos, pos - 1);
            }
        }
    }

    /// Swap the entry with its successor; no-op for the last entry
    pub fn move_down(&mut self, id: PageId) {
        if let Some(pos) = self.position_of(id) {
            if pos + 1 < self.entries.len() {
                self.entries.swap(pos, pos + 1);
            }
        }
    }

    /// Remove the entry at `from` and reinsert it at `to`. No-op when
    /// the indices match or either is out of range.
    pub fn reorder(&mut self, from: usize, to: usize) {
        let len = self.entries.len();
        if from == to || from >= len || to >= len {
            return;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
    }

    /// One more quarter turn clockwise for this entry only
    pub fn rotate(&mut self, id: PageId) {
        if let Some(pos) = self.position_of(id) {
            let entry = &mut self.entries[pos];
            entry.rotation = entry.rotation.clockwise();
        }
    }

    pub fn rotate_all(&mut self) {
        for entry in &mut self.entries {
            entry.rotation = entry.rotation.clockwise();
        }
    }

    /// Remove the entry. Deleting the last remaining entry is allowed
    /// and leaves the model empty.
    pub fn delete(&mut self, id: PageId) {
        self.entries.retain(|e| e.id != id);
    }

    /// Insert a copy directly after the original. The copy gets a fresh
    /// id but shares the original's thumbnail; nothing is re-rendered.
    pub fn duplicate(&mut self, id: PageId) {
        let Some(pos) = self.position_of(id) else {
            return;
        };
        let new_id = self.next_page_id();
        let original = &self.entries[pos];
        let copy = PageEntry {
            id: new_id,
            source: original.source,
            page_number: original.page_number,
            rotation: original.rotation,
            selected: false,
            thumbnail: Arc::clone(&original.thumbnail),
        };
        self.entries.insert(pos + 1, copy);
    }

    /// Append a blank US Letter page backed by a fresh synthetic source
    /// document, with a placeholder preview instead of a rendered one.
    pub fn insert_blank(&mut self) {
        let index = SourceIndex(self.sources.len());
        self.sources.push(SourceDocument {
            name: "Blank page".to_string(),
            render_bytes: None,
            document: blank_document(),
            page_count: 1,
        });

        let id = self.next_page_id();
        let height =
            (THUMBNAIL_WIDTH as f32 * BLANK_PAGE_HEIGHT_PT / BLANK_PAGE_WIDTH_PT).round() as u32;
        self.entries.push(PageEntry {
            id,
            source: index,
            page_number: 1,
            rotation: crate::types::Rotation::None,
            selected: false,
            thumbnail: Arc::new(Thumbnail::placeholder(THUMBNAIL_WIDTH, height)),
        });
    }

    pub fn set_selected(&mut self, id: PageId, on: bool) {
        if let Some(pos) = self.position_of(id) {
            self.entries[pos].selected = on;
        }
    }

    pub fn rotate_selected(&mut self) {
        for entry in &mut self.entries {
            if entry.selected {
                entry.rotation = entry.rotation.clockwise();
            }
        }
    }

    pub fn delete_selected(&mut self) {
        self.entries.retain(|e| !e.selected);
    }
}

/// A complete one-page document with an empty content stream, used as
/// the source for inserted blank pages so the assembler can treat them
/// like any other page.
fn blank_document() -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(BLANK_PAGE_WIDTH_PT),
                Object::Real(BLANK_PAGE_HEIGHT_PT),
            ]),
        ),
        ("Resources", Object::Dictionary(Dictionary::new())),
        ("Contents", Object::Reference(content_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}
