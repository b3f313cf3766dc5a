//! Page-model editing core for Pagedeck
//!
//! A session holds source PDF documents plus one flat, reorderable
//! sequence of page entries referencing into them. Edits mutate the
//! sequence only; the assembler re-serializes it into a fresh output
//! document in model order.

pub mod assemble;
mod edit;
pub mod loader;
mod session;
mod thumbnail;
mod types;

pub use assemble::{DEFAULT_OUTPUT_NAME, assemble, save_pdf, serialize, split};
pub use edit::EditCommand;
pub use loader::{BatchOutcome, PageRenderer, load_batch, load_document, parse_document};
pub use session::{PageEntry, PageSnapshot, Session, SourceDocument};
pub use thumbnail::{THUMBNAIL_WIDTH, Thumbnail};
pub use types::{EditorError, PageId, Result, Rotation, SourceIndex};
