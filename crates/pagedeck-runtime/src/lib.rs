use std::path::PathBuf;

// Re-export types from the core library
pub use pagedeck_core::{
    EditCommand, EditorError, PageId, PageSnapshot, Rotation, SourceIndex, Thumbnail,
};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum EditorCommand {
    /// Load one or more PDF files, sequentially, in the given order
    LoadFiles {
        paths: Vec<PathBuf>,
    },
    /// Apply one page-model edit
    Edit(EditCommand),
    /// Assemble the page model and write it to `output_path`
    Save {
        output_path: PathBuf,
    },
    /// Assemble two documents, split before entry `at`
    Split {
        at: usize,
        first_path: PathBuf,
        second_path: PathBuf,
    },
    /// Extract the text of every page in model order
    ExtractText,
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum EditorUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    DocumentLoaded {
        source: SourceIndex,
        name: String,
        page_count: usize,
    },
    /// A batch of [`EditorCommand::LoadFiles`] finished; failures were
    /// already reported individually as [`EditorUpdate::Error`]s
    BatchLoadFinished {
        loaded: usize,
        failed: usize,
    },
    /// The page model changed; re-render from this snapshot
    PagesChanged {
        pages: Vec<PageSnapshot>,
    },
    SaveComplete {
        path: PathBuf,
        page_count: usize,
    },
    SplitComplete {
        first_path: PathBuf,
        second_path: PathBuf,
    },
    TextExtracted {
        text: String,
    },
    Error {
        message: String,
    },
}
