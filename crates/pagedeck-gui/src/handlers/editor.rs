use std::path::{Path, PathBuf};
use std::sync::Arc;

use pagedeck_core::{
    EditCommand, EditorError, PageRenderer, Session, SourceDocument, Thumbnail, assemble,
    parse_document, save_pdf, serialize, split,
};
use pagedeck_runtime::EditorUpdate;
use tokio::sync::mpsc;

use crate::renderer::PdfiumRenderer;

/// Load each file in order. Parsing and thumbnail rendering run on a
/// blocking thread and the session only sees the finished parts, so a
/// failing file appends nothing while earlier successes are kept.
pub async fn handle_load_files(
    paths: Vec<PathBuf>,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<EditorUpdate>,
) {
    let total = paths.len();
    let mut loaded = 0;
    let mut failed = 0;

    for (i, path) in paths.into_iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let _ = update_tx.send(EditorUpdate::Progress {
            operation: format!("Loading {name}"),
            current: i,
            total,
        });

        match load_one(&path, &name, update_tx).await {
            Ok((document, thumbnails, bytes)) => {
                let thumbnails = thumbnails.into_iter().map(Arc::new).collect();
                let appended = SourceDocument::from_parts(name.clone(), Some(bytes), document)
                    .and_then(|source| session.append_source(source, thumbnails));
                match appended {
                    Ok(index) => {
                        loaded += 1;
                        let page_count =
                            session.source(index).map(|s| s.page_count()).unwrap_or(0) as usize;
                        log::info!("loaded {name}: {page_count} pages");
                        let _ = update_tx.send(EditorUpdate::DocumentLoaded {
                            source: index,
                            name,
                            page_count,
                        });
                        let _ = update_tx.send(EditorUpdate::PagesChanged {
                            pages: session.snapshot(),
                        });
                    }
                    Err(e) => {
                        failed += 1;
                        let _ = update_tx.send(EditorUpdate::Error {
                            message: format!("{name}: {e}"),
                        });
                    }
                }
            }
            Err(e) => {
                failed += 1;
                log::warn!("skipping {name}: {e}");
                let _ = update_tx.send(EditorUpdate::Error {
                    message: format!("{name}: {e}"),
                });
            }
        }
    }

    let _ = update_tx.send(EditorUpdate::BatchLoadFinished { loaded, failed });
}

async fn load_one(
    path: &Path,
    name: &str,
    update_tx: &mpsc::UnboundedSender<EditorUpdate>,
) -> pagedeck_core::Result<(lopdf::Document, Vec<Thumbnail>, Vec<u8>)> {
    let bytes = tokio::fs::read(path).await?;
    let name = name.to_string();
    let progress_tx = update_tx.clone();

    tokio::task::spawn_blocking(move || {
        let (document, page_count) = parse_document(&bytes)?;
        let renderer = PdfiumRenderer::new()?;
        let mut thumbnails = Vec::with_capacity(page_count as usize);
        for page_number in 1..=page_count {
            let _ = progress_tx.send(EditorUpdate::Progress {
                operation: format!("Rendering {name}"),
                current: page_number as usize - 1,
                total: page_count as usize,
            });
            thumbnails.push(renderer.render_page(&bytes, page_number)?);
        }
        Ok::<_, EditorError>((document, thumbnails, bytes))
    })
    .await?
}

/// Apply one page-model edit and hand back a fresh snapshot
pub fn handle_edit(
    edit: EditCommand,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<EditorUpdate>,
) {
    log::debug!("applying {edit:?}");
    session.apply(edit);
    let _ = update_tx.send(EditorUpdate::PagesChanged {
        pages: session.snapshot(),
    });
}

/// Assemble the page model and write it out. The session is untouched
/// either way, so the user can retry after a failure.
pub async fn handle_save(
    output_path: PathBuf,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<EditorUpdate>,
) {
    let page_count = session.len();
    let result = match assemble(session) {
        Ok(document) => save_pdf(document, &output_path).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            log::info!("saved {page_count} pages to {}", output_path.display());
            let _ = update_tx.send(EditorUpdate::SaveComplete {
                path: output_path,
                page_count,
            });
        }
        Err(e) => {
            let _ = update_tx.send(EditorUpdate::Error {
                message: format!("Save failed: {e}"),
            });
        }
    }
}

pub async fn handle_split(
    at: usize,
    first_path: PathBuf,
    second_path: PathBuf,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<EditorUpdate>,
) {
    match split_and_write(at, &first_path, &second_path, session).await {
        Ok(()) => {
            log::info!(
                "split before page {at} into {} and {}",
                first_path.display(),
                second_path.display()
            );
            let _ = update_tx.send(EditorUpdate::SplitComplete {
                first_path,
                second_path,
            });
        }
        Err(e) => {
            let _ = update_tx.send(EditorUpdate::Error {
                message: format!("Split failed: {e}"),
            });
        }
    }
}

async fn split_and_write(
    at: usize,
    first_path: &Path,
    second_path: &Path,
    session: &Session,
) -> pagedeck_core::Result<()> {
    let (first, second) = split(session, at)?;
    // Serialize both parts before writing either, so a failure leaves
    // no partial output on disk.
    let (first_bytes, second_bytes) =
        tokio::task::spawn_blocking(move || Ok::<_, EditorError>((serialize(first)?, serialize(second)?)))
            .await??;
    tokio::fs::write(first_path, first_bytes).await?;
    tokio::fs::write(second_path, second_bytes).await?;
    Ok(())
}

/// Extract the text of every page in model order, with one header per
/// page position. Blank pages contribute an empty body.
pub async fn handle_extract_text(
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<EditorUpdate>,
) {
    if session.is_empty() {
        let _ = update_tx.send(EditorUpdate::Error {
            message: "Nothing to extract: no pages loaded".to_string(),
        });
        return;
    }

    let jobs: Vec<(Option<Arc<[u8]>>, u32)> = session
        .entries()
        .iter()
        .map(|e| {
            (
                session.source(e.source()).and_then(|s| s.render_bytes()),
                e.page_number(),
            )
        })
        .collect();

    let result = tokio::task::spawn_blocking(move || {
        let renderer = PdfiumRenderer::new()?;
        let mut out = String::new();
        for (i, (bytes, page_number)) in jobs.iter().enumerate() {
            out.push_str(&format!("--- Page {} ---\n", i + 1));
            if let Some(bytes) = bytes {
                out.push_str(renderer.page_text(bytes, *page_number)?.trim_end());
            }
            out.push_str("\n\n");
        }
        Ok::<_, EditorError>(out)
    })
    .await;

    match result {
        Ok(Ok(text)) => {
            let _ = update_tx.send(EditorUpdate::TextExtracted { text });
        }
        Ok(Err(e)) => {
            let _ = update_tx.send(EditorUpdate::Error {
                message: format!("Text extraction failed: {e}"),
            });
        }
        Err(e) => {
            let _ = update_tx.send(EditorUpdate::Error {
                message: format!("Task join error: {e}"),
            });
        }
    }
}
