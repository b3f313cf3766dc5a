use pagedeck_core::Session;
use pagedeck_runtime::{EditorCommand, EditorUpdate};
use tokio::sync::mpsc;

use crate::handlers;

/// Async worker task that owns the editing session and processes
/// commands strictly in arrival order. Loads and edits share the one
/// queue, so a load can never interleave with a page-model mutation.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<EditorCommand>,
    update_tx: mpsc::UnboundedSender<EditorUpdate>,
) {
    let mut session = Session::new();

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut session, &update_tx).await;
    }
}

async fn process_command(
    cmd: EditorCommand,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<EditorUpdate>,
) {
    match cmd {
        EditorCommand::LoadFiles { paths } => {
            handlers::editor::handle_load_files(paths, session, update_tx).await;
        }
        EditorCommand::Edit(edit) => {
            handlers::editor::handle_edit(edit, session, update_tx);
        }
        EditorCommand::Save { output_path } => {
            handlers::editor::handle_save(output_path, session, update_tx).await;
        }
        EditorCommand::Split {
            at,
            first_path,
            second_path,
        } => {
            handlers::editor::handle_split(at, first_path, second_path, session, update_tx).await;
        }
        EditorCommand::ExtractText => {
            handlers::editor::handle_extract_text(session, update_tx).await;
        }
    }
}
