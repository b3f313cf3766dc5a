use std::collections::HashMap;
use std::path::PathBuf;

use eframe::egui;
use pagedeck_runtime::{EditCommand, EditorCommand, EditorUpdate, PageId, PageSnapshot};
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views;

#[derive(Clone)]
struct ProgressState {
    operation: String,
    current: usize,
    total: usize,
}

pub struct PagedeckApp {
    // Async infrastructure
    command_tx: mpsc::UnboundedSender<EditorCommand>,
    update_rx: mpsc::UnboundedReceiver<EditorUpdate>,

    /// Last snapshot of the page model, in order
    pages: Vec<PageSnapshot>,
    /// GPU textures keyed by stable page id, uploaded lazily
    textures: HashMap<PageId, egui::TextureHandle>,

    status: String,
    progress: Option<ProgressState>,
    /// True while a load batch is in flight; editing is gated off until
    /// the worker reports the batch finished
    loading: bool,
    split_at: usize,
    extracted_text: Option<String>,
    show_log: bool,
    logger: AppLogger,

    _tokio_handle: tokio::runtime::Handle,
}

impl PagedeckApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        Self {
            command_tx,
            update_rx,
            pages: Vec::new(),
            textures: HashMap::new(),
            status: String::new(),
            progress: None,
            loading: false,
            split_at: 1,
            extracted_text: None,
            show_log: false,
            logger,
            _tokio_handle: tokio_handle,
        }
    }

    fn send_load(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        self.loading = true;
        self.status = format!(
            "Loading {} file{}...",
            paths.len(),
            if paths.len() == 1 { "" } else { "s" }
        );
        let _ = self.command_tx.send(EditorCommand::LoadFiles { paths });
    }

    fn process_updates(&mut self, ctx: &egui::Context) {
        while let Ok(update) = self.update_rx.try_recv() {
            match update {
                EditorUpdate::Progress {
                    operation,
                    current,
                    total,
                } => {
                    self.progress = Some(ProgressState {
                        operation,
                        current,
                        total,
                    });
                    ctx.request_repaint();
                }
                EditorUpdate::DocumentLoaded {
                    name, page_count, ..
                } => {
                    self.status = format!("Loaded {name} ({page_count} pages)");
                }
                EditorUpdate::BatchLoadFinished { loaded, failed } => {
                    self.loading = false;
                    self.progress = None;
                    if failed > 0 {
                        self.status = format!("Loaded {loaded} files, {failed} failed");
                    }
                }
                EditorUpdate::PagesChanged { pages } => {
                    // Drop textures for pages no longer in the model;
                    // duplicates share an id-keyed upload with their original
                    self.textures.retain(|id, _| pages.iter().any(|p| p.id == *id));
                    self.pages = pages;
                    ctx.request_repaint();
                }
                EditorUpdate::SaveComplete { path, page_count } => {
                    self.progress = None;
                    self.status = format!("Saved {page_count} pages → {}", path.display());
                }
                EditorUpdate::SplitComplete {
                    first_path,
                    second_path,
                } => {
                    self.progress = None;
                    self.status = format!(
                        "Split → {} and {}",
                        first_path.display(),
                        second_path.display()
                    );
                }
                EditorUpdate::TextExtracted { text } => {
                    self.progress = None;
                    self.status = "Text extracted".to_string();
                    self.extracted_text = Some(text);
                }
                EditorUpdate::Error { message } => {
                    self.progress = None;
                    self.status = format!("Error: {message}");
                }
            }
        }
    }
}

impl eframe::App for PagedeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle drag-and-drop of PDF files
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("pdf"))
                .collect()
        });
        if !dropped.is_empty() && !self.loading {
            self.send_load(dropped);
        }

        self.process_updates(ctx);

        let enabled = !self.loading;

        // Keyboard shortcuts act on the current selection
        if enabled && self.pages.iter().any(|p| p.selected) {
            if ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
                let _ = self
                    .command_tx
                    .send(EditorCommand::Edit(EditCommand::DeleteSelected));
            }
            if ctx.input(|i| i.key_pressed(egui::Key::R)) {
                let _ = self
                    .command_tx
                    .send(EditorCommand::Edit(EditCommand::RotateSelected));
            }
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Pagedeck");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.show_log, "🗒 Log");
                });
            });
        });

        let show_log = self.show_log;
        egui::TopBottomPanel::bottom("log")
            .resizable(true)
            .show_animated(ctx, show_log, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in self.logger.entries() {
                            ui.monospace(format!(
                                "{} [{}] {}",
                                entry.timestamp.format("%H:%M:%S"),
                                entry.level,
                                entry.message
                            ));
                        }
                    });
            });

        let mut picked = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.pages.is_empty() {
                picked = views::editor::show_empty_state(ui, self.loading);
            } else {
                picked = views::editor::show_editor(
                    ui,
                    &self.pages,
                    &mut self.textures,
                    &self.command_tx,
                    &mut self.status,
                    enabled,
                    &mut self.split_at,
                );
            }

            if let Some(ref progress) = self.progress {
                ui.separator();
                ui.label(&progress.operation);
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .show_percentage(),
                );
                ctx.request_repaint();
            }

            if !self.status.is_empty() {
                ui.separator();
                ui.label(&self.status);
            }
        });
        if let Some(paths) = picked {
            self.send_load(paths);
        }

        if let Some(text) = &self.extracted_text {
            let mut open = true;
            let text_clone = text.clone();
            egui::Window::new("Extracted text")
                .open(&mut open)
                .default_size(egui::vec2(500.0, 400.0))
                .show(ctx, |ui| {
                    if ui.button("📋 Copy to clipboard").clicked() {
                        ui.ctx().copy_text(text_clone.clone());
                    }
                    ui.separator();
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut text_clone.as_str())
                                .desired_width(f32::INFINITY),
                        );
                    });
                });
            if !open {
                self.extracted_text = None;
            }
        }
    }
}
