use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eframe::egui;
use pagedeck_core::DEFAULT_OUTPUT_NAME;
use pagedeck_runtime::{EditCommand, EditorCommand, PageId, PageSnapshot};
use tokio::sync::mpsc;

const CARD_THUMB_SIZE: f32 = 160.0;

/// Shown while no pages are loaded. Returns files the user picked.
pub fn show_empty_state(ui: &mut egui::Ui, loading: bool) -> Option<Vec<PathBuf>> {
    let mut picked = None;

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.heading("Pagedeck");
        ui.label("Drop PDF files here, or");
        ui.add_space(8.0);
        if loading {
            ui.spinner();
        } else if ui.button("📂 Open PDFs...").clicked() {
            picked = pick_pdf_files();
        }
    });

    picked
}

/// Toolbar plus the page grid. Returns files picked via the Add button.
#[allow(clippy::too_many_arguments)]
pub fn show_editor(
    ui: &mut egui::Ui,
    pages: &[PageSnapshot],
    textures: &mut HashMap<PageId, egui::TextureHandle>,
    command_tx: &mpsc::UnboundedSender<EditorCommand>,
    status: &mut String,
    enabled: bool,
    split_at: &mut usize,
) -> Option<Vec<PathBuf>> {
    let mut picked = None;
    let any_selected = pages.iter().any(|p| p.selected);

    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal_wrapped(|ui| {
            if ui.button("📂 Add PDFs...").clicked() {
                picked = pick_pdf_files();
            }
            if ui.button("➕ Insert blank").clicked() {
                send_edit(command_tx, EditCommand::InsertBlank);
            }
            if ui.button("⟳ Rotate all").clicked() {
                send_edit(command_tx, EditCommand::RotateAll);
            }
            ui.add_enabled_ui(any_selected, |ui| {
                if ui.button("⟳ Rotate selected").clicked() {
                    send_edit(command_tx, EditCommand::RotateSelected);
                }
                if ui.button("🗑 Delete selected").clicked() {
                    send_edit(command_tx, EditCommand::DeleteSelected);
                }
            });

            ui.separator();

            // A split point of n means pages [0, n) and [n, len) part ways
            let max_split = pages.len().saturating_sub(1).max(1);
            *split_at = (*split_at).clamp(1, max_split);
            ui.label("Split before page");
            ui.add(egui::DragValue::new(split_at).range(1..=max_split));
            ui.add_enabled_ui(pages.len() >= 2, |ui| {
                if ui.button("✂ Split...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .set_file_name("split.pdf")
                        .save_file()
                    {
                        let (first_path, second_path) = split_output_paths(&path);
                        let _ = command_tx.send(EditorCommand::Split {
                            at: *split_at,
                            first_path,
                            second_path,
                        });
                        *status = "Splitting...".to_string();
                    }
                }
            });

            ui.separator();

            if ui.button("📋 Extract text").clicked() {
                let _ = command_tx.send(EditorCommand::ExtractText);
                *status = "Extracting text...".to_string();
            }
            if ui.button("🗑 Clear all").clicked() {
                send_edit(command_tx, EditCommand::ClearAll);
            }
            if ui.button("💾 Save as...").clicked() {
                if let Some(output_path) = rfd::FileDialog::new()
                    .set_file_name(DEFAULT_OUTPUT_NAME)
                    .save_file()
                {
                    let _ = command_tx.send(EditorCommand::Save { output_path });
                    *status = "Saving...".to_string();
                }
            }
        });

        ui.label(format!("{} pages", pages.len()));
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for (idx, page) in pages.iter().enumerate() {
                    page_card(ui, idx, page, pages.len(), textures, command_tx);
                }
            });
        });
    });

    picked
}

/// One draggable page card: thumbnail, position label and edit controls
fn page_card(
    ui: &mut egui::Ui,
    idx: usize,
    page: &PageSnapshot,
    total: usize,
    textures: &mut HashMap<PageId, egui::TextureHandle>,
    command_tx: &mpsc::UnboundedSender<EditorCommand>,
) {
    let texture = textures.entry(page.id).or_insert_with(|| {
        let thumbnail = &page.thumbnail;
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [thumbnail.width() as usize, thumbnail.height() as usize],
            thumbnail.rgba(),
        );
        ui.ctx().load_texture(
            format!("page-{}", page.id.0),
            color_image,
            egui::TextureOptions::default(),
        )
    });

    let id = egui::Id::new(("page_card", page.id));
    let response = ui
        .dnd_drag_source(id, idx, |ui| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.set_width(CARD_THUMB_SIZE);

                    // Rotation is display-only; the thumbnail bitmap is
                    // rendered once and never re-rasterized
                    let aspect = texture.aspect_ratio();
                    let (w, h) = if aspect >= 1.0 {
                        (CARD_THUMB_SIZE, CARD_THUMB_SIZE / aspect)
                    } else {
                        (CARD_THUMB_SIZE * aspect, CARD_THUMB_SIZE)
                    };
                    ui.add(
                        egui::Image::from_texture(&*texture)
                            .rotate(page.rotation.radians(), egui::Vec2::splat(0.5))
                            .fit_to_exact_size(egui::vec2(w, h)),
                    );

                    ui.label(format!("{} · {}", idx + 1, page.label));

                    ui.horizontal(|ui| {
                        let mut selected = page.selected;
                        if ui.checkbox(&mut selected, "").changed() {
                            send_edit(
                                command_tx,
                                EditCommand::SetSelected {
                                    id: page.id,
                                    on: selected,
                                },
                            );
                        }
                        if ui
                            .add_enabled(idx > 0, egui::Button::new("◀"))
                            .on_hover_text("Move left")
                            .clicked()
                        {
                            send_edit(command_tx, EditCommand::MoveUp(page.id));
                        }
                        if ui
                            .add_enabled(idx + 1 < total, egui::Button::new("▶"))
                            .on_hover_text("Move right")
                            .clicked()
                        {
                            send_edit(command_tx, EditCommand::MoveDown(page.id));
                        }
                        if ui.button("⟳").on_hover_text("Rotate 90° clockwise").clicked() {
                            send_edit(command_tx, EditCommand::Rotate(page.id));
                        }
                        if ui.button("⧉").on_hover_text("Duplicate").clicked() {
                            send_edit(command_tx, EditCommand::Duplicate(page.id));
                        }
                        if ui.button("✖").on_hover_text("Delete").clicked() {
                            send_edit(command_tx, EditCommand::Delete(page.id));
                        }
                    });
                });
            });
        })
        .response;

    if let Some(from) = response.dnd_release_payload::<usize>() {
        if *from != idx {
            send_edit(command_tx, EditCommand::Reorder { from: *from, to: idx });
        }
    }

    if response.dnd_hover_payload::<usize>().is_some() {
        ui.painter().rect_stroke(
            response.rect,
            egui::CornerRadius::same(4),
            egui::Stroke::new(2.0, ui.visuals().selection.bg_fill),
            egui::StrokeKind::Outside,
        );
    }
}

fn send_edit(command_tx: &mpsc::UnboundedSender<EditorCommand>, edit: EditCommand) {
    let _ = command_tx.send(EditorCommand::Edit(edit));
}

fn pick_pdf_files() -> Option<Vec<PathBuf>> {
    rfd::FileDialog::new()
        .add_filter("PDF files", &["pdf"])
        .pick_files()
}

/// Derive `name_part1.pdf` and `name_part2.pdf` from the chosen path
pub fn split_output_paths(path: &Path) -> (PathBuf, PathBuf) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "split".to_string());
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    (
        dir.join(format!("{stem}_part1.pdf")),
        dir.join(format!("{stem}_part2.pdf")),
    )
}
