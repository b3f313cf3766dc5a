#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

mod app;
mod handlers;
mod logger;
mod renderer;
mod views;
mod worker;

fn main() -> anyhow::Result<()> {
    let app_logger = logger::AppLogger::new(256);
    app_logger.clone().init()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let tokio_handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_title("Pagedeck"),
        ..Default::default()
    };

    eframe::run_native(
        "Pagedeck",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::PagedeckApp::new(
                cc,
                tokio_handle,
                app_logger,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))?;

    Ok(())
}
