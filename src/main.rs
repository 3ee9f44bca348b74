mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::DataLensApp;
use config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::load().unwrap_or_else(|e| {
        log::warn!("Using default settings: {e:#}");
        Settings::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Lens – CSV Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(DataLensApp::new(settings)))),
    )
}
