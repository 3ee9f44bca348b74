use eframe::egui::{self, ScrollArea, Ui};

use crate::config::Settings;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataLensApp {
    pub state: AppState,
}

impl DataLensApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
        }
    }
}

impl eframe::App for DataLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters + chart controls ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: overview, preview, chart, summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &self.state;
            if let (Some(source), Some(filtered)) = (&state.dataset, &state.filtered) {
                ScrollArea::vertical()
                    .id_salt("tables")
                    .max_height(ui.available_height() * 0.4)
                    .show(ui, |ui: &mut Ui| {
                        table::overview(ui, source);
                        table::preview(ui, filtered, state.settings.preview_rows);
                        table::summary(ui, filtered);
                    });
                ui.separator();
            }
            plot::chart_view(ui, state);
        });
    }
}
