use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::ChartKind;
use crate::data::filter::ColumnFilter;
use crate::data::model::ColumnKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filters and chart controls
// ---------------------------------------------------------------------------

/// Render the left panel: data filters, then chart type and axes.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        ui.heading("Data Filtering");
        ui.separator();
        ui.label("No dataset loaded.");
        return;
    };

    // Snapshot what the widgets need so state can be mutated in the loop.
    let columns: Vec<(String, ColumnKind)> = dataset
        .columns()
        .iter()
        .map(|c| (c.name().to_string(), c.kind()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data Filtering");
            if ui.small_button("Reset filters").clicked() {
                state.reset_filters();
            }
            ui.separator();

            for (name, kind) in &columns {
                match kind {
                    ColumnKind::Categorical => categorical_filter(ui, state, name),
                    ColumnKind::Numeric => numeric_filter(ui, state, name),
                }
            }

            ui.add_space(8.0);
            ui.heading("Choose Visualization Type");
            ui.separator();
            chart_controls(ui, state, &columns);
        });
}

fn categorical_filter(ui: &mut Ui, state: &mut AppState, column: &str) {
    let Some(all_values) = state.choices.get(column).cloned() else {
        return;
    };
    let selected = match state.filters.get(column) {
        Some(ColumnFilter::Allowed(set)) => set.clone(),
        _ => all_values.iter().cloned().collect(),
    };

    // Show count of selected / total in the header
    let header_text = format!("{column}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(("filter", column))
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            for value in &all_values {
                let label = value.as_deref().unwrap_or("<missing>");
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, label).changed() {
                    state.toggle_filter_value(column, value);
                }
            }
        });
}

fn numeric_filter(ui: &mut Ui, state: &mut AppState, column: &str) {
    let Some(&(lo, hi)) = state.bounds.get(column) else {
        ui.label(RichText::new(format!("{column}: no values")).weak());
        return;
    };
    let (mut min, mut max) = match state.filters.get(column) {
        Some(ColumnFilter::Range { min, max }) => (*min, *max),
        _ => (lo, hi),
    };

    ui.label(RichText::new(format!("Range for {column}")).strong());
    let min_changed = ui
        .add(egui::Slider::new(&mut min, lo..=hi).text("min"))
        .changed();
    let max_changed = ui
        .add(egui::Slider::new(&mut max, lo..=hi).text("max"))
        .changed();
    if min_changed || max_changed {
        state.set_range(column, min, max);
    }
    ui.add_space(4.0);
}

fn chart_controls(ui: &mut Ui, state: &mut AppState, columns: &[(String, ColumnKind)]) {
    let numeric: Vec<&str> = columns
        .iter()
        .filter(|(_, kind)| *kind == ColumnKind::Numeric)
        .map(|(name, _)| name.as_str())
        .collect();
    let all: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();

    let mut kind = state.chart.kind;
    egui::ComboBox::from_label("Chart Type")
        .selected_text(kind.label())
        .show_ui(ui, |ui: &mut Ui| {
            for option in ChartKind::ALL {
                ui.selectable_value(&mut kind, option, option.label());
            }
        });
    if kind != state.chart.kind {
        state.set_chart_kind(kind);
    }

    let mut changed = false;
    match state.chart.kind {
        ChartKind::Line | ChartKind::Bar | ChartKind::Scatter | ChartKind::BoxPlot => {
            changed |= column_picker(ui, "X-axis", &all, &mut state.chart.x);
            changed |= column_picker(ui, "Y-axis", &numeric, &mut state.chart.y);
        }
        ChartKind::PieChart => {
            changed |= column_picker(ui, "X-axis", &all, &mut state.chart.x);
        }
        ChartKind::Histogram => {
            changed |= column_picker(
                ui,
                "Column for Histogram",
                &numeric,
                &mut state.chart.histogram_column,
            );
        }
        ChartKind::Heatmap => {
            ui.label("Uses every numeric column.");
        }
        ChartKind::CorrelationMatrix => {
            ui.label("Select Columns for Correlation Matrix");
            for name in &numeric {
                let mut checked = state.chart.matrix_columns.iter().any(|c| c == name);
                if ui.checkbox(&mut checked, *name).changed() {
                    if checked {
                        state.chart.matrix_columns.push(name.to_string());
                    } else {
                        state.chart.matrix_columns.retain(|c| c != name);
                    }
                    changed = true;
                }
            }
        }
    }
    if changed {
        state.resolve_chart();
    }
}

/// A combo box over `options`; returns whether the selection changed.
fn column_picker(
    ui: &mut Ui,
    label: &str,
    options: &[&str],
    current: &mut Option<String>,
) -> bool {
    let before = current.clone();
    egui::ComboBox::from_label(label)
        .selected_text(current.as_deref().unwrap_or("—"))
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                let is_current = current.as_deref() == Some(*option);
                if ui.selectable_label(is_current, *option).clicked() {
                    *current = Some(option.to_string());
                }
            }
        });
    *current != before
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.filtered.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Download Filtered Data…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(filtered)) = (&state.dataset, &state.filtered) {
            ui.label(format!(
                "{}: {} rows loaded, {} after filters",
                state.source_name.as_deref().unwrap_or("dataset"),
                ds.row_count(),
                filtered.row_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV file")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                state.set_dataset(name, dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(state.settings.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.status_message = match state.export_filtered(&path) {
            Ok(()) => None,
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                Some(format!("Error: {e:#}"))
            }
        };
    }
}
