use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{Cell, Dataset};
use crate::data::stats::{self, Summary};

// ---------------------------------------------------------------------------
// Dataset overview (collapsible)
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, source: &Dataset) {
    let ov = stats::overview(source);
    egui::CollapsingHeader::new("Dataset Overview")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("Shape: ({}, {})", ov.rows, ov.columns.len()));
            egui::Grid::new("overview_grid")
                .striped(true)
                .num_columns(3)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Column");
                    ui.strong("Kind");
                    ui.strong("Missing");
                    ui.end_row();
                    for col in &ov.columns {
                        ui.label(col.name.as_str());
                        ui.label(col.kind.to_string());
                        ui.label(col.missing.to_string());
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Preview of the first rows
// ---------------------------------------------------------------------------

pub fn preview(ui: &mut Ui, filtered: &Dataset, rows: usize) {
    ui.strong("Dataset Preview");
    let head = filtered.head(rows);
    if head.column_count() == 0 {
        return;
    }

    ui.push_id("preview_table", |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .columns(TableColumn::auto().at_least(60.0), head.column_count())
                .header(20.0, |mut header| {
                    for name in head.column_names() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for row in 0..head.row_count() {
                        body.row(18.0, |mut table_row| {
                            for cell in head.row(row) {
                                table_row.col(|ui: &mut Ui| {
                                    match cell {
                                        Cell::Missing => ui.label(RichText::new("NaN").weak()),
                                        other => ui.label(other.to_string()),
                                    };
                                });
                            }
                        });
                    }
                });
        });
    });

    if filtered.is_empty() {
        ui.label(RichText::new("No rows match the current filters.").italics());
    }
}

// ---------------------------------------------------------------------------
// Summary statistics (collapsible)
// ---------------------------------------------------------------------------

const NUMERIC_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
const CATEGORICAL_ROWS: [&str; 4] = ["count", "unique", "top", "freq"];

pub fn summary(ui: &mut Ui, filtered: &Dataset) {
    egui::CollapsingHeader::new("View Summary Statistics")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let summaries = stats::describe(filtered);
            let numeric: Vec<_> = summaries
                .iter()
                .filter_map(|(name, s)| match s {
                    Summary::Numeric(n) => Some((name.as_str(), n)),
                    Summary::Categorical(_) => None,
                })
                .collect();
            let categorical: Vec<_> = summaries
                .iter()
                .filter_map(|(name, s)| match s {
                    Summary::Categorical(c) => Some((name.as_str(), c)),
                    Summary::Numeric(_) => None,
                })
                .collect();

            if !numeric.is_empty() {
                let rows: Vec<Vec<String>> = numeric
                    .iter()
                    .map(|(_, n)| {
                        vec![
                            n.count.to_string(),
                            fmt_stat(n.mean),
                            fmt_stat(n.std),
                            fmt_stat(n.min),
                            fmt_stat(n.q25),
                            fmt_stat(n.median),
                            fmt_stat(n.q75),
                            fmt_stat(n.max),
                        ]
                    })
                    .collect();
                let names: Vec<&str> = numeric.iter().map(|(name, _)| *name).collect();
                stat_grid(ui, "numeric_summary", &NUMERIC_ROWS, &names, &rows);
            }

            if !categorical.is_empty() {
                ui.add_space(6.0);
                let rows: Vec<Vec<String>> = categorical
                    .iter()
                    .map(|(_, c)| {
                        vec![
                            c.count.to_string(),
                            c.unique.to_string(),
                            c.top.clone().unwrap_or_else(|| "NaN".to_string()),
                            c.freq.to_string(),
                        ]
                    })
                    .collect();
                let names: Vec<&str> = categorical.iter().map(|(name, _)| *name).collect();
                stat_grid(ui, "categorical_summary", &CATEGORICAL_ROWS, &names, &rows);
            }
        });
}

/// Statistics as rows, columns as grid columns. `values[c][r]` is
/// statistic `r` of column `c`.
fn stat_grid(
    ui: &mut Ui,
    id: &str,
    stat_names: &[&str],
    columns: &[&str],
    values: &[Vec<String>],
) {
    ScrollArea::horizontal().id_salt(id).show(ui, |ui: &mut Ui| {
        egui::Grid::new(id).striped(true).show(ui, |ui: &mut Ui| {
            ui.label("");
            for name in columns {
                ui.strong(*name);
            }
            ui.end_row();
            for (r, stat) in stat_names.iter().enumerate() {
                ui.strong(*stat);
                for column in values {
                    ui.label(column[r].as_str());
                }
                ui.end_row();
            }
        });
    });
}

fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}
