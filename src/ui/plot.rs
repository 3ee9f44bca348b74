use std::collections::BTreeMap;
use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

use crate::chart::correlation::CorrelationMatrix;
use crate::chart::{ChartInstruction, ChartKind, ChartPayload};
use crate::color;
use crate::data::model::{Cell, Column, Dataset};
use crate::data::stats::quantile;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart area (central panel)
// ---------------------------------------------------------------------------

/// Render the current chart, or the reason it cannot be drawn.
pub fn chart_view(ui: &mut Ui, state: &AppState) {
    let Some(filtered) = &state.filtered else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Please open a CSV file to start visualizing data  (File → Open CSV…)");
        });
        return;
    };

    match &state.outcome {
        None => {}
        Some(Err(e)) => {
            ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
            if let Some(role) = e.role() {
                ui.label(RichText::new(format!("Check the {role} selection.")).weak());
            }
        }
        Some(Ok(instruction)) => {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(&instruction.title);
            });
            draw(ui, filtered, instruction, state.settings.histogram_bins);
        }
    }
}

fn draw(ui: &mut Ui, data: &Dataset, instruction: &ChartInstruction, bins: usize) {
    match &instruction.payload {
        ChartPayload::Axes { x, y } => {
            let Some(x_col) = data.column(x) else {
                return;
            };
            match (instruction.kind, y.as_deref().and_then(|y| data.column(y))) {
                (ChartKind::Histogram, _) => histogram(ui, x_col, bins),
                (kind, Some(y_col)) => xy_chart(ui, kind, x_col, y_col),
                (_, None) => {}
            }
        }
        ChartPayload::ValueCounts { counts, .. } => pie(ui, counts),
        ChartPayload::Correlation(matrix) => heatmap(ui, matrix),
    }
}

// ---------------------------------------------------------------------------
// X positions: numeric values as-is, categories as 0, 1, 2, …
// ---------------------------------------------------------------------------

struct XAxis {
    positions: Vec<Option<f64>>,
    /// Category labels, indexed by position; empty for numeric X.
    labels: Vec<String>,
}

impl XAxis {
    fn from_column(column: &Column) -> Self {
        if let Some(values) = column.as_numeric() {
            return XAxis {
                positions: values.to_vec(),
                labels: Vec::new(),
            };
        }
        let mut labels: Vec<String> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        let positions = (0..column.len())
            .map(|row| match column.cell(row) {
                Cell::Text(s) => {
                    let next = labels.len();
                    let i = *index.entry(s.to_string()).or_insert_with(|| {
                        labels.push(s.to_string());
                        next
                    });
                    Some(i as f64)
                }
                _ => None,
            })
            .collect();
        XAxis { positions, labels }
    }

    fn is_categorical(&self) -> bool {
        !self.labels.is_empty()
    }
}

fn xy_points(x: &XAxis, y: &Column) -> Vec<[f64; 2]> {
    let ys = y.as_numeric().unwrap_or(&[]);
    x.positions
        .iter()
        .zip(ys)
        .filter_map(|(xv, yv)| Some([(*xv)?, (*yv)?]))
        .collect()
}

fn xy_chart(ui: &mut Ui, kind: ChartKind, x_col: &Column, y_col: &Column) {
    let x = XAxis::from_column(x_col);
    let points = xy_points(&x, y_col);
    let mut plot = Plot::new(kind.label())
        .legend(Legend::default())
        .x_axis_label(x_col.name())
        .y_axis_label(y_col.name())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if x.is_categorical() {
        let labels = x.labels.clone();
        plot = plot.x_axis_formatter(move |mark, _range| tick_label(&labels, mark.value, false));
    }

    match kind {
        ChartKind::Line => {
            plot.show(ui, |plot_ui| {
                let line = Line::new(PlotPoints::from(points))
                    .name(y_col.name())
                    .width(1.5);
                plot_ui.line(line);
            });
        }
        ChartKind::Scatter => {
            plot.show(ui, |plot_ui| {
                let dots = Points::new(PlotPoints::from(points))
                    .name(y_col.name())
                    .radius(3.0);
                plot_ui.points(dots);
            });
        }
        ChartKind::Bar => {
            let totals = bar_totals(&points);
            let width = bar_width(&totals);
            let bars: Vec<Bar> = totals
                .iter()
                .map(|p| Bar::new(p[0], p[1]).width(width))
                .collect();
            plot.show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(y_col.name()));
            });
        }
        ChartKind::BoxPlot => {
            let boxes = box_elements(&x, &points);
            plot.show(ui, |plot_ui| {
                plot_ui.box_plot(BoxPlot::new(boxes).name(y_col.name()));
            });
        }
        _ => {}
    }
}

/// Axis tick text for integer positions into `names`; blank elsewhere.
/// `flip` counts from the far end, for rows drawn top to bottom.
fn tick_label(names: &[String], value: f64, flip: bool) -> String {
    let i = value.round();
    if (value - i).abs() > 1e-6 || i < 0.0 || i as usize >= names.len() {
        return String::new();
    }
    let i = i as usize;
    let i = if flip { names.len() - 1 - i } else { i };
    names[i].clone()
}

/// Sum of Y per distinct X position, ordered by position. Rows sharing an X
/// stack into one bar.
fn bar_totals(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]));
    let mut totals: Vec<[f64; 2]> = Vec::new();
    for [x, y] in sorted {
        match totals.last_mut() {
            Some(last) if last[0] == x => last[1] += y,
            _ => totals.push([x, y]),
        }
    }
    totals
}

/// 80% of the smallest gap between distinct X positions.
fn bar_width(points: &[[f64; 2]]) -> f64 {
    let mut xs: Vec<f64> = points.iter().map(|p| p[0]).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    let gap = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min);
    if gap.is_finite() { gap * 0.8 } else { 0.8 }
}

/// One box per distinct X position, whiskers at 1.5 × IQR.
fn box_elements(x: &XAxis, points: &[[f64; 2]]) -> Vec<BoxElem> {
    let mut groups: BTreeMap<u64, (f64, Vec<f64>)> = BTreeMap::new();
    for p in points {
        groups
            .entry(p[0].to_bits())
            .or_insert_with(|| (p[0], Vec::new()))
            .1
            .push(p[1]);
    }

    let width = bar_width(points) * 0.75;
    groups
        .into_values()
        .map(|(pos, mut ys)| {
            ys.sort_by(f64::total_cmp);
            let q1 = quantile(&ys, 0.25);
            let median = quantile(&ys, 0.5);
            let q3 = quantile(&ys, 0.75);
            let reach = 1.5 * (q3 - q1);
            let lower = ys.iter().copied().find(|v| *v >= q1 - reach).unwrap_or(q1);
            let upper = ys.iter().rev().copied().find(|v| *v <= q3 + reach).unwrap_or(q3);
            let name = x
                .labels
                .get(pos as usize)
                .cloned()
                .filter(|_| x.is_categorical())
                .unwrap_or_else(|| pos.to_string());
            BoxElem::new(pos, BoxSpread::new(lower, q1, median, q3, upper))
                .name(name)
                .box_width(width)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bin counts over the observed range: `(centre, width, count)`.
fn bin_counts(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    let Some((lo, hi)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    }) else {
        return Vec::new();
    };

    let bins = bins.max(1);
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };
    let mut counts = vec![0usize; bins];
    for &v in values {
        let i = (((v - lo) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, n)| (lo + width * (i as f64 + 0.5), width, n))
        .collect()
}

fn histogram(ui: &mut Ui, column: &Column, bins: usize) {
    let values: Vec<f64> = column
        .as_numeric()
        .unwrap_or(&[])
        .iter()
        .flatten()
        .copied()
        .collect();
    let bars: Vec<Bar> = bin_counts(&values, bins)
        .into_iter()
        .map(|(centre, width, n)| Bar::new(centre, n as f64).width(width))
        .collect();

    Plot::new("histogram")
        .legend(Legend::default())
        .x_axis_label(column.name().to_string())
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(column.name()));
        });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

fn pie(ui: &mut Ui, counts: &[(String, usize)]) {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        ui.label("No data.");
        return;
    }
    let colors = color::generate_palette(counts.len());

    Plot::new("pie")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for ((label, n), color) in counts.iter().zip(colors) {
                let sweep = TAU * (*n as f64) / total as f64;
                let share = 100.0 * (*n as f64) / total as f64;
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(slice_outline(start, sweep)))
                        .fill_color(color)
                        .name(format!("{label} ({share:.1}%)")),
                );
                start += sweep;
            }
        });
}

/// Outline of a unit-circle slice starting at `start` radians, counter-
/// clockwise from 12 o'clock.
fn slice_outline(start: f64, sweep: f64) -> Vec<[f64; 2]> {
    let steps = ((sweep / TAU) * 128.0).ceil().max(2.0) as usize;
    let mut outline = vec![[0.0, 0.0]];
    for s in 0..=steps {
        let a = std::f64::consts::FRAC_PI_2 + start + sweep * s as f64 / steps as f64;
        outline.push([a.cos(), a.sin()]);
    }
    outline
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.len();
    let labels = matrix.columns.clone();
    let row_labels = labels.clone();

    Plot::new("correlation")
        .data_aspect(1.0)
        .show_grid(false)
        .x_axis_formatter(move |mark, _range| tick_label(&labels, mark.value, false))
        .y_axis_formatter(move |mark, _range| tick_label(&row_labels, mark.value, true))
        .show(ui, |plot_ui| {
            for i in 0..n {
                for j in 0..n {
                    let value = matrix.get(i, j);
                    let fill = color::diverging(value);
                    let (cx, cy) = (j as f64, (n - 1 - i) as f64);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(vec![
                            [cx - 0.5, cy - 0.5],
                            [cx + 0.5, cy - 0.5],
                            [cx + 0.5, cy + 0.5],
                            [cx - 0.5, cy + 0.5],
                        ]))
                        .fill_color(fill),
                    );
                    let text = if value.is_nan() {
                        "NaN".to_string()
                    } else {
                        format!("{value:.2}")
                    };
                    plot_ui.text(Text::new(
                        PlotPoint::new(cx, cy),
                        RichText::new(text).color(color::contrasting_text(fill)),
                    ));
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_x_positions() {
        let col = Column::categorical("c", [Some("b"), Some("a"), None, Some("b")]);
        let x = XAxis::from_column(&col);
        assert_eq!(x.positions, vec![Some(0.0), Some(1.0), None, Some(0.0)]);
        assert_eq!(x.labels, vec!["b", "a"]);
    }

    #[test]
    fn test_xy_points_skip_missing() {
        let x = XAxis::from_column(&Column::numeric("x", [Some(1.0), None, Some(3.0)]));
        let y = Column::numeric("y", [Some(10.0), Some(20.0), None]);
        assert_eq!(xy_points(&x, &y), vec![[1.0, 10.0]]);
    }

    #[test]
    fn test_bin_counts_cover_all_values() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let bins = bin_counts(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), values.len());
        assert_eq!(bins[4].2, 1);
    }

    #[test]
    fn test_bin_counts_constant_and_empty() {
        assert_eq!(bin_counts(&[2.0, 2.0], 10).iter().map(|b| b.2).sum::<usize>(), 2);
        assert!(bin_counts(&[], 10).is_empty());
    }

    #[test]
    fn test_tick_labels() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(tick_label(&names, 1.0, false), "b");
        assert_eq!(tick_label(&names, 0.0, true), "c");
        assert_eq!(tick_label(&names, 0.5, false), "");
        assert_eq!(tick_label(&names, 3.0, false), "");
        assert_eq!(tick_label(&names, -1.0, false), "");
    }

    #[test]
    fn test_bar_totals_stack_rows_sharing_x() {
        let col = Column::categorical("c", [Some("A"), Some("A"), Some("B")]);
        let x = XAxis::from_column(&col);
        let y = Column::numeric("v", [Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(bar_totals(&xy_points(&x, &y)), vec![[0.0, 3.0], [1.0, 3.0]]);

        let unsorted = [[2.0, 1.0], [-1.0, 4.0], [2.0, 0.5]];
        assert_eq!(bar_totals(&unsorted), vec![[-1.0, 4.0], [2.0, 1.5]]);
    }

    #[test]
    fn test_bar_width_uses_smallest_gap() {
        assert!((bar_width(&[[0.0, 1.0], [2.0, 1.0], [3.0, 1.0]]) - 0.8).abs() < 1e-12);
        assert!((bar_width(&[[5.0, 1.0]]) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_slice_outline_starts_at_centre() {
        let outline = slice_outline(0.0, TAU / 4.0);
        assert_eq!(outline[0], [0.0, 0.0]);
        let first = outline[1];
        assert!(first[0].abs() < 1e-12 && (first[1] - 1.0).abs() < 1e-12);
    }
}
