use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::chart::{ChartInstruction, ChartKind, ChartRequest, ValidationError, resolve};
use crate::config::Settings;
use crate::data::export;
use crate::data::filter::{ColumnFilter, FilterState, apply_filters, init_filter_state};
use crate::data::model::{ColumnKind, Dataset};

// ---------------------------------------------------------------------------
// Chart selections
// ---------------------------------------------------------------------------

/// The chart controls as the user left them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSelection {
    pub kind: ChartKind,
    pub x: Option<String>,
    pub y: Option<String>,
    pub histogram_column: Option<String>,
    pub matrix_columns: Vec<String>,
}

impl Default for ChartSelection {
    fn default() -> Self {
        Self {
            kind: ChartKind::Line,
            x: None,
            y: None,
            histogram_column: None,
            matrix_columns: Vec::new(),
        }
    }
}

impl ChartSelection {
    /// Defaults for a freshly loaded dataset: first column on X, first
    /// numeric column on Y and for histograms, every numeric column in the
    /// correlation matrix.
    fn for_dataset(kind: ChartKind, dataset: &Dataset) -> Self {
        let first_numeric = dataset
            .columns_of_kind(ColumnKind::Numeric)
            .next()
            .map(|c| c.name().to_string());
        Self {
            kind,
            x: dataset.column_names().next().map(str::to_string),
            y: first_numeric.clone(),
            histogram_column: first_numeric,
            matrix_columns: dataset
                .columns_of_kind(ColumnKind::Numeric)
                .map(|c| c.name().to_string())
                .collect(),
        }
    }

    /// Build the request for the current chart kind.
    pub fn request(&self) -> ChartRequest {
        let mut request = ChartRequest::new(self.kind);
        match self.kind {
            ChartKind::Histogram => {
                if let Some(column) = &self.histogram_column {
                    request = request.with_x(column.as_str());
                }
            }
            ChartKind::CorrelationMatrix => {
                request = request.with_columns(&self.matrix_columns);
            }
            ChartKind::Heatmap => {}
            _ => {
                if let Some(x) = &self.x {
                    request = request.with_x(x.as_str());
                }
                if let Some(y) = &self.y {
                    request = request.with_y(y.as_str());
                }
            }
        }
        request
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The source dataset is never modified; `filtered` and `outcome` are
/// recomputed from it on every change.
pub struct AppState {
    pub settings: Settings,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// File name of the loaded dataset.
    pub source_name: Option<String>,

    /// Per-column filter selections.
    pub filters: FilterState,

    /// Distinct values per categorical column, from the source dataset.
    pub choices: BTreeMap<String, Vec<Option<String>>>,

    /// Observed `(min, max)` per numeric column, from the source dataset.
    pub bounds: BTreeMap<String, (f64, f64)>,

    /// Rows passing the current filters.
    pub filtered: Option<Dataset>,

    pub chart: ChartSelection,

    /// Result of the last resolution pass.
    pub outcome: Option<Result<ChartInstruction, ValidationError>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            dataset: None,
            source_name: None,
            filters: FilterState::new(),
            choices: BTreeMap::new(),
            bounds: BTreeMap::new(),
            filtered: None,
            chart: ChartSelection::default(),
            outcome: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and chart controls.
    pub fn set_dataset(&mut self, name: impl Into<String>, dataset: Dataset) {
        self.filters = init_filter_state(&dataset);
        self.choices = dataset
            .columns_of_kind(ColumnKind::Categorical)
            .map(|c| (c.name().to_string(), c.distinct_values()))
            .collect();
        self.bounds = dataset
            .columns()
            .iter()
            .filter_map(|c| c.bounds().map(|b| (c.name().to_string(), b)))
            .collect();
        self.chart = ChartSelection::for_dataset(self.chart.kind, &dataset);

        self.dataset = Some(dataset);
        self.source_name = Some(name.into());
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered dataset, then the chart.
    pub fn refilter(&mut self) {
        self.filtered = self
            .dataset
            .as_ref()
            .map(|ds| apply_filters(ds, &self.filters));
        self.resolve_chart();
    }

    /// Re-run the chart resolver against the current filtered dataset.
    pub fn resolve_chart(&mut self) {
        self.outcome = self.filtered.as_ref().map(|ds| {
            let outcome = resolve(ds, &self.chart.request());
            if let Err(e) = &outcome {
                log::debug!("Chart request rejected: {e}");
            }
            outcome
        });
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.chart.kind = kind;
        self.resolve_chart();
    }

    /// Toggle a single value in a categorical column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &Option<String>) {
        if let Some(ColumnFilter::Allowed(selected)) = self.filters.get_mut(column) {
            if !selected.remove(value) {
                selected.insert(value.clone());
            }
            self.refilter();
        }
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(all_vals) = self.choices.get(column) {
            let all = ColumnFilter::Allowed(all_vals.iter().cloned().collect());
            self.filters.insert(column.to_string(), all);
            self.refilter();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        if self.choices.contains_key(column) {
            self.filters
                .insert(column.to_string(), ColumnFilter::Allowed(Default::default()));
            self.refilter();
        }
    }

    /// Narrow a numeric column to `[min, max]`, clamped to the source bounds.
    pub fn set_range(&mut self, column: &str, min: f64, max: f64) {
        if let Some(&(lo, hi)) = self.bounds.get(column) {
            let (min, max) = (min.min(max).clamp(lo, hi), max.max(min).clamp(lo, hi));
            self.filters
                .insert(column.to_string(), ColumnFilter::Range { min, max });
            self.refilter();
        }
    }

    /// Put every filter back to its default.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = init_filter_state(ds);
            self.refilter();
        }
    }

    /// Write the filtered rows to `path` as CSV.
    pub fn export_filtered(&self, path: &Path) -> Result<()> {
        match &self.filtered {
            Some(ds) => export::save_csv(ds, path),
            None => anyhow::bail!("No dataset loaded"),
        }
    }
}
