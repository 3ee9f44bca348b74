use serde::Serialize;

use super::correlation::{CorrelationMatrix, correlation_matrix};
use super::error::ValidationError;
use super::kind::{AxisRole, ChartKind, ChartSpec, Derivation, RoleRule, Selection};
use super::request::ChartRequest;
use crate::data::model::{Column, ColumnKind, Dataset};
use crate::data::stats::value_counts;

// ---------------------------------------------------------------------------
// Resolver output
// ---------------------------------------------------------------------------

/// A validated, renderer-ready chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartInstruction {
    pub kind: ChartKind,
    pub title: String,
    pub payload: ChartPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartPayload {
    /// Column references; the renderer reads values from the dataset.
    /// `y` is `None` for a histogram.
    Axes { x: String, y: Option<String> },
    /// `(label, count)` pairs by descending count, ties by first appearance.
    ValueCounts {
        column: String,
        counts: Vec<(String, usize)>,
    },
    Correlation(CorrelationMatrix),
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Columns bound to a request after validation.
enum Bound<'a> {
    Axes(Vec<(AxisRole, &'a Column)>),
    Columns(Vec<&'a Column>),
}

impl<'a> Bound<'a> {
    fn axis(&self, role: AxisRole) -> Option<&'a Column> {
        match self {
            Bound::Axes(axes) => axes.iter().find(|(r, _)| *r == role).map(|(_, c)| *c),
            Bound::Columns(_) => None,
        }
    }
}

/// Validate `request` against `dataset` and derive the chart payload.
///
/// Role and kind checks run first, in the order the chart's rules list
/// them; an empty dataset is reported only once the request itself is
/// valid.
pub fn resolve(
    dataset: &Dataset,
    request: &ChartRequest,
) -> Result<ChartInstruction, ValidationError> {
    let spec = request.kind.spec();
    let bound = bind(dataset, request, spec)?;

    if dataset.is_empty() {
        return Err(ValidationError::EmptyResult { chart: spec.kind });
    }

    let instruction = match (spec.derivation, &bound) {
        (Derivation::PassThrough, _) => {
            let x = bound.axis(AxisRole::X).map(|c| c.name().to_string());
            let y = bound.axis(AxisRole::Y).map(|c| c.name().to_string());
            ChartInstruction {
                kind: spec.kind,
                title: match (&x, &y) {
                    (Some(x), Some(y)) => format!("{} of {y} vs {x}", spec.title),
                    (Some(x), None) => format!("{} of {x}", spec.title),
                    _ => spec.title.to_string(),
                },
                payload: ChartPayload::Axes {
                    x: x.unwrap_or_default(),
                    y,
                },
            }
        }
        (Derivation::ValueCounts, _) => {
            let column = bound.axis(AxisRole::X);
            let counts = column
                .and_then(Column::as_categorical)
                .map(value_counts)
                .unwrap_or_default();
            let name = column.map(|c| c.name().to_string()).unwrap_or_default();
            ChartInstruction {
                kind: spec.kind,
                title: format!("{} of {name}", spec.title),
                payload: ChartPayload::ValueCounts { column: name, counts },
            }
        }
        (Derivation::Correlation, Bound::Columns(columns)) => ChartInstruction {
            kind: spec.kind,
            title: spec.title.to_string(),
            payload: ChartPayload::Correlation(correlation_matrix(columns)),
        },
        (Derivation::Correlation, Bound::Axes(axes)) => {
            let columns: Vec<&Column> = axes.iter().map(|(_, c)| *c).collect();
            ChartInstruction {
                kind: spec.kind,
                title: spec.title.to_string(),
                payload: ChartPayload::Correlation(correlation_matrix(&columns)),
            }
        }
    };

    log::debug!("Resolved {} → \"{}\"", spec.kind, instruction.title);
    Ok(instruction)
}

fn bind<'a>(
    dataset: &'a Dataset,
    request: &ChartRequest,
    spec: &ChartSpec,
) -> Result<Bound<'a>, ValidationError> {
    let chart = spec.kind;
    match spec.selection {
        Selection::Axes(rules) => {
            let mut axes = Vec::with_capacity(rules.len());
            for rule in rules {
                axes.push((rule.role, bind_role(dataset, request, chart, rule)?));
            }
            Ok(Bound::Axes(axes))
        }
        Selection::AllNumeric { min } => {
            let columns: Vec<&Column> = dataset.columns_of_kind(ColumnKind::Numeric).collect();
            if columns.len() < min {
                return Err(ValidationError::InsufficientSelection {
                    chart,
                    role: AxisRole::Columns,
                    required: min,
                    selected: columns.len(),
                });
            }
            Ok(Bound::Columns(columns))
        }
        Selection::NumericList { min } => {
            let mut names: Vec<&str> = Vec::with_capacity(request.columns.len());
            for name in &request.columns {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            if names.len() < min {
                return Err(ValidationError::InsufficientSelection {
                    chart,
                    role: AxisRole::Columns,
                    required: min,
                    selected: names.len(),
                });
            }
            let columns = names
                .into_iter()
                .map(|name| {
                    lookup(dataset, chart, AxisRole::Columns, name, Some(ColumnKind::Numeric))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Bound::Columns(columns))
        }
    }
}

fn bind_role<'a>(
    dataset: &'a Dataset,
    request: &ChartRequest,
    chart: ChartKind,
    rule: &RoleRule,
) -> Result<&'a Column, ValidationError> {
    let name = request
        .column_for(rule.role)
        .ok_or(ValidationError::InsufficientSelection {
            chart,
            role: rule.role,
            required: 1,
            selected: 0,
        })?;
    lookup(dataset, chart, rule.role, name, rule.kind)
}

fn lookup<'a>(
    dataset: &'a Dataset,
    chart: ChartKind,
    role: AxisRole,
    name: &str,
    expected: Option<ColumnKind>,
) -> Result<&'a Column, ValidationError> {
    let column = dataset
        .column(name)
        .ok_or_else(|| ValidationError::UnknownColumn {
            chart,
            role,
            column: name.to_string(),
        })?;
    match expected {
        Some(kind) if column.kind() != kind => Err(ValidationError::TypeMismatch {
            chart,
            role,
            column: name.to_string(),
            expected: kind,
            found: column.kind(),
        }),
        _ => Ok(column),
    }
}
