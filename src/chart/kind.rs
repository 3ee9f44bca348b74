use std::fmt;

use serde::Serialize;

use crate::data::model::ColumnKind;

// ---------------------------------------------------------------------------
// Chart kinds and axis roles
// ---------------------------------------------------------------------------

/// The chart types offered to the user. Declaration order is also the
/// index into [`CHART_SPECS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Histogram,
    BoxPlot,
    Heatmap,
    PieChart,
    CorrelationMatrix,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::Heatmap,
        ChartKind::PieChart,
        ChartKind::CorrelationMatrix,
    ];

    /// Validation and payload rules for this kind.
    pub fn spec(self) -> &'static ChartSpec {
        &CHART_SPECS[self as usize]
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Scatter => "Scatter",
            ChartKind::Histogram => "Histogram",
            ChartKind::BoxPlot => "Box Plot",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::PieChart => "Pie Chart",
            ChartKind::CorrelationMatrix => "Correlation Matrix",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The part a column plays in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisRole {
    X,
    Y,
    /// The column list of a matrix-style chart.
    Columns,
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisRole::X => write!(f, "X-axis"),
            AxisRole::Y => write!(f, "Y-axis"),
            AxisRole::Columns => write!(f, "matrix"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch table
// ---------------------------------------------------------------------------

/// One single-column role and the kind it demands (`None` = any kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRule {
    pub role: AxisRole,
    pub kind: Option<ColumnKind>,
}

/// Which columns a chart consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Named single-column roles, validated in slice order.
    Axes(&'static [RoleRule]),
    /// Every numeric column of the dataset, at least `min` of them.
    AllNumeric { min: usize },
    /// A user-chosen list of numeric columns, at least `min` of them.
    NumericList { min: usize },
}

/// What the resolver computes once validation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// Column references only.
    PassThrough,
    /// Frequency of each label of the X column.
    ValueCounts,
    /// Pearson correlation matrix of the selected columns.
    Correlation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub selection: Selection,
    pub derivation: Derivation,
    /// Title stem; the resolver appends the column names.
    pub title: &'static str,
}

// X is validated before Y, so a bad X is reported even while Y is unset.
const X_ANY_Y_NUMERIC: &[RoleRule] = &[
    RoleRule { role: AxisRole::X, kind: None },
    RoleRule { role: AxisRole::Y, kind: Some(ColumnKind::Numeric) },
];

const X_NUMERIC_Y_NUMERIC: &[RoleRule] = &[
    RoleRule { role: AxisRole::X, kind: Some(ColumnKind::Numeric) },
    RoleRule { role: AxisRole::Y, kind: Some(ColumnKind::Numeric) },
];

const X_CATEGORICAL: &[RoleRule] = &[RoleRule {
    role: AxisRole::X,
    kind: Some(ColumnKind::Categorical),
}];

const X_NUMERIC: &[RoleRule] = &[RoleRule {
    role: AxisRole::X,
    kind: Some(ColumnKind::Numeric),
}];

/// Chart kind → role requirements and payload. Adding a chart kind means
/// adding a variant and a row here.
pub static CHART_SPECS: [ChartSpec; 8] = [
    ChartSpec {
        kind: ChartKind::Line,
        selection: Selection::Axes(X_ANY_Y_NUMERIC),
        derivation: Derivation::PassThrough,
        title: "Line Plot",
    },
    ChartSpec {
        kind: ChartKind::Bar,
        selection: Selection::Axes(X_ANY_Y_NUMERIC),
        derivation: Derivation::PassThrough,
        title: "Bar Plot",
    },
    ChartSpec {
        kind: ChartKind::Scatter,
        selection: Selection::Axes(X_NUMERIC_Y_NUMERIC),
        derivation: Derivation::PassThrough,
        title: "Scatter Plot",
    },
    ChartSpec {
        kind: ChartKind::Histogram,
        selection: Selection::Axes(X_NUMERIC),
        derivation: Derivation::PassThrough,
        title: "Histogram",
    },
    ChartSpec {
        kind: ChartKind::BoxPlot,
        selection: Selection::Axes(X_ANY_Y_NUMERIC),
        derivation: Derivation::PassThrough,
        title: "Box Plot",
    },
    ChartSpec {
        kind: ChartKind::Heatmap,
        selection: Selection::AllNumeric { min: 1 },
        derivation: Derivation::Correlation,
        title: "Correlation Heatmap",
    },
    ChartSpec {
        kind: ChartKind::PieChart,
        selection: Selection::Axes(X_CATEGORICAL),
        derivation: Derivation::ValueCounts,
        title: "Pie Chart",
    },
    ChartSpec {
        kind: ChartKind::CorrelationMatrix,
        selection: Selection::NumericList { min: 2 },
        derivation: Derivation::Correlation,
        title: "Correlation Matrix",
    },
];
