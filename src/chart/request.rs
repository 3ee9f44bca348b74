use super::kind::{AxisRole, ChartKind};

/// The user's chart intent, rebuilt from the current selections on every
/// render cycle. Roles a chart kind does not use are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub x: Option<String>,
    pub y: Option<String>,
    /// Column list for matrix-style charts.
    pub columns: Vec<String>,
}

impl ChartRequest {
    pub fn new(kind: ChartKind) -> Self {
        ChartRequest {
            kind,
            x: None,
            y: None,
            columns: Vec::new(),
        }
    }

    pub fn with_x(mut self, column: impl Into<String>) -> Self {
        self.x = Some(column.into());
        self
    }

    pub fn with_y(mut self, column: impl Into<String>) -> Self {
        self.y = Some(column.into());
        self
    }

    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// The column chosen for a single-column role.
    pub fn column_for(&self, role: AxisRole) -> Option<&str> {
        match role {
            AxisRole::X => self.x.as_deref(),
            AxisRole::Y => self.y.as_deref(),
            AxisRole::Columns => None,
        }
    }
}
