use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::infer;

// ---------------------------------------------------------------------------
// ColumnKind – the inferred type tag of a column
// ---------------------------------------------------------------------------

/// How a column's values are treated downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Discrete text labels.
    Categorical,
    /// Real numbers (integers are widened to `f64`).
    Numeric,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Numeric => write!(f, "numeric"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell – a borrowed view of one value
// ---------------------------------------------------------------------------

/// One cell of a [`Dataset`], borrowed from its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Missing => write!(f, "<missing>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Typed storage for a column's values. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Categorical(Vec<Option<String>>),
    Numeric(Vec<Option<f64>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Categorical(v) => v.len(),
            ColumnData::Numeric(v) => v.len(),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::Numeric(_) => ColumnKind::Numeric,
        }
    }

    fn take(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::Categorical(v) => {
                ColumnData::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
            ColumnData::Numeric(v) => ColumnData::Numeric(indices.iter().map(|&i| v[i]).collect()),
        }
    }
}

/// A named column with its kind resolved once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Column {
            name: name.into(),
            kind: data.kind(),
            data,
        }
    }

    #[cfg(test)]
    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Column::new(name, ColumnData::Categorical(values))
    }

    #[cfg(test)]
    pub fn numeric(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Column::new(name, ColumnData::Numeric(values.into_iter().collect()))
    }

    /// Build a column from raw text cells, inferring its kind.
    pub fn from_raw<S: AsRef<str>>(name: impl Into<String>, cells: &[S]) -> Self {
        let data = match infer::infer_kind(cells.iter().map(|c| c.as_ref())) {
            ColumnKind::Numeric => ColumnData::Numeric(
                cells.iter().map(|c| infer::parse_number(c.as_ref())).collect(),
            ),
            ColumnKind::Categorical => ColumnData::Categorical(
                cells
                    .iter()
                    .map(|c| {
                        let c = c.as_ref();
                        (!infer::is_missing(c)).then(|| c.trim().to_string())
                    })
                    .collect(),
            ),
        };
        Column::new(name, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn cell(&self, row: usize) -> Cell<'_> {
        match &self.data {
            ColumnData::Categorical(v) => v[row].as_deref().map_or(Cell::Missing, Cell::Text),
            ColumnData::Numeric(v) => v[row].map_or(Cell::Missing, Cell::Number),
        }
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(v) => Some(v),
            ColumnData::Numeric(_) => None,
        }
    }

    /// Distinct values of a categorical column in first-appearance order.
    /// Empty for numeric columns.
    pub fn distinct_values(&self) -> Vec<Option<String>> {
        let Some(values) = self.as_categorical() else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        values
            .iter()
            .filter(|v| seen.insert(*v))
            .cloned()
            .collect()
    }

    /// Observed `(min, max)` of a numeric column, ignoring missing cells.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.as_numeric()?
            .iter()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }

    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Categorical(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    fn take(&self, indices: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            kind: self.kind,
            data: self.data.take(indices),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete table
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// An immutable table of equal-length named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Assemble a dataset, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut names = BTreeSet::new();
        for col in &columns {
            if !names.insert(col.name()) {
                return Err(DataError::DuplicateColumn(col.name().to_string()));
            }
            if col.len() != row_count {
                return Err(DataError::RaggedColumn {
                    column: col.name().to_string(),
                    expected: row_count,
                    found: col.len(),
                });
            }
        }
        Ok(Dataset { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    pub fn columns_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter().filter(move |c| c.kind() == kind)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row: usize) -> Vec<Cell<'_>> {
        self.columns.iter().map(|c| c.cell(row)).collect()
    }

    /// A new dataset holding only the given rows, in the given order.
    pub fn take_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            row_count: indices.len(),
        }
    }

    /// The first `n` rows (or fewer).
    pub fn head(&self, n: usize) -> Dataset {
        let indices: Vec<usize> = (0..n.min(self.row_count)).collect();
        self.take_rows(&indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::categorical("category", [Some("A"), Some("A"), Some("B"), None]),
            Column::numeric("value", [Some(1.0), Some(2.0), None, Some(4.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_kind_is_cached_from_data() {
        let ds = sample();
        assert_eq!(ds.column("category").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(ds.column("value").unwrap().kind(), ColumnKind::Numeric);
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let err = Dataset::new(vec![
            Column::numeric("a", [Some(1.0), Some(2.0)]),
            Column::numeric("b", [Some(1.0)]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DataError::RaggedColumn {
                column: "b".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Dataset::new(vec![
            Column::numeric("a", [Some(1.0)]),
            Column::numeric("a", [Some(2.0)]),
        ])
        .unwrap_err();
        assert_eq!(err, DataError::DuplicateColumn("a".into()));
    }

    #[test]
    fn test_distinct_values_keep_first_appearance() {
        let col = Column::categorical("c", [Some("z"), Some("a"), None, Some("z"), Some("b")]);
        assert_eq!(
            col.distinct_values(),
            vec![Some("z".to_string()), Some("a".to_string()), None, Some("b".to_string())]
        );
    }

    #[test]
    fn test_bounds_skip_missing() {
        let ds = sample();
        assert_eq!(ds.column("value").unwrap().bounds(), Some((1.0, 4.0)));
        assert_eq!(ds.column("category").unwrap().bounds(), None);
        assert_eq!(Column::numeric("n", [None, None]).bounds(), None);
    }

    #[test]
    fn test_take_rows_preserves_columns() {
        let ds = sample();
        let taken = ds.take_rows(&[3, 0]);
        assert_eq!(taken.row_count(), 2);
        assert_eq!(taken.column_names().collect::<Vec<_>>(), vec!["category", "value"]);
        assert_eq!(taken.row(0), vec![Cell::Missing, Cell::Number(4.0)]);
        assert_eq!(taken.row(1), vec![Cell::Text("A"), Cell::Number(1.0)]);
    }

    #[test]
    fn test_zero_row_dataset_keeps_schema() {
        let ds = sample().take_rows(&[]);
        assert!(ds.is_empty());
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.column("value").unwrap().kind(), ColumnKind::Numeric);
    }

    #[test]
    fn test_missing_count() {
        let ds = sample();
        assert_eq!(ds.column("category").unwrap().missing_count(), 1);
        assert_eq!(ds.column("value").unwrap().missing_count(), 1);
    }
}
