use std::collections::{BTreeMap, BTreeSet};

use super::model::{Column, ColumnData, Dataset};

// ---------------------------------------------------------------------------
// Filter predicate per column
// ---------------------------------------------------------------------------

/// A per-column inclusion predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Categorical columns: keep rows whose value is in the set.
    /// `None` stands for a missing cell.
    Allowed(BTreeSet<Option<String>>),
    /// Numeric columns: keep rows whose value lies in `[min, max]`.
    /// Missing cells are not constrained by a range.
    Range { min: f64, max: f64 },
}

impl ColumnFilter {
    /// The filter that keeps every row of `column`: all distinct values for
    /// categorical columns, the observed `[min, max]` for numeric ones.
    /// `None` for a numeric column with no observed values.
    pub fn default_for(column: &Column) -> Option<Self> {
        match column.data() {
            ColumnData::Categorical(_) => Some(ColumnFilter::Allowed(
                column.distinct_values().into_iter().collect(),
            )),
            ColumnData::Numeric(_) => column
                .bounds()
                .map(|(min, max)| ColumnFilter::Range { min, max }),
        }
    }

    fn admits(&self, data: &ColumnData, row: usize) -> Option<bool> {
        match (self, data) {
            (ColumnFilter::Allowed(set), ColumnData::Categorical(values)) => {
                Some(set.contains(&values[row]))
            }
            (ColumnFilter::Range { min, max }, ColumnData::Numeric(values)) => {
                Some(values[row].map_or(true, |v| v >= *min && v <= *max))
            }
            _ => None,
        }
    }

    fn fits(&self, column: &Column) -> bool {
        matches!(
            (self, column.data()),
            (ColumnFilter::Allowed(_), ColumnData::Categorical(_))
                | (ColumnFilter::Range { .. }, ColumnData::Numeric(_))
        )
    }
}

/// Active filters: column_name → filter. An absent column is unrestricted.
pub type FilterState = BTreeMap<String, ColumnFilter>;

/// Initialise a [`FilterState`] with every filter at its default, computed
/// from the source dataset so range bounds never shrink as filters change.
pub fn init_filter_state(dataset: &Dataset) -> FilterState {
    dataset
        .columns()
        .iter()
        .filter_map(|col| ColumnFilter::default_for(col).map(|f| (col.name().to_string(), f)))
        .collect()
}

// ---------------------------------------------------------------------------
// Applying filters
// ---------------------------------------------------------------------------

/// Return indices of rows that pass all active filters, in source order.
///
/// Filters naming an unknown column, or whose variant does not match the
/// column kind, are skipped with a warning.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    let active: Vec<(&ColumnFilter, &ColumnData)> = filters
        .iter()
        .filter_map(|(name, filter)| {
            let Some(column) = dataset.column(name) else {
                log::warn!("Ignoring filter on unknown column '{name}'");
                return None;
            };
            if !filter.fits(column) {
                log::warn!(
                    "Ignoring filter on '{name}': does not fit a {} column",
                    column.kind()
                );
                return None;
            }
            Some((filter, column.data()))
        })
        .collect();

    (0..dataset.row_count())
        .filter(|&row| {
            active
                .iter()
                .all(|(filter, data)| filter.admits(data, row).unwrap_or(true))
        })
        .collect()
}

/// Derive a new dataset holding only the rows that pass all filters.
/// The source is left untouched; zero surviving rows is a valid result.
pub fn apply_filters(dataset: &Dataset, filters: &FilterState) -> Dataset {
    let indices = filtered_indices(dataset, filters);
    log::debug!(
        "Filter pass kept {} of {} rows ({} filters)",
        indices.len(),
        dataset.row_count(),
        filters.len()
    );
    dataset.take_rows(&indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Cell;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::categorical("category", [Some("A"), Some("A"), Some("B"), Some("B")]),
            Column::numeric("value", [Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
        ])
        .unwrap()
    }

    fn allowed(values: &[&str]) -> ColumnFilter {
        ColumnFilter::Allowed(values.iter().map(|v| Some(v.to_string())).collect())
    }

    #[test]
    fn test_range_filter_is_inclusive() {
        let ds = sample();
        let mut filters = FilterState::new();
        filters.insert("value".into(), ColumnFilter::Range { min: 2.0, max: 4.0 });
        let out = apply_filters(&ds, &filters);
        assert_eq!(out.row_count(), 3);
        assert_eq!(out.row(0), vec![Cell::Text("A"), Cell::Number(2.0)]);
    }

    #[test]
    fn test_filters_intersect() {
        let ds = sample();
        let mut filters = FilterState::new();
        filters.insert("value".into(), ColumnFilter::Range { min: 2.0, max: 4.0 });
        filters.insert("category".into(), allowed(&["A"]));
        assert_eq!(filtered_indices(&ds, &filters), vec![1]);
    }

    #[test]
    fn test_default_filters_are_identity() {
        let ds = sample();
        let filters = init_filter_state(&ds);
        assert_eq!(filters.len(), 2);
        assert_eq!(apply_filters(&ds, &filters), ds);
    }

    #[test]
    fn test_empty_allowed_set_hides_everything() {
        let ds = sample();
        let mut filters = FilterState::new();
        filters.insert("category".into(), ColumnFilter::Allowed(BTreeSet::new()));
        let out = apply_filters(&ds, &filters);
        assert!(out.is_empty());
        assert_eq!(out.column_count(), 2);
    }

    #[test]
    fn test_missing_values() {
        let ds = Dataset::new(vec![
            Column::categorical("c", [Some("x"), None, Some("y")]),
            Column::numeric("n", [None, Some(5.0), Some(9.0)]),
        ])
        .unwrap();

        let mut filters = init_filter_state(&ds);
        assert_eq!(apply_filters(&ds, &filters), ds);

        filters.insert("n".into(), ColumnFilter::Range { min: 6.0, max: 10.0 });
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 2]);

        filters.insert("c".into(), ColumnFilter::Allowed([None].into_iter().collect()));
        assert!(filtered_indices(&ds, &filters).is_empty());
    }

    #[test]
    fn test_bad_filters_are_ignored() {
        let ds = sample();
        let mut filters = FilterState::new();
        filters.insert("nope".into(), allowed(&["A"]));
        filters.insert("value".into(), allowed(&["A"]));
        filters.insert("category".into(), ColumnFilter::Range { min: 0.0, max: 0.0 });
        assert_eq!(apply_filters(&ds, &filters), ds);
    }

    #[test]
    fn test_source_is_not_mutated() {
        let ds = sample();
        let before = ds.clone();
        let mut filters = FilterState::new();
        filters.insert("category".into(), allowed(&["B"]));
        let _ = apply_filters(&ds, &filters);
        assert_eq!(ds, before);
    }
}
