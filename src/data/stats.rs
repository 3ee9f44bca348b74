use std::collections::HashMap;

use super::model::{ColumnData, ColumnKind, Dataset};

// ---------------------------------------------------------------------------
// Dataset overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnOverview {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

/// Shape, column names and kinds, and missing-value counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub rows: usize,
    pub columns: Vec<ColumnOverview>,
}

pub fn overview(dataset: &Dataset) -> Overview {
    Overview {
        rows: dataset.row_count(),
        columns: dataset
            .columns()
            .iter()
            .map(|c| ColumnOverview {
                name: c.name().to_string(),
                kind: c.kind(),
                missing: c.missing_count(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Describe every column: moments and quartiles for numeric columns,
/// cardinality and the most frequent label for categorical ones.
pub fn describe(dataset: &Dataset) -> Vec<(String, Summary)> {
    dataset
        .columns()
        .iter()
        .map(|c| {
            let summary = match c.data() {
                ColumnData::Numeric(values) => Summary::Numeric(numeric_summary(values)),
                ColumnData::Categorical(values) => {
                    Summary::Categorical(categorical_summary(values))
                }
            };
            (c.name().to_string(), summary)
        })
        .collect()
}

fn numeric_summary(values: &[Option<f64>]) -> NumericSummary {
    let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
    observed.sort_by(f64::total_cmp);
    let count = observed.len();

    let mean = if count == 0 {
        f64::NAN
    } else {
        observed.iter().sum::<f64>() / count as f64
    };
    // Sample standard deviation (n - 1).
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = observed.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };

    NumericSummary {
        count,
        mean,
        std,
        min: observed.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&observed, 0.25),
        median: quantile(&observed, 0.5),
        q75: quantile(&observed, 0.75),
        max: observed.last().copied().unwrap_or(f64::NAN),
    }
}

fn categorical_summary(values: &[Option<String>]) -> CategoricalSummary {
    let counts = value_counts(values);
    let (top, freq) = counts
        .first()
        .map_or((None, 0), |(label, n)| (Some(label.clone()), *n));
    CategoricalSummary {
        count: values.iter().flatten().count(),
        unique: counts.len(),
        top,
        freq,
    }
}

/// Linear-interpolated quantile of an ascending slice; NaN when empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Frequency of each non-missing label: descending count, ties broken by
/// first appearance.
pub fn value_counts(values: &[Option<String>]) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values.iter().flatten() {
        let n = counts.entry(v.as_str()).or_insert(0);
        if *n == 0 {
            order.push(v);
        }
        *n += 1;
    }
    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|label| (label.to_string(), counts[label]))
        .collect();
    // Stable sort keeps first-appearance order among equal counts.
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::model::Column;

    fn labels(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(&labels(&["b", "a", "a", "c", "b", "a"]));
        assert_eq!(
            counts,
            vec![("a".to_string(), 3), ("b".to_string(), 2), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn test_value_counts_ties_keep_first_appearance() {
        let counts = value_counts(&labels(&["y", "x", "x", "y", "z"]));
        assert_eq!(counts[0].0, "y");
        assert_eq!(counts[1].0, "x");
        assert_eq!(counts[2].0, "z");
    }

    #[test]
    fn test_value_counts_skip_missing() {
        let mut values = labels(&["a"]);
        values.push(None);
        values.push(None);
        assert_eq!(value_counts(&values), vec![("a".to_string(), 1)]);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&sorted, 0.25), 1.75);
        assert_relative_eq!(quantile(&sorted, 0.5), 2.5);
        assert_relative_eq!(quantile(&sorted, 1.0), 4.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_describe_numeric() {
        let ds = Dataset::new(vec![Column::numeric(
            "v",
            [Some(4.0), None, Some(1.0), Some(3.0), Some(2.0)],
        )])
        .unwrap();
        let Summary::Numeric(s) = &describe(&ds)[0].1 else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.count, 4);
        assert_relative_eq!(s.mean, 2.5);
        assert_relative_eq!(s.std, (5.0f64 / 3.0).sqrt());
        assert_relative_eq!(s.min, 1.0);
        assert_relative_eq!(s.median, 2.5);
        assert_relative_eq!(s.max, 4.0);
    }

    #[test]
    fn test_describe_categorical() {
        let ds = Dataset::new(vec![Column::categorical(
            "c",
            [Some("x"), Some("y"), Some("y"), None],
        )])
        .unwrap();
        let Summary::Categorical(s) = &describe(&ds)[0].1 else {
            panic!("expected categorical summary");
        };
        assert_eq!(s.count, 3);
        assert_eq!(s.unique, 2);
        assert_eq!(s.top.as_deref(), Some("y"));
        assert_eq!(s.freq, 2);
    }

    #[test]
    fn test_describe_empty_dataset() {
        let ds = Dataset::new(vec![Column::numeric("v", [])]).unwrap();
        let Summary::Numeric(s) = &describe(&ds)[0].1 else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
        assert!(s.max.is_nan());
    }

    #[test]
    fn test_overview_counts_missing() {
        let ds = Dataset::new(vec![
            Column::categorical("c", [Some("x"), None]),
            Column::numeric("n", [None, None]),
        ])
        .unwrap();
        let ov = overview(&ds);
        assert_eq!(ov.rows, 2);
        assert_eq!(ov.columns[0].missing, 1);
        assert_eq!(ov.columns[1].missing, 2);
        assert_eq!(ov.columns[1].kind, ColumnKind::Numeric);
    }
}
