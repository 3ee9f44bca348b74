//! Pearson correlation over numeric columns.
//!
//! Missing cells are handled pairwise: each coefficient uses only the rows
//! where both columns have a value. A column that is constant over those
//! rows (or has fewer than two of them) has no defined correlation, and the
//! cell is NaN. NaN is reported as-is, never replaced.

use serde::Serialize;

use crate::data::model::Column;

/// Symmetric matrix of correlation coefficients, labelled by column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `values[i][j]` pairs `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }
}

/// Pearson coefficient of two equally long columns, in `[-1, 1]` or NaN.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if pairs.len() < 2
        || is_constant(pairs.iter().map(|p| p.0))
        || is_constant(pairs.iter().map(|p| p.1))
    {
        return f64::NAN;
    }

    // Scale both series into [-1, 1] so the sums below cannot overflow.
    let scale_x = max_abs(pairs.iter().map(|p| p.0));
    let scale_y = max_abs(pairs.iter().map(|p| p.1));
    let pairs: Vec<(f64, f64)> = pairs
        .into_iter()
        .map(|(a, b)| (a / scale_x, b / scale_y))
        .collect();

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sum_xy, mut sum_xx, mut sum_yy) = (0.0, 0.0, 0.0);
    for &(a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    (sum_xy / (sum_xx.sqrt() * sum_yy.sqrt())).clamp(-1.0, 1.0)
}

/// Largest magnitude in a series that is known not to be constant, hence
/// not all zero.
fn max_abs(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc: f64, v| acc.max(v.abs()))
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        None => true,
        Some(first) => values.all(|v| v == first),
    }
}

/// Correlation matrix of numeric columns. Non-numeric columns contribute
/// NaN rows; callers validate kinds first.
pub fn correlation_matrix(columns: &[&Column]) -> CorrelationMatrix {
    let n = columns.len();
    let data: Vec<&[Option<f64>]> = columns
        .iter()
        .map(|c| c.as_numeric().unwrap_or(&[]))
        .collect();

    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        // Self-correlation is 1 whenever the column varies at all.
        let own = pearson(data[i], data[i]);
        values[i][i] = if own.is_nan() { f64::NAN } else { 1.0 };
        for j in (i + 1)..n {
            let r = pearson(data[i], data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.iter().map(|c| c.name().to_string()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_perfect_positive_and_negative() {
        let x = some(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let up = some(&[2.0, 4.0, 6.0, 8.0, 10.0]);
        let down = some(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_relative_eq!(pearson(&x, &up), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &down), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_known_value() {
        let x = some(&[1.0, 2.0, 3.0, 4.0]);
        let y = some(&[1.0, 3.0, 2.0, 4.0]);
        assert_relative_eq!(pearson(&x, &y), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_is_nan() {
        let x = some(&[1.0, 2.0, 3.0]);
        let flat = some(&[0.1, 0.1, 0.1]);
        assert!(pearson(&x, &flat).is_nan());
        assert!(pearson(&flat, &flat).is_nan());
    }

    #[test]
    fn test_huge_magnitudes_do_not_overflow() {
        let x = some(&[1e300, 2e300, 3e300, 4e300]);
        let y = some(&[1e-300, 3e-300, 2e-300, 4e-300]);
        assert_relative_eq!(pearson(&x, &x), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &y), 0.8, epsilon = 1e-12);

        let big = Column::numeric("big", some(&[1e160, -2e160, 5e160]));
        assert_eq!(correlation_matrix(&[&big]).get(0, 0), 1.0);
    }

    #[test]
    fn test_pairwise_complete_observations() {
        let x = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let y = vec![Some(2.0), Some(100.0), Some(4.0), Some(6.0)];
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-12);
        assert!(pearson(&[Some(1.0), None], &[None, Some(1.0)]).is_nan());
    }

    #[test]
    fn test_matrix_shape_and_diagonal() {
        let a = Column::numeric("a", some(&[1.0, 2.0, 3.0]));
        let b = Column::numeric("b", some(&[3.0, 1.0, 2.0]));
        let flat = Column::numeric("flat", some(&[7.0, 7.0, 7.0]));
        let m = correlation_matrix(&[&a, &b, &flat]);

        assert_eq!(m.columns, vec!["a", "b", "flat"]);
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(1, 1), 1.0);
        assert!(m.get(2, 2).is_nan());
        assert!(m.get(0, 2).is_nan());
        assert_eq!(m.get(0, 1), m.get(1, 0));
    }

    #[test]
    fn test_matrix_serializes_nan_as_null() {
        let flat = Column::numeric("flat", some(&[1.0, 1.0]));
        let json = serde_json::to_string(&correlation_matrix(&[&flat])).unwrap();
        assert_eq!(json, r#"{"columns":["flat"],"values":[[null]]}"#);
    }
}
