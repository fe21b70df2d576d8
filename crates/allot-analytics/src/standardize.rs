//! Column-wise standardization of feature tables.

use nalgebra::DMatrix;

/// Standard deviations below this are treated as zero.
const ZERO_VARIANCE: f64 = 1e-12;

/// A standardized table and the statistics used to produce it.
#[derive(Debug, Clone)]
pub struct Standardized {
    /// Rows are samples, columns are features.
    pub data: DMatrix<f64>,
    pub means: Vec<f64>,
    /// Divisor applied to each centered column (1.0 for constant columns).
    pub scales: Vec<f64>,
}

/// Center each column to zero mean and scale it to unit (population) variance.
///
/// Constant columns are centered and left at zero.
#[must_use]
pub fn standardize(table: &DMatrix<f64>) -> Standardized {
    let (n_rows, n_cols) = table.shape();
    let mut data = table.clone();
    let mut means = Vec::with_capacity(n_cols);
    let mut scales = Vec::with_capacity(n_cols);

    if n_rows == 0 {
        return Standardized {
            data,
            means: vec![0.0; n_cols],
            scales: vec![1.0; n_cols],
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let n = n_rows as f64;
    for mut column in data.column_iter_mut() {
        let mean = column.sum() / n;
        let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        let scale = if std > ZERO_VARIANCE { std } else { 1.0 };
        for value in column.iter_mut() {
            *value = (*value - mean) / scale;
        }
        means.push(mean);
        scales.push(scale);
    }

    Standardized {
        data,
        means,
        scales,
    }
}

/// Build a samples x features matrix from row slices.
#[must_use]
pub fn table_from_rows<const N: usize>(rows: &[[f64; N]]) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), N, |i, j| rows[i][j])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_have_zero_mean_unit_variance() {
        let table = table_from_rows(&[[1.0, 10.0], [2.0, 30.0], [3.0, 20.0], [6.0, 40.0]]);
        let out = standardize(&table);

        for column in out.data.column_iter() {
            let mean = column.sum() / 4.0;
            let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 4.0;
            assert!(mean.abs() < 1e-12, "mean was {mean}");
            assert!((variance - 1.0).abs() < 1e-12, "variance was {variance}");
        }
        assert!((out.means[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_stays_at_zero() {
        let table = table_from_rows(&[[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]]);
        let out = standardize(&table);

        assert!(out.data.column(0).iter().all(|v| *v == 0.0));
        assert!((out.scales[0] - 1.0).abs() < f64::EPSILON);
        assert!(out.data.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn empty_table_passes_through() {
        let table = DMatrix::<f64>::zeros(0, 3);
        let out = standardize(&table);
        assert_eq!(out.data.shape(), (0, 3));
        assert_eq!(out.means.len(), 3);
    }
}
