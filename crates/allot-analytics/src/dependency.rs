//! Chi-square test of independence between neighborhood and assigned school.

use allot_core::AssignmentMatrix;
use allot_core::entities::DependencyTestResult;
use allot_core::enums::DependencyVerdict;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::error::AnalyticsError;
use crate::outcome::Outcome;

/// Significance level of the verdict.
pub const ALPHA: f64 = 0.05;

/// Run the test on `matrix` after removing zero-sum rows and columns.
///
/// Applies the Yates continuity correction for 2x2 tables. Cramér's V is
/// `sqrt(chi2 / (N * min(rows - 1, cols - 1)))`. Empty tables and tables with
/// a single row or column yield the null-effect result with a
/// `DegenerateStatistic` warning.
#[must_use]
pub fn chi_square_test(matrix: &AssignmentMatrix) -> Outcome<DependencyTestResult> {
    let table = matrix.without_empty_lines();
    let (rows, cols) = (table.n_rows(), table.n_cols());
    if table.is_empty() {
        return degenerate(rows, cols, "contingency table is empty after removing zero-sum lines");
    }
    let dof = (rows - 1) * (cols - 1);
    if dof == 0 {
        return degenerate(
            rows,
            cols,
            &format!("{rows}x{cols} table has no degrees of freedom"),
        );
    }

    #[allow(clippy::cast_precision_loss)]
    let total = table.total() as f64;
    let row_sums = table.row_sums();
    let col_sums = table.column_sums();
    let yates = dof == 1;

    let mut chi_square = 0.0;
    for (row, &row_sum) in table.rows().iter().zip(&row_sums) {
        for (&observed, &col_sum) in row.iter().zip(&col_sums) {
            #[allow(clippy::cast_precision_loss)]
            let (observed, expected) = (observed as f64, row_sum as f64 * col_sum as f64 / total);
            let mut diff = (observed - expected).abs();
            if yates {
                diff = (diff - 0.5).max(0.0);
            }
            chi_square += diff * diff / expected;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let p_value = match ChiSquared::new(dof as f64) {
        Ok(distribution) => distribution.sf(chi_square).clamp(0.0, 1.0),
        Err(error) => {
            return degenerate(rows, cols, &format!("chi-square distribution: {error}"));
        }
    };

    #[allow(clippy::cast_precision_loss)]
    let min_dim = (rows - 1).min(cols - 1) as f64;
    let cramers_v = if min_dim > 0.0 {
        (chi_square / (total * min_dim)).sqrt().min(1.0)
    } else {
        0.0
    };

    Outcome::clean(DependencyTestResult {
        neighborhood_count: rows,
        school_count: cols,
        chi_square,
        degrees_of_freedom: dof,
        p_value,
        cramers_v,
        verdict: if p_value < ALPHA {
            DependencyVerdict::SignificantDependency
        } else {
            DependencyVerdict::PlausiblyChance
        },
    })
}

fn degenerate(rows: usize, cols: usize, reason: &str) -> Outcome<DependencyTestResult> {
    Outcome::degraded(
        DependencyTestResult::insufficient(rows, cols),
        AnalyticsError::DegenerateStatistic(reason.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn matrix(rows: Vec<Vec<u64>>) -> AssignmentMatrix {
        let neighborhoods = (0..rows.len()).map(|i| format!("n{i}")).collect();
        let schools = (0..rows.first().map_or(0, Vec::len)).map(|j| format!("s{j}")).collect();
        AssignmentMatrix::new(neighborhoods, schools, rows).unwrap()
    }

    #[test]
    fn proportional_rows_look_independent() {
        let outcome = chi_square_test(&matrix(vec![vec![10, 20, 30], vec![20, 40, 60], vec![5, 10, 15]]));
        assert!(outcome.warning.is_none());
        let result = outcome.value;
        assert!(result.p_value > ALPHA);
        assert!(result.chi_square.abs() < 1e-9);
        assert!(result.cramers_v.abs() < 1e-6);
        assert_eq!(result.degrees_of_freedom, 4);
        assert_eq!(result.verdict, DependencyVerdict::PlausiblyChance);
    }

    #[test]
    fn segregated_table_is_significant() {
        let result = chi_square_test(&matrix(vec![vec![40, 2, 1], vec![1, 38, 3], vec![2, 1, 45]])).value;
        assert!(result.p_value < 1e-6);
        assert!(result.cramers_v > 0.8 && result.cramers_v <= 1.0);
        assert_eq!(result.verdict, DependencyVerdict::SignificantDependency);
    }

    #[test]
    fn two_by_two_uses_continuity_correction() {
        let result = chi_square_test(&matrix(vec![vec![50, 0], vec![0, 50]])).value;
        // Each |O - E| = 25 shrinks to 24.5: 4 * 24.5^2 / 25.
        assert!((result.chi_square - 96.04).abs() < 1e-9);
        assert!((result.cramers_v - 0.98).abs() < 1e-9);
        assert_eq!(result.degrees_of_freedom, 1);
    }

    #[test]
    fn zero_sum_lines_are_removed_before_testing() {
        let result = chi_square_test(&matrix(vec![vec![10, 0, 20], vec![0, 0, 0], vec![20, 0, 40]])).value;
        assert_eq!(result.neighborhood_count, 2);
        assert_eq!(result.school_count, 2);
    }

    #[test]
    fn empty_table_is_degenerate() {
        let outcome = chi_square_test(&matrix(vec![vec![0, 0], vec![0, 0]]));
        assert!(matches!(outcome.warning, Some(AnalyticsError::DegenerateStatistic(_))));
        assert_eq!(outcome.value, DependencyTestResult::insufficient(0, 0));
    }

    #[test]
    fn single_column_is_degenerate() {
        let outcome = chi_square_test(&matrix(vec![vec![4], vec![9]]));
        assert!(outcome.warning.is_some());
        assert_eq!(outcome.value.verdict, DependencyVerdict::InsufficientData);
        assert!((outcome.value.p_value - 1.0).abs() < f64::EPSILON);
    }
}
