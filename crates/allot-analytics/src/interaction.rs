//! Independence-proxy spatial interaction (gravity) ratios and top destinations.

use allot_core::entities::{Destination, InteractionMatrix, NeighborhoodDestinations};
use allot_core::AssignmentMatrix;

/// Destinations kept per neighborhood.
pub const TOP_DESTINATIONS: usize = 3;

/// Observed flow divided by the flow expected if neighborhood and school were independent.
///
/// `expected_ij = row_sum_i * col_sum_j / total`, `ratio_ij = T_ij / (expected_ij + epsilon)`.
/// An all-zero matrix yields zero expectations and zero ratios.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn interaction_ratios(matrix: &AssignmentMatrix, epsilon: f64) -> InteractionMatrix {
    let total = matrix.total() as f64;
    let row_sums = matrix.row_sums();
    let col_sums = matrix.column_sums();

    let mut expected = Vec::with_capacity(matrix.n_rows());
    let mut ratios = Vec::with_capacity(matrix.n_rows());
    for (row, &row_sum) in matrix.rows().iter().zip(&row_sums) {
        let expected_row: Vec<f64> = col_sums
            .iter()
            .map(|&col_sum| {
                if total > 0.0 {
                    row_sum as f64 * col_sum as f64 / total
                } else {
                    0.0
                }
            })
            .collect();
        let ratio_row = row
            .iter()
            .zip(&expected_row)
            .map(|(&observed, e)| observed as f64 / (e + epsilon))
            .collect();
        expected.push(expected_row);
        ratios.push(ratio_row);
    }

    InteractionMatrix {
        neighborhoods: matrix.neighborhoods().to_vec(),
        schools: matrix.schools().to_vec(),
        expected,
        ratios,
    }
}

/// The most common destination schools of each neighborhood, largest first.
///
/// Ties keep matrix column order; zero counts are omitted.
#[must_use]
pub fn top_destinations(matrix: &AssignmentMatrix, limit: usize) -> Vec<NeighborhoodDestinations> {
    matrix
        .neighborhoods()
        .iter()
        .zip(matrix.rows())
        .map(|(neighborhood, row)| {
            let mut ranked: Vec<(usize, u64)> =
                row.iter().copied().enumerate().filter(|(_, c)| *c > 0).collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            NeighborhoodDestinations {
                neighborhood: neighborhood.clone(),
                top: ranked
                    .into_iter()
                    .take(limit)
                    .map(|(j, count)| Destination {
                        school: matrix.schools()[j].clone(),
                        count,
                    })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const EPS: f64 = 1e-9;

    fn matrix(rows: Vec<Vec<u64>>) -> AssignmentMatrix {
        let neighborhoods = (0..rows.len()).map(|i| format!("n{i}")).collect();
        let schools = (0..rows[0].len()).map(|j| format!("s{j}")).collect();
        AssignmentMatrix::new(neighborhoods, schools, rows).unwrap()
    }

    #[test]
    fn diagonal_matrix_doubles_on_diagonal() {
        let out = interaction_ratios(&matrix(vec![vec![10, 0], vec![0, 10]]), EPS);
        assert_eq!(out.expected, vec![vec![5.0, 5.0], vec![5.0, 5.0]]);
        assert!((out.ratios[0][0] - 2.0).abs() < 1e-9);
        assert!((out.ratios[1][1] - 2.0).abs() < 1e-9);
        assert!(out.ratios[0][1].abs() < 1e-12);
        assert!(out.ratios[1][0].abs() < 1e-12);
    }

    #[test]
    fn expected_preserves_the_grand_total() {
        let m = matrix(vec![vec![3, 7, 0, 2], vec![11, 0, 5, 1], vec![0, 4, 4, 9]]);
        let out = interaction_ratios(&m, EPS);
        let expected_total: f64 = out.expected.iter().flatten().sum();
        #[allow(clippy::cast_precision_loss)]
        let observed_total = m.total() as f64;
        assert!((expected_total - observed_total).abs() < 1e-9);
        assert_eq!(out.ratios.len(), 3);
        assert!(out.ratios.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn independent_matrix_has_unit_ratios() {
        let out = interaction_ratios(&matrix(vec![vec![1, 2, 3], vec![2, 4, 6]]), EPS);
        for ratio in out.ratios.iter().flatten() {
            assert!((ratio - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn all_zero_matrix_yields_zeros() {
        let out = interaction_ratios(&matrix(vec![vec![0, 0], vec![0, 0]]), EPS);
        assert!(out.expected.iter().flatten().all(|e| *e == 0.0));
        assert!(out.ratios.iter().flatten().all(|r| *r == 0.0));
    }

    #[test]
    fn destinations_rank_by_count_then_column() {
        let m = matrix(vec![vec![2, 9, 2, 0, 5], vec![0, 0, 0, 0, 0]]);
        let out = top_destinations(&m, TOP_DESTINATIONS);
        let top: Vec<(&str, u64)> = out[0]
            .top
            .iter()
            .map(|d| (d.school.as_str(), d.count))
            .collect();
        assert_eq!(top, vec![("s1", 9), ("s4", 5), ("s0", 2)]);
        assert!(out[1].top.is_empty());
    }
}
