//! Invariants of the individual components, checked through the public API.

use allot_analytics::correlation::competition_satisfaction;
use allot_analytics::dependency::chi_square_test;
use allot_analytics::diversity::{neighborhood_diversity, school_diversity};
use allot_analytics::interaction::interaction_ratios;
use allot_analytics::mixture::{MixtureParams, fit_with_recovery};
use allot_analytics::standardize::{standardize, table_from_rows};
use allot_analytics::ReliabilityFilter;
use allot_core::enums::CorrelationStrength;
use allot_core::{AssignmentMatrix, SchoolMetrics};
use pretty_assertions::assert_eq;
use rstest::rstest;

const EPS: f64 = 1e-9;

fn matrix(rows: Vec<Vec<u64>>) -> AssignmentMatrix {
    let neighborhoods = (0..rows.len()).map(|i| format!("n{i}")).collect();
    let schools = (0..rows[0].len()).map(|j| format!("s{j}")).collect();
    AssignmentMatrix::new(neighborhoods, schools, rows).unwrap()
}

#[rstest]
#[case(vec![vec![10, 0], vec![0, 10]])]
#[case(vec![vec![3, 3, 3], vec![1, 0, 8], vec![0, 0, 0]])]
#[case(vec![vec![50, 1, 1, 1], vec![2, 2, 2, 2], vec![0, 7, 0, 0]])]
fn row_entropy_stays_within_its_bounds(#[case] rows: Vec<Vec<u64>>) {
    let m = matrix(rows);
    for (index, row) in neighborhood_diversity(&m, EPS).iter().zip(m.rows()) {
        let nonzero: Vec<u64> = row.iter().copied().filter(|c| *c > 0).collect();
        #[allow(clippy::cast_precision_loss)]
        let bound = (nonzero.len().max(1) as f64).ln();
        assert!(index.entropy >= 0.0);
        assert!(index.entropy <= bound + 1e-6, "{index:?}");

        let uniform = nonzero.windows(2).all(|w| w[0] == w[1]);
        assert_eq!((index.entropy - bound).abs() < 1e-6, uniform, "{row:?}");
    }
}

#[test]
fn perfectly_concentrated_matrix() {
    let m = matrix(vec![vec![10, 0], vec![0, 10]]);
    assert!(neighborhood_diversity(&m, EPS).iter().all(|d| d.entropy.abs() < 1e-12));
    assert!(school_diversity(&m, EPS).iter().all(|d| d.entropy.abs() < 1e-12));

    let interaction = interaction_ratios(&m, EPS);
    assert_eq!(interaction.expected, vec![vec![5.0, 5.0], vec![5.0, 5.0]]);
    let rounded: Vec<Vec<f64>> = interaction
        .ratios
        .iter()
        .map(|row| row.iter().map(|r| (r * 1e6).round() / 1e6).collect())
        .collect();
    assert_eq!(rounded, vec![vec![2.0, 0.0], vec![0.0, 2.0]]);
}

#[rstest]
#[case(vec![vec![1, 2], vec![3, 4]])]
#[case(vec![vec![0, 9, 1, 4], vec![12, 0, 0, 3], vec![5, 5, 5, 5]])]
#[case(vec![vec![100], vec![1]])]
fn independence_model_preserves_the_total(#[case] rows: Vec<Vec<u64>>) {
    let m = matrix(rows);
    let expected: f64 = interaction_ratios(&m, EPS).expected.iter().flatten().sum();
    #[allow(clippy::cast_precision_loss)]
    let total = m.total() as f64;
    assert!((expected - total).abs() < 1e-9);
}

#[test]
fn standardized_columns_have_zero_mean_and_unit_variance() {
    let table = table_from_rows(&[
        [1.0, 10.0, 4.0],
        [2.0, 30.0, 4.0],
        [3.0, 20.0, 4.0],
        [4.0, 60.0, 4.0],
    ]);
    let standardized = standardize(&table).data;
    for (j, column) in standardized.column_iter().enumerate() {
        let mean = column.mean();
        let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12, "column {j}");
        if j == 2 {
            assert!(column.iter().all(|v| *v == 0.0));
        } else {
            assert!((variance - 1.0).abs() < 1e-9, "column {j}");
        }
    }
}

#[test]
fn mixture_labels_are_in_range_and_reproducible() {
    let points: Vec<Vec<f64>> = (0..16)
        .map(|i| {
            let t = f64::from(i);
            vec![(t * 0.7).sin() * 4.0, (t * 1.3).cos() * 2.0]
        })
        .collect();
    let params = MixtureParams {
        n_components: 4,
        seed: 42,
        max_iter: 100,
    };
    let first = fit_with_recovery(&points, params).value;
    let second = fit_with_recovery(&points, params).value;
    assert!(first.labels.iter().all(|l| *l < 4));
    assert!(first.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    assert_eq!(first.labels, second.labels);
}

#[rstest]
#[case(1, 1)]
#[case(10, 10)]
#[case(25, 5)]
fn filter_thresholds_hold(#[case] min_school: u64, #[case] min_dong: u64) {
    let schools: Vec<SchoolMetrics> = (0..8_u64)
        .map(|i| SchoolMetrics::from_counts(format!("s{i}"), i * 5, i * 2, i * 8))
        .collect();
    let m = matrix(vec![
        vec![0, 1, 2, 3, 4, 5, 6, 7],
        vec![0, 0, 0, 1, 0, 2, 0, 1],
        vec![0, 4, 8, 11, 16, 18, 24, 27],
    ]);
    let snapshot = ReliabilityFilter {
        min_sample_school: min_school,
        min_sample_dong: min_dong,
    }
    .apply(&schools, &m);

    assert!(snapshot.schools.iter().all(|s| s.assigned_count >= min_school));
    assert!(snapshot.matrix.row_sums().iter().all(|sum| *sum >= min_dong));
    assert!(
        snapshot
            .matrix
            .schools()
            .iter()
            .all(|id| snapshot.schools.iter().any(|s| &s.id == id))
    );
    assert_eq!(
        snapshot.report.retained_schools + snapshot.report.excluded_schools.len(),
        schools.len()
    );
}

#[test]
fn exactly_proportional_table_is_not_significant() {
    let result = chi_square_test(&matrix(vec![vec![6, 12, 18, 24], vec![3, 6, 9, 12], vec![9, 18, 27, 36]])).value;
    assert!(result.p_value > 0.05);
}

#[test]
fn satisfaction_falling_with_competition_is_strongly_negative() {
    let schools: Vec<SchoolMetrics> = (1..=8_u64)
        .map(|c| SchoolMetrics::from_counts(format!("s{c}"), 10, 10 - c, 10 * c))
        .collect();
    let result = competition_satisfaction(&schools).value;
    assert!((result.coefficient + 1.0).abs() < 1e-9);
    assert_eq!(result.strength, CorrelationStrength::StrongNegative);
}
