//! Pearson correlation between competition ratio and satisfaction.

use allot_core::SchoolMetrics;
use allot_core::entities::CorrelationResult;
use allot_core::enums::CorrelationStrength;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::AnalyticsError;
use crate::outcome::Outcome;

/// Coefficients below this read as a strong negative relationship.
pub const STRONG_NEGATIVE: f64 = -0.5;

/// Pearson's r and its two-sided p-value (Student-t with `n - 2` degrees of freedom).
///
/// # Errors
///
/// Returns [`AnalyticsError::DegenerateStatistic`] for fewer than three pairs,
/// mismatched lengths, or a constant series.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<(f64, f64), AnalyticsError> {
    let n = x.len();
    if n != y.len() || n < 3 {
        return Err(AnalyticsError::DegenerateStatistic(format!(
            "correlation needs at least 3 pairs, got {} and {}",
            x.len(),
            y.len()
        )));
    }

    #[allow(clippy::cast_precision_loss)]
    let len = n as f64;
    let mean_x = x.iter().sum::<f64>() / len;
    let mean_y = y.iter().sum::<f64>() / len;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= f64::EPSILON || syy <= f64::EPSILON {
        return Err(AnalyticsError::DegenerateStatistic(
            "correlation is undefined for a constant series".to_string(),
        ));
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    let df = len - 2.0;
    if 1.0 - r.abs() < 1e-12 {
        return Ok((r, 0.0));
    }
    let t = r * (df / (1.0 - r * r)).sqrt();
    let distribution = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AnalyticsError::DegenerateStatistic(format!("student-t distribution: {e}")))?;
    let p_value = (2.0 * distribution.sf(t.abs())).clamp(0.0, 1.0);
    Ok((r, p_value))
}

/// Correlate competition ratio with satisfaction across `schools`.
///
/// Missing ratios count as 0. Degenerate inputs yield the null-effect result
/// with a warning.
#[must_use]
pub fn competition_satisfaction(schools: &[SchoolMetrics]) -> Outcome<CorrelationResult> {
    let competition: Vec<f64> = schools.iter().map(SchoolMetrics::competition_or_zero).collect();
    let satisfaction: Vec<f64> = schools.iter().map(SchoolMetrics::satisfaction_or_zero).collect();

    match pearson(&competition, &satisfaction) {
        Ok((coefficient, p_value)) => Outcome::clean(CorrelationResult {
            school_count: schools.len(),
            coefficient,
            p_value,
            strength: if coefficient < STRONG_NEGATIVE {
                CorrelationStrength::StrongNegative
            } else {
                CorrelationStrength::Weak
            },
        }),
        Err(error) => Outcome::degraded(CorrelationResult::insufficient(schools.len()), error),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Schools whose satisfaction is exactly `100 - 10 * competition`.
    fn linear_schools() -> Vec<SchoolMetrics> {
        (1..=6_u64)
            .map(|i| {
                // assigned = 10, applicants = 10 * i -> competition = i,
                // first choices = 10 - i -> satisfaction = 100 - 10 * i.
                SchoolMetrics::from_counts(format!("s{i}"), 10, 10 - i, 10 * i)
            })
            .collect()
    }

    #[test]
    fn linear_decline_is_a_perfect_negative_correlation() {
        let outcome = competition_satisfaction(&linear_schools());
        assert!(outcome.warning.is_none());
        let result = outcome.value;
        assert!((result.coefficient + 1.0).abs() < 1e-9);
        assert!(result.p_value < 1e-6);
        assert_eq!(result.strength, CorrelationStrength::StrongNegative);
        assert_eq!(result.school_count, 6);
        assert_eq!(result.strength.label(), "strong negative relationship");
    }

    #[test]
    fn p_value_matches_reference() {
        // r = 0.8 with n = 5: t = 0.8 * sqrt(3 / 0.36) = 2.3094, two-sided p = 0.1041.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        let (r, p) = pearson(&x, &y).unwrap();
        assert!((r - 0.8).abs() < 1e-12);
        assert!((p - 0.1041).abs() < 1e-3, "p = {p}");
    }

    #[test]
    fn weak_relationship_is_labelled_weak() {
        let result = pearson(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 2.0, 4.0]).unwrap();
        assert!(result.0 > 0.0);
        let schools = vec![
            SchoolMetrics::from_counts("a", 10, 5, 10),
            SchoolMetrics::from_counts("b", 10, 9, 20),
            SchoolMetrics::from_counts("c", 10, 6, 30),
        ];
        assert_eq!(competition_satisfaction(&schools).value.strength, CorrelationStrength::Weak);
    }

    #[test]
    fn fewer_than_three_schools_is_insufficient() {
        let outcome = competition_satisfaction(&linear_schools()[..2]);
        assert!(matches!(outcome.warning, Some(AnalyticsError::DegenerateStatistic(_))));
        assert_eq!(outcome.value, CorrelationResult::insufficient(2));
    }

    #[test]
    fn constant_series_is_insufficient() {
        let schools = vec![SchoolMetrics::from_counts("a", 10, 5, 20); 4];
        let outcome = competition_satisfaction(&schools);
        assert!(outcome.warning.is_some());
        assert_eq!(outcome.value.strength, CorrelationStrength::InsufficientData);
    }
}
