//! Aggregation of per-student placements into the pipeline's input snapshots.

use std::collections::{BTreeMap, BTreeSet};

use allot_core::entities::{GenderPreference, GenderSatisfaction, NeighborhoodSatisfaction, SchoolGenderRatio};
use allot_core::enums::Gender;
use allot_core::{AssignmentMatrix, CoreError, SchoolMetrics, StudentPlacement};

/// Neighborhoods with fewer residents are left out of the satisfaction ranking.
pub const MIN_RESIDENTS: u64 = 5;

/// Everything derived from one batch of placement records.
#[derive(Debug, Clone)]
pub struct PlacementSummary {
    /// One row per assigned school, highest competition first.
    pub schools: Vec<SchoolMetrics>,
    pub matrix: AssignmentMatrix,
    /// Least fortunate neighborhoods first.
    pub neighborhoods: Vec<NeighborhoodSatisfaction>,
    /// Schools most favored by male over female applicants first.
    pub gender_preferences: Vec<GenderPreference>,
    /// One row per gender present in the batch.
    pub gender_satisfaction: Vec<GenderSatisfaction>,
    /// Sorted by school id.
    pub school_gender_ratios: Vec<SchoolGenderRatio>,
}

#[derive(Default)]
struct SchoolTally {
    assigned: u64,
    first_choice_assigned: u64,
}

#[derive(Default)]
struct SuccessTally {
    members: u64,
    successes: u64,
}

impl SuccessTally {
    fn record(&mut self, success: bool) {
        self.members += 1;
        if success {
            self.successes += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn success_pct(&self) -> f64 {
        self.successes as f64 / self.members as f64 * 100.0
    }
}

#[derive(Default, Clone, Copy)]
struct GenderTally {
    male: u64,
    female: u64,
}

impl GenderTally {
    const fn add(&mut self, gender: Gender) {
        match gender {
            Gender::Male => self.male += 1,
            Gender::Female => self.female += 1,
        }
    }
}

#[derive(Default)]
struct GenderTables<'a> {
    preferences: BTreeMap<&'a str, GenderTally>,
    satisfaction: BTreeMap<Gender, SuccessTally>,
    assigned: BTreeMap<&'a str, GenderTally>,
}

/// Build school metrics, the assignment matrix, neighborhood satisfaction and
/// the gender breakdowns.
///
/// Records with a blank neighborhood or assigned school are ignored, except
/// that their first-choice mentions still count as applicants. Every
/// first-choice mention counts as one applicant for that school, across all
/// slots. Matrix labels are sorted. Records without a gender only feed the
/// gender-blind tables.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] if the cross-tabulation cannot form a
/// valid matrix.
pub fn aggregate(placements: &[StudentPlacement]) -> Result<PlacementSummary, CoreError> {
    let mut schools: BTreeMap<&str, SchoolTally> = BTreeMap::new();
    let mut applicants: BTreeMap<&str, u64> = BTreeMap::new();
    let mut neighborhoods: BTreeMap<&str, SuccessTally> = BTreeMap::new();
    let mut genders = GenderTables::default();
    let mut cells: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    let mut skipped = 0_usize;

    for placement in placements {
        for choice in &placement.first_choices {
            let choice = choice.trim();
            if !choice.is_empty() {
                *applicants.entry(choice).or_default() += 1;
                if let Some(gender) = placement.gender {
                    genders.preferences.entry(choice).or_default().add(gender);
                }
            }
        }

        let neighborhood = placement.neighborhood.trim();
        let school = placement.assigned_school.trim();
        if neighborhood.is_empty() || school.is_empty() {
            skipped += 1;
            continue;
        }

        let success = placement.first_choices.iter().any(|c| c.trim() == school);
        let tally = schools.entry(school).or_default();
        tally.assigned += 1;
        if success {
            tally.first_choice_assigned += 1;
        }
        neighborhoods.entry(neighborhood).or_default().record(success);
        if let Some(gender) = placement.gender {
            genders.satisfaction.entry(gender).or_default().record(success);
            genders.assigned.entry(school).or_default().add(gender);
        }
        *cells.entry((neighborhood, school)).or_default() += 1;
    }

    if skipped > 0 {
        tracing::debug!(skipped, "placements without neighborhood or assigned school ignored");
    }

    let matrix = crosstab(&neighborhoods, &schools, &cells)?;

    let mut metrics: Vec<SchoolMetrics> = schools
        .iter()
        .map(|(id, tally)| {
            SchoolMetrics::from_counts(
                *id,
                tally.assigned,
                tally.first_choice_assigned,
                applicants.get(id).copied().unwrap_or(0),
            )
        })
        .collect();
    metrics.sort_by(|a, b| {
        b.competition_or_zero()
            .total_cmp(&a.competition_or_zero())
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut satisfaction: Vec<NeighborhoodSatisfaction> = neighborhoods
        .iter()
        .filter(|(_, tally)| tally.members >= MIN_RESIDENTS)
        .map(|(id, tally)| NeighborhoodSatisfaction {
            neighborhood: (*id).to_string(),
            resident_count: tally.members,
            first_choice_success_count: tally.successes,
            success_pct: tally.success_pct(),
        })
        .collect();
    satisfaction.sort_by(|a, b| {
        a.success_pct
            .total_cmp(&b.success_pct)
            .then_with(|| a.neighborhood.cmp(&b.neighborhood))
    });

    Ok(PlacementSummary {
        schools: metrics,
        matrix,
        neighborhoods: satisfaction,
        gender_preferences: gender_preferences(&genders.preferences),
        gender_satisfaction: genders
            .satisfaction
            .iter()
            .map(|(gender, tally)| GenderSatisfaction {
                gender: *gender,
                student_count: tally.members,
                first_choice_success_count: tally.successes,
                success_pct: tally.success_pct(),
            })
            .collect(),
        school_gender_ratios: genders
            .assigned
            .iter()
            .map(|(school, tally)| {
                #[allow(clippy::cast_precision_loss)]
                let male_pct = tally.male as f64 / (tally.male + tally.female) as f64 * 100.0;
                SchoolGenderRatio {
                    school: (*school).to_string(),
                    male_count: tally.male,
                    female_count: tally.female,
                    male_pct,
                }
            })
            .collect(),
    })
}

fn gender_preferences(tallies: &BTreeMap<&str, GenderTally>) -> Vec<GenderPreference> {
    let mut rows: Vec<GenderPreference> = tallies
        .iter()
        .map(|(school, tally)| GenderPreference {
            school: (*school).to_string(),
            male_applicants: tally.male,
            female_applicants: tally.female,
            gap: i64::try_from(tally.male).unwrap_or(i64::MAX) - i64::try_from(tally.female).unwrap_or(i64::MAX),
        })
        .collect();
    rows.sort_by(|a, b| b.gap.cmp(&a.gap).then_with(|| a.school.cmp(&b.school)));
    rows
}

fn crosstab(
    neighborhoods: &BTreeMap<&str, SuccessTally>,
    schools: &BTreeMap<&str, SchoolTally>,
    cells: &BTreeMap<(&str, &str), u64>,
) -> Result<AssignmentMatrix, CoreError> {
    let row_labels: BTreeSet<&str> = neighborhoods.keys().copied().collect();
    let col_labels: Vec<&str> = schools.keys().copied().collect();
    let counts = row_labels
        .iter()
        .map(|n| {
            col_labels
                .iter()
                .map(|s| cells.get(&(*n, *s)).copied().unwrap_or(0))
                .collect()
        })
        .collect();
    AssignmentMatrix::new(
        row_labels.into_iter().map(str::to_string).collect(),
        col_labels.into_iter().map(str::to_string).collect(),
        counts,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn placement(neighborhood: &str, school: &str, choices: &[&str]) -> StudentPlacement {
        StudentPlacement {
            neighborhood: neighborhood.to_string(),
            assigned_school: school.to_string(),
            first_choices: choices.iter().map(ToString::to_string).collect(),
            gender: None,
        }
    }

    fn gendered(gender: Gender, school: &str, choices: &[&str]) -> StudentPlacement {
        StudentPlacement {
            gender: Some(gender),
            ..placement("east", school, choices)
        }
    }

    fn batch() -> Vec<StudentPlacement> {
        let mut records = Vec::new();
        // Five students from "east": three got "alpha" as first choice.
        for _ in 0..3 {
            records.push(placement("east", "alpha", &["alpha"]));
        }
        records.push(placement("east", "beta", &["alpha"]));
        records.push(placement("east", "beta", &["alpha", "beta"]));
        // Five from "west", all sent to "beta" while asking for "alpha".
        for _ in 0..5 {
            records.push(placement("west", "beta", &["alpha"]));
        }
        // Too small to be ranked.
        records.push(placement("north", "alpha", &["beta"]));
        records
    }

    #[test]
    fn school_metrics_count_every_first_choice_mention() {
        let summary = aggregate(&batch()).unwrap();
        let alpha = summary.schools.iter().find(|s| s.id == "alpha").unwrap();
        assert_eq!(alpha.assigned_count, 4);
        assert_eq!(alpha.first_choice_assigned_count, 3);
        assert_eq!(alpha.total_first_choice_applicants, 10);
        assert_eq!(alpha.competition_ratio, Some(2.5));
        assert_eq!(alpha.satisfaction_pct, Some(75.0));

        let beta = summary.schools.iter().find(|s| s.id == "beta").unwrap();
        assert_eq!(beta.assigned_count, 7);
        assert_eq!(beta.first_choice_assigned_count, 1);
        assert_eq!(beta.total_first_choice_applicants, 2);
    }

    #[test]
    fn schools_are_sorted_by_competition_descending() {
        let summary = aggregate(&batch()).unwrap();
        let ids: Vec<&str> = summary.schools.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }

    #[test]
    fn matrix_cross_tabulates_with_sorted_labels() {
        let summary = aggregate(&batch()).unwrap();
        assert_eq!(summary.matrix.neighborhoods(), ["east", "north", "west"]);
        assert_eq!(summary.matrix.schools(), ["alpha", "beta"]);
        assert_eq!(summary.matrix.rows(), [vec![3, 2], vec![1, 0], vec![0, 5]]);
        assert_eq!(summary.matrix.total(), 11);
    }

    #[test]
    fn satisfaction_ranks_least_fortunate_first() {
        let summary = aggregate(&batch()).unwrap();
        let ranked: Vec<(&str, f64)> = summary
            .neighborhoods
            .iter()
            .map(|n| (n.neighborhood.as_str(), n.success_pct))
            .collect();
        assert_eq!(ranked, vec![("west", 0.0), ("east", 80.0)]);
    }

    #[test]
    fn blank_records_are_ignored() {
        let records = vec![placement("", "alpha", &["alpha"]), placement("east", " ", &[])];
        let summary = aggregate(&records).unwrap();
        assert!(summary.schools.is_empty());
        assert!(summary.matrix.is_empty());
    }

    #[test]
    fn gender_preferences_rank_by_male_minus_female_gap() {
        let records = vec![
            gendered(Gender::Male, "alpha", &["alpha"]),
            gendered(Gender::Male, "beta", &["alpha", "beta"]),
            gendered(Gender::Female, "beta", &["beta"]),
            gendered(Gender::Female, "gamma", &["beta"]),
            gendered(Gender::Female, "gamma", &["gamma"]),
            placement("east", "gamma", &["gamma"]),
        ];
        let summary = aggregate(&records).unwrap();
        let rows: Vec<(&str, u64, u64, i64)> = summary
            .gender_preferences
            .iter()
            .map(|p| (p.school.as_str(), p.male_applicants, p.female_applicants, p.gap))
            .collect();
        assert_eq!(
            rows,
            vec![("alpha", 2, 0, 2), ("beta", 1, 2, -1), ("gamma", 0, 1, -1)]
        );
    }

    #[test]
    fn gender_satisfaction_reports_first_choice_success() {
        let records = vec![
            gendered(Gender::Male, "alpha", &["alpha"]),
            gendered(Gender::Male, "beta", &["alpha"]),
            gendered(Gender::Male, "beta", &["alpha"]),
            gendered(Gender::Male, "alpha", &["alpha"]),
            gendered(Gender::Female, "beta", &["beta"]),
            placement("east", "alpha", &["beta"]),
        ];
        let summary = aggregate(&records).unwrap();
        assert_eq!(
            summary.gender_satisfaction,
            vec![
                GenderSatisfaction {
                    gender: Gender::Male,
                    student_count: 4,
                    first_choice_success_count: 2,
                    success_pct: 50.0,
                },
                GenderSatisfaction {
                    gender: Gender::Female,
                    student_count: 1,
                    first_choice_success_count: 1,
                    success_pct: 100.0,
                },
            ]
        );
    }

    #[test]
    fn school_gender_ratio_counts_assigned_students() {
        let records = vec![
            gendered(Gender::Male, "alpha", &[]),
            gendered(Gender::Male, "alpha", &[]),
            gendered(Gender::Male, "alpha", &[]),
            gendered(Gender::Female, "alpha", &[]),
            gendered(Gender::Female, "beta", &[]),
            placement("east", "beta", &[]),
            placement("east", "delta", &[]),
        ];
        let summary = aggregate(&records).unwrap();
        let ratios: Vec<(&str, u64, u64, f64)> = summary
            .school_gender_ratios
            .iter()
            .map(|r| (r.school.as_str(), r.male_count, r.female_count, r.male_pct))
            .collect();
        assert_eq!(ratios, vec![("alpha", 3, 1, 75.0), ("beta", 0, 1, 0.0)]);
    }

    #[test]
    fn ungendered_batch_has_empty_gender_tables() {
        let summary = aggregate(&batch()).unwrap();
        assert!(summary.gender_preferences.is_empty());
        assert!(summary.gender_satisfaction.is_empty());
        assert!(summary.school_gender_ratios.is_empty());
    }
}
