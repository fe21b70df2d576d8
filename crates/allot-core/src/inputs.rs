//! Input snapshots consumed by the analytics pipeline.
//!
//! Both relations are read once per run and never mutated afterwards. Derived
//! snapshots (for example the reliability-filtered matrix) are built as new
//! values through [`AssignmentMatrix::select`].

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Gender;
use crate::errors::CoreError;

/// Indicator names in the order returned by [`SchoolMetrics::indicators`].
pub const INDICATOR_NAMES: [&str; 5] = [
    "assigned_count",
    "first_choice_assigned_count",
    "total_first_choice_applicants",
    "competition_ratio",
    "satisfaction_pct",
];

/// Aggregate assignment metrics for one school.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SchoolMetrics {
    pub id: String,
    pub assigned_count: u64,
    pub first_choice_assigned_count: u64,
    pub total_first_choice_applicants: u64,
    /// `total_first_choice_applicants / assigned_count`; `None` when nobody was assigned.
    pub competition_ratio: Option<f64>,
    /// `first_choice_assigned_count / assigned_count * 100`; `None` when nobody was assigned.
    pub satisfaction_pct: Option<f64>,
}

impl SchoolMetrics {
    /// Build metrics from raw counts, deriving both ratios.
    #[must_use]
    pub fn from_counts(
        id: impl Into<String>,
        assigned_count: u64,
        first_choice_assigned_count: u64,
        total_first_choice_applicants: u64,
    ) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let (competition_ratio, satisfaction_pct) = if assigned_count == 0 {
            (None, None)
        } else {
            let assigned = assigned_count as f64;
            (
                Some(total_first_choice_applicants as f64 / assigned),
                Some(first_choice_assigned_count as f64 / assigned * 100.0),
            )
        };

        Self {
            id: id.into(),
            assigned_count,
            first_choice_assigned_count,
            total_first_choice_applicants,
            competition_ratio,
            satisfaction_pct,
        }
    }

    /// Competition ratio with missing values filled with 0.
    #[must_use]
    pub fn competition_or_zero(&self) -> f64 {
        self.competition_ratio.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    /// Satisfaction percentage with missing values filled with 0.
    #[must_use]
    pub fn satisfaction_or_zero(&self) -> f64 {
        self.satisfaction_pct.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    /// The five indicators, ordered as [`INDICATOR_NAMES`], missing values filled with 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn indicators(&self) -> [f64; 5] {
        [
            self.assigned_count as f64,
            self.first_choice_assigned_count as f64,
            self.total_first_choice_applicants as f64,
            self.competition_or_zero(),
            self.satisfaction_or_zero(),
        ]
    }
}

/// One student's placement record, already parsed and masked by the loader.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StudentPlacement {
    pub neighborhood: String,
    pub assigned_school: String,
    /// Schools listed in the first-choice slots; a student may name several.
    #[serde(default)]
    pub first_choices: Vec<String>,
    /// Absent when the source did not record it; such students are left out
    /// of the gender breakdowns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl StudentPlacement {
    /// Whether the student was placed at one of their first choices.
    #[must_use]
    pub fn got_first_choice(&self) -> bool {
        self.first_choices.iter().any(|s| s == &self.assigned_school)
    }
}

/// Neighborhood-by-school assignment counts.
///
/// Rows are neighborhoods, columns are schools. Counts are unsigned so the
/// non-negativity invariant holds by construction. Deserialization goes
/// through [`AssignmentMatrix::new`], so a decoded matrix is always rectangular.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(try_from = "RawAssignmentMatrix")]
pub struct AssignmentMatrix {
    neighborhoods: Vec<String>,
    schools: Vec<String>,
    counts: Vec<Vec<u64>>,
}

/// Wire shape of [`AssignmentMatrix`] before validation.
#[derive(Deserialize, JsonSchema)]
struct RawAssignmentMatrix {
    neighborhoods: Vec<String>,
    schools: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl TryFrom<RawAssignmentMatrix> for AssignmentMatrix {
    type Error = CoreError;

    fn try_from(raw: RawAssignmentMatrix) -> Result<Self, Self::Error> {
        Self::new(raw.neighborhoods, raw.schools, raw.counts)
    }
}

impl AssignmentMatrix {
    /// Build a matrix, validating its shape and label uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the row count does not match the
    /// neighborhood labels, any row length does not match the school labels,
    /// or a label is duplicated on either axis.
    pub fn new(
        neighborhoods: Vec<String>,
        schools: Vec<String>,
        counts: Vec<Vec<u64>>,
    ) -> Result<Self, CoreError> {
        if counts.len() != neighborhoods.len() {
            return Err(CoreError::Validation(format!(
                "matrix has {} rows but {} neighborhood labels",
                counts.len(),
                neighborhoods.len()
            )));
        }
        if let Some((i, row)) = counts
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != schools.len())
        {
            return Err(CoreError::Validation(format!(
                "row {i} ('{}') has {} cells but there are {} school labels",
                neighborhoods[i],
                row.len(),
                schools.len()
            )));
        }
        ensure_unique("neighborhood", &neighborhoods)?;
        ensure_unique("school", &schools)?;

        Ok(Self {
            neighborhoods,
            schools,
            counts,
        })
    }

    #[must_use]
    pub fn neighborhoods(&self) -> &[String] {
        &self.neighborhoods
    }

    #[must_use]
    pub fn schools(&self) -> &[String] {
        &self.schools
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.counts
    }

    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.neighborhoods.len()
    }

    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.schools.len()
    }

    /// `true` when either axis has no labels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.neighborhoods.is_empty() || self.schools.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.counts[row][col]
    }

    #[must_use]
    pub fn row_sums(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    #[must_use]
    pub fn column_sums(&self) -> Vec<u64> {
        let mut sums = vec![0_u64; self.schools.len()];
        for row in &self.counts {
            for (sum, value) in sums.iter_mut().zip(row) {
                *sum += value;
            }
        }
        sums
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Counts of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = u64> + Clone + '_ {
        self.counts.iter().map(move |row| row[col])
    }

    #[must_use]
    pub fn school_index(&self, school: &str) -> Option<usize> {
        self.schools.iter().position(|s| s == school)
    }

    /// Restrict the matrix to the given row and column indices, in the given order.
    ///
    /// Indices are assumed to be in range and unique.
    #[must_use]
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Self {
        Self {
            neighborhoods: rows.iter().map(|&r| self.neighborhoods[r].clone()).collect(),
            schools: cols.iter().map(|&c| self.schools[c].clone()).collect(),
            counts: rows
                .iter()
                .map(|&r| cols.iter().map(|&c| self.counts[r][c]).collect())
                .collect(),
        }
    }

    /// Drop rows and columns whose sums are zero.
    #[must_use]
    pub fn without_empty_lines(&self) -> Self {
        let rows: Vec<usize> = self
            .row_sums()
            .iter()
            .enumerate()
            .filter(|(_, sum)| **sum > 0)
            .map(|(i, _)| i)
            .collect();
        let cols: Vec<usize> = self
            .column_sums()
            .iter()
            .enumerate()
            .filter(|(_, sum)| **sum > 0)
            .map(|(j, _)| j)
            .collect();
        self.select(&rows, &cols)
    }
}

fn ensure_unique(axis: &str, labels: &[String]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(CoreError::Validation(format!(
                "duplicate {axis} label '{label}'"
            )));
        }
    }
    Ok(())
}
