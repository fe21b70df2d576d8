//! Minimum-sample gate in front of the inferential statistics.

use std::collections::HashSet;

use allot_config::ReliabilityConfig;
use allot_core::entities::ReliabilityReport;
use allot_core::{AssignmentMatrix, SchoolMetrics};

use crate::error::AnalyticsError;

/// Fewest retained schools the inferential stages accept.
pub const MIN_RETAINED_SCHOOLS: usize = 3;

/// Drops schools and neighborhoods with too few students.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReliabilityFilter {
    pub min_sample_school: u64,
    pub min_sample_dong: u64,
}

/// Snapshot left after filtering, plus what was dropped.
#[derive(Debug, Clone)]
pub struct FilteredSnapshot {
    pub schools: Vec<SchoolMetrics>,
    /// Retained neighborhoods by retained schools that appear as matrix
    /// columns. Columns without flow from a retained neighborhood are kept;
    /// the dependency test strips them itself.
    pub matrix: AssignmentMatrix,
    pub report: ReliabilityReport,
}

impl From<&ReliabilityConfig> for ReliabilityFilter {
    fn from(config: &ReliabilityConfig) -> Self {
        Self {
            min_sample_school: config.min_sample_school,
            min_sample_dong: config.min_sample_dong,
        }
    }
}

impl ReliabilityFilter {
    /// Build the filtered snapshot. The inputs are not modified.
    ///
    /// Schools present in `schools` but absent from the matrix columns stay in
    /// the school list and are only left out of the matrix side. Duplicate
    /// school identifiers map to a single matrix column.
    #[must_use]
    pub fn apply(&self, schools: &[SchoolMetrics], matrix: &AssignmentMatrix) -> FilteredSnapshot {
        let (retained, excluded): (Vec<&SchoolMetrics>, Vec<&SchoolMetrics>) = schools
            .iter()
            .partition(|s| s.assigned_count >= self.min_sample_school);

        let mut rows = Vec::new();
        let mut dropped_neighborhoods = Vec::new();
        for (i, (name, sum)) in matrix.neighborhoods().iter().zip(matrix.row_sums()).enumerate() {
            if sum >= self.min_sample_dong {
                rows.push(i);
            } else {
                dropped_neighborhoods.push(name.clone());
            }
        }

        let mut seen = HashSet::new();
        let cols: Vec<usize> = retained
            .iter()
            .filter_map(|s| matrix.school_index(&s.id))
            .filter(|col| seen.insert(*col))
            .collect();

        let filtered = matrix.select(&rows, &cols);
        let report = ReliabilityReport {
            min_sample_school: self.min_sample_school,
            min_sample_dong: self.min_sample_dong,
            total_schools: schools.len(),
            retained_schools: retained.len(),
            excluded_schools: excluded.iter().map(|s| s.id.clone()).collect(),
            total_neighborhoods: matrix.n_rows(),
            retained_neighborhoods: rows.len(),
            dropped_neighborhoods,
            matrix_schools: filtered.n_cols(),
        };

        FilteredSnapshot {
            schools: retained.into_iter().cloned().collect(),
            matrix: filtered,
            report,
        }
    }
}

impl FilteredSnapshot {
    /// Whether enough data survived for the inferential stages.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InsufficientData`] if fewer than
    /// [`MIN_RETAINED_SCHOOLS`] schools were kept or the filtered matrix is empty.
    pub fn ensure_sufficient(&self) -> Result<(), AnalyticsError> {
        if self.schools.len() < MIN_RETAINED_SCHOOLS {
            return Err(AnalyticsError::InsufficientData(format!(
                "{} schools have at least {} assigned students, {MIN_RETAINED_SCHOOLS} required",
                self.schools.len(),
                self.report.min_sample_school
            )));
        }
        if self.matrix.is_empty() {
            return Err(AnalyticsError::InsufficientData(format!(
                "filtered matrix is empty ({} neighborhoods x {} schools)",
                self.matrix.n_rows(),
                self.matrix.n_cols()
            )));
        }
        Ok(())
    }
}
