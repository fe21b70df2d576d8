//! Reliability-gated inference: filter, partition clustering, dependency test, correlation.
//!
//! One stage parameterized by its filter thresholds and clustering settings, so
//! the same code serves the main run and any re-run with other thresholds.

use allot_config::{AnalysisConfig, PartitionConfig};
use allot_core::entities::{ClusterSummary, CorrelationResult, DependencyTestResult, ReliabilityReport};
use allot_core::enums::{Archetype, Stage};
use allot_core::{AssignmentMatrix, SchoolMetrics, StageReport, StageStatus};

use crate::archetype;
use crate::correlation;
use crate::dependency;
use crate::reliability::ReliabilityFilter;

/// Archetype membership of one retained school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeAssignment {
    pub school_id: String,
    pub cluster_id: usize,
    pub archetype: Option<Archetype>,
}

/// Everything the inferential stages produce, plus one status per stage.
#[derive(Debug, Clone)]
pub struct InferenceOutput {
    pub reliability: ReliabilityReport,
    pub assignments: Vec<ArchetypeAssignment>,
    pub cluster_summary: Vec<ClusterSummary>,
    pub dependency_test: DependencyTestResult,
    pub correlation: CorrelationResult,
    /// Reliability, partition clustering, dependency test, correlation, in that order.
    pub stages: Vec<StageReport>,
}

#[derive(Debug, Clone)]
pub struct InferenceStage {
    pub filter: ReliabilityFilter,
    pub partition: PartitionConfig,
}

impl From<&AnalysisConfig> for InferenceStage {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            filter: ReliabilityFilter::from(&config.reliability),
            partition: config.partition.clone(),
        }
    }
}

impl InferenceStage {
    /// Filter the snapshot, then run the three inferential components on it.
    ///
    /// If too little data survives, the downstream components are skipped and
    /// hold their null-effect results.
    #[must_use]
    pub fn run(&self, schools: &[SchoolMetrics], matrix: &AssignmentMatrix) -> InferenceOutput {
        let snapshot = self.filter.apply(schools, matrix);
        tracing::info!(
            retained_schools = snapshot.report.retained_schools,
            retained_neighborhoods = snapshot.report.retained_neighborhoods,
            matrix_schools = snapshot.report.matrix_schools,
            "reliability filter applied"
        );

        if let Err(error) = snapshot.ensure_sufficient() {
            tracing::warn!(%error, "skipping inferential stages");
            let skipped = error.as_skipped();
            return InferenceOutput {
                assignments: Vec::new(),
                cluster_summary: Vec::new(),
                dependency_test: DependencyTestResult::insufficient(
                    snapshot.matrix.n_rows(),
                    snapshot.matrix.n_cols(),
                ),
                correlation: CorrelationResult::insufficient(snapshot.schools.len()),
                stages: vec![
                    StageReport::new(Stage::Reliability, error.as_warning()),
                    StageReport::new(Stage::PartitionClustering, skipped.clone()),
                    StageReport::new(Stage::DependencyTest, skipped.clone()),
                    StageReport::new(Stage::Correlation, skipped),
                ],
                reliability: snapshot.report,
            };
        }

        let partition = archetype::partition(&snapshot.schools, &self.partition);
        let dependency = dependency::chi_square_test(&snapshot.matrix);
        let correlation = correlation::competition_satisfaction(&snapshot.schools);

        for (stage, warning) in [
            (Stage::PartitionClustering, &partition.warning),
            (Stage::DependencyTest, &dependency.warning),
            (Stage::Correlation, &correlation.warning),
        ] {
            if let Some(error) = warning {
                tracing::warn!(%error, stage = %stage, "inferential stage degraded");
            }
        }

        let assignments = snapshot
            .schools
            .iter()
            .zip(&partition.value.labels)
            .enumerate()
            .map(|(i, (school, &cluster_id))| ArchetypeAssignment {
                school_id: school.id.clone(),
                cluster_id,
                archetype: partition.value.archetype_of(i),
            })
            .collect();

        InferenceOutput {
            reliability: snapshot.report,
            assignments,
            stages: vec![
                StageReport::new(Stage::Reliability, StageStatus::Success),
                StageReport::new(Stage::PartitionClustering, partition.status()),
                StageReport::new(Stage::DependencyTest, dependency.status()),
                StageReport::new(Stage::Correlation, correlation.status()),
            ],
            cluster_summary: partition.value.summaries,
            dependency_test: dependency.value,
            correlation: correlation.value,
        }
    }
}
