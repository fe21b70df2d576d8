//! The `analyze` entry point.
//!
//! Stages over the unfiltered snapshot (embedding, mixture clustering,
//! diversity, centrality, interaction, destinations) are independent of each
//! other. The inference stage derives its own filtered snapshot. Every
//! stage-local problem is caught at the stage boundary and recorded in the
//! bundle's status list; a completed run always returns a full bundle.

use allot_config::AnalysisConfig;
use allot_core::entities::{
    AnalyzedSchool, CentralityReport, CorrelationResult, DependencyTestResult, InteractionMatrix,
    ReliabilityReport,
};
use allot_core::enums::Stage;
use allot_core::inputs::INDICATOR_NAMES;
use allot_core::{AssignmentMatrix, CoreError, ResultBundle, SchoolMetrics, StageReport, StageStatus, StudentPlacement};

use crate::aggregate::{self, PlacementSummary};
use crate::diversity;
use crate::error::AnalyticsError;
use crate::inference::InferenceStage;
use crate::interaction::{self, TOP_DESTINATIONS};
use crate::mixture::{self, MixtureParams};
use crate::network;
use crate::reduce::{self, Embedding};
use crate::standardize::{standardize, table_from_rows};

/// Run every stage over one snapshot.
///
/// The inputs are only read. An invalid `config` marks every stage as failed
/// instead of running any of them.
#[must_use]
pub fn analyze(
    schools: &[SchoolMetrics],
    matrix: &AssignmentMatrix,
    config: &AnalysisConfig,
) -> ResultBundle {
    if let Err(error) = config.validate() {
        let error = AnalyticsError::InvalidConfiguration(error.to_string());
        tracing::warn!(%error, "analysis not run");
        return failed_bundle(schools, &error);
    }

    let mut stages = Vec::with_capacity(Stage::ALL.len());
    let mut analyzed: Vec<AnalyzedSchool> = schools.iter().cloned().map(AnalyzedSchool::new).collect();
    let mut loadings = Vec::new();
    let mut explained_variance = Vec::new();

    // Embedding and mixture clustering.
    match embed(schools, config.embedding.n_principal_components) {
        Ok(embedding) => {
            tracing::info!(
                schools = schools.len(),
                components = embedding.explained_variance_ratio.len(),
                "embedding computed"
            );
            for (i, school) in analyzed.iter_mut().enumerate() {
                school.pca_x = embedding.coordinates.get((i, 0)).copied();
                school.pca_y = embedding.coordinates.get((i, 1)).copied();
            }

            let mixture = mixture::fit_with_recovery(
                &embedding.points(),
                MixtureParams {
                    n_components: config.embedding.n_mixture_components,
                    seed: config.embedding.mixture_seed,
                    max_iter: config.embedding.mixture_max_iter,
                },
            );
            if let Some(error) = &mixture.warning {
                tracing::warn!(%error, "mixture clustering degraded");
            }
            for ((school, &label), &probability) in analyzed
                .iter_mut()
                .zip(&mixture.value.labels)
                .zip(&mixture.value.probabilities)
            {
                school.cluster_id = Some(label);
                school.cluster_probability = Some(probability);
            }

            stages.push(StageReport::new(Stage::Embedding, StageStatus::Success));
            stages.push(StageReport::new(Stage::MixtureClustering, mixture.status()));
            loadings = embedding.loadings;
            explained_variance = embedding.explained_variance_ratio;
        }
        Err(error) => {
            tracing::warn!(%error, "embedding failed");
            stages.push(StageReport::new(Stage::Embedding, error.as_failed()));
            stages.push(StageReport::new(Stage::MixtureClustering, error.as_skipped()));
        }
    }

    // Matrix-only stages.
    let neighborhood_diversity = diversity::neighborhood_diversity(matrix, config.numerics.entropy_epsilon);
    let school_diversity = diversity::school_diversity(matrix, config.numerics.entropy_epsilon);
    stages.push(StageReport::new(Stage::Diversity, StageStatus::Success));

    let centrality = network::centrality(
        matrix,
        config.numerics.centrality_max_iter,
        config.numerics.centrality_tolerance,
    );
    if let Some(error) = &centrality.warning {
        tracing::warn!(%error, "centrality degraded");
    }
    stages.push(StageReport::new(Stage::Centrality, centrality.status()));

    let interaction = interaction::interaction_ratios(matrix, config.numerics.interaction_epsilon);
    stages.push(StageReport::new(Stage::Interaction, StageStatus::Success));

    let destinations = interaction::top_destinations(matrix, TOP_DESTINATIONS);
    stages.push(StageReport::new(Stage::Destinations, StageStatus::Success));

    tracing::info!(
        neighborhoods = matrix.n_rows(),
        schools = matrix.n_cols(),
        centrality = %centrality.value.method,
        "matrix stages computed"
    );

    // Reliability-gated inference.
    let inference = InferenceStage::from(config).run(schools, matrix);
    for school in &mut analyzed {
        if let Some(assignment) = inference
            .assignments
            .iter()
            .find(|a| a.school_id == school.metrics.id)
        {
            school.partition_cluster = Some(assignment.cluster_id);
            school.archetype = assignment.archetype;
        }
    }
    stages.extend(inference.stages);
    stages.sort_by_key(|r| r.stage);

    ResultBundle {
        schools: analyzed,
        loadings,
        explained_variance,
        neighborhood_diversity,
        school_diversity,
        centrality: centrality.value,
        interaction,
        destinations,
        reliability: inference.reliability,
        cluster_summary: inference.cluster_summary,
        dependency_test: inference.dependency_test,
        correlation: inference.correlation,
        stages,
    }
}

/// Aggregate raw placements, then analyze the resulting snapshot.
///
/// # Errors
///
/// Returns [`CoreError`] if the placements cannot be cross-tabulated.
pub fn analyze_placements(
    placements: &[StudentPlacement],
    config: &AnalysisConfig,
) -> Result<(PlacementSummary, ResultBundle), CoreError> {
    let summary = aggregate::aggregate(placements)?;
    let bundle = analyze(&summary.schools, &summary.matrix, config);
    Ok((summary, bundle))
}

fn embed(schools: &[SchoolMetrics], n_components: usize) -> Result<Embedding, AnalyticsError> {
    let rows: Vec<[f64; 5]> = schools.iter().map(SchoolMetrics::indicators).collect();
    let standardized = standardize(&table_from_rows(rows.as_slice()));
    reduce::principal_components(&standardized.data, &INDICATOR_NAMES, n_components)
}

fn failed_bundle(schools: &[SchoolMetrics], error: &AnalyticsError) -> ResultBundle {
    ResultBundle {
        schools: schools.iter().cloned().map(AnalyzedSchool::new).collect(),
        loadings: Vec::new(),
        explained_variance: Vec::new(),
        neighborhood_diversity: Vec::new(),
        school_diversity: Vec::new(),
        centrality: CentralityReport::default(),
        interaction: InteractionMatrix::default(),
        destinations: Vec::new(),
        reliability: ReliabilityReport::default(),
        cluster_summary: Vec::new(),
        dependency_test: DependencyTestResult::insufficient(0, 0),
        correlation: CorrelationResult::insufficient(0),
        stages: Stage::ALL
            .into_iter()
            .map(|stage| StageReport::new(stage, error.as_failed()))
            .collect(),
    }
}
