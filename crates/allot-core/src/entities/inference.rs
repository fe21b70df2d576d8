use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Archetype, CorrelationStrength, DependencyVerdict};

/// What the reliability filter kept and dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReliabilityReport {
    pub min_sample_school: u64,
    pub min_sample_dong: u64,
    pub total_schools: usize,
    pub retained_schools: usize,
    pub excluded_schools: Vec<String>,
    pub total_neighborhoods: usize,
    pub retained_neighborhoods: usize,
    pub dropped_neighborhoods: Vec<String>,
    /// Schools of the filtered matrix (retained schools present as matrix columns).
    pub matrix_schools: usize,
}

/// Per-cluster means of the partition clustering, with its archetype.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClusterSummary {
    pub cluster_id: usize,
    pub school_count: usize,
    pub mean_competition_ratio: f64,
    pub mean_satisfaction_pct: f64,
    pub archetype: Archetype,
}

/// Chi-square test of independence between neighborhood and assigned school.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DependencyTestResult {
    pub neighborhood_count: usize,
    pub school_count: usize,
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    pub cramers_v: f64,
    pub verdict: DependencyVerdict,
}

impl DependencyTestResult {
    /// Null-effect result used when the test cannot run.
    #[must_use]
    pub const fn insufficient(neighborhood_count: usize, school_count: usize) -> Self {
        Self {
            neighborhood_count,
            school_count,
            chi_square: 0.0,
            degrees_of_freedom: 0,
            p_value: 1.0,
            cramers_v: 0.0,
            verdict: DependencyVerdict::InsufficientData,
        }
    }
}

/// Pearson correlation between competition ratio and satisfaction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CorrelationResult {
    pub school_count: usize,
    pub coefficient: f64,
    pub p_value: f64,
    pub strength: CorrelationStrength,
}

impl CorrelationResult {
    /// Null-effect result used when the coefficient cannot be computed.
    #[must_use]
    pub const fn insufficient(school_count: usize) -> Self {
        Self {
            school_count,
            coefficient: 0.0,
            p_value: 1.0,
            strength: CorrelationStrength::InsufficientData,
        }
    }
}
