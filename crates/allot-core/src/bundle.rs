//! The result bundle returned by one analytics run.
//!
//! Persistence and rendering collaborators read the bundle through its fixed
//! named keys ([`ResultBundle::KEYS`]); they never need the Rust field layout.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    AnalyzedSchool, CentralityReport, ClusterSummary, CorrelationResult, DependencyTestResult,
    DiversityIndex, FeatureLoading, InteractionMatrix, NeighborhoodDestinations, ReliabilityReport,
};
use crate::enums::Stage;
use crate::errors::CoreError;
use crate::status::{StageReport, StageStatus};

/// Every derived entity of one run plus a status per stage.
///
/// A completed run always yields a full bundle: entries of failed or skipped
/// stages hold empty or degenerate values, and `stages` says which.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResultBundle {
    pub schools: Vec<AnalyzedSchool>,
    pub loadings: Vec<FeatureLoading>,
    pub explained_variance: Vec<f64>,
    pub neighborhood_diversity: Vec<DiversityIndex>,
    pub school_diversity: Vec<DiversityIndex>,
    pub centrality: CentralityReport,
    pub interaction: InteractionMatrix,
    pub destinations: Vec<NeighborhoodDestinations>,
    pub reliability: ReliabilityReport,
    pub cluster_summary: Vec<ClusterSummary>,
    pub dependency_test: DependencyTestResult,
    pub correlation: CorrelationResult,
    pub stages: Vec<StageReport>,
}

impl ResultBundle {
    /// Named keys, one per serialized field.
    pub const KEYS: [&'static str; 13] = [
        "schools",
        "loadings",
        "explained_variance",
        "neighborhood_diversity",
        "school_diversity",
        "centrality",
        "interaction",
        "destinations",
        "reliability",
        "cluster_summary",
        "dependency_test",
        "correlation",
        "stages",
    ];

    /// Status recorded for a stage.
    #[must_use]
    pub fn status(&self, stage: Stage) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|report| report.stage == stage)
            .map(|report| &report.status)
    }

    /// One entry of the bundle as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownKey`] for a key outside [`Self::KEYS`], or
    /// [`CoreError::Serialization`] if the entry cannot be serialized.
    pub fn entry(&self, key: &str) -> Result<serde_json::Value, CoreError> {
        if !Self::KEYS.contains(&key) {
            return Err(CoreError::UnknownKey(key.to_string()));
        }
        let mut value = serde_json::to_value(self)?;
        value
            .get_mut(key)
            .map(serde_json::Value::take)
            .ok_or_else(|| CoreError::UnknownKey(key.to_string()))
    }

    /// Every entry of the bundle as JSON, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the bundle cannot be serialized.
    pub fn named_entries(&self) -> Result<BTreeMap<&'static str, serde_json::Value>, CoreError> {
        let mut value = serde_json::to_value(self)?;
        Ok(Self::KEYS
            .iter()
            .map(|key| {
                let entry = value
                    .get_mut(*key)
                    .map(serde_json::Value::take)
                    .unwrap_or_default();
                (*key, entry)
            })
            .collect())
    }
}

/// JSON Schema of [`ResultBundle`] for external tooling.
#[must_use]
pub fn bundle_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(ResultBundle)).unwrap_or_default()
}
