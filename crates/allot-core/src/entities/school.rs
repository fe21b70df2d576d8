use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Archetype;
use crate::inputs::SchoolMetrics;

/// A school's input metrics together with every per-school derived field.
///
/// Derived fields are `None` when the producing stage failed or did not cover
/// the school (archetypes exist only for schools that pass the reliability filter).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalyzedSchool {
    #[serde(flatten)]
    pub metrics: SchoolMetrics,
    pub pca_x: Option<f64>,
    pub pca_y: Option<f64>,
    pub cluster_id: Option<usize>,
    pub cluster_probability: Option<f64>,
    pub partition_cluster: Option<usize>,
    pub archetype: Option<Archetype>,
}

impl AnalyzedSchool {
    #[must_use]
    pub const fn new(metrics: SchoolMetrics) -> Self {
        Self {
            metrics,
            pca_x: None,
            pca_y: None,
            cluster_id: None,
            cluster_probability: None,
            partition_cluster: None,
            archetype: None,
        }
    }
}

/// Contribution of one original indicator to each principal component.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FeatureLoading {
    pub feature: String,
    /// One weight per component, `components[0]` is PC1.
    pub components: Vec<f64>,
}
