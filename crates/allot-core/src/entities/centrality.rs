use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CentralityMethod, NodeKind};

/// Importance of one node in the neighborhood/school graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CentralityScore {
    pub node_id: String,
    pub node_kind: NodeKind,
    pub score: f64,
}

/// All centrality scores from one run, tagged with the method that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CentralityReport {
    pub method: CentralityMethod,
    pub node_count: usize,
    pub edge_count: usize,
    pub scores: Vec<CentralityScore>,
}

impl CentralityReport {
    /// Score of a node, looked up by kind and identifier.
    #[must_use]
    pub fn score_of(&self, kind: NodeKind, id: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.node_kind == kind && s.node_id == id)
            .map(|s| s.score)
    }
}

impl Default for CentralityReport {
    fn default() -> Self {
        Self {
            method: CentralityMethod::Degree,
            node_count: 0,
            edge_count: 0,
            scores: Vec::new(),
        }
    }
}
