use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Observed/expected flow ratios under the independence model.
///
/// Same shape as the assignment matrix it was computed from. A ratio above 1
/// marks above-expected affinity between a neighborhood and a school.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct InteractionMatrix {
    pub neighborhoods: Vec<String>,
    pub schools: Vec<String>,
    pub expected: Vec<Vec<f64>>,
    pub ratios: Vec<Vec<f64>>,
}

/// One destination school of a neighborhood.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Destination {
    pub school: String,
    pub count: u64,
}

/// The schools a neighborhood's students most often end up in, largest first.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NeighborhoodDestinations {
    pub neighborhood: String,
    pub top: Vec<Destination>,
}
