use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::NodeKind;

/// Shannon entropy of one node's assignment distribution.
///
/// For a neighborhood, low entropy means its students funnel into few schools.
/// For a school, high entropy means it draws from many neighborhoods.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DiversityIndex {
    pub node_id: String,
    pub node_kind: NodeKind,
    /// Natural-log entropy in `[0, ln(nonzero_categories)]`.
    pub entropy: f64,
    pub nonzero_categories: usize,
}
