//! K-means archetype clustering of reliable schools.

use serde::{Deserialize, Serialize};

const fn default_seed() -> u64 {
    42
}

const fn default_n_init() -> usize {
    10
}

const fn default_max_iter() -> usize {
    300
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PartitionConfig {
    #[serde(default = "default_seed")]
    pub kmeans_seed: u64,

    /// Independent k-means++ initializations; the lowest-inertia run wins.
    #[serde(default = "default_n_init")]
    pub kmeans_n_init: usize,

    /// Lloyd iteration cap per initialization.
    #[serde(default = "default_max_iter")]
    pub kmeans_max_iter: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            kmeans_seed: default_seed(),
            kmeans_n_init: default_n_init(),
            kmeans_max_iter: default_max_iter(),
        }
    }
}
