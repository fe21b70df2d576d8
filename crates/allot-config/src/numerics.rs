//! Numerical guards and iteration caps.

use serde::{Deserialize, Serialize};

const fn default_epsilon() -> f64 {
    1e-9
}

const fn default_centrality_max_iter() -> usize {
    1000
}

const fn default_centrality_tolerance() -> f64 {
    1e-6
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NumericsConfig {
    /// Added inside the logarithm of the entropy terms.
    #[serde(default = "default_epsilon")]
    pub entropy_epsilon: f64,

    /// Added to expected flows before dividing.
    #[serde(default = "default_epsilon")]
    pub interaction_epsilon: f64,

    /// Hard cap on eigenvector-centrality power iterations.
    #[serde(default = "default_centrality_max_iter")]
    pub centrality_max_iter: usize,

    /// Per-node convergence tolerance of the power iteration.
    #[serde(default = "default_centrality_tolerance")]
    pub centrality_tolerance: f64,
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            entropy_epsilon: default_epsilon(),
            interaction_epsilon: default_epsilon(),
            centrality_max_iter: default_centrality_max_iter(),
            centrality_tolerance: default_centrality_tolerance(),
        }
    }
}
