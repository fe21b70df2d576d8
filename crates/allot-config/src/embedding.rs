//! Dimensionality reduction and probabilistic clustering of schools.

use serde::{Deserialize, Serialize};

const fn default_principal_components() -> usize {
    2
}

const fn default_mixture_components() -> usize {
    4
}

const fn default_seed() -> u64 {
    42
}

const fn default_mixture_max_iter() -> usize {
    100
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Principal axes kept by the reducer; the first two become `pca_x`/`pca_y`.
    #[serde(default = "default_principal_components")]
    pub n_principal_components: usize,

    /// Gaussian mixture components (K).
    #[serde(default = "default_mixture_components")]
    pub n_mixture_components: usize,

    /// Seed for the k-means initialization of the mixture.
    #[serde(default = "default_seed")]
    pub mixture_seed: u64,

    /// EM iteration cap per fit.
    #[serde(default = "default_mixture_max_iter")]
    pub mixture_max_iter: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            n_principal_components: default_principal_components(),
            n_mixture_components: default_mixture_components(),
            mixture_seed: default_seed(),
            mixture_max_iter: default_mixture_max_iter(),
        }
    }
}
