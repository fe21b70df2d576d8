//! Principal component projection of standardized school indicators.

use std::cmp::Ordering;

use allot_core::entities::FeatureLoading;
use nalgebra::{DMatrix, SymmetricEigen};

use crate::error::AnalyticsError;

/// Projection of every sample onto the leading principal axes.
#[derive(Debug, Clone)]
pub struct Embedding {
    /// One row per sample, one column per component.
    pub coordinates: DMatrix<f64>,
    pub loadings: Vec<FeatureLoading>,
    /// Share of total variance carried by each component.
    pub explained_variance_ratio: Vec<f64>,
}

impl Embedding {
    /// Coordinates of one sample as a vector.
    #[must_use]
    pub fn point(&self, sample: usize) -> Vec<f64> {
        self.coordinates.row(sample).iter().copied().collect()
    }

    #[must_use]
    pub fn points(&self) -> Vec<Vec<f64>> {
        (0..self.coordinates.nrows()).map(|i| self.point(i)).collect()
    }
}

/// Project standardized data onto its `n_components` principal axes.
///
/// Axes come from the eigen-decomposition of the sample covariance matrix,
/// ordered by decreasing eigenvalue. Each axis is oriented so that its
/// largest-magnitude loading is positive, which makes the output deterministic.
///
/// # Errors
///
/// Returns [`AnalyticsError::Dimensionality`] if there are fewer features or
/// fewer samples than requested components, or no components are requested.
pub fn principal_components(
    standardized: &DMatrix<f64>,
    feature_names: &[&str],
    n_components: usize,
) -> Result<Embedding, AnalyticsError> {
    let (n_samples, n_features) = standardized.shape();
    if n_components == 0 || n_features < n_components || n_samples < n_components.max(2) {
        return Err(AnalyticsError::Dimensionality {
            requested: n_components,
            features: n_features,
            samples: n_samples,
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let denom = (n_samples - 1) as f64;
    let covariance = standardized.transpose() * standardized / denom;
    let eigen = SymmetricEigen::new(covariance);

    let mut order: Vec<usize> = (0..n_features).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut axes = DMatrix::<f64>::zeros(n_features, n_components);
    for (k, &idx) in order.iter().take(n_components).enumerate() {
        let axis = eigen.eigenvectors.column(idx);
        let pivot = axis
            .iter()
            .copied()
            .max_by(|a, b| a.abs().partial_cmp(&b.abs()).unwrap_or(Ordering::Equal))
            .unwrap_or(1.0);
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
        axes.set_column(k, &(axis * sign));
    }

    let total_variance: f64 = eigen.eigenvalues.iter().map(|v| v.max(0.0)).sum();
    let explained_variance_ratio = order
        .iter()
        .take(n_components)
        .map(|&idx| {
            if total_variance > 0.0 {
                eigen.eigenvalues[idx].max(0.0) / total_variance
            } else {
                0.0
            }
        })
        .collect();

    let loadings = feature_names
        .iter()
        .enumerate()
        .map(|(f, name)| FeatureLoading {
            feature: (*name).to_string(),
            components: axes.row(f).iter().copied().collect(),
        })
        .collect();

    Ok(Embedding {
        coordinates: standardized * &axes,
        loadings,
        explained_variance_ratio,
    })
}
