//! Gaussian mixture clustering of the school embedding.
//!
//! Fits aprender's `GaussianMixture` (k-means initialized, seeded) and reports
//! the hard label plus the posterior probability of that label per sample.

use aprender::prelude::{CovarianceType, GaussianMixture, UnsupervisedEstimator};

use crate::error::AnalyticsError;
use crate::kmeans::{rows, sample_matrix};
use crate::outcome::Outcome;

/// Convergence threshold on the change of the mean log-likelihood.
const TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
pub struct MixtureParams {
    pub n_components: usize,
    pub seed: u64,
    pub max_iter: usize,
}

/// A fitted mixture and the per-sample hard/soft assignments it implies.
#[derive(Debug, Clone)]
pub struct MixtureFit {
    pub n_components: usize,
    pub labels: Vec<usize>,
    /// Posterior membership of each sample in its own component, in `[0, 1]`.
    pub probabilities: Vec<f64>,
    pub weights: Vec<f64>,
    pub means: Vec<Vec<f64>>,
}

impl MixtureFit {
    /// Every sample in one component with certainty.
    fn single(n_samples: usize) -> Self {
        Self {
            n_components: usize::from(n_samples > 0),
            labels: vec![0; n_samples],
            probabilities: vec![1.0; n_samples],
            weights: if n_samples > 0 { vec![1.0] } else { Vec::new() },
            means: Vec::new(),
        }
    }
}

/// Fit with the deterministic recovery policy.
///
/// If there are fewer samples than components, K is reduced to the sample
/// count. If no usable fit comes out with K components, K-1, K-2, ... 1 are
/// tried in turn and the first usable fit is kept; if none works every sample
/// is placed in a single component. Any of these paths attaches a
/// `ClusteringWarning`.
#[must_use]
pub fn fit_with_recovery(points: &[Vec<f64>], params: MixtureParams) -> Outcome<MixtureFit> {
    let requested = params.n_components.max(1);
    let k = requested.min(points.len());
    if k == 0 {
        return Outcome::clean(MixtureFit::single(0));
    }

    let reduced_note = (k < requested)
        .then(|| format!("only {} samples for {requested} components; K reduced to {k}", points.len()));

    let primary_error = match fit(points, MixtureParams { n_components: k, ..params }) {
        Ok(primary) => {
            return match reduced_note {
                Some(note) => Outcome::degraded(primary, AnalyticsError::ClusteringWarning(note)),
                None => Outcome::clean(primary),
            };
        }
        Err(error) => error,
    };

    tracing::debug!(k, error = %primary_error, "mixture fit unusable; trying fewer components");
    let prefix = reduced_note.map_or_else(String::new, |note| format!("{note}; "));
    for smaller in (1..k).rev() {
        if let Ok(candidate) = fit(points, MixtureParams { n_components: smaller, ..params }) {
            let message = format!("{prefix}{primary_error}; using K={smaller}");
            return Outcome::degraded(candidate, AnalyticsError::ClusteringWarning(message));
        }
    }

    let message = format!("{prefix}{primary_error}; no K<={k} could be fitted, all samples in one component");
    Outcome::degraded(MixtureFit::single(points.len()), AnalyticsError::ClusteringWarning(message))
}

/// Single fit with exactly `params.n_components` components.
///
/// # Errors
///
/// Returns [`AnalyticsError::ClusteringWarning`] if the model cannot be fitted
/// or its parameters come out non-finite.
pub fn fit(points: &[Vec<f64>], params: MixtureParams) -> Result<MixtureFit, AnalyticsError> {
    let k = params.n_components;
    let samples = sample_matrix(points)?;

    let mut model = GaussianMixture::new(k, CovarianceType::Full)
        .with_max_iter(params.max_iter.max(1))
        .with_tol(TOLERANCE)
        .with_random_state(params.seed);
    model
        .fit(&samples)
        .map_err(|e| AnalyticsError::ClusteringWarning(format!("mixture with K={k} could not be fitted: {e}")))?;

    let means = rows(model.means());
    let weights: Vec<f64> = model.weights().as_slice().iter().copied().map(f64::from).collect();
    if means.iter().flatten().chain(&weights).any(|v| !v.is_finite()) {
        return Err(AnalyticsError::ClusteringWarning(format!(
            "mixture with K={k} produced non-finite parameters"
        )));
    }

    let labels = model.predict(&samples);
    let posterior = model.predict_proba(&samples);
    let probabilities = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| f64::from(posterior.get(i, label)).clamp(0.0, 1.0))
        .collect();

    Ok(MixtureFit {
        n_components: k,
        labels,
        probabilities,
        weights,
        means,
    })
}
