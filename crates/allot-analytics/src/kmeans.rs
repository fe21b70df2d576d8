//! Seeded k-means over aprender's `KMeans`, best of several starts.
//!
//! Each start uses its own seed (`seed`, `seed + 1`, ...), so the output is a
//! pure function of `(points, k, seed, n_init, max_iter)`.

use aprender::prelude::{KMeans, Matrix, UnsupervisedEstimator};

use crate::error::AnalyticsError;

/// Absolute tolerance on centroid movement between iterations.
const TOLERANCE: f32 = 1e-4;

/// Parameters of one k-means fit.
#[derive(Debug, Clone, Copy)]
pub struct KMeansParams {
    pub k: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iter: usize,
}

/// Best of `n_init` seeded runs.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centroid.
    pub inertia: f64,
    /// Whether the winning run stopped moving before `max_iter`.
    pub converged: bool,
    pub iterations: usize,
}

impl KMeansFit {
    fn empty() -> Self {
        Self {
            labels: Vec::new(),
            centroids: Vec::new(),
            inertia: 0.0,
            converged: true,
            iterations: 0,
        }
    }
}

/// Cluster `points` (all of equal dimension) into `params.k` groups.
///
/// `k` is clamped to the number of points. An empty input yields an empty fit.
/// Of the `n_init` runs the one with the lowest inertia wins; ties keep the
/// earlier seed.
///
/// # Errors
///
/// Returns [`AnalyticsError::ClusteringWarning`] if the points do not form a
/// rectangular table or no run could be fitted.
pub fn fit(points: &[Vec<f64>], params: KMeansParams) -> Result<KMeansFit, AnalyticsError> {
    let k = params.k.min(points.len());
    if k == 0 {
        return Ok(KMeansFit::empty());
    }

    let samples = sample_matrix(points)?;
    let max_iter = params.max_iter.max(1);
    let mut best: Option<KMeansFit> = None;
    let mut last_error = None;

    for run in 0..params.n_init.max(1) {
        let seed = params.seed.wrapping_add(run as u64);
        let mut model = KMeans::new(k)
            .with_max_iter(max_iter)
            .with_tol(TOLERANCE)
            .with_random_state(seed);
        if let Err(error) = model.fit(&samples) {
            last_error = Some(error.to_string());
            continue;
        }

        let candidate = KMeansFit {
            labels: model.predict(&samples),
            centroids: rows(model.centroids()),
            inertia: f64::from(model.inertia()),
            converged: model.n_iter() < max_iter,
            iterations: model.n_iter(),
        };
        tracing::debug!(run, seed, inertia = candidate.inertia, iterations = candidate.iterations, "k-means run");
        if best.as_ref().is_none_or(|b| candidate.inertia < b.inertia) {
            best = Some(candidate);
        }
    }

    best.ok_or_else(|| {
        AnalyticsError::ClusteringWarning(format!(
            "k-means with K={k} could not be fitted: {}",
            last_error.unwrap_or_default()
        ))
    })
}

/// Samples x features table in the single precision aprender works in.
pub(crate) fn sample_matrix(points: &[Vec<f64>]) -> Result<Matrix<f32>, AnalyticsError> {
    let dim = points.first().map_or(0, Vec::len);
    #[allow(clippy::cast_possible_truncation)]
    let data: Vec<f32> = points.iter().flatten().map(|v| *v as f32).collect();
    Matrix::from_vec(points.len(), dim, data)
        .map_err(|e| AnalyticsError::ClusteringWarning(format!("sample table: {e}")))
}

/// Rows of an aprender matrix as `f64` vectors.
pub(crate) fn rows(matrix: &Matrix<f32>) -> Vec<Vec<f64>> {
    let (n_rows, n_cols) = matrix.shape();
    (0..n_rows)
        .map(|i| (0..n_cols).map(|j| f64::from(matrix.get(i, j))).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.1],
            vec![0.2, -0.1],
            vec![-0.1, 0.0],
            vec![5.0, 5.1],
            vec![5.2, 4.9],
            vec![4.9, 5.0],
            vec![10.0, -0.2],
            vec![10.1, 0.1],
            vec![9.8, 0.0],
        ]
    }

    fn params(k: usize, seed: u64) -> KMeansParams {
        KMeansParams {
            k,
            seed,
            n_init: 10,
            max_iter: 300,
        }
    }

    #[test]
    fn separates_well_spaced_blobs() {
        let fit = fit(&blobs(), params(3, 42)).unwrap();
        assert!(fit.converged);
        assert_eq!(fit.centroids.len(), 3);
        for group in fit.labels.chunks(3) {
            assert!(group.iter().all(|l| *l == group[0]));
        }
        let mut distinct = fit.labels.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 3);
        assert!(fit.inertia < 1.0);
    }

    #[test]
    fn same_seed_same_labels() {
        let a = fit(&blobs(), params(3, 7)).unwrap();
        let b = fit(&blobs(), params(3, 7)).unwrap();
        assert_eq!(a.labels, b.labels);
        assert!((a.inertia - b.inertia).abs() < f64::EPSILON);
    }

    #[test]
    fn more_starts_never_raise_inertia() {
        let one = fit(&blobs(), KMeansParams { n_init: 1, ..params(2, 5) }).unwrap();
        let many = fit(&blobs(), KMeansParams { n_init: 9, ..params(2, 5) }).unwrap();
        assert!(many.inertia <= one.inertia);
    }

    #[test]
    fn k_is_clamped_to_point_count() {
        let points = vec![vec![1.0], vec![2.0]];
        let fit = fit(&points, params(5, 1)).unwrap();
        assert_eq!(fit.centroids.len(), 2);
        assert!(fit.inertia.abs() < 1e-6);
    }

    #[test]
    fn identical_points_do_not_panic() {
        let points = vec![vec![3.0, 3.0]; 4];
        let fit = fit(&points, params(2, 3)).unwrap();
        assert_eq!(fit.labels.len(), 4);
        assert!(fit.inertia.abs() < 1e-6);
    }

    #[test]
    fn empty_input_yields_empty_fit() {
        let fit = fit(&[], params(3, 1)).unwrap();
        assert!(fit.labels.is_empty());
        assert!(fit.centroids.is_empty());
    }

    #[test]
    fn ragged_points_are_rejected() {
        let points = vec![vec![1.0, 2.0], vec![3.0]];
        let err = fit(&points, params(2, 1)).unwrap_err();
        assert!(matches!(err, AnalyticsError::ClusteringWarning(_)));
    }
}
