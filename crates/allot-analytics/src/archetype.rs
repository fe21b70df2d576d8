//! K-means partition of schools on (competition, satisfaction) with archetype labels.

use allot_config::PartitionConfig;
use allot_core::SchoolMetrics;
use allot_core::entities::ClusterSummary;
use allot_core::enums::Archetype;

use crate::error::AnalyticsError;
use crate::kmeans::{self, KMeansParams};
use crate::outcome::Outcome;
use crate::standardize::{standardize, table_from_rows};

/// More schools than this get three clusters, otherwise two.
const THREE_CLUSTER_THRESHOLD: usize = 10;
/// Satisfaction (percent) above which a cluster counts as highly satisfied.
const HIGH_SATISFACTION_PCT: f64 = 90.0;

/// Hard partition of the input schools plus one summary per non-empty cluster.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Cluster of each input school, in input order.
    pub labels: Vec<usize>,
    pub summaries: Vec<ClusterSummary>,
}

impl Partition {
    /// Archetype assigned to the cluster of the `school`-th input.
    #[must_use]
    pub fn archetype_of(&self, school: usize) -> Option<Archetype> {
        let cluster = *self.labels.get(school)?;
        self.summaries
            .iter()
            .find(|s| s.cluster_id == cluster)
            .map(|s| s.archetype)
    }
}

/// Number of clusters used for `n_schools` schools.
#[must_use]
pub const fn cluster_count(n_schools: usize) -> usize {
    if n_schools > THREE_CLUSTER_THRESHOLD { 3 } else { 2 }
}

/// Label one cluster by comparing its means with the mean of all cluster means.
///
/// Rules are checked in order and the first match wins.
#[must_use]
pub fn classify(competition: f64, satisfaction: f64, mean_competition: f64, mean_satisfaction: f64) -> Archetype {
    if competition > mean_competition && satisfaction < mean_satisfaction {
        Archetype::HighCompetitionUnderDelivering
    } else if competition < mean_competition && satisfaction > mean_satisfaction {
        Archetype::StableSatisfied
    } else if satisfaction > HIGH_SATISFACTION_PCT {
        Archetype::HighSatisfactionAdequate
    } else {
        Archetype::MixedComplex
    }
}

/// Cluster schools on standardized (competition, satisfaction) and label each cluster.
///
/// Missing ratios count as 0. A fit that hits `kmeans_max_iter` is kept and
/// reported as a clustering warning; a fit that fails leaves every school
/// unlabeled with the same warning.
#[must_use]
pub fn partition(schools: &[SchoolMetrics], config: &PartitionConfig) -> Outcome<Partition> {
    if schools.is_empty() {
        return Outcome::clean(Partition::default());
    }

    let raw: Vec<[f64; 2]> = schools
        .iter()
        .map(|s| [s.competition_or_zero(), s.satisfaction_or_zero()])
        .collect();
    let standardized = standardize(&table_from_rows(raw.as_slice())).data;
    let points: Vec<Vec<f64>> = standardized
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect();

    let k = cluster_count(schools.len());
    let fit = kmeans::fit(
        &points,
        KMeansParams {
            k,
            seed: config.kmeans_seed,
            n_init: config.kmeans_n_init,
            max_iter: config.kmeans_max_iter,
        },
    );
    let fit = match fit {
        Ok(fit) => fit,
        Err(error) => return Outcome::degraded(Partition::default(), error),
    };

    let summaries = summarize(&raw, &fit.labels, k);
    let partition = Partition {
        labels: fit.labels,
        summaries,
    };

    if fit.converged {
        Outcome::clean(partition)
    } else {
        Outcome::degraded(
            partition,
            AnalyticsError::ClusteringWarning(format!(
                "k-means with K={k} did not converge within {} iterations",
                config.kmeans_max_iter
            )),
        )
    }
}

fn summarize(raw: &[[f64; 2]], labels: &[usize], k: usize) -> Vec<ClusterSummary> {
    let mut sums = vec![[0.0_f64; 2]; k];
    let mut counts = vec![0_usize; k];
    for (values, &label) in raw.iter().zip(labels) {
        sums[label][0] += values[0];
        sums[label][1] += values[1];
        counts[label] += 1;
    }

    let means: Vec<(usize, usize, f64, f64)> = (0..k)
        .filter(|&c| counts[c] > 0)
        .map(|c| {
            #[allow(clippy::cast_precision_loss)]
            let n = counts[c] as f64;
            (c, counts[c], sums[c][0] / n, sums[c][1] / n)
        })
        .collect();

    // Mean of the cluster means, not of the schools.
    #[allow(clippy::cast_precision_loss)]
    let clusters = means.len().max(1) as f64;
    let mean_competition = means.iter().map(|m| m.2).sum::<f64>() / clusters;
    let mean_satisfaction = means.iter().map(|m| m.3).sum::<f64>() / clusters;

    means
        .into_iter()
        .map(|(cluster_id, school_count, competition, satisfaction)| ClusterSummary {
            cluster_id,
            school_count,
            mean_competition_ratio: competition,
            mean_satisfaction_pct: satisfaction,
            archetype: classify(competition, satisfaction, mean_competition, mean_satisfaction),
        })
        .collect()
}
