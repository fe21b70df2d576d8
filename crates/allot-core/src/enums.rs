//! Tag enums for derived entities and pipeline stages.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Human-facing labels are exposed through `label()`, machine labels through `as_str()`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Which side of the bipartite assignment structure a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Neighborhood,
    School,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neighborhood => "neighborhood",
            Self::School => "school",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Student gender as recorded in the placement data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CentralityMethod
// ---------------------------------------------------------------------------

/// Algorithm that produced a set of centrality scores.
///
/// Scores from different methods are not comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CentralityMethod {
    /// Weighted eigenvector centrality (power iteration).
    Eigenvector,
    /// Unweighted degree centrality, used when power iteration does not converge.
    Degree,
}

impl CentralityMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eigenvector => "eigenvector",
            Self::Degree => "degree",
        }
    }
}

impl fmt::Display for CentralityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Archetype
// ---------------------------------------------------------------------------

/// Semantic label attached to a partition cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Above-average competition, below-average satisfaction.
    HighCompetitionUnderDelivering,
    /// Below-average competition, above-average satisfaction.
    StableSatisfied,
    /// Satisfaction above 90%.
    HighSatisfactionAdequate,
    /// Anything else.
    MixedComplex,
}

impl Archetype {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighCompetitionUnderDelivering => "high_competition_under_delivering",
            Self::StableSatisfied => "stable_satisfied",
            Self::HighSatisfactionAdequate => "high_satisfaction_adequate",
            Self::MixedComplex => "mixed_complex",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighCompetitionUnderDelivering => "high-competition, under-delivering",
            Self::StableSatisfied => "stable/satisfied",
            Self::HighSatisfactionAdequate => "high-satisfaction, adequate",
            Self::MixedComplex => "mixed/complex",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// DependencyVerdict
// ---------------------------------------------------------------------------

/// Conclusion of the neighborhood/school independence test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DependencyVerdict {
    /// p < 0.05.
    SignificantDependency,
    PlausiblyChance,
    InsufficientData,
}

impl DependencyVerdict {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SignificantDependency => "statistically significant dependency",
            Self::PlausiblyChance => "plausibly due to chance",
            Self::InsufficientData => "insufficient data",
        }
    }
}

impl fmt::Display for DependencyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CorrelationStrength
// ---------------------------------------------------------------------------

/// Qualitative reading of the competition/satisfaction correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    /// r < -0.5.
    StrongNegative,
    Weak,
    InsufficientData,
}

impl CorrelationStrength {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StrongNegative => "strong negative relationship",
            Self::Weak => "weak relationship",
            Self::InsufficientData => "insufficient data",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Pipeline stages, each reporting one status in the result bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Embedding,
    MixtureClustering,
    Diversity,
    Centrality,
    Interaction,
    Destinations,
    Reliability,
    PartitionClustering,
    DependencyTest,
    Correlation,
}

impl Stage {
    pub const ALL: [Self; 10] = [
        Self::Embedding,
        Self::MixtureClustering,
        Self::Diversity,
        Self::Centrality,
        Self::Interaction,
        Self::Destinations,
        Self::Reliability,
        Self::PartitionClustering,
        Self::DependencyTest,
        Self::Correlation,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Embedding => "embedding",
            Self::MixtureClustering => "mixture_clustering",
            Self::Diversity => "diversity",
            Self::Centrality => "centrality",
            Self::Interaction => "interaction",
            Self::Destinations => "destinations",
            Self::Reliability => "reliability",
            Self::PartitionClustering => "partition_clustering",
            Self::DependencyTest => "dependency_test",
            Self::Correlation => "correlation",
        }
    }

    /// Stages that consume the reliability-filtered snapshot.
    #[must_use]
    pub const fn is_inferential(self) -> bool {
        matches!(
            self,
            Self::PartitionClustering | Self::DependencyTest | Self::Correlation
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IssueKind
// ---------------------------------------------------------------------------

/// Category of a non-success stage outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Fewer indicators (or samples) than requested principal components.
    Dimensionality,
    /// Mixture or partition clustering did not converge.
    ClusteringWarning,
    /// Eigenvector centrality did not converge; degree centrality substituted.
    CentralityFallback,
    /// The reliability filter left too little data.
    InsufficientData,
    /// A statistic could not be computed on empty or singular input.
    DegenerateStatistic,
    /// The run configuration failed validation; no stage ran.
    InvalidConfiguration,
}

impl IssueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dimensionality => "dimensionality",
            Self::ClusteringWarning => "clustering_warning",
            Self::CentralityFallback => "centrality_fallback",
            Self::InsufficientData => "insufficient_data",
            Self::DegenerateStatistic => "degenerate_statistic",
            Self::InvalidConfiguration => "invalid_configuration",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
