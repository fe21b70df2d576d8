//! Analytics error types.
//!
//! Every variant corresponds to one [`IssueKind`]. Stage boundaries in
//! [`crate::pipeline`] turn these into [`StageStatus`] entries instead of
//! letting them escape a run.

use allot_core::enums::IssueKind;
use allot_core::StageStatus;

/// Errors and degradations raised by individual analytics components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyticsError {
    /// Fewer indicators or samples than requested principal components.
    #[error("cannot extract {requested} components from {samples} samples x {features} indicators")]
    Dimensionality {
        requested: usize,
        features: usize,
        samples: usize,
    },

    /// A clustering fit did not converge; a best-effort fit was kept.
    #[error("clustering did not converge: {0}")]
    ClusteringWarning(String),

    /// Eigenvector centrality did not converge; degree centrality was substituted.
    #[error("eigenvector centrality fell back to degree centrality: {0}")]
    CentralityFallback(String),

    /// The reliability filter left too little data for inference.
    #[error("insufficient data after reliability filter: {0}")]
    InsufficientData(String),

    /// A statistic is undefined on the given input.
    #[error("degenerate statistic: {0}")]
    DegenerateStatistic(String),

    /// The run configuration was rejected before any stage ran.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl AnalyticsError {
    #[must_use]
    pub const fn issue_kind(&self) -> IssueKind {
        match self {
            Self::Dimensionality { .. } => IssueKind::Dimensionality,
            Self::ClusteringWarning(_) => IssueKind::ClusteringWarning,
            Self::CentralityFallback(_) => IssueKind::CentralityFallback,
            Self::InsufficientData(_) => IssueKind::InsufficientData,
            Self::DegenerateStatistic(_) => IssueKind::DegenerateStatistic,
            Self::InvalidConfiguration(_) => IssueKind::InvalidConfiguration,
        }
    }

    /// Status for a stage that still produced a (degraded) result.
    #[must_use]
    pub fn as_warning(&self) -> StageStatus {
        StageStatus::warning(self.issue_kind(), self.to_string())
    }

    /// Status for a stage whose precondition failed and holds a placeholder.
    #[must_use]
    pub fn as_skipped(&self) -> StageStatus {
        StageStatus::skipped(self.issue_kind(), self.to_string())
    }

    /// Status for a stage that produced nothing.
    #[must_use]
    pub fn as_failed(&self) -> StageStatus {
        StageStatus::failed(self.issue_kind(), self.to_string())
    }
}
