//! Per-stage outcome reporting.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{IssueKind, Stage};

/// Outcome of one pipeline stage.
///
/// ```text
/// success   the stage produced its full result
/// warning   a result was produced through a fallback (degree centrality, reduced K, ...)
/// skipped   a precondition failed; a degenerate placeholder result is present
/// failed    the stage could not run; its entries are empty
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StageStatus {
    Success,
    Warning { issue: IssueKind, message: String },
    Skipped { issue: IssueKind, message: String },
    Failed { issue: IssueKind, message: String },
}

impl StageStatus {
    #[must_use]
    pub fn warning(issue: IssueKind, message: impl Into<String>) -> Self {
        Self::Warning {
            issue,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn skipped(issue: IssueKind, message: impl Into<String>) -> Self {
        Self::Skipped {
            issue,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failed(issue: IssueKind, message: impl Into<String>) -> Self {
        Self::Failed {
            issue,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The issue attached to a non-success status.
    #[must_use]
    pub const fn issue(&self) -> Option<IssueKind> {
        match self {
            Self::Success => None,
            Self::Warning { issue, .. } | Self::Skipped { issue, .. } | Self::Failed { issue, .. } => {
                Some(*issue)
            }
        }
    }
}

/// A stage paired with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
}

impl StageReport {
    #[must_use]
    pub const fn new(stage: Stage, status: StageStatus) -> Self {
        Self { stage, status }
    }
}
