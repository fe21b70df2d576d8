//! Values produced through a possible fallback path.

use allot_core::StageStatus;

use crate::error::AnalyticsError;

/// A component result plus the degradation, if any, that produced it.
///
/// Fallbacks (reduced mixture size, degree centrality) still yield a usable
/// `value`; the `warning` records which path was taken so the stage status
/// never hides it.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub value: T,
    pub warning: Option<AnalyticsError>,
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    #[must_use]
    pub const fn degraded(value: T, warning: AnalyticsError) -> Self {
        Self {
            value,
            warning: Some(warning),
        }
    }

    #[must_use]
    pub fn status(&self) -> StageStatus {
        self.warning
            .as_ref()
            .map_or(StageStatus::Success, AnalyticsError::as_warning)
    }
}
