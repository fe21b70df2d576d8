//! Minimum-sample gate applied before inferential statistics.

use serde::{Deserialize, Serialize};

const fn default_min_sample() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReliabilityConfig {
    /// Schools with fewer assigned students are excluded.
    #[serde(default = "default_min_sample")]
    pub min_sample_school: u64,

    /// Neighborhoods with fewer resident students (matrix row sum) are excluded.
    #[serde(default = "default_min_sample")]
    pub min_sample_dong: u64,
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            min_sample_school: default_min_sample(),
            min_sample_dong: default_min_sample(),
        }
    }
}
