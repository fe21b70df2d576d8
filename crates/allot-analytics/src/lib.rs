//! # allot-analytics
//!
//! School assignment analytics for Allot.
//!
//! Turns a per-school metrics table and a neighborhood-by-school assignment
//! matrix into one [`ResultBundle`](allot_core::ResultBundle):
//! - PCA embedding of the school indicators and Gaussian mixture clustering over it
//! - Shannon-entropy diversity of neighborhoods and schools
//! - Eigenvector centrality on the bipartite assignment graph (degree fallback)
//! - Independence-proxy interaction ratios and top destinations
//! - Reliability-filtered inference: k-means archetypes, chi-square
//!   dependency test, competition/satisfaction correlation
//!
//! All randomness is seeded from the configuration, so a run is a pure
//! function of its inputs and [`AnalysisConfig`](allot_config::AnalysisConfig).

pub mod aggregate;
pub mod archetype;
pub mod correlation;
pub mod dependency;
pub mod diversity;
pub mod error;
pub mod inference;
pub mod interaction;
pub mod kmeans;
pub mod mixture;
pub mod network;
pub mod outcome;
pub mod pipeline;
pub mod reduce;
pub mod reliability;
pub mod standardize;

pub use error::AnalyticsError;
pub use inference::InferenceStage;
pub use outcome::Outcome;
pub use pipeline::{analyze, analyze_placements};
pub use reliability::ReliabilityFilter;
