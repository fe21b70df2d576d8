//! Derived entity structs produced by the analytics pipeline.
//!
//! Each entity is produced once per run by exactly one stage and is read-only
//! afterwards. All structs derive `Serialize`, `Deserialize`, and `JsonSchema`
//! so persistence collaborators can consume them through the result bundle.

mod centrality;
mod diversity;
mod inference;
mod interaction;
mod placement;
mod school;

pub use centrality::{CentralityReport, CentralityScore};
pub use diversity::DiversityIndex;
pub use inference::{ClusterSummary, CorrelationResult, DependencyTestResult, ReliabilityReport};
pub use interaction::{Destination, InteractionMatrix, NeighborhoodDestinations};
pub use placement::{GenderPreference, GenderSatisfaction, NeighborhoodSatisfaction, SchoolGenderRatio};
pub use school::{AnalyzedSchool, FeatureLoading};
