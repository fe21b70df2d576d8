//! # allot-core
//!
//! Core types and error types for Allot.
//!
//! This crate provides the foundational types shared across all Allot crates:
//! - Input snapshots: per-school metrics and the neighborhood-by-school assignment matrix
//! - Per-student placement records the snapshots can be aggregated from
//! - Derived entity structs produced by the analytics pipeline
//! - Tag enums (node kinds, centrality methods, archetypes, verdicts)
//! - Per-stage status reporting
//! - The `ResultBundle` handed to persistence and rendering collaborators

pub mod bundle;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod inputs;
pub mod status;

pub use bundle::{bundle_schema, ResultBundle};
pub use errors::CoreError;
pub use inputs::{AssignmentMatrix, SchoolMetrics, StudentPlacement};
pub use status::{StageReport, StageStatus};
