//! Core data model for the Levelsight difficulty analytics engine.
//!
//! This crate defines the types exchanged between the ingestion layer
//! (out of scope here), the clustering pipeline, and the storage layer:
//!
//! - [`record::LevelMetricRecord`]: one level's telemetry snapshot
//! - [`range::LevelRange`]: the level span a clustering run operates on
//! - [`concept`]: deterministic level-to-concept bucketing, so only levels
//!   of a comparable difficulty tier are clustered together
//! - [`assignment`]: cluster-state tags (`Unassigned` / `AutoAssigned` /
//!   `ManuallyOverridden`) and the last-write-wins assignment store
//!
//! Everything in this crate is pure and deterministic; the randomized and
//! batch-oriented parts of the system live in `levelsight-analysis`.
//!
//! # Example
//!
//! ```
//! use levelsight_engine::{concept, range::LevelRange};
//!
//! let range = LevelRange::new(1, 200);
//! assert!(range.validate().is_ok());
//!
//! // Levels 3000 and 3001 sit on a concept boundary.
//! assert_ne!(concept::concept_group(3000), concept::concept_group(3001));
//! ```

pub mod assignment;
pub mod concept;
pub mod range;
pub mod record;

pub use self::{
    assignment::{AssignmentStore, ClusterState, LevelAssignment},
    range::{InvalidRangeError, LevelRange},
    record::LevelMetricRecord,
};
