//! Cluster-state tags and the last-write-wins assignment store.
//!
//! Every level moves through the state machine
//! `Unassigned -> AutoAssigned -> ManuallyOverridden`. Automatic
//! assignments come out of a clustering run; manual overrides come from an
//! operator. Re-running the pipeline over a range always overwrites prior
//! state in that range, including manual overrides: last write wins. The
//! engine provides the tags and the merge rule; durable persistence is the
//! caller's responsibility and must be idempotent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How a level's current cluster was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterState {
    /// No clustering run has covered this level yet.
    Unassigned,
    /// Assigned by the clustering pipeline.
    AutoAssigned,
    /// Set explicitly by an operator.
    ManuallyOverridden,
}

/// A level's current cluster together with its provenance tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelAssignment {
    /// The level this assignment belongs to.
    pub level: u32,
    /// Cluster rank label, "1".."4".
    pub cluster: String,
    /// How the cluster was determined.
    pub state: ClusterState,
}

/// In-memory view of per-level cluster state with last-write-wins merges.
///
/// # Example
///
/// ```
/// use levelsight_engine::assignment::{AssignmentStore, ClusterState};
///
/// let mut store = AssignmentStore::default();
/// store.set_manual(12, "4");
/// // A later clustering run over the same range overwrites the override.
/// store.apply_auto(12, "2");
/// let current = store.get(12).unwrap();
/// assert_eq!(current.cluster, "2");
/// assert_eq!(current.state, ClusterState::AutoAssigned);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssignmentStore {
    assignments: BTreeMap<u32, LevelAssignment>,
}

impl AssignmentStore {
    /// Records an automatic assignment from a clustering run.
    ///
    /// Overwrites whatever was stored before, including a manual override.
    pub fn apply_auto(&mut self, level: u32, cluster: impl Into<String>) {
        self.assignments.insert(
            level,
            LevelAssignment {
                level,
                cluster: cluster.into(),
                state: ClusterState::AutoAssigned,
            },
        );
    }

    /// Records an operator override for a level.
    ///
    /// The override holds until the next clustering run covering the level
    /// overwrites it; callers should recompute the level's score after
    /// calling this.
    pub fn set_manual(&mut self, level: u32, cluster: impl Into<String>) {
        self.assignments.insert(
            level,
            LevelAssignment {
                level,
                cluster: cluster.into(),
                state: ClusterState::ManuallyOverridden,
            },
        );
    }

    /// Returns the current assignment for a level, if any.
    #[must_use]
    pub fn get(&self, level: u32) -> Option<&LevelAssignment> {
        self.assignments.get(&level)
    }

    /// Returns the state tag for a level, `Unassigned` if never covered.
    #[must_use]
    pub fn state(&self, level: u32) -> ClusterState {
        self.assignments
            .get(&level)
            .map_or(ClusterState::Unassigned, |a| a.state)
    }

    /// Iterates over all stored assignments in level order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelAssignment> {
        self.assignments.values()
    }

    /// Number of levels with a stored assignment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns whether the store holds no assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_is_unassigned() {
        let store = AssignmentStore::default();
        assert_eq!(store.state(99), ClusterState::Unassigned);
        assert!(store.get(99).is_none());
    }

    #[test]
    fn auto_assignment_tags_level() {
        let mut store = AssignmentStore::default();
        store.apply_auto(5, "3");
        assert_eq!(store.state(5), ClusterState::AutoAssigned);
        assert_eq!(store.get(5).unwrap().cluster, "3");
    }

    #[test]
    fn manual_override_replaces_auto() {
        let mut store = AssignmentStore::default();
        store.apply_auto(5, "3");
        store.set_manual(5, "1");
        let assignment = store.get(5).unwrap();
        assert_eq!(assignment.cluster, "1");
        assert_eq!(assignment.state, ClusterState::ManuallyOverridden);
    }

    #[test]
    fn recluster_overwrites_manual_override() {
        // Last write wins by design; reclustering does not preserve
        // operator overrides in the reclustered range.
        let mut store = AssignmentStore::default();
        store.set_manual(5, "4");
        store.apply_auto(5, "2");
        let assignment = store.get(5).unwrap();
        assert_eq!(assignment.cluster, "2");
        assert_eq!(assignment.state, ClusterState::AutoAssigned);
    }

    #[test]
    fn levels_outside_a_run_are_untouched() {
        let mut store = AssignmentStore::default();
        store.set_manual(5, "4");
        // A run over levels 10..20 never calls apply_auto for level 5.
        store.apply_auto(12, "1");
        assert_eq!(store.state(5), ClusterState::ManuallyOverridden);
        assert_eq!(store.len(), 2);
    }
}
