//! The clustering run: one atomic pass over a level range.
//!
//! A run is the unit of work the engine's caller requests: bucket the
//! in-range records into concept groups, normalize and cluster each group
//! independently, convert raw cluster indices into difficulty ranks, and
//! score every assigned level. The pass is single-threaded, synchronous,
//! and in-memory; partial results are never published, so callers that
//! cancel a run discard its output rather than resuming it.
//!
//! Soft conditions (a group too small to cluster, a record missing a
//! metric) are counted in the [`RunReport`] and logged, never raised. The
//! single hard precondition is the range check, rejected before any work
//! starts.

use std::collections::BTreeMap;

use levelsight_engine::{
    concept::concept_group,
    range::{InvalidRangeError, LevelRange},
    record::LevelMetricRecord,
};
use levelsight_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::{
    feature::{FeatureMatrix, MetricKind, MetricWeights},
    kmeans::{self, KMeansConfig, KMeansError},
    ranking::rank_clusters,
    score::{ClusterMultiplierTable, score_level},
};

/// Minimum concept-group size worth clustering.
///
/// Smaller groups are skipped (soft, counted), since k-means over fewer
/// than four levels cannot produce a meaningful four-rank ladder.
pub const MIN_GROUP_SIZE: usize = 4;

/// Upper bound on clusters per concept group.
pub const MAX_CLUSTERS: usize = 4;

/// A failed clustering run. The range check is the only failure a caller
/// should ever observe; soft conditions are reported, not raised.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RunError {
    /// The requested range failed the `min >= 1` precondition.
    #[display("{_0}")]
    InvalidRange(InvalidRangeError),
    /// Clustering rejected its input. Unreachable when the group-size
    /// precondition holds; surfaced rather than swallowed.
    #[display("{_0}")]
    Clustering(KMeansError),
}

/// One level's cluster assignment produced by a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelCluster {
    /// The assigned level.
    pub level: u32,
    /// Difficulty rank, "1".."4".
    pub cluster: String,
}

/// One level's composite score produced by a run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LevelScore {
    /// The scored level.
    pub level: u32,
    /// Composite player-experience score.
    pub score: f32,
}

/// Operator-facing summary of one rank across the whole run.
///
/// Derived and non-authoritative: recomputed per run from raw metrics,
/// never persisted as a source of truth.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RankSummary {
    /// The rank this row summarizes.
    pub rank: String,
    /// Number of levels assigned to the rank.
    pub count: usize,
    /// Mean raw repeat ratio across those levels.
    pub mean_repeat_ratio: f32,
    /// Mean raw play time across those levels.
    pub mean_play_time: f32,
}

/// Everything a clustering run hands back to the caller.
///
/// Persisting assignments and scores is the caller's responsibility; the
/// engine only computes them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunReport {
    /// Per-level difficulty ranks, in level order.
    pub assignments: Vec<LevelCluster>,
    /// Per-level composite scores, in level order.
    pub scores: Vec<LevelScore>,
    /// Per-rank operator summaries, in rank order.
    pub rank_summaries: Vec<RankSummary>,
    /// Concept groups skipped for having fewer than [`MIN_GROUP_SIZE`] levels.
    pub skipped_groups: usize,
    /// Levels left unassigned because their group was skipped.
    pub skipped_levels: usize,
    /// Records with at least one missing or non-finite metric; each such
    /// value defaulted to zero.
    pub missing_records: usize,
}

/// Configuration for clustering runs: metric weights, score multipliers,
/// and k-means parameters (including the seed).
///
/// A `ClusteringRun` is reusable; [`execute`](Self::execute) borrows its
/// inputs immutably, so concurrent runs over disjoint ranges are safe.
/// Runs over overlapping ranges must not race against the same downstream
/// store; the engine provides no isolation.
#[derive(Debug, Clone, Default)]
pub struct ClusteringRun {
    weights: MetricWeights,
    multipliers: ClusterMultiplierTable,
    kmeans: KMeansConfig,
}

impl ClusteringRun {
    /// Creates a run configuration.
    #[must_use]
    pub fn new(
        weights: MetricWeights,
        multipliers: ClusterMultiplierTable,
        kmeans: KMeansConfig,
    ) -> Self {
        Self {
            weights,
            multipliers,
            kmeans,
        }
    }

    /// Executes one clustering run over the records inside `range`.
    ///
    /// Records outside the range are ignored; whatever the caller has
    /// stored for them stays untouched. Re-running over a range replaces
    /// every prior assignment in that range, including manual overrides
    /// (last write wins).
    pub fn execute(
        &self,
        records: &[LevelMetricRecord],
        range: LevelRange,
    ) -> Result<RunReport, RunError> {
        range.validate()?;

        let mut groups: BTreeMap<u32, Vec<&LevelMetricRecord>> = BTreeMap::new();
        for record in records {
            if range.contains(record.level) {
                groups
                    .entry(concept_group(record.level))
                    .or_default()
                    .push(record);
            }
        }

        let mut report = RunReport::default();
        let mut ranked: BTreeMap<String, Vec<&LevelMetricRecord>> = BTreeMap::new();

        for (concept, group) in &groups {
            if group.len() < MIN_GROUP_SIZE {
                log::debug!(
                    "skipping concept group {concept}: {} levels, need {MIN_GROUP_SIZE}",
                    group.len()
                );
                report.skipped_groups += 1;
                report.skipped_levels += group.len();
                continue;
            }

            let matrix = FeatureMatrix::from_group(group, &self.weights);
            if matrix.missing_records > 0 {
                log::warn!(
                    "concept group {concept}: {} records with missing metrics, defaulted to 0.0",
                    matrix.missing_records
                );
            }
            report.missing_records += matrix.missing_records;

            let k = MAX_CLUSTERS.min(matrix.len());
            let config = KMeansConfig {
                k,
                ..self.kmeans.clone()
            };
            let assignment = kmeans::cluster(&matrix.vectors, &config)?;
            let ranks = rank_clusters(&matrix.vectors, &assignment, k);

            for (row, &raw_index) in assignment.iter().enumerate() {
                let rank = ranks[raw_index].clone();
                report.assignments.push(LevelCluster {
                    level: matrix.levels[row],
                    cluster: rank.clone(),
                });
                ranked.entry(rank).or_default().push(group[row]);
            }
        }

        report.assignments.sort_by_key(|a| a.level);

        let clusters: BTreeMap<u32, &str> = report
            .assignments
            .iter()
            .map(|a| (a.level, a.cluster.as_str()))
            .collect();
        for record in records {
            if let Some(cluster) = clusters.get(&record.level) {
                report.scores.push(LevelScore {
                    level: record.level,
                    score: score_level(
                        record.monetization_score,
                        record.engagement_score,
                        record.satisfaction_score,
                        cluster,
                        &self.multipliers,
                    ),
                });
            }
        }
        report.scores.sort_by_key(|s| s.level);

        report.rank_summaries = ranked
            .into_iter()
            .map(|(rank, members)| summarize_rank(rank, &members))
            .collect();

        Ok(report)
    }
}

/// Builds the operator summary row for one rank.
fn summarize_rank(rank: String, members: &[&LevelMetricRecord]) -> RankSummary {
    let mean_of = |kind: MetricKind| {
        DescriptiveStats::new(
            members
                .iter()
                .map(|r| r.metric(kind.key()).unwrap_or(0.0)),
        )
        .map_or(0.0, |stats| stats.mean)
    };
    RankSummary {
        rank,
        count: members.len(),
        mean_repeat_ratio: mean_of(MetricKind::RepeatRatio),
        mean_play_time: mean_of(MetricKind::PlayTime),
    }
}
