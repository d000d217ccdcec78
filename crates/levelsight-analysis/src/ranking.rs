//! Difficulty ranking of raw k-means clusters.
//!
//! K-means cluster indices are arbitrary: the same data can come back with
//! the clusters numbered in any order, so a raw index must never be stored
//! or shown. This module converts raw indices into meaning-bearing ranks:
//! rank "1" is the easiest cluster in the group, rank "k" the hardest, and
//! the ordering is reproducible across independent runs because it is
//! derived from the data, not from the index order.
//!
//! The difficulty composite is a fixed signed linear combination over the
//! per-cluster feature means (in the weighted-normalized space): repeat
//! ratio, play time, and plays per user push difficulty up; play-on-win
//! ratio and first-try-win rate push it down, since higher early success
//! means an easier level.

use crate::feature::{FeatureVector, METRIC_COUNT, MetricKind};

/// Version of the difficulty composite formula.
///
/// Version 3 is the five-feature signed composite; earlier formulas (a
/// single-feature mean and a three-feature composite) are retired and must
/// not be reintroduced without bumping this.
pub const RANKING_VERSION: u32 = 3;

/// Scalar difficulty of one cluster, from its per-feature mean vector.
///
/// # Examples
///
/// ```
/// use levelsight_analysis::ranking::difficulty_score;
///
/// // All-zero features score zero.
/// assert_eq!(difficulty_score(&[0.0; 5]), 0.0);
/// // Success metrics (columns 2 and 4) reduce difficulty.
/// assert!(difficulty_score(&[0.0, 0.0, 1.0, 0.0, 1.0]) < 0.0);
/// ```
#[must_use]
pub fn difficulty_score(mean: &FeatureVector) -> f32 {
    MetricKind::ALL
        .iter()
        .map(|kind| kind.difficulty_sign() * mean[kind.column()])
        .sum()
}

/// Maps raw cluster indices to difficulty ranks `"1"..="k"`.
///
/// For each raw cluster the per-feature mean over its members is reduced
/// to a difficulty score; clusters are sorted ascending by that score and
/// relabeled. An empty cluster scores `f32::INFINITY` so it sorts last and
/// never displaces a populated cluster from a low rank.
///
/// Returns a vector indexed by raw cluster index holding the rank label.
#[must_use]
pub fn rank_clusters(vectors: &[FeatureVector], assignment: &[usize], k: usize) -> Vec<String> {
    let scores: Vec<f32> = cluster_means(vectors, assignment, k)
        .iter()
        .map(|mean| mean.as_ref().map_or(f32::INFINITY, difficulty_score))
        .collect();

    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![String::new(); k];
    for (position, raw_index) in order.into_iter().enumerate() {
        ranks[raw_index] = (position + 1).to_string();
    }
    ranks
}

/// Per-feature mean of each cluster's members; `None` for empty clusters.
#[expect(clippy::cast_precision_loss)]
fn cluster_means(
    vectors: &[FeatureVector],
    assignment: &[usize],
    k: usize,
) -> Vec<Option<FeatureVector>> {
    let mut sums = vec![[0.0f32; METRIC_COUNT]; k];
    let mut counts = vec![0usize; k];
    for (vector, &cluster) in vectors.iter().zip(assignment) {
        counts[cluster] += 1;
        for (sum, value) in sums[cluster].iter_mut().zip(vector) {
            *sum += value;
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(mut sum, count)| {
            if count == 0 {
                return None;
            }
            for value in &mut sum {
                *value /= count as f32;
            }
            Some(sum)
        })
        .collect()
}
