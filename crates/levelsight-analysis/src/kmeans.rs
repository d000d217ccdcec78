//! Seeded k-means clustering over weighted feature vectors.
//!
//! One clustering call covers one concept group. Centroids are seeded with
//! k-means++ (distance-squared weighted sampling, which prefers
//! well-separated seeds over uniform draws and stabilizes convergence),
//! then refined with Lloyd iteration under Euclidean distance.
//!
//! The raw cluster indices this module returns are arbitrary; k-means
//! gives no meaning to index order. The [`ranking`](crate::ranking) module
//! turns them into stable difficulty ranks; nothing downstream may attach
//! meaning to a raw index directly.
//!
//! All randomness flows from a caller-supplied `u64` seed through a
//! [`Pcg32`] generator, so a fixed seed makes the whole run reproducible.

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::feature::{FeatureVector, METRIC_COUNT};

/// Configuration for one k-means invocation.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters. The pipeline uses `min(4, n)`, which is always
    /// 4 under the group-size precondition.
    pub k: usize,
    /// Maximum Lloyd iterations before giving up on convergence.
    pub max_iterations: usize,
    /// Iteration stops when the largest centroid movement falls below this.
    pub convergence_threshold: f32,
    /// Seed for the k-means++ RNG; fixed seed means reproducible output.
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 4,
            max_iterations: 100,
            convergence_threshold: 1e-6,
            seed: 0,
        }
    }
}

impl KMeansConfig {
    /// Returns a default configuration with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// Invalid input to [`cluster`].
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
pub enum KMeansError {
    /// `k` was zero.
    #[display("k must be > 0")]
    ZeroK,
    /// More clusters requested than there are vectors.
    #[display("k ({k}) must be <= number of vectors ({n})")]
    TooFewVectors {
        /// Requested cluster count.
        k: usize,
        /// Number of input vectors.
        n: usize,
    },
}

/// Clusters the vectors of one concept group.
///
/// Returns one raw cluster index per input vector, in input order. Raw
/// indices carry no meaning beyond identity within this call; the caller
/// must rank them before exposing them.
///
/// Deterministic for a fixed `config.seed`.
pub fn cluster(
    vectors: &[FeatureVector],
    config: &KMeansConfig,
) -> Result<Vec<usize>, KMeansError> {
    if config.k == 0 {
        return Err(KMeansError::ZeroK);
    }
    if config.k > vectors.len() {
        return Err(KMeansError::TooFewVectors {
            k: config.k,
            n: vectors.len(),
        });
    }

    let mut rng = Pcg32::seed_from_u64(config.seed);
    let mut centroids = seed_centroids(vectors, config.k, &mut rng);
    let mut assignment = vec![0usize; vectors.len()];

    for iteration in 0..config.max_iterations {
        for (slot, vector) in assignment.iter_mut().zip(vectors) {
            *slot = nearest_centroid(vector, &centroids);
        }

        let new_centroids = update_centroids(vectors, &assignment, &centroids);
        let max_movement = centroids
            .iter()
            .zip(&new_centroids)
            .map(|(old, new)| distance_squared(old, new).sqrt())
            .fold(0.0f32, f32::max);
        centroids = new_centroids;

        if max_movement < config.convergence_threshold {
            log::debug!(
                "k-means converged after {} iterations (movement {max_movement:.2e})",
                iteration + 1
            );
            break;
        }
    }

    // Final reassignment against the settled centroids.
    for (slot, vector) in assignment.iter_mut().zip(vectors) {
        *slot = nearest_centroid(vector, &centroids);
    }

    Ok(assignment)
}

/// k-means++ seeding: first centroid uniform, the rest sampled with
/// probability proportional to squared distance from the nearest chosen
/// centroid.
fn seed_centroids(vectors: &[FeatureVector], k: usize, rng: &mut Pcg32) -> Vec<FeatureVector> {
    let n = vectors.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(vectors[rng.random_range(0..n)]);

    let mut min_distances = vec![f32::MAX; n];
    for _ in 1..k {
        let last = *centroids.last().expect("at least one centroid is seeded");
        for (distance, vector) in min_distances.iter_mut().zip(vectors) {
            let candidate = distance_squared(vector, &last);
            if candidate < *distance {
                *distance = candidate;
            }
        }

        let total: f32 = min_distances.iter().sum();
        let chosen = if total > 0.0 {
            let mut target = rng.random_range(0.0..total);
            let mut index = n - 1;
            for (i, distance) in min_distances.iter().enumerate() {
                target -= distance;
                if target <= 0.0 {
                    index = i;
                    break;
                }
            }
            index
        } else {
            // Every vector coincides with a chosen centroid; any pick works.
            rng.random_range(0..n)
        };
        centroids.push(vectors[chosen]);
    }

    centroids
}

/// Index of the centroid nearest to `vector`; ties break to the lowest index.
fn nearest_centroid(vector: &FeatureVector, centroids: &[FeatureVector]) -> usize {
    let mut best = 0;
    let mut best_distance = f32::MAX;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = distance_squared(vector, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best
}

/// Recomputes each centroid as the mean of its assigned vectors.
///
/// A cluster that lost all members keeps its previous centroid rather than
/// collapsing to the origin.
#[expect(clippy::cast_precision_loss)]
fn update_centroids(
    vectors: &[FeatureVector],
    assignment: &[usize],
    previous: &[FeatureVector],
) -> Vec<FeatureVector> {
    let k = previous.len();
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
        .zip(previous)
        .map(|((mut sum, count), old)| {
            if count == 0 {
                return *old;
            }
            for value in &mut sum {
                *value /= count as f32;
            }
            sum
        })
        .collect()
}

/// Squared Euclidean distance; comparisons never need the square root.
fn distance_squared(a: &FeatureVector, b: &FeatureVector) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(value: f32) -> FeatureVector {
        [value; METRIC_COUNT]
    }

    #[test]
    fn zero_k_is_rejected() {
        let config = KMeansConfig {
            k: 0,
            ..KMeansConfig::default()
        };
        assert!(matches!(
            cluster(&[vector(0.0)], &config),
            Err(KMeansError::ZeroK)
        ));
    }

    #[test]
    fn k_larger_than_input_is_rejected() {
        let config = KMeansConfig::default();
        let err = cluster(&[vector(0.0), vector(1.0)], &config).unwrap_err();
        assert!(err.to_string().contains("k (4)"));
    }

    #[test]
    fn one_assignment_per_input_vector() {
        let vectors = vec![vector(0.0), vector(0.1), vector(0.9), vector(1.0)];
        let assignment = cluster(&vectors, &KMeansConfig::with_seed(7)).unwrap();
        assert_eq!(assignment.len(), vectors.len());
        assert!(assignment.iter().all(|&c| c < 4));
    }

    #[test]
    fn well_separated_pairs_share_clusters() {
        let vectors = vec![
            vector(0.00),
            vector(0.02),
            vector(0.98),
            vector(1.00),
            vector(0.50),
            vector(0.52),
        ];
        let config = KMeansConfig {
            k: 3,
            ..KMeansConfig::with_seed(42)
        };
        let assignment = cluster(&vectors, &config).unwrap();
        assert_eq!(assignment[0], assignment[1]);
        assert_eq!(assignment[2], assignment[3]);
        assert_eq!(assignment[4], assignment[5]);
        assert_ne!(assignment[0], assignment[2]);
        assert_ne!(assignment[0], assignment[4]);
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let vectors: Vec<FeatureVector> = (0..12).map(|i| vector(i as f32 / 12.0)).collect();
        let config = KMeansConfig::with_seed(123);
        let first = cluster(&vectors, &config).unwrap();
        let second = cluster(&vectors, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn identical_points_still_cluster() {
        // Degenerate group: every vector coincides, D^2 totals are zero.
        let vectors = vec![vector(0.5); 6];
        let assignment = cluster(&vectors, &KMeansConfig::with_seed(1)).unwrap();
        assert_eq!(assignment.len(), 6);
    }
}
