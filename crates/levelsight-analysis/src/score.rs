//! Composite player-experience scoring.
//!
//! A level's score is a weighted sum of its three player-experience
//! subscores (monetization, engagement, satisfaction), with the weights
//! chosen by the level's difficulty cluster. Easy clusters weight
//! satisfaction heavily; hard clusters shift weight toward monetization
//! and engagement. Scoring is pure and total: an empty or unrecognized
//! cluster falls back to the table's default row, never to an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Subscore weights for one cluster rank.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SubscoreWeights {
    /// Weight on the monetization subscore.
    pub monetization: f32,
    /// Weight on the engagement subscore.
    pub engagement: f32,
    /// Weight on the satisfaction subscore.
    pub satisfaction: f32,
}

impl SubscoreWeights {
    /// Applies the weights to a subscore triple.
    #[must_use]
    pub fn apply(&self, monetization: f32, engagement: f32, satisfaction: f32) -> f32 {
        monetization * self.monetization
            + engagement * self.engagement
            + satisfaction * self.satisfaction
    }
}

/// Per-rank subscore weights with a default row for unknown clusters.
///
/// The documented defaults shift weight from satisfaction toward
/// monetization and engagement as difficulty rises:
///
/// | rank      | monetization | engagement | satisfaction |
/// |-----------|--------------|------------|--------------|
/// | "1"       | 0.20         | 0.20       | 0.60         |
/// | "2"       | 0.25         | 0.25       | 0.50         |
/// | "3"       | 0.30         | 0.35       | 0.35         |
/// | "4"       | 0.35         | 0.35       | 0.30         |
/// | (default) | 0.30         | 0.30       | 0.40         |
///
/// # Example
///
/// ```
/// use levelsight_analysis::score::{ClusterMultiplierTable, score_level};
///
/// let table = ClusterMultiplierTable::default();
/// let score = score_level(10.0, 20.0, 30.0, "3", &table);
/// assert!((score - 20.5).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClusterMultiplierTable {
    ranks: BTreeMap<String, SubscoreWeights>,
    default: SubscoreWeights,
}

impl Default for ClusterMultiplierTable {
    fn default() -> Self {
        let ranks = [
            ("1", 0.20, 0.20, 0.60),
            ("2", 0.25, 0.25, 0.50),
            ("3", 0.30, 0.35, 0.35),
            ("4", 0.35, 0.35, 0.30),
        ]
        .into_iter()
        .map(|(rank, monetization, engagement, satisfaction)| {
            (
                rank.to_string(),
                SubscoreWeights {
                    monetization,
                    engagement,
                    satisfaction,
                },
            )
        })
        .collect();

        Self {
            ranks,
            default: SubscoreWeights {
                monetization: 0.30,
                engagement: 0.30,
                satisfaction: 0.40,
            },
        }
    }
}

impl ClusterMultiplierTable {
    /// Builds a table from explicit rank rows and a default row.
    #[must_use]
    pub fn new(ranks: BTreeMap<String, SubscoreWeights>, default: SubscoreWeights) -> Self {
        Self { ranks, default }
    }

    /// Inserts or replaces the weights for one rank.
    pub fn set(&mut self, rank: impl Into<String>, weights: SubscoreWeights) {
        self.ranks.insert(rank.into(), weights);
    }

    /// Returns the weights for a cluster, falling back to the default row
    /// when the cluster is empty or unrecognized.
    #[must_use]
    pub fn weights_for(&self, cluster: &str) -> &SubscoreWeights {
        self.ranks.get(cluster).unwrap_or(&self.default)
    }

    /// Iterates over the explicit rank rows in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubscoreWeights)> {
        self.ranks.iter().map(|(rank, w)| (rank.as_str(), w))
    }

    /// The default row used for unknown clusters.
    #[must_use]
    pub fn default_weights(&self) -> &SubscoreWeights {
        &self.default
    }
}

/// Computes a level's composite score from its subscores and cluster.
///
/// Pure and total: identical arguments always produce identical results,
/// and no cluster string can make this fail.
#[must_use]
pub fn score_level(
    monetization: f32,
    engagement: f32,
    satisfaction: f32,
    cluster: &str,
    table: &ClusterMultiplierTable,
) -> f32 {
    table
        .weights_for(cluster)
        .apply(monetization, engagement, satisfaction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_example_scores_twenty_point_five() {
        let table = ClusterMultiplierTable::default();
        let score = score_level(10.0, 20.0, 30.0, "3", &table);
        assert!((score - 20.5).abs() < 1e-4);
    }

    #[test]
    fn empty_cluster_uses_default_row() {
        let table = ClusterMultiplierTable::default();
        let expected = score_level(1.0, 1.0, 1.0, "no-such-rank", &table);
        assert_eq!(score_level(1.0, 1.0, 1.0, "", &table), expected);
        assert_eq!(
            table.weights_for(""),
            table.default_weights()
        );
    }

    #[test]
    fn scoring_is_pure() {
        let table = ClusterMultiplierTable::default();
        let first = score_level(3.5, 7.25, 1.0, "2", &table);
        let second = score_level(3.5, 7.25, 1.0, "2", &table);
        assert_eq!(first, second);
    }

    #[test]
    fn default_rows_each_sum_to_one() {
        let table = ClusterMultiplierTable::default();
        for (_, weights) in table.iter() {
            let sum = weights.monetization + weights.engagement + weights.satisfaction;
            assert!((sum - 1.0).abs() < 1e-6);
        }
        let default = table.default_weights();
        let sum = default.monetization + default.engagement + default.satisfaction;
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn custom_row_overrides_default_table() {
        let mut table = ClusterMultiplierTable::default();
        table.set(
            "4",
            SubscoreWeights {
                monetization: 1.0,
                engagement: 0.0,
                satisfaction: 0.0,
            },
        );
        assert_eq!(score_level(9.0, 100.0, 100.0, "4", &table), 9.0);
    }

    #[test]
    fn table_round_trips_through_json() {
        let table = ClusterMultiplierTable::default();
        let json = serde_json::to_string(&table).unwrap();
        let restored: ClusterMultiplierTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, restored);
    }
}
