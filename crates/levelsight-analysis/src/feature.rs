//! Feature extraction and per-group normalization.
//!
//! The pipeline clusters levels on a fixed five-metric set. Raw telemetry
//! metrics arrive on wildly different scales (a repeat ratio is a fraction,
//! play time is seconds), and several are right-skewed, so each concept
//! group goes through the same four-step preparation:
//!
//! 1. **Extract** the fixed metric set from each record; a missing or
//!    non-finite value becomes `0.0`, never fatal. Records with at least
//!    one such value are counted so callers can warn operators.
//! 2. **Skew-correct** right-skewed metrics (repeat ratio, play time,
//!    plays per user) with `log1p`; bounded ratios stay linear. Negative
//!    raw values clamp to `0.0` first, since `log1p` is undefined below
//!    `-1.0`.
//! 3. **Min-max normalize** each column to `[0, 1]` within the group. A
//!    near-constant column (extent below `1e-5`) becomes exactly `0.5`
//!    everywhere: a neutral value that avoids divide-by-zero and spurious
//!    separation on a column that carries no signal.
//! 4. **Weight** each column by its configured multiplier. The defaults
//!    upweight repeat ratio about five-fold: repeat play is the strongest
//!    churn signal in this domain.
//!
//! Normalization statistics never leak across concept groups; every
//! [`FeatureMatrix`] is computed from one group in isolation.

use levelsight_engine::record::LevelMetricRecord;
use levelsight_stats::extent::column_extent;
use serde::{Deserialize, Serialize};

/// Number of metrics in the fixed feature set.
pub const METRIC_COUNT: usize = 5;

/// Extent below which a column is treated as constant.
const CONSTANT_COLUMN_EPSILON: f32 = 1e-5;

/// Neutral value substituted for every entry of a constant column.
const CONSTANT_COLUMN_VALUE: f32 = 0.5;

/// A level's feature values in canonical metric order.
pub type FeatureVector = [f32; METRIC_COUNT];

/// The fixed metric set, in canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Fraction of players who replay a level after failing or completing
    /// it; the primary difficulty signal.
    RepeatRatio,
    /// Mean play time per attempt, in seconds.
    PlayTime,
    /// Fraction of sessions where a player continues past a won level.
    PlayOnWinRatio,
    /// Mean number of plays per user.
    PlaysPerUser,
    /// Fraction of players who win on their first attempt.
    FirstTryWinRate,
}

impl MetricKind {
    /// All metrics in canonical column order.
    pub const ALL: [MetricKind; METRIC_COUNT] = [
        MetricKind::RepeatRatio,
        MetricKind::PlayTime,
        MetricKind::PlayOnWinRatio,
        MetricKind::PlaysPerUser,
        MetricKind::FirstTryWinRate,
    ];

    /// Canonical metric name, as it appears in record metric maps.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            MetricKind::RepeatRatio => "repeat_ratio",
            MetricKind::PlayTime => "play_time",
            MetricKind::PlayOnWinRatio => "play_on_win_ratio",
            MetricKind::PlaysPerUser => "plays_per_user",
            MetricKind::FirstTryWinRate => "first_try_win_rate",
        }
    }

    /// Whether the metric distribution is right-skewed and gets `log1p`.
    ///
    /// Bounded ratio/percentage metrics stay linear.
    #[must_use]
    pub fn is_right_skewed(self) -> bool {
        matches!(
            self,
            MetricKind::RepeatRatio | MetricKind::PlayTime | MetricKind::PlaysPerUser
        )
    }

    /// Sign of the metric's contribution to the difficulty composite.
    ///
    /// Higher early success means an easier level, so the two success
    /// metrics contribute negatively.
    #[must_use]
    pub fn difficulty_sign(self) -> f32 {
        match self {
            MetricKind::RepeatRatio | MetricKind::PlayTime | MetricKind::PlaysPerUser => 1.0,
            MetricKind::PlayOnWinRatio | MetricKind::FirstTryWinRate => -1.0,
        }
    }

    /// Column index of this metric in a [`FeatureVector`].
    #[must_use]
    pub fn column(self) -> usize {
        match self {
            MetricKind::RepeatRatio => 0,
            MetricKind::PlayTime => 1,
            MetricKind::PlayOnWinRatio => 2,
            MetricKind::PlaysPerUser => 3,
            MetricKind::FirstTryWinRate => 4,
        }
    }
}

/// Per-metric column weights applied after normalization.
///
/// The defaults encode the domain prior that repeat play is the strongest
/// churn signal: repeat ratio gets roughly five times the weight of every
/// other metric.
///
/// # Example
///
/// ```
/// use levelsight_analysis::feature::{MetricKind, MetricWeights};
///
/// let weights = MetricWeights::default();
/// assert_eq!(weights.weight(MetricKind::RepeatRatio), 5.0);
/// assert_eq!(weights.weight(MetricKind::PlayTime), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricWeights {
    /// Weight for the repeat-ratio column.
    pub repeat_ratio: f32,
    /// Weight for the play-time column.
    pub play_time: f32,
    /// Weight for the play-on-win-ratio column.
    pub play_on_win_ratio: f32,
    /// Weight for the plays-per-user column.
    pub plays_per_user: f32,
    /// Weight for the first-try-win-rate column.
    pub first_try_win_rate: f32,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            repeat_ratio: 5.0,
            play_time: 1.0,
            play_on_win_ratio: 1.0,
            plays_per_user: 1.0,
            first_try_win_rate: 1.0,
        }
    }
}

impl MetricWeights {
    /// Returns the weight configured for a metric.
    #[must_use]
    pub fn weight(&self, kind: MetricKind) -> f32 {
        match kind {
            MetricKind::RepeatRatio => self.repeat_ratio,
            MetricKind::PlayTime => self.play_time,
            MetricKind::PlayOnWinRatio => self.play_on_win_ratio,
            MetricKind::PlaysPerUser => self.plays_per_user,
            MetricKind::FirstTryWinRate => self.first_try_win_rate,
        }
    }
}

/// Weighted, normalized feature vectors for one concept group.
///
/// Row order matches the input record order; `levels[i]` identifies the
/// level behind `vectors[i]`.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Level number per row.
    pub levels: Vec<u32>,
    /// Weighted normalized feature vector per row.
    pub vectors: Vec<FeatureVector>,
    /// Number of records with at least one missing or non-finite metric,
    /// each such slot defaulted to `0.0`.
    pub missing_records: usize,
}

impl FeatureMatrix {
    /// Builds the feature matrix for one concept group.
    ///
    /// Pure: the same records and weights always produce the same matrix.
    /// Never fails; missing metrics default to `0.0` and the affected
    /// records are counted in [`FeatureMatrix::missing_records`].
    #[must_use]
    pub fn from_group(records: &[&LevelMetricRecord], weights: &MetricWeights) -> Self {
        let mut missing_records = 0;
        let mut vectors: Vec<FeatureVector> = records
            .iter()
            .map(|record| {
                let mut vector = [0.0; METRIC_COUNT];
                let mut incomplete = false;
                for kind in MetricKind::ALL {
                    let raw = match record.metric(kind.key()) {
                        Some(value) => value,
                        None => {
                            incomplete = true;
                            0.0
                        }
                    };
                    vector[kind.column()] = if kind.is_right_skewed() {
                        raw.max(0.0).ln_1p()
                    } else {
                        raw
                    };
                }
                if incomplete {
                    missing_records += 1;
                }
                vector
            })
            .collect();

        for kind in MetricKind::ALL {
            let column = kind.column();
            normalize_column(&mut vectors, column);
            let weight = weights.weight(kind);
            for vector in &mut vectors {
                vector[column] *= weight;
            }
        }

        Self {
            levels: records.iter().map(|r| r.level).collect(),
            vectors,
            missing_records,
        }
    }

    /// Number of rows (levels) in the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns whether the matrix holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Min-max rescales one column to `[0, 1]` in place.
///
/// A column with extent below [`CONSTANT_COLUMN_EPSILON`] carries no
/// signal; every entry becomes [`CONSTANT_COLUMN_VALUE`] instead.
fn normalize_column(vectors: &mut [FeatureVector], column: usize) {
    let Some((min, max)) = column_extent(vectors.iter().map(|v| v[column])) else {
        return;
    };
    let extent = max - min;
    if extent < CONSTANT_COLUMN_EPSILON {
        for vector in vectors {
            vector[column] = CONSTANT_COLUMN_VALUE;
        }
    } else {
        for vector in vectors {
            vector[column] = (vector[column] - min) / extent;
        }
    }
}
