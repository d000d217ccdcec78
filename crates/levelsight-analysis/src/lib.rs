//! Level difficulty clustering and scoring for Levelsight.
//!
//! This crate is the analytical core of the dashboard: it segments game
//! levels into behavioral difficulty clusters from raw telemetry and
//! computes a composite player-experience score per level. Ingestion,
//! storage, and presentation are collaborators on either side; this crate
//! consumes typed [`LevelMetricRecord`](levelsight_engine::record::LevelMetricRecord)s
//! and hands back assignment and score records.
//!
//! # Pipeline
//!
//! One clustering run flows strictly downward:
//!
//! 1. **Bucket** ([`levelsight_engine::concept`]): each level maps to a
//!    concept group so only comparable levels cluster together
//! 2. **Normalize** ([`feature`]): extract the fixed metric set, correct
//!    skew, min-max within the group, apply weights
//! 3. **Cluster** ([`kmeans`]): seeded k-means++ per group, `k = min(4, n)`
//! 4. **Rank** ([`ranking`]): convert arbitrary cluster indices into a
//!    stable difficulty ladder "1".."k"
//! 5. **Score** ([`score`]): combine the three player-experience subscores
//!    with per-cluster weights
//!
//! [`run::ClusteringRun`] orchestrates the pass and reports soft
//! conditions (skipped groups, missing metrics) as counts instead of
//! errors.
//!
//! # Example
//!
//! ```
//! use levelsight_analysis::{
//!     feature::MetricWeights,
//!     kmeans::KMeansConfig,
//!     run::ClusteringRun,
//!     score::ClusterMultiplierTable,
//! };
//! use levelsight_engine::range::LevelRange;
//!
//! let run = ClusteringRun::new(
//!     MetricWeights::default(),
//!     ClusterMultiplierTable::default(),
//!     KMeansConfig::with_seed(42),
//! );
//! let report = run.execute(&[], LevelRange::new(1, 100)).unwrap();
//! assert!(report.assignments.is_empty());
//! ```

pub mod feature;
pub mod kmeans;
pub mod ranking;
pub mod run;
pub mod score;
