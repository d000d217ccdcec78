//! Per-level telemetry records.
//!
//! A [`LevelMetricRecord`] is the immutable input snapshot the clustering
//! pipeline consumes. Records are produced once per external "load" by the
//! ingestion layer (CSV/reporting glue, out of scope here) and are never
//! mutated by a clustering run; runs hand back fresh assignment and score
//! records instead.
//!
//! # Serialization
//!
//! Records round-trip through JSON with `serde`:
//!
//! ```json
//! {
//!   "level": 42,
//!   "metrics": { "repeat_ratio": 0.18, "play_time": 95.0 },
//!   "monetization_score": 12.0,
//!   "engagement_score": 30.5,
//!   "satisfaction_score": 22.0,
//!   "final_cluster": "2"
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One level's telemetry snapshot for a clustering run.
///
/// The metric map is keyed by canonical metric name; the pipeline reads a
/// fixed metric set from it and treats missing entries as `0.0` (counted,
/// never fatal). `final_cluster` carries the rank stored by a previous run,
/// or an empty string for a level that has never been assigned.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LevelMetricRecord {
    /// Level number, `>= 1`. Non-positive levels are rejected upstream.
    pub level: u32,
    /// Raw metric values keyed by canonical metric name.
    pub metrics: BTreeMap<String, f32>,
    /// Monetization subscore supplied by the reporting layer.
    pub monetization_score: f32,
    /// Engagement subscore supplied by the reporting layer.
    pub engagement_score: f32,
    /// Satisfaction subscore supplied by the reporting layer.
    pub satisfaction_score: f32,
    /// Rank stored by a previous run ("1".."4"), or empty if unassigned.
    #[serde(default)]
    pub final_cluster: String,
}

impl LevelMetricRecord {
    /// Looks up a raw metric by name, returning `None` when the record does
    /// not carry it or the stored value is not finite.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<f32> {
        self.metrics.get(name).copied().filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(metrics: &[(&str, f32)]) -> LevelMetricRecord {
        LevelMetricRecord {
            level: 1,
            metrics: metrics
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect(),
            monetization_score: 0.0,
            engagement_score: 0.0,
            satisfaction_score: 0.0,
            final_cluster: String::new(),
        }
    }

    #[test]
    fn metric_lookup_returns_stored_value() {
        let record = record_with(&[("repeat_ratio", 0.25)]);
        assert_eq!(record.metric("repeat_ratio"), Some(0.25));
    }

    #[test]
    fn missing_metric_is_none() {
        let record = record_with(&[]);
        assert_eq!(record.metric("repeat_ratio"), None);
    }

    #[test]
    fn non_finite_metric_is_none() {
        let record = record_with(&[("play_time", f32::NAN)]);
        assert_eq!(record.metric("play_time"), None);
    }

    #[test]
    fn final_cluster_defaults_to_empty_on_deserialize() {
        let json = r#"{
            "level": 7,
            "metrics": {"repeat_ratio": 0.1},
            "monetization_score": 1.0,
            "engagement_score": 2.0,
            "satisfaction_score": 3.0
        }"#;
        let record: LevelMetricRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.level, 7);
        assert!(record.final_cluster.is_empty());
    }
}
