//! Statistical helpers for the Levelsight analytics pipeline.
//!
//! This crate provides the small set of statistics the clustering pipeline
//! and its operator reports need:
//!
//! - **Descriptive statistics**: min, max, mean, median, standard deviation
//!   for per-rank level summaries
//! - **Column extent**: min/max extraction used by per-group min-max
//!   normalization
//!
//! # Examples
//!
//! ## Summarizing a metric column
//!
//! ```
//! use levelsight_stats::descriptive::DescriptiveStats;
//!
//! let play_counts = [4.0, 1.0, 3.0, 2.0, 5.0];
//! let stats = DescriptiveStats::new(play_counts).unwrap();
//! assert_eq!(stats.min, 1.0);
//! assert_eq!(stats.max, 5.0);
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Computing a normalization range
//!
//! ```
//! use levelsight_stats::extent::column_extent;
//!
//! let play_times = [12.0, 30.0, 7.5];
//! let (min, max) = column_extent(play_times).unwrap();
//! assert_eq!(min, 7.5);
//! assert_eq!(max, 30.0);
//! ```

pub mod descriptive;
pub mod extent;
