//! Level ranges for clustering runs.

use serde::{Deserialize, Serialize};

/// The inclusive level span a clustering run operates on.
///
/// Levels outside the range are excluded from the run; any cluster or score
/// previously stored for them is left untouched. The only hard precondition
/// of the whole pipeline lives here: `min` must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelRange {
    /// First level included in the run (inclusive, `>= 1`).
    pub min: u32,
    /// Last level included in the run (inclusive).
    pub max: u32,
}

/// Rejection of a clustering run before any work starts.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("invalid level range [{min}, {max}]: range.min must be >= 1")]
pub struct InvalidRangeError {
    /// The rejected lower bound.
    pub min: u32,
    /// The upper bound of the rejected range.
    pub max: u32,
}

impl LevelRange {
    /// Creates a range spanning `min..=max`.
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Checks the run precondition: `min >= 1`.
    ///
    /// An inverted range (`min > max`) is not an error; it simply selects
    /// no levels and the run reports empty output.
    pub fn validate(&self) -> Result<(), InvalidRangeError> {
        if self.min == 0 {
            return Err(InvalidRangeError {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Returns whether `level` falls inside this range.
    #[must_use]
    pub fn contains(&self, level: u32) -> bool {
        (self.min..=self.max).contains(&level)
    }
}
