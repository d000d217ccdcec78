//! Level-to-concept bucketing.
//!
//! Only levels of a comparable difficulty tier should be clustered against
//! each other, so every level maps to a "concept" group id before any
//! feature work happens. The mapping is a versioned policy decision that
//! must stay reproducible across releases, so it is encoded as a literal
//! interval table rather than arithmetic.
//!
//! Two distinct schemes live here and must not be conflated:
//!
//! - [`concept_group`]: the fine-grained table the clustering pipeline
//!   uses. Interval widths grow with level number (10 up to level 200,
//!   20 then 50 up to 1000, 100 up to 3000) and switch to dynamic width-50
//!   buckets above level 3000.
//! - [`display_tier`]: a coarse 4-tier scheme used only when presenting
//!   score-multiplier lookups to operators.

/// Version of the concept interval table.
///
/// Bump whenever [`CONCEPT_TABLE`] or the dynamic regime changes; stored
/// alongside persisted assignments so historical runs stay interpretable.
pub const CONCEPT_TABLE_VERSION: u32 = 2;

/// First level of the dynamic bucketing regime.
const DYNAMIC_ORIGIN: u32 = 3001;
/// Concept id assigned to the first dynamic bucket.
const DYNAMIC_BASE: u32 = 63;
/// Width of each dynamic bucket.
const DYNAMIC_WIDTH: u32 = 50;

/// One row of the concept table: levels `start..=end` map to `concept`.
#[derive(Debug, Clone, Copy)]
struct ConceptBand {
    start: u32,
    end: u32,
    concept: u32,
}

const fn band(start: u32, end: u32, concept: u32) -> ConceptBand {
    ConceptBand {
        start,
        end,
        concept,
    }
}

/// The literal interval ladder for levels 1..=3000.
///
/// Regimes, in order: one width-10 starter band, width-10 bands to level
/// 200, width-20 bands to 400, width-50 bands to 1000, width-100 bands to
/// 3000. Levels above 3000 use the dynamic regime in [`concept_group`].
const CONCEPT_TABLE: &[ConceptBand] = &[
    band(1, 10, 1),
    band(11, 20, 2),
    band(21, 30, 3),
    band(31, 40, 4),
    band(41, 50, 5),
    band(51, 60, 6),
    band(61, 70, 7),
    band(71, 80, 8),
    band(81, 90, 9),
    band(91, 100, 10),
    band(101, 110, 11),
    band(111, 120, 12),
    band(121, 130, 13),
    band(131, 140, 14),
    band(141, 150, 15),
    band(151, 160, 16),
    band(161, 170, 17),
    band(171, 180, 18),
    band(181, 190, 19),
    band(191, 200, 20),
    band(201, 220, 21),
    band(221, 240, 22),
    band(241, 260, 23),
    band(261, 280, 24),
    band(281, 300, 25),
    band(301, 320, 26),
    band(321, 340, 27),
    band(341, 360, 28),
    band(361, 380, 29),
    band(381, 400, 30),
    band(401, 450, 31),
    band(451, 500, 32),
    band(501, 550, 33),
    band(551, 600, 34),
    band(601, 650, 35),
    band(651, 700, 36),
    band(701, 750, 37),
    band(751, 800, 38),
    band(801, 850, 39),
    band(851, 900, 40),
    band(901, 950, 41),
    band(951, 1000, 42),
    band(1001, 1100, 43),
    band(1101, 1200, 44),
    band(1201, 1300, 45),
    band(1301, 1400, 46),
    band(1401, 1500, 47),
    band(1501, 1600, 48),
    band(1601, 1700, 49),
    band(1701, 1800, 50),
    band(1801, 1900, 51),
    band(1901, 2000, 52),
    band(2001, 2100, 53),
    band(2101, 2200, 54),
    band(2201, 2300, 55),
    band(2301, 2400, 56),
    band(2401, 2500, 57),
    band(2501, 2600, 58),
    band(2601, 2700, 59),
    band(2701, 2800, 60),
    band(2801, 2900, 61),
    band(2901, 3000, 62),
];

/// Maps a level number to its clustering concept group id.
///
/// Pure, total, and deterministic for every `level >= 1`; levels below the
/// contract (0, which upstream rejects) fall into the first band. The
/// result is non-decreasing in `level`.
///
/// # Examples
///
/// ```
/// use levelsight_engine::concept::concept_group;
///
/// assert_eq!(concept_group(1), concept_group(10));
/// assert_ne!(concept_group(10), concept_group(11));
/// assert_eq!(concept_group(3051), concept_group(3001) + 1);
/// ```
#[must_use]
pub fn concept_group(level: u32) -> u32 {
    if level >= DYNAMIC_ORIGIN {
        return DYNAMIC_BASE + (level - DYNAMIC_ORIGIN) / DYNAMIC_WIDTH;
    }
    CONCEPT_TABLE
        .iter()
        .find(|row| (row.start..=row.end).contains(&level))
        .map_or(CONCEPT_TABLE[0].concept, |row| row.concept)
}

/// Maps a level number to its coarse score-multiplier display tier.
///
/// Used only for presenting multiplier lookups to operators; the
/// clustering pipeline never consults this table.
#[must_use]
pub fn display_tier(level: u32) -> u32 {
    match level {
        0..=10 => 1,
        11..=1000 => 2,
        1001..=3000 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_contiguous_and_ascending() {
        let mut expected_start = 1;
        let mut last_concept = 0;
        for row in CONCEPT_TABLE {
            assert_eq!(row.start, expected_start);
            assert!(row.end >= row.start);
            assert_eq!(row.concept, last_concept + 1);
            expected_start = row.end + 1;
            last_concept = row.concept;
        }
        assert_eq!(expected_start, DYNAMIC_ORIGIN);
        assert_eq!(last_concept + 1, DYNAMIC_BASE);
    }

    #[test]
    fn concept_is_non_decreasing() {
        let mut previous = concept_group(1);
        for level in 2..5000 {
            let current = concept_group(level);
            assert!(
                current >= previous,
                "concept decreased at level {level}: {previous} -> {current}"
            );
            previous = current;
        }
    }

    #[test]
    fn first_band_covers_levels_one_to_ten() {
        for level in 1..=10 {
            assert_eq!(concept_group(level), 1);
        }
        assert_eq!(concept_group(11), 2);
    }

    #[test]
    fn boundary_between_static_and_dynamic_regimes() {
        assert_ne!(concept_group(3000), concept_group(3001));
        assert_eq!(concept_group(3001), DYNAMIC_BASE);
    }

    #[test]
    fn dynamic_buckets_have_width_fifty() {
        assert_eq!(concept_group(3050), concept_group(3001));
        assert_eq!(concept_group(3051), concept_group(3001) + 1);
        assert_eq!(concept_group(3101), concept_group(3001) + 2);
    }

    #[test]
    fn display_tiers_are_distinct_from_concept_table() {
        assert_eq!(display_tier(10), 1);
        assert_eq!(display_tier(11), 2);
        assert_eq!(display_tier(1000), 2);
        assert_eq!(display_tier(1001), 3);
        assert_eq!(display_tier(3000), 3);
        assert_eq!(display_tier(3001), 4);
        // The display scheme is far coarser than the clustering table.
        assert_ne!(display_tier(500), concept_group(500));
    }
}
