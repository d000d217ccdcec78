//! Column extent (min/max) extraction.
//!
//! Min-max normalization needs the extent of each metric column within a
//! concept group. This is a single pass over the values with no sorting,
//! tolerating any iteration order.

/// Returns the `(min, max)` of the values, or `None` if the input is empty.
///
/// Comparison uses [`f32::total_cmp`], so NaN values order after every
/// finite value instead of poisoning the result. Callers that must exclude
/// NaN should filter before calling.
///
/// # Examples
///
/// ```
/// use levelsight_stats::extent::column_extent;
///
/// assert_eq!(column_extent([3.0, 1.0, 2.0]), Some((1.0, 3.0)));
/// assert_eq!(column_extent([]), None);
/// ```
#[must_use]
pub fn column_extent<I>(values: I) -> Option<(f32, f32)>
where
    I: IntoIterator<Item = f32>,
{
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((
            if v.total_cmp(&min).is_lt() { v } else { min },
            if v.total_cmp(&max).is_gt() { v } else { max },
        )),
    })
}
