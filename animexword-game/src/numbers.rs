//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a count to f64, returning 0.0 if it cannot be represented.
#[must_use]
pub fn count_to_f64(value: u32) -> f64 {
    cast::<u32, f64>(value).unwrap_or(0.0)
}

/// Share of `part` in `whole` as a percentage clamped to `0..=100`.
///
/// A zero `whole` yields 0.0 rather than a non-finite value.
#[must_use]
pub fn percent_of(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (count_to_f64(part) / count_to_f64(whole) * 100.0).clamp(0.0, 100.0)
}

/// Convert a length to u32, saturating at `u32::MAX`.
#[must_use]
pub fn len_to_u32(value: usize) -> u32 {
    cast::<usize, u32>(value).unwrap_or(u32::MAX)
}
