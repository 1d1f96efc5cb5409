//! The one place where shuffle indices get folded back into lane range.
//!
//! Every call site (shuffle construction, `wrap_indexes`, iota shuffles, gathers)
//! goes through these functions so the power-of-two and general paths can never
//! drift apart.

/// Folds any index into `[0, lane_count)` with floor-modulo semantics.
///
/// # Panics
///
/// Panics if `lane_count` is zero.
#[inline]
pub fn wrap_to_range(index: i32, lane_count: usize) -> i32 {
    assert!(lane_count > 0, "lane count must be positive");
    let n = lane_count as i32;
    if lane_count.is_power_of_two() {
        index & (n - 1)
    } else {
        index.rem_euclid(n)
    }
}

/// Maps an arbitrary index onto the shuffle encoding: in-range indices are kept,
/// anything else becomes an exceptional entry in `[-lane_count, 0)` whose wrapped
/// value is still recoverable by adding `lane_count`.
#[inline]
pub fn partially_wrap(index: i32, lane_count: usize) -> i32 {
    let wrapped = wrap_to_range(index, lane_count);
    if wrapped == index {
        wrapped
    } else {
        wrapped - lane_count as i32
    }
}

/// Normalizes an entry already in `[-lane_count, lane_count)` into `[0, lane_count)`.
///
/// Power-of-two lane counts mask, other lane counts add `lane_count` to negative
/// entries. Both agree with [`wrap_to_range`] on that domain.
#[inline]
pub fn normalize_exceptional(index: i32, lane_count: usize) -> i32 {
    debug_assert!(is_encodable(index, lane_count));
    let n = lane_count as i32;
    if lane_count.is_power_of_two() {
        index & (n - 1)
    } else if index < 0 {
        index + n
    } else {
        index
    }
}

/// Whether `index` is a legal shuffle entry (valid or exceptional).
#[inline]
pub fn is_encodable(index: i32, lane_count: usize) -> bool {
    let n = lane_count as i64;
    let index = index as i64;
    -n <= index && index < n
}
