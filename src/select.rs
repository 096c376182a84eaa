// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Order statistics over the per-row estimates.

use smallvec::SmallVec;

/// Rows kept inline before the scratch buffer spills to the heap.
pub const INLINE_ROWS: usize = 16;

/// Scratch buffer holding one estimate per sketch row.
pub type RowEstimates<T> = SmallVec<[T; INLINE_ROWS]>;

/// Returns the `k`-th smallest element (1-based) of `values`.
///
/// Reorders `values` in place. Linear expected time.
///
/// # Panics
///
/// Panics if `k` is outside `[1, values.len()]`.
pub(crate) fn select_kth<T: Ord + Copy>(k: usize, values: &mut [T]) -> T {
    assert!(
        k >= 1 && k <= values.len(),
        "rank {} out of range for {} values",
        k,
        values.len()
    );
    let (_, kth, _) = values.select_nth_unstable(k - 1);
    *kth
}

/// Rank of the median among `depth` estimates, i.e. `ceil((depth + 1) / 2)`.
#[inline]
pub fn median_rank(depth: usize) -> usize {
    1 + depth / 2
}

/// Estimate types the row-combination rule works over.
pub trait RowEstimate: Ord + Copy {
    /// Integer mean of two estimates, truncated toward zero.
    fn mean2(a: Self, b: Self) -> Self;
}

impl RowEstimate for i32 {
    fn mean2(a: Self, b: Self) -> Self {
        ((i64::from(a) + i64::from(b)) / 2) as i32
    }
}

impl RowEstimate for i64 {
    fn mean2(a: Self, b: Self) -> Self {
        ((i128::from(a) + i128::from(b)) / 2) as i64
    }
}

/// Combines independent row estimates into one answer.
///
/// One row is returned as is, two rows are averaged and three or more yield
/// their median.
///
/// # Panics
///
/// Panics on an empty slice.
pub(crate) fn combine_estimates<T: RowEstimate>(estimates: &mut [T]) -> T {
    match estimates.len() {
        0 => panic!("no row estimates to combine"),
        1 => estimates[0],
        2 => T::mean2(estimates[0], estimates[1]),
        depth => select_kth(median_rank(depth), estimates),
    }
}
