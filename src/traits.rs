// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use thiserror::Error;

/// Error type for sketch operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SketchError {
    #[error("Invalid dimensions: buckets={buckets}, depth={depth} (both must be at least 1)")]
    InvalidDimensions { buckets: usize, depth: usize },
    #[error("Invalid error bounds: epsilon={epsilon}, delta={delta} (both must lie in (0, 1))")]
    InvalidBounds { epsilon: f64, delta: f64 },
    #[error("Allocation error: could not reserve {cells} cells")]
    Allocation { cells: usize },
    #[error("Incompatible sketches: {0}")]
    Incompatible(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Nothing to merge")]
    Empty,
}

/// Linear sketch trait - the algebra shared by sketches that are exact linear
/// projections of a frequency vector.
///
/// Two compatible sketches describe the same linear map, so the sketch of the
/// sum (or difference) of two streams is the element-wise sum (or difference)
/// of their sketches.
///
/// # Requirements
///
/// Implementations must satisfy the following algebraic properties:
/// - **Commutativity**: `add_into(A, B)` and `add_into(B, A)` hold the same state.
/// - **Associativity**: grouping of additions does not change the result.
/// - **Inverse**: `subtract_from(add_into(A, B), B) == A`.
///
/// Unlike a state-based CRDT merge, addition is **not** idempotent: adding the
/// same sketch twice doubles its contribution.
pub trait LinearSketch: Clone {
    /// Returns true if `self` and `other` share shape and hash family.
    fn is_compatible(&self, other: &Self) -> bool;

    /// Adds `source` into `self`. Leaves `self` untouched on error.
    fn add_into(&mut self, source: &Self) -> Result<(), SketchError>;

    /// Subtracts `source` from `self`. Leaves `self` untouched on error.
    fn subtract_from(&mut self, source: &Self) -> Result<(), SketchError>;

    /// Validates the internal consistency of the sketch state.
    ///
    /// Typically called on a sketch that did not come out of a constructor,
    /// e.g. one rebuilt through serde.
    fn validate(&self) -> Result<(), SketchError>;

    /// Returns true if every counter is zero.
    fn is_empty(&self) -> bool;

    /// Approximate memory footprint in bytes.
    fn size_in_bytes(&self) -> usize;
}
