// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::agms::AgmsSketch;
use crate::prng::DEFAULT_SEED;
use crate::traits::SketchError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shape and seed of a sketch.
///
/// Missing fields fall back to [`SketchConfig::default`] when deserialized.
///
/// ```
/// use agms_sketch::SketchConfig;
///
/// let config = SketchConfig::from_error_bounds(0.5, 0.5).unwrap();
/// assert_eq!(config.buckets, 12);
/// assert_eq!(config.depth, 3);
///
/// let sketch = config.build().unwrap();
/// assert_eq!(sketch.buckets(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Counters per row
    pub buckets: usize,
    /// Number of rows
    pub depth: usize,
    /// Seed of the hash family
    pub seed: u64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            buckets: 1024,
            depth: 5,
            seed: DEFAULT_SEED,
        }
    }
}

impl SketchConfig {
    pub fn new(buckets: usize, depth: usize) -> Self {
        Self {
            buckets,
            depth,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sizes a sketch so point queries are within `epsilon * sqrt(F2)` of the
    /// true weight with probability at least `1 - delta`.
    ///
    /// Each row fails with probability at most 1/3 once `buckets >= 3 / epsilon²`
    /// (Chebyshev), and the median of `4 ln(1/delta)` rows fails with
    /// probability at most `delta` (Chernoff). Depth is rounded up to an odd
    /// number so the median is a single row.
    pub fn from_error_bounds(epsilon: f64, delta: f64) -> Result<Self, SketchError> {
        let in_unit = |x: f64| x.is_finite() && x > 0.0 && x < 1.0;
        if !in_unit(epsilon) || !in_unit(delta) {
            return Err(SketchError::InvalidBounds { epsilon, delta });
        }

        let buckets = (3.0 / (epsilon * epsilon)).ceil() as usize;
        let mut depth = ((4.0 * (1.0 / delta).ln()).ceil() as usize).max(1);
        if depth % 2 == 0 {
            depth += 1;
        }

        debug!(epsilon, delta, buckets, depth, "sized AGMS sketch from error bounds");
        Ok(Self::new(buckets.max(1), depth))
    }

    /// Builds an empty sketch with this shape and seed.
    pub fn build(&self) -> Result<AgmsSketch, SketchError> {
        AgmsSketch::with_seed(self.buckets, self.depth, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LinearSketch;

    #[test]
    fn default_builds() {
        let sketch = SketchConfig::default().build().unwrap();
        assert_eq!(sketch.buckets(), 1024);
        assert_eq!(sketch.depth(), 5);
        assert!(sketch.is_compatible(&AgmsSketch::new(1024, 5).unwrap()));
    }

    #[test]
    fn seed_changes_the_family() {
        let a = SketchConfig::new(64, 3).build().unwrap();
        let b = SketchConfig::new(64, 3).with_seed(42).build().unwrap();
        assert!(!a.is_compatible(&b));
    }

    #[test]
    fn error_bounds_sizing() {
        let config = SketchConfig::from_error_bounds(0.1, 0.01).unwrap();
        assert_eq!(config.buckets, 300);
        assert_eq!(config.depth, 19);
        assert_eq!(config.depth % 2, 1);
    }

    #[test]
    fn error_bounds_depth_rounds_to_odd() {
        // 4 ln(1/0.6) = 2.04.. -> 3
        assert_eq!(SketchConfig::from_error_bounds(0.9, 0.6).unwrap().depth, 3);
        // 4 ln(1/0.9) = 0.42.. -> 1
        assert_eq!(SketchConfig::from_error_bounds(0.9, 0.9).unwrap().depth, 1);
    }

    #[test]
    fn rejects_out_of_range_bounds() {
        for (epsilon, delta) in [(0.0, 0.1), (1.0, 0.1), (0.1, 0.0), (0.1, 1.5), (f64::NAN, 0.1)] {
            assert!(matches!(
                SketchConfig::from_error_bounds(epsilon, delta),
                Err(SketchError::InvalidBounds { .. })
            ));
        }
    }

    #[test]
    fn build_propagates_invalid_shape() {
        assert!(matches!(
            SketchConfig::new(0, 5).build(),
            Err(SketchError::InvalidDimensions { .. })
        ));
    }
}
