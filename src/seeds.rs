// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::hashing::{fourwise, hash31, sign_of};
use crate::prng::{SeedSource, U31_LIMIT};
use crate::traits::SketchError;
use serde::{Deserialize, Serialize};

/// Parameters per sketch row: two for the bucket hash, four for the sign hash.
pub const PARAMS_PER_ROW: usize = 6;

/// Hash Seeds - the hash family of a sketch.
///
/// Stored as 6 parameter rows of `depth` entries each. For sketch row `r`,
/// `params[0][r]` and `params[1][r]` select the bucket, `params[2..6][r]` select
/// the sign. Two sketches with equal seeds apply the same linear map to their
/// input streams.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashSeeds {
    params: [Vec<u64>; PARAMS_PER_ROW],
}

impl HashSeeds {
    /// Draws `depth` rows of parameters from `source`.
    ///
    /// Draws are taken row by row, six per sketch row, so the same source state
    /// always yields the same family.
    pub fn generate<S: SeedSource + ?Sized>(
        depth: usize,
        source: &mut S,
    ) -> Result<Self, SketchError> {
        let mut params: [Vec<u64>; PARAMS_PER_ROW] = Default::default();
        for column in params.iter_mut() {
            column
                .try_reserve_exact(depth)
                .map_err(|_| SketchError::Allocation {
                    cells: depth.saturating_mul(PARAMS_PER_ROW),
                })?;
        }

        for _ in 0..depth {
            for column in params.iter_mut() {
                column.push(u64::from(source.next_u31()));
            }
        }

        Ok(Self { params })
    }

    /// Number of sketch rows covered.
    pub fn depth(&self) -> usize {
        self.params[0].len()
    }

    /// Parameter row `j` (0..6), one entry per sketch row.
    pub fn params(&self, j: usize) -> &[u64] {
        &self.params[j]
    }

    /// Bucket of `item` in sketch row `row`, in `[0, buckets)`.
    #[inline]
    pub fn bucket(&self, row: usize, item: u64, buckets: usize) -> usize {
        let hash = hash31(self.params[0][row], self.params[1][row], item);
        hash as usize % buckets
    }

    /// `+1` or `-1` multiplier of `item` in sketch row `row`.
    #[inline]
    pub fn sign(&self, row: usize, item: u64) -> i32 {
        sign_of(fourwise(
            self.params[2][row],
            self.params[3][row],
            self.params[4][row],
            self.params[5][row],
            item,
        ))
    }

    /// Checks that every parameter row covers `depth` rows and stays 31-bit.
    pub fn validate(&self, depth: usize) -> Result<(), SketchError> {
        for (j, column) in self.params.iter().enumerate() {
            if column.len() != depth {
                return Err(SketchError::Validation(format!(
                    "hash seed row {} has {} entries, expected {}",
                    j,
                    column.len(),
                    depth
                )));
            }
            if let Some(bad) = column.iter().find(|&&p| p >= U31_LIMIT) {
                return Err(SketchError::Validation(format!(
                    "hash seed {} in row {} exceeds 31 bits",
                    bad, j
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::{default_source, DEFAULT_SEED};

    #[test]
    fn generate_fills_every_row() {
        let seeds = HashSeeds::generate(5, &mut default_source(DEFAULT_SEED)).unwrap();
        assert_eq!(seeds.depth(), 5);
        for j in 0..PARAMS_PER_ROW {
            assert_eq!(seeds.params(j).len(), 5);
        }
        assert!(seeds.validate(5).is_ok());
    }

    #[test]
    fn draws_are_taken_row_by_row() {
        let seeds = HashSeeds::generate(3, &mut default_source(5)).unwrap();
        let mut source = default_source(5);
        for r in 0..3 {
            for j in 0..PARAMS_PER_ROW {
                assert_eq!(seeds.params(j)[r], u64::from(source.next_u31()));
            }
        }
    }

    #[test]
    fn same_seed_same_family() {
        let a = HashSeeds::generate(4, &mut default_source(DEFAULT_SEED)).unwrap();
        let b = HashSeeds::generate(4, &mut default_source(DEFAULT_SEED)).unwrap();
        assert_eq!(a, b);
        let c = HashSeeds::generate(4, &mut default_source(DEFAULT_SEED + 1)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn buckets_stay_in_range() {
        let seeds = HashSeeds::generate(3, &mut default_source(1)).unwrap();
        for item in 0..1_000u64 {
            for row in 0..3 {
                assert!(seeds.bucket(row, item, 13) < 13);
                assert!(matches!(seeds.sign(row, item), 1 | -1));
            }
        }
    }

    #[test]
    fn validate_rejects_wrong_depth() {
        let seeds = HashSeeds::generate(3, &mut default_source(1)).unwrap();
        assert!(matches!(seeds.validate(4), Err(SketchError::Validation(_))));
    }

    #[test]
    fn validate_rejects_wide_parameters() {
        let mut seeds = HashSeeds::generate(2, &mut default_source(1)).unwrap();
        seeds.params[3][1] = U31_LIMIT - 1;
        assert!(seeds.validate(2).is_ok());

        seeds.params[3][1] = U31_LIMIT;
        let err = seeds.validate(2).unwrap_err();
        assert!(err.to_string().contains("exceeds 31 bits"), "{}", err);
    }
}
