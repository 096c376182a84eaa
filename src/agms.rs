// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::hashing::item_of;
use crate::prng::{default_source, SeedSource, DEFAULT_SEED};
use crate::seeds::{HashSeeds, PARAMS_PER_ROW};
use crate::select::{combine_estimates, RowEstimates};
use crate::traits::{LinearSketch, SketchError};
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use tracing::{debug, warn};

/// AGMS Sketch - Turnstile Frequency Synopsis
///
/// Also known as the "tug-of-war" sketch. Each of the `depth` rows hashes an
/// item to one of `buckets` counters and adds the item's weight multiplied by a
/// pseudo-random `±1` sign. A row then gives unbiased estimates of single item
/// frequencies, of the second frequency moment (F2) and of inner products with
/// other sketches; the median across rows bounds the error with high
/// probability.
///
/// # Key Properties
///
/// - **Fixed Memory**: `buckets × depth` 32-bit counters plus `6 × depth` hash
///   parameters, regardless of the domain size or stream length.
/// - **Turnstile**: Weights are signed, so deletions are just negative updates.
/// - **Linear**: The counters are an exact linear projection of the frequency
///   vector. Sketches of two streams that share a hash family can be added or
///   subtracted to obtain the sketch of the combined stream.
///
/// # Algebraic Properties
///
/// - **Commutativity**: Yes (counter addition is commutative).
/// - **Associativity**: Yes.
/// - **Idempotence**: **NO**. Adding the same sketch twice doubles its weights.
/// - **Inverse**: Yes. Subtraction undoes addition exactly.
///
/// # Example
///
/// ```
/// use agms_sketch::{AgmsSketch, LinearSketch};
///
/// let mut left = AgmsSketch::new(256, 5).unwrap();
/// let mut right = AgmsSketch::new(256, 5).unwrap();
/// left.update(7, 10);
/// right.update(7, 5);
///
/// left.add_into(&right).unwrap();
/// assert_eq!(left.total_weight(), 15);
/// assert!(left.f2_estimate() > 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAgmsSketch")]
pub struct AgmsSketch {
    /// Number of counters per row
    buckets: usize,
    /// Number of independent rows
    depth: usize,
    /// Signed sum of every weight applied
    count: i64,
    /// Row-major counter grid, `depth × buckets`
    counters: Vec<i32>,
    /// Hash family shared by compatible sketches
    seeds: HashSeeds,
}

impl AgmsSketch {
    /// Creates a sketch whose hash family is drawn from [`DEFAULT_SEED`].
    ///
    /// All sketches created this way with the same shape are compatible.
    pub fn new(buckets: usize, depth: usize) -> Result<Self, SketchError> {
        Self::with_seed(buckets, depth, DEFAULT_SEED)
    }

    /// Creates a sketch whose hash family is drawn from `seed`.
    pub fn with_seed(buckets: usize, depth: usize, seed: u64) -> Result<Self, SketchError> {
        let mut source = default_source(seed);
        Self::from_source(buckets, depth, &mut source)
    }

    /// Creates a sketch whose hash family is drawn from a caller-owned source.
    ///
    /// # Errors
    ///
    /// - [`SketchError::InvalidDimensions`] if `buckets` or `depth` is zero.
    /// - [`SketchError::Allocation`] if the counter grid cannot be allocated.
    pub fn from_source<S: SeedSource + ?Sized>(
        buckets: usize,
        depth: usize,
        source: &mut S,
    ) -> Result<Self, SketchError> {
        if buckets == 0 || depth == 0 {
            return Err(SketchError::InvalidDimensions { buckets, depth });
        }

        let cells = buckets
            .checked_mul(depth)
            .ok_or(SketchError::Allocation { cells: usize::MAX })?;
        let mut counters = Vec::new();
        counters
            .try_reserve_exact(cells)
            .map_err(|_| SketchError::Allocation { cells })?;
        counters.resize(cells, 0);

        let seeds = HashSeeds::generate(depth, source)?;

        let sketch = Self {
            buckets,
            depth,
            count: 0,
            counters,
            seeds,
        };
        debug!(
            buckets,
            depth,
            bytes = sketch.size_in_bytes(),
            "created AGMS sketch"
        );
        Ok(sketch)
    }

    /// Number of counters per row.
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Number of rows.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Signed sum of every weight applied through [`update`](Self::update).
    pub fn total_weight(&self) -> i64 {
        self.count
    }

    /// The counter grid, row-major.
    pub fn counters(&self) -> &[i32] {
        &self.counters
    }

    /// Counters of row `r`, or `None` past the last row.
    pub fn row(&self, r: usize) -> Option<&[i32]> {
        self.counters.chunks_exact(self.buckets).nth(r)
    }

    /// The hash family.
    pub fn hash_seeds(&self) -> &HashSeeds {
        &self.seeds
    }

    /// Adds `weight` (possibly negative) to the frequency of `item`.
    pub fn update(&mut self, item: u64, weight: i32) {
        self.count = self.count.wrapping_add(i64::from(weight));

        let buckets = self.buckets;
        for (row, cells) in self.counters.chunks_exact_mut(buckets).enumerate() {
            let bucket = self.seeds.bucket(row, item, buckets);
            if self.seeds.sign(row, item) > 0 {
                cells[bucket] = cells[bucket].wrapping_add(weight);
            } else {
                cells[bucket] = cells[bucket].wrapping_sub(weight);
            }
        }
    }

    /// Adds `weight` to the frequency of an arbitrary hashable key.
    pub fn update_key<K: Hash + ?Sized>(&mut self, key: &K, weight: i32) {
        self.update(item_of(key), weight);
    }

    /// Estimates the net accumulated weight of `item`.
    pub fn estimate(&self, item: u64) -> i32 {
        let mut estimates: RowEstimates<i32> = self
            .counters
            .chunks_exact(self.buckets)
            .enumerate()
            .map(|(row, cells)| {
                let cell = cells[self.seeds.bucket(row, item, self.buckets)];
                if self.seeds.sign(row, item) > 0 {
                    cell
                } else {
                    cell.wrapping_neg()
                }
            })
            .collect();
        combine_estimates(&mut estimates)
    }

    /// Estimates the net accumulated weight of a hashable key.
    pub fn estimate_key<K: Hash + ?Sized>(&self, key: &K) -> i32 {
        self.estimate(item_of(key))
    }

    /// Estimates the second frequency moment, the sum over all items of their
    /// squared net weight.
    pub fn f2_estimate(&self) -> i64 {
        row_products(&self.counters, &self.counters, self.buckets)
    }

    /// Estimates the inner product of the frequency vectors behind `self` and
    /// `other`.
    ///
    /// Returns `0` when the sketches are incompatible, which is
    /// indistinguishable from a true zero. Use
    /// [`checked_inner_product`](Self::checked_inner_product) when that matters.
    pub fn inner_product(&self, other: &Self) -> i64 {
        self.checked_inner_product(other).unwrap_or(0)
    }

    /// Estimates the inner product, failing on incompatible sketches.
    pub fn checked_inner_product(&self, other: &Self) -> Result<i64, SketchError> {
        self.ensure_compatible(other, "inner product")?;
        Ok(row_products(&self.counters, &other.counters, self.buckets))
    }

    /// Subtracts the sketch from itself, leaving every counter at zero.
    ///
    /// Same result as `subtract_from` with a clone of `self`.
    pub fn subtract_self(&mut self) {
        self.clear();
    }

    /// Zeroes every counter and the total weight. The hash family is kept.
    pub fn clear(&mut self) {
        self.counters.fill(0);
        self.count = 0;
    }

    /// Sums any number of compatible sketches into a new one.
    ///
    /// # Errors
    ///
    /// - [`SketchError::Empty`] if `sketches` yields nothing.
    /// - [`SketchError::Incompatible`] if any sketch differs from the first.
    pub fn merge_all<'a, I>(sketches: I) -> Result<Self, SketchError>
    where
        I: IntoIterator<Item = &'a AgmsSketch>,
    {
        let mut sketches = sketches.into_iter();
        let mut merged = sketches.next().ok_or(SketchError::Empty)?.clone();
        for sketch in sketches {
            merged.add_into(sketch)?;
        }
        Ok(merged)
    }

    fn mismatch(&self, other: &Self) -> Option<String> {
        if self.buckets != other.buckets {
            return Some(format!("buckets {} vs {}", self.buckets, other.buckets));
        }
        if self.depth != other.depth {
            return Some(format!("depth {} vs {}", self.depth, other.depth));
        }
        if self.seeds != other.seeds {
            return Some("hash seeds differ".to_string());
        }
        None
    }

    fn ensure_compatible(&self, other: &Self, operation: &str) -> Result<(), SketchError> {
        match self.mismatch(other) {
            None => Ok(()),
            Some(reason) => {
                warn!(operation, %reason, "refusing to combine incompatible AGMS sketches");
                Err(SketchError::Incompatible(reason))
            }
        }
    }
}

/// Unchecked serde image of [`AgmsSketch`], validated before it becomes one.
#[derive(Deserialize)]
struct RawAgmsSketch {
    buckets: usize,
    depth: usize,
    count: i64,
    counters: Vec<i32>,
    seeds: HashSeeds,
}

impl TryFrom<RawAgmsSketch> for AgmsSketch {
    type Error = SketchError;

    fn try_from(raw: RawAgmsSketch) -> Result<Self, Self::Error> {
        let sketch = Self {
            buckets: raw.buckets,
            depth: raw.depth,
            count: raw.count,
            counters: raw.counters,
            seeds: raw.seeds,
        };
        sketch.validate()?;
        Ok(sketch)
    }
}

impl LinearSketch for AgmsSketch {
    fn is_compatible(&self, other: &Self) -> bool {
        self.mismatch(other).is_none()
    }

    fn add_into(&mut self, source: &Self) -> Result<(), SketchError> {
        self.ensure_compatible(source, "add")?;
        for (dst, &src) in self.counters.iter_mut().zip(&source.counters) {
            *dst = dst.wrapping_add(src);
        }
        self.count = self.count.wrapping_add(source.count);
        Ok(())
    }

    fn subtract_from(&mut self, source: &Self) -> Result<(), SketchError> {
        self.ensure_compatible(source, "subtract")?;
        for (dst, &src) in self.counters.iter_mut().zip(&source.counters) {
            *dst = dst.wrapping_sub(src);
        }
        self.count = self.count.wrapping_sub(source.count);
        Ok(())
    }

    fn validate(&self) -> Result<(), SketchError> {
        if self.buckets == 0 || self.depth == 0 {
            return Err(SketchError::InvalidDimensions {
                buckets: self.buckets,
                depth: self.depth,
            });
        }
        if Some(self.counters.len()) != self.buckets.checked_mul(self.depth) {
            return Err(SketchError::Validation(format!(
                "counter grid has {} cells, expected {} x {}",
                self.counters.len(),
                self.depth,
                self.buckets
            )));
        }
        self.seeds.validate(self.depth)
    }

    fn is_empty(&self) -> bool {
        self.counters.iter().all(|&c| c == 0)
    }

    fn size_in_bytes(&self) -> usize {
        std::mem::size_of::<usize>()
            + self.buckets * self.depth * std::mem::size_of::<i32>()
            + self.depth * PARAMS_PER_ROW * std::mem::size_of::<u64>()
            + std::mem::size_of::<Self>()
    }
}

/// Returns true when both sketches are present and compatible.
pub fn compatible(a: Option<&AgmsSketch>, b: Option<&AgmsSketch>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.is_compatible(b),
        _ => false,
    }
}

/// Per-row dot products of two equally shaped grids, combined across rows.
fn row_products(a: &[i32], b: &[i32], buckets: usize) -> i64 {
    let mut estimates: RowEstimates<i64> = a
        .chunks_exact(buckets)
        .zip(b.chunks_exact(buckets))
        .map(|(ra, rb)| {
            ra.iter().zip(rb).fold(0i64, |acc, (&x, &y)| {
                acc.wrapping_add(i64::from(x) * i64::from(y))
            })
        })
        .collect();
    combine_estimates(&mut estimates)
}
