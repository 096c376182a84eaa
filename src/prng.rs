// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Seed sources for hash-family construction.
//!
//! Sketches only draw randomness while they are being built. The generator is
//! an explicit value threaded through construction, never process-wide state.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Seed used when the caller does not pick one.
///
/// Every sketch built from this seed with the same shape draws the same hash
/// family, which makes independently built sketches compatible.
pub const DEFAULT_SEED: u64 = 6_321_371;

/// Largest value (exclusive) a [`SeedSource`] may return.
pub const U31_LIMIT: u64 = 1 << 31;

/// A generator of uniformly distributed non-negative 31-bit integers.
pub trait SeedSource {
    /// Next value, uniform over `[0, 2^31)`.
    fn next_u31(&mut self) -> u32;
}

impl<R: RngCore + ?Sized> SeedSource for R {
    fn next_u31(&mut self) -> u32 {
        self.next_u32() >> 1
    }
}

/// Builds the deterministic generator used by [`crate::AgmsSketch::with_seed`].
pub fn default_source(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
