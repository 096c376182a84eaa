// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Hash families used by the sketch rows.
//!
//! - [`hash31`] is a pairwise-independent family `a·x + b mod p` with
//!   `p = 2^31 - 1`, used to pick a bucket.
//! - [`fourwise`] chains three [`hash31`] evaluations into a degree-three
//!   polynomial, giving four-wise independence; only its low bit is used, as a
//!   fair ±1 sign.
//!
//! Both reduce modulo the Mersenne prime with a shift-and-add fold instead of
//! a division.

use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};

/// Mersenne prime `2^31 - 1`, also the 31-bit mask.
pub const MOD_P: u64 = (1 << 31) - 1;

/// Bit width of [`MOD_P`].
const HL: u32 = 31;

/// Pairwise-independent hash of `x` parameterized by `(a, b)`.
///
/// Returns a value in `[0, 2^31)`.
#[inline]
pub fn hash31(a: u64, b: u64, x: u64) -> u32 {
    let result = a.wrapping_mul(x).wrapping_add(b);
    let folded = (result >> HL).wrapping_add(result) & MOD_P;
    folded as u32
}

/// Four-wise independent hash of `x` parameterized by `(a, b, c, d)`.
#[inline]
pub fn fourwise(a: u64, b: u64, c: u64, d: u64, x: u64) -> u32 {
    let h = hash31(x, a, b);
    let h = hash31(u64::from(h), x, c);
    hash31(u64::from(h), x, d)
}

/// Maps the low bit of a sign hash to `+1` (bit set) or `-1` (bit clear).
#[inline]
pub fn sign_of(hash: u32) -> i32 {
    if hash & 1 == 1 {
        1
    } else {
        -1
    }
}

/// Stable 64-bit item identifier for an arbitrary hashable key.
///
/// SipHash-1-3 with fixed zero keys, so the same key maps to the same item in
/// every sketch and every process.
pub fn item_of<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = SipHasher13::new();
    key.hash(&mut hasher);
    hasher.finish()
}
