//! # agms-sketch
//!
//! The AGMS ("tug-of-war") sketch: a fixed-size, linear synopsis of a turnstile
//! stream of `(item, signed weight)` updates. It answers approximate point
//! queries, second frequency moment (F2) and inner-product queries in memory
//! that depends only on the accuracy parameters.
//!
//! Sketches built with the same shape and seed share a hash family and can be
//! added or subtracted exactly, so streams can be sketched independently (per
//! worker, per time window) and combined afterwards.

pub mod agms;
pub mod config;
pub mod hashing;
pub mod prng;
pub mod seeds;
pub mod select;
pub mod traits;

// Re-export core traits
pub use traits::{LinearSketch, SketchError};

pub use agms::{compatible, AgmsSketch};
pub use config::SketchConfig;
pub use prng::{default_source, SeedSource, DEFAULT_SEED};
pub use seeds::HashSeeds;
