// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use agms_sketch::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const DOMAIN: u64 = 1_000;
const UPDATES: usize = 10_000;

fn random_stream(sketch: &mut AgmsSketch, rng: &mut StdRng) -> HashMap<u64, i64> {
    let mut truth = HashMap::new();
    for _ in 0..UPDATES {
        let item = rng.random_range(0..DOMAIN);
        sketch.update(item, 1);
        *truth.entry(item).or_insert(0) += 1;
    }
    truth
}

#[test]
fn test_point_query_error_within_three_sigma() {
    let trials = 100;
    let probe = 7u64;
    let mut misses = 0;

    for trial in 0..trials {
        let mut sketch = AgmsSketch::with_seed(64, 7, 1_000 + trial).unwrap();
        let mut rng = StdRng::seed_from_u64(5_000 + trial);
        let truth = random_stream(&mut sketch, &mut rng);

        let actual = truth.get(&probe).copied().unwrap_or(0);
        let error = (i64::from(sketch.estimate(probe)) - actual).abs() as f64;
        let bound = 3.0 * (sketch.f2_estimate() as f64 / sketch.buckets() as f64).sqrt();
        if error > bound {
            misses += 1;
        }
    }

    // Fewer than 5% of trials may miss.
    assert!(misses * 20 < trials, "{} of {} trials missed", misses, trials);
}

#[test]
fn test_f2_estimate_tracks_true_moment() {
    for trial in 0..5u64 {
        let mut sketch = AgmsSketch::with_seed(1024, 7, 77 + trial).unwrap();
        let mut rng = StdRng::seed_from_u64(900 + trial);
        let truth = random_stream(&mut sketch, &mut rng);

        let exact: i64 = truth.values().map(|v| v * v).sum();
        let relative = (sketch.f2_estimate() - exact).abs() as f64 / exact as f64;
        assert!(relative < 0.5, "trial {}: relative error {}", trial, relative);
    }
}

#[test]
fn test_heavy_item_dominates_estimate() {
    let mut sketch = AgmsSketch::new(256, 5).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..2_000 {
        sketch.update(rng.random_range(0..DOMAIN), 1);
    }
    sketch.update(424_242, 5_000);

    let estimate = sketch.estimate(424_242);
    assert!((estimate - 5_000).abs() < 500, "estimate {}", estimate);
}

#[test]
fn test_inner_product_of_overlapping_streams() {
    let mut a = AgmsSketch::new(1024, 7).unwrap();
    let mut b = AgmsSketch::new(1024, 7).unwrap();
    let mut fa: HashMap<u64, i64> = HashMap::new();
    let mut fb: HashMap<u64, i64> = HashMap::new();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..5_000 {
        let item = rng.random_range(0..500u64);
        a.update(item, 2);
        *fa.entry(item).or_insert(0) += 2;
        let item = rng.random_range(250..750u64);
        b.update(item, 1);
        *fb.entry(item).or_insert(0) += 1;
    }

    let exact: i64 = fa
        .iter()
        .map(|(item, wa)| wa * fb.get(item).copied().unwrap_or(0))
        .sum();
    let scale = ((a.f2_estimate() as f64) * (b.f2_estimate() as f64)).sqrt();
    let error = (a.inner_product(&b) - exact).abs() as f64;
    // Per-row standard deviation is about sqrt(2 / buckets) * |a| * |b|.
    assert!(error < 0.25 * scale, "error {} vs scale {}", error, scale);
}
