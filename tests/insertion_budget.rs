mod common;

use common::{clustered, hamming, BitVec256, CountingMetric};
use nsw_index::Index;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Flips enough bits that the probe is guaranteed distinct from every stored
/// value, so the distance-call budget assertion isn't a no-op on an
/// accidental exact-match short-circuit (see Open Question 5 in SPEC_FULL.md).
fn unique_probe(points: &[BitVec256], rng: &mut SmallRng) -> BitVec256 {
    loop {
        let candidate = points[0].flip_bits(rng, 40);
        if !points.contains(&candidate) {
            return candidate;
        }
    }
}

#[test]
#[ignore] // Run manually: cargo test --test insertion_budget -- --ignored
fn single_insertion_distance_budget_at_50k() {
    let mut rng = SmallRng::seed_from_u64(307);
    let metric = CountingMetric::new(hamming);
    let mut index = Index::new(metric.clone());
    let points = clustered(&mut rng, 50_000, 40);
    for p in &points {
        index.add(p.clone());
    }

    let probe = unique_probe(&points, &mut rng);
    metric.reset();
    assert!(index.add(probe));
    let calls = metric.calls();
    assert!(calls <= 5000, "single insertion into a 50000-element index made {calls} distance calls");
}
