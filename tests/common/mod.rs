//! Shared fixtures for the integration test suite: a 256-bit vector type
//! with Hamming distance, clustered random generation, and a brute-force
//! reference search used to compute recall and distance-ratio metrics.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Once;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber once so `RUST_LOG=debug cargo test -- --nocapture`
/// surfaces the index's insert/remove/search-budget events during a test run.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitVec256(pub [u64; 4]);

impl BitVec256 {
    pub fn random(rng: &mut SmallRng) -> Self {
        BitVec256([rng.gen(), rng.gen(), rng.gen(), rng.gen()])
    }

    pub fn flip_bits(&self, rng: &mut SmallRng, count: usize) -> Self {
        let mut bits = self.0;
        for _ in 0..count {
            let word = rng.gen_range(0..4);
            let bit = rng.gen_range(0..64);
            bits[word] ^= 1u64 << bit;
        }
        BitVec256(bits)
    }
}

pub fn hamming(a: &BitVec256, b: &BitVec256) -> f64 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(x, y)| (x ^ y).count_ones() as u64)
        .sum::<u64>() as f64
}

/// `n` values drawn from `clusters` well-separated cluster centers, each
/// jittered by a handful of bit flips.
pub fn clustered(rng: &mut SmallRng, n: usize, clusters: usize) -> Vec<BitVec256> {
    let centers: Vec<BitVec256> = (0..clusters).map(|_| BitVec256::random(rng)).collect();
    (0..n)
        .map(|i| centers[i % clusters].flip_bits(rng, 6))
        .collect()
}

/// A `Metric` wrapper that counts every `distance` call, for verifying
/// distance-call budget assertions.
#[derive(Clone)]
pub struct CountingMetric<F> {
    inner: F,
    calls: Rc<Cell<usize>>,
}

impl<F> CountingMetric<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn reset(&self) {
        self.calls.set(0);
    }
}

impl<T, F> nsw_index::Metric<T> for CountingMetric<F>
where
    F: Fn(&T, &T) -> f64,
{
    fn distance(&self, a: &T, b: &T) -> f64 {
        self.calls.set(self.calls.get() + 1);
        (self.inner)(a, b)
    }
}

/// Brute-force top-k over `values` against `query`, ascending distance.
pub fn brute_force_topk(
    values: &[BitVec256],
    query: &BitVec256,
    k: usize,
) -> Vec<(BitVec256, f64)> {
    let mut scored: Vec<(BitVec256, f64)> = values
        .iter()
        .map(|v| (v.clone(), hamming(v, query)))
        .collect();
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    scored.truncate(k);
    scored
}
