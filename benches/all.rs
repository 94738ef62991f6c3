use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nsw_index::Index;

const SEED: u64 = 123456789;

fn euclid(a: &Point, b: &Point) -> f64 {
    let dx = (a.0[0] - b.0[0]) as f64;
    let dy = (a.0[1] - b.0[1]) as f64;
    (dx * dx + dy * dy).sqrt()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Point([i32; 2]);

fn random_points(rng: &mut StdRng, n: usize) -> Vec<Point> {
    (0..n)
        .map(|_| Point([rng.gen_range(0..100_000), rng.gen_range(0..100_000)]))
        .collect()
}

fn build(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let points = random_points(&mut rng, 1024);

    c.bench_function("build_1024", |b| {
        b.iter_batched(
            || points.clone(),
            |points| {
                let mut index = Index::new(euclid);
                for p in points {
                    index.add(p);
                }
                index
            },
            BatchSize::SmallInput,
        )
    });
}

fn search(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let points = random_points(&mut rng, 4096);
    let mut index = Index::new(euclid);
    for p in &points {
        index.add(*p);
    }

    c.bench_function("search_k10_in_4096", |b| {
        b.iter_batched(
            || Point([rng.gen_range(0..100_000), rng.gen_range(0..100_000)]),
            |query| index.find_neighbors(&query, 10).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

fn remove_and_reinsert(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let points = random_points(&mut rng, 4096);
    let mut index = Index::new(euclid);
    for p in &points {
        index.add(*p);
    }

    c.bench_function("remove_reinsert_cycle", |b| {
        let idx = rng.gen_range(0..points.len());
        b.iter_batched(
            || points[idx],
            |victim| {
                index.remove(&victim);
                index.add(victim);
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, build, search, remove_and_reinsert);
criterion_main!(benches);
