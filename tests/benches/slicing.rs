//! # Ginsu Benchmarks
//!
//! | Operation | Input |
//! |-----------|-------|
//! | slice | random star polygon, growing grids |
//! | merge | the grids produced by slice |
//! | parallel difference | two random stars, cut 2x2 |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geo::BooleanOps;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use rand::{Rng, SeedableRng};

use ginsu::{parallel, ParallelConfig, Slicer};

fn star(vertices: usize, seed: u64) -> MultiPolygon<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut coords: Vec<Coord<f64>> = (0..vertices)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / vertices as f64;
            let radius = rng.gen_range(50.0..100.0);
            Coord {
                x: radius * angle.cos(),
                y: radius * angle.sin(),
            }
        })
        .collect();
    coords.push(coords[0]);
    MultiPolygon(vec![Polygon::new(LineString(coords), vec![])])
}

fn knives(n: usize) -> Vec<f64> {
    (1..=n).map(|i| -100.0 + 200.0 * i as f64 / (n + 1) as f64).collect()
}

fn bench_slice_and_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice-merge");
    group.measurement_time(Duration::from_secs(5));

    let polygon = star(2_000, 7);
    for n in [1, 4, 16] {
        let slicer = Slicer::new(&knives(n), &knives(n)).expect("knives are increasing");
        group.bench_with_input(BenchmarkId::new("slice", n), &slicer, |b, slicer| {
            b.iter(|| black_box(slicer.polygonal(&polygon).expect("slice")))
        });

        let grid = slicer.polygonal(&polygon).expect("slice");
        let merger = slicer.merger();
        group.bench_with_input(BenchmarkId::new("merge", n), &grid, |b, grid| {
            b.iter(|| black_box(merger.polygonal(grid).expect("merge")))
        });
    }

    group.finish();
}

fn bench_parallel_difference(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel-difference");
    group.sample_size(10);

    let a = star(4_000, 11);
    let b = star(4_000, 13);
    group.bench_function("direct", |bench| bench.iter(|| black_box(a.difference(&b))));

    let config = ParallelConfig::default().with_pattern(2, 2).with_limit(1_000);
    group.bench_function("parallel", |bench| {
        bench.iter(|| black_box(parallel::polygonal(&config, &a, &b, |a, b| a.difference(b)).expect("parallel")))
    });

    group.finish();
}

criterion_group!(benches, bench_slice_and_merge, bench_parallel_difference);
criterion_main!(benches);
