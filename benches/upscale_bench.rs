//! Benchmarks for column upscaling.
//!
//! Run with: `cargo bench --bench upscale_bench`
//!
//! Measures building the column geometry, volume-averaging rock properties
//! and the per-column integration and elevation lookup used every time step.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use verteq::{
    CartesianGridBuilder, FineGrid, RockFluidProps, TopSurf, UpscaleMapping, VertEqProps,
    VertEqUpscaler,
};

/// Layered grid with `n x n` columns of `nz` cells and varying thickness.
fn generate_grid(n: usize, nz: usize) -> FineGrid {
    let thickness: Vec<f64> = (0..nz).map(|k| 1.0 + 0.5 * (k as f64 * 0.7).sin()).collect();
    let top: Vec<f64> = (0..n * n)
        .map(|c| 1000.0 + 10.0 * (c as f64 * 0.01).cos())
        .collect();
    CartesianGridBuilder::new(n, n, nz)
        .with_cell_size(100.0, 100.0, 1.0)
        .with_layer_thickness(thickness)
        .with_top_depth(top)
        .build()
        .unwrap()
}

fn generate_rock(num_cells: usize) -> RockFluidProps {
    let poro: Vec<f64> = (0..num_cells)
        .map(|i| 0.2 + 0.05 * (i as f64 * 0.1).sin())
        .collect();
    let diag: Vec<[f64; 3]> = (0..num_cells)
        .map(|i| {
            let k = 500.0 + 100.0 * (i as f64 * 0.3).cos();
            [k, k, 0.1 * k]
        })
        .collect();
    RockFluidProps::from_diagonal(poro, &diag, vec![8e-5, 3e-4], vec![700.0, 1000.0]).unwrap()
}

fn setup(n: usize, nz: usize) -> (Arc<UpscaleMapping>, RockFluidProps) {
    let fine = Arc::new(generate_grid(n, nz));
    let ts = Arc::new(TopSurf::create(&fine).unwrap());
    let rock = generate_rock(fine.number_of_cells);
    let mapping = Arc::new(UpscaleMapping::new(fine, ts).unwrap());
    (mapping, rock)
}

/// Benchmark building the column geometry.
fn bench_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping");

    for &n in &[16, 64] {
        let fine = Arc::new(generate_grid(n, 20));
        let ts = Arc::new(TopSurf::create(&fine).unwrap());
        group.bench_with_input(BenchmarkId::new("columns", n * n), &n, |b, _| {
            b.iter(|| UpscaleMapping::new(black_box(fine.clone()), black_box(ts.clone())).unwrap())
        });
    }

    group.finish();
}

/// Benchmark volume-averaging porosity and permeability.
fn bench_vol_avg(c: &mut Criterion) {
    let mut group = c.benchmark_group("vol_avg");

    for &n in &[16, 64] {
        let (mapping, rock) = setup(n, 20);
        let rock = Arc::new(rock);
        group.bench_with_input(BenchmarkId::new("props", n * n), &n, |b, _| {
            b.iter(|| VertEqProps::new(black_box(&mapping), rock.clone()).unwrap())
        });
    }

    group.finish();
}

/// Benchmark depth integration and interface lookup over all columns.
fn bench_integrate_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate_find");

    let (mapping, rock) = setup(64, 20);
    let up = VertEqUpscaler::new(mapping);
    let poro = verteq::IncompProperties::porosity(&rock).to_vec();

    group.bench_function("integrate", |b| {
        b.iter(|| up.integrate(black_box(&poro), 1, 0))
    });

    let dpt = up.integrate(&poro, 1, 0);
    group.bench_function("find", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for col in 0..up.mapping().num_cols {
                let table = dpt.column(col);
                let target = 0.37 * table[table.len() - 1];
                let zeta = up.find(col, table, black_box(target));
                total += zeta.fraction();
            }
            total
        })
    });

    group.finish();
}

criterion_group!(benches, bench_mapping, bench_vol_avg, bench_integrate_find);
criterion_main!(benches);
