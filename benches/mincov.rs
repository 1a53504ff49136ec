//! Covering solver benchmarks.
//!
//! Run with:
//! ```bash
//! cargo bench --bench mincov
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mincov_rs::cost::Cost1;
use mincov_rs::matrix::Matrix;
use mincov_rs::solver::{Solver, SolverConfig};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// Helpers
// ============================================================================

/// Random instance where every row has at least one cell.
fn random_matrix(seed: u64, rows: usize, cols: usize, density: f64) -> Matrix<Cost1> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut m = Matrix::new(rows, cols, 1);
    for i in 0..rows {
        let mut hit = false;
        for j in 0..cols {
            if rng.random_bool(density) {
                m.insert_elem(i, j);
                hit = true;
            }
        }
        if !hit {
            m.insert_elem(i, rng.random_range(0..cols));
        }
    }
    for j in 0..cols {
        m.set_col_cost(j, 0, rng.random_range(1..=4) as f64);
    }
    m
}

/// Queen domination on an `n x n` board.
fn queens_matrix(n: usize) -> Matrix<Cost1> {
    let mut m = Matrix::new(n * n, n * n, 1);
    for qi in 0..n {
        for qj in 0..n {
            for si in 0..n {
                for sj in 0..n {
                    if qi == si || qj == sj || qi.abs_diff(si) == qj.abs_diff(sj) {
                        m.insert_elem(si * n + sj, qi * n + qj);
                    }
                }
            }
        }
    }
    m
}

// ============================================================================
// Benchmark: Matrix select/restore cycle
// ============================================================================

fn bench_select_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix/select_restore");

    for size in [20, 50, 100] {
        let mut m = random_matrix(42, size, size, 0.1);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("random", size), &size, |b, &size| {
            b.iter(|| {
                for col in 0..size {
                    if m.is_col_active(col) {
                        let mut sub = m.checkpoint();
                        sub.select_col(col);
                        black_box(sub.active_row_count());
                    }
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Solver on random instances
// ============================================================================

fn bench_solve_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver/random");
    group.sample_size(10);

    for (rows, cols) in [(20, 15), (30, 25), (40, 30)] {
        let m = random_matrix(7, rows, cols, 0.15);
        group.bench_with_input(BenchmarkId::new("default", format!("{}x{}", rows, cols)), &m, |b, m| {
            b.iter(|| Solver::new().solve(m));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Contribution of the individual rules
// ============================================================================

fn bench_ablation(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver/ablation");
    group.sample_size(10);

    let m = random_matrix(11, 20, 16, 0.2);
    let configs = [
        ("all", SolverConfig::default()),
        (
            "no_bound",
            SolverConfig {
                lower_bound: false,
                ..SolverConfig::default()
            },
        ),
        (
            "no_dominance",
            SolverConfig {
                row_dominance: false,
                col_dominance: false,
                ..SolverConfig::default()
            },
        ),
        ("exhaustive", SolverConfig::exhaustive()),
    ];

    for (name, config) in configs {
        group.bench_with_input(BenchmarkId::new("20x16", name), &config, |b, config| {
            b.iter(|| Solver::with_config(config.clone()).solve(&m));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Queen domination (structured instances)
// ============================================================================

fn bench_queens(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver/queens");
    group.sample_size(10);

    for n in [4, 5, 6] {
        let m = queens_matrix(n);
        group.bench_with_input(BenchmarkId::new("queens", n), &m, |b, m| {
            b.iter(|| Solver::new().solve(m));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select_restore, bench_solve_random, bench_ablation, bench_queens);

criterion_main!(benches);
