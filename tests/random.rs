//! Randomized tests against a brute-force oracle.
//!
//! Instances are small enough to enumerate every subset of columns, and every instance
//! comes from a seeded generator so failures are reproducible.

use mincov_rs::cost::{Cost, Cost1, Cost2};
use mincov_rs::matrix::Matrix;
use mincov_rs::solver::{Solver, SolverConfig};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

struct Instance {
    rows: usize,
    /// Rows covered by each column.
    cols: Vec<Vec<usize>>,
    /// Integer-valued costs, so that sums are exact in any order.
    costs: Vec<f64>,
}

impl Instance {
    fn random(rng: &mut impl Rng, rows: usize, cols: usize, density: f64) -> Self {
        let mut cover = vec![Vec::new(); cols];
        for i in 0..rows {
            let mut hit = false;
            for col in cover.iter_mut() {
                if rng.random_bool(density) {
                    col.push(i);
                    hit = true;
                }
            }
            if !hit {
                cover[rng.random_range(0..cols)].push(i);
            }
        }
        let costs = (0..cols).map(|_| rng.random_range(1..=5) as f64).collect();
        Self {
            rows,
            cols: cover,
            costs,
        }
    }

    fn matrix(&self) -> Matrix<Cost1> {
        let mut m = Matrix::new(self.rows, self.cols.len(), 1);
        for (j, rows) in self.cols.iter().enumerate() {
            for &i in rows {
                m.insert_elem(i, j);
            }
            m.set_col_cost(j, 0, self.costs[j]);
        }
        m
    }

    fn covers(&self, columns: &[usize]) -> bool {
        let mut covered = vec![false; self.rows];
        for &j in columns {
            for &i in &self.cols[j] {
                covered[i] = true;
            }
        }
        covered.into_iter().all(|c| c)
    }

    fn cost_of(&self, columns: &[usize]) -> f64 {
        columns.iter().map(|&j| self.costs[j]).sum()
    }

    /// Cost of the cheapest cover, by enumerating all column subsets.
    fn brute_force(&self) -> f64 {
        let n = self.cols.len();
        let mut best = f64::INFINITY;
        for mask in 0u32..(1 << n) {
            let columns: Vec<usize> = (0..n).filter(|&j| mask & (1 << j) != 0).collect();
            if self.covers(&columns) {
                best = best.min(self.cost_of(&columns));
            }
        }
        best
    }
}

fn instances(seed: u64, count: usize) -> Vec<Instance> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let rows = rng.random_range(1..=9);
            let cols = rng.random_range(1..=10);
            let density = rng.random_range(0.15..0.6);
            Instance::random(&mut rng, rows, cols, density)
        })
        .collect()
}

// ─── Optimality ────────────────────────────────────────────────────────────────

#[test]
fn matches_brute_force() {
    for (k, inst) in instances(42, 200).iter().enumerate() {
        let m = inst.matrix();
        let mut solver = Solver::new();
        let solution = solver.solve(&m).unwrap();

        assert!(inst.covers(&solution.columns), "instance {}: not a cover", k);
        let expected = inst.brute_force();
        assert_eq!(solution.cost.value(), expected, "instance {}: not optimal", k);
        assert_eq!(inst.cost_of(&solution.columns), expected, "instance {}: wrong cost", k);

        let mut distinct = solution.columns.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), solution.columns.len(), "instance {}: repeated column", k);
    }
}

#[test]
fn every_config_is_optimal() {
    for inst in instances(7, 25) {
        let m = inst.matrix();
        let expected = inst.brute_force();
        for bits in 0..16u32 {
            let config = SolverConfig {
                row_dominance: bits & 1 != 0,
                col_dominance: bits & 2 != 0,
                essential_col: bits & 4 != 0,
                lower_bound: bits & 8 != 0,
            };
            let solution = Solver::with_config(config.clone()).solve(&m).unwrap();
            assert!(inst.covers(&solution.columns), "{:?}: not a cover", config);
            assert_eq!(solution.cost.value(), expected, "{:?}: not optimal", config);
        }
    }
}

#[test]
fn solve_is_deterministic() {
    for inst in instances(3, 30) {
        let m = inst.matrix();
        let a = Solver::new().solve(&m).unwrap();
        let b = Solver::new().solve(&m).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn lexicographic_cost() {
    // Same instances, secondary component breaks ties in the primary one.
    for inst in instances(11, 40) {
        let mut m = Matrix::<Cost2>::new(inst.rows, inst.cols.len(), 2);
        for (j, rows) in inst.cols.iter().enumerate() {
            for &i in rows {
                m.insert_elem(i, j);
            }
            m.set_col_cost(j, 1, inst.costs[j]);
        }
        let solution = Solver::new().solve(&m).unwrap();
        assert!(inst.covers(&solution.columns));

        // Oracle: fewest columns first, then cheapest.
        let n = inst.cols.len();
        let mut best = (usize::MAX, f64::INFINITY);
        for mask in 0u32..(1 << n) {
            let columns: Vec<usize> = (0..n).filter(|&j| mask & (1 << j) != 0).collect();
            if inst.covers(&columns) {
                let key = (columns.len(), inst.cost_of(&columns));
                if key.0 < best.0 || (key.0 == best.0 && key.1 < best.1) {
                    best = key;
                }
            }
        }
        assert_eq!(solution.cost, Cost2::new(best.0 as f64, best.1));
    }
}

// ─── Lower bound ───────────────────────────────────────────────────────────────

#[test]
fn lower_bound_is_sound() {
    for inst in instances(5, 150) {
        let m = inst.matrix();
        let bound = Solver::new().lower_bound(&m);
        assert!(bound.component(0) <= inst.brute_force());
    }
}

/// Cost of the cheapest cover of the active rows by the active columns.
fn sub_optimum(m: &Matrix<Cost1>) -> f64 {
    let rows: Vec<usize> = m.rows().collect();
    let cols: Vec<usize> = m.cols().collect();
    let mut best = f64::INFINITY;
    for mask in 0u32..(1 << cols.len()) {
        let chosen: Vec<usize> = (0..cols.len()).filter(|&k| mask & (1 << k) != 0).map(|k| cols[k]).collect();
        let covered = rows.iter().all(|&r| chosen.iter().any(|&c| m.col_rows(c).any(|x| x == r)));
        if covered {
            best = best.min(chosen.iter().map(|&c| m.col_cost(c).value()).sum());
        }
    }
    best
}

fn assert_bound_sound(solver: &Solver, m: &Matrix<Cost1>) {
    let bound = solver.lower_bound(m).value();
    let optimum = sub_optimum(m);
    assert!(bound <= optimum, "bound {} exceeds optimum {}\n{}", bound, optimum, m);
}

#[test]
fn lower_bound_is_sound_on_sub_problems() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for inst in instances(21, 120) {
        let mut m = inst.matrix();
        let mut solver = Solver::new();
        assert_bound_sound(&solver, &m);

        {
            let mut reduced = m.checkpoint();
            let mut selected = Vec::new();
            solver.reduce(&mut *reduced, &mut selected);
            assert_bound_sound(&solver, &reduced);

            let cols: Vec<usize> = reduced.cols().collect();
            if let Some(&col) = cols.choose(&mut rng) {
                let mut branch = reduced.checkpoint();
                if rng.random_bool(0.5) {
                    branch.select_col(col);
                } else {
                    branch.delete_col(col);
                }
                assert_bound_sound(&solver, &branch);

                let mut inner = branch.checkpoint();
                solver.reduce(&mut *inner, &mut selected);
                assert_bound_sound(&solver, &inner);
            }
        }

        assert_eq!(m.history_depth(), 0);
        assert_eq!(m.snapshot(), inst.matrix().snapshot());
    }
}

// ─── Reversibility ─────────────────────────────────────────────────────────────

#[test]
fn restore_undoes_random_deletions() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for inst in instances(13, 60) {
        let mut m = inst.matrix();
        let mut saved = Vec::new();

        for _ in 0..6 {
            if !saved.is_empty() && rng.random_bool(0.3) {
                m.restore();
                let snapshot = saved.pop().unwrap();
                assert_eq!(m.snapshot(), snapshot);
                continue;
            }

            saved.push(m.snapshot());
            m.backup();
            for _ in 0..rng.random_range(1..=3) {
                let rows: Vec<usize> = m.rows().collect();
                let cols: Vec<usize> = m.cols().collect();
                match rng.random_range(0..3) {
                    0 if !rows.is_empty() => m.delete_row(*rows.choose(&mut rng).unwrap()),
                    1 if !cols.is_empty() => m.delete_col(*cols.choose(&mut rng).unwrap()),
                    2 if !cols.is_empty() => m.select_col(*cols.choose(&mut rng).unwrap()),
                    _ => {}
                }
                assert_eq!(m.check_consistency(), Ok(()));
            }
        }

        while let Some(snapshot) = saved.pop() {
            m.restore();
            assert_eq!(m.snapshot(), snapshot);
        }
        assert_eq!(m.history_depth(), 0);
        assert_eq!(m.snapshot(), inst.matrix().snapshot());
    }
}

#[test]
fn reductions_preserve_optimum() {
    for inst in instances(17, 80) {
        let mut m = inst.matrix();
        let mut solver = Solver::new();
        let mut selected = Vec::new();
        solver.reduce(&mut m, &mut selected);
        assert_eq!(m.check_consistency(), Ok(()));

        // Whatever is left, solved exactly, plus the forced columns, is optimal.
        let rest = Solver::new().solve(&m).unwrap();
        let mut columns = selected.clone();
        columns.extend(&rest.columns);
        assert!(inst.covers(&columns));
        assert_eq!(inst.cost_of(&columns), inst.brute_force());
    }
}
