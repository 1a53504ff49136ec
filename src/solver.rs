//! Exact minimum-cost covering by branch and bound.
//!
//! # Algorithm
//!
//! Each node of the search tree works on the shared [`Matrix`] inside its own
//! [`Checkpoint`][crate::matrix::Checkpoint], so every exit path hands the matrix back
//! unchanged. A node proceeds in four steps:
//!
//! 1. **Reduce** until nothing changes:
//!    - *row dominance*: if `cols(R) ⊆ cols(R')`, every cover of `R` also covers `R'`,
//!      so `R'` is deleted;
//!    - *column dominance*: if `rows(A) ⊆ rows(B)` and `cost(B) <= cost(A)`, column `A`
//!      is never needed and is deleted;
//!    - *essential columns*: a row with a single remaining column forces that column.
//! 2. **Bound**: rows whose columns fall into different connected groups need pairwise
//!    distinct columns. A greedy clique over "different group" rows, each weighted by its
//!    cheapest column, never exceeds the optimum of the sub-problem. Nodes whose
//!    accumulated cost plus this bound reaches the incumbent are pruned.
//! 3. **Branch** on the first active column: select it, then (unless some row depends
//!    on it alone) delete it. The second branch replaces the first only when strictly
//!    cheaper, so among equally cheap covers the first one found is returned.
//! 4. **Leaf**: no rows left, the accumulated cost is the cost of the cover.
//!
//! # Examples
//!
//! ```
//! use mincov_rs::cost::Cost1;
//! use mincov_rs::matrix::Matrix;
//! use mincov_rs::solver::Solver;
//!
//! // col0 covers {r0}, col1 covers {r1}, col2 covers {r0, r1, r2}.
//! let mut m = Matrix::<Cost1>::new(3, 3, 1);
//! m.insert_elem(0, 0);
//! m.insert_elem(1, 1);
//! for r in 0..3 {
//!     m.insert_elem(r, 2);
//! }
//!
//! let solution = Solver::new().solve(&m).unwrap();
//! assert_eq!(solution.columns, vec![2]);
//! assert_eq!(solution.cost, Cost1::new(1.0));
//! ```

use std::cmp::max;

use log::{debug, info};
use thiserror::Error;

use crate::clique::MaxClique;
use crate::cost::Cost;
use crate::matrix::Matrix;
use crate::mfset::MfSet;

/// Switches for the individual reduction and pruning rules.
///
/// Every combination yields an optimal cover; turning rules off only makes the search
/// larger.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub row_dominance: bool,
    pub col_dominance: bool,
    pub essential_col: bool,
    pub lower_bound: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            row_dominance: true,
            col_dominance: true,
            essential_col: true,
            lower_bound: true,
        }
    }
}

impl SolverConfig {
    /// Plain branching: no reductions, no pruning.
    ///
    /// The search recurses once per branched column, and without reductions every
    /// column gets branched on. Instances with a few thousand columns can exhaust the
    /// stack of a default-sized thread; run those on a thread with a larger stack.
    pub fn exhaustive() -> Self {
        Self {
            row_dominance: false,
            col_dominance: false,
            essential_col: false,
            lower_bound: false,
        }
    }
}

/// Statistics collected during the last [`Solver::solve`] call.
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    /// Number of search nodes visited
    pub nodes: usize,
    /// Number of nodes that reached an empty matrix
    pub leaves: usize,
    /// Number of nodes cut off by the lower bound
    pub pruned: usize,
    /// Deepest branching level reached
    pub max_depth: usize,
    /// Rows deleted by row dominance
    pub dominated_rows: usize,
    /// Columns deleted by column dominance
    pub dominated_cols: usize,
    /// Columns selected as essential
    pub essential_cols: usize,
}

/// An optimal cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<C> {
    /// Total cost of the selected columns.
    pub cost: C,
    /// Selected columns, in the order the search committed to them.
    pub columns: Vec<usize>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum SolveError {
    /// The row has no cell at all, so no set of columns can cover it.
    #[error("row {row} is not covered by any column")]
    UncoverableRow { row: usize },
}

#[derive(Debug, Default)]
pub struct Solver {
    config: SolverConfig,
    stats: SolverStats,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            stats: SolverStats::default(),
        }
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Find a minimum-cost set of columns covering every row of `matrix`.
    ///
    /// The search runs on a private copy; `matrix` is left untouched. Rows removed with
    /// [`Matrix::delete_row`] before the call count as already covered.
    ///
    /// Recursion depth grows with the number of branched columns, see
    /// [`SolverConfig::exhaustive`].
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::UncoverableRow`] for the first row whose cell count is zero,
    /// whether or not it is active. A row emptied by deleting its last column therefore
    /// counts as uncoverable.
    pub fn solve<C: Cost>(&mut self, matrix: &Matrix<C>) -> Result<Solution<C>, SolveError> {
        self.stats = SolverStats::default();

        if let Some(row) = (0..matrix.row_size()).find(|&r| matrix.row_num(r) == 0) {
            debug!("solve: row {} has no covering column", row);
            return Err(SolveError::UncoverableRow { row });
        }

        let mut work = matrix.clone();
        let Some((cost, columns)) = self.search(&mut work, C::zero(), None, 0) else {
            unreachable!("an unbounded search always reaches a leaf");
        };

        info!(
            "solve: cost {:?} with {} columns ({} nodes, {} pruned, depth {})",
            cost,
            columns.len(),
            self.stats.nodes,
            self.stats.pruned,
            self.stats.max_depth
        );
        Ok(Solution { cost, columns })
    }

    /// One node of the search tree.
    ///
    /// `base` is the cost of the columns selected on the path to this node, `best` the
    /// cost of the incumbent (absolute, like `base`). Returns the cheapest cover found
    /// below this node together with the columns selected below it, but only if it is
    /// strictly cheaper than `best`.
    fn search<C: Cost>(
        &mut self,
        matrix: &mut Matrix<C>,
        base: C,
        best: Option<&C>,
        depth: usize,
    ) -> Option<(C, Vec<usize>)> {
        self.stats.nodes += 1;
        self.stats.max_depth = max(self.stats.max_depth, depth);

        let mut matrix = matrix.checkpoint();

        let mut selected = Vec::new();
        self.reduce(&mut *matrix, &mut selected);
        let mut cost = base;
        for &col in &selected {
            cost += matrix.col_cost(col);
        }

        if matrix.is_empty() {
            self.stats.leaves += 1;
            if best.map_or(true, |b| cost < *b) {
                debug!("search: new incumbent {:?} at depth {}", cost, depth);
                return Some((cost, selected));
            }
            return None;
        }

        if self.config.lower_bound {
            let mut bound = self.lower_bound(&*matrix);
            bound += &cost;
            if best.is_some_and(|b| bound >= *b) {
                debug!("search: prune at depth {} (bound {:?})", depth, bound);
                self.stats.pruned += 1;
                return None;
            }
        }

        let Some(col) = matrix.first_col() else {
            unreachable!("active rows without active columns");
        };
        // Without the essential-column rule a row may depend on `col` alone.
        let forced = matrix.col_rows(col).any(|r| matrix.row_num(r) == 1);
        debug!("search: branch on column {} at depth {} (forced = {})", col, depth, forced);

        let mut incumbent = best.cloned();
        let mut found = None;

        {
            let mut sub = matrix.checkpoint();
            let mut sub_base = cost.clone();
            sub_base += sub.col_cost(col);
            sub.select_col(col);
            if let Some((v, cols)) = self.search(&mut *sub, sub_base, incumbent.as_ref(), depth + 1) {
                let mut columns = selected.clone();
                columns.push(col);
                columns.extend(cols);
                incumbent = Some(v.clone());
                found = Some((v, columns));
            }
        }

        if !forced {
            let mut sub = matrix.checkpoint();
            sub.delete_col(col);
            if let Some((v, cols)) = self.search(&mut *sub, cost, incumbent.as_ref(), depth + 1) {
                let mut columns = selected;
                columns.extend(cols);
                found = Some((v, columns));
            }
        }

        found
    }

    /// Apply the enabled reduction rules until a fixed point is reached.
    ///
    /// Columns chosen as essential are appended to `selected`. Returns `true` if the
    /// matrix changed.
    pub fn reduce<C: Cost>(&mut self, matrix: &mut Matrix<C>, selected: &mut Vec<usize>) -> bool {
        let mut changed = false;
        loop {
            let mut change = false;
            if self.config.row_dominance && self.row_dominance(matrix) {
                change = true;
            }
            if self.config.col_dominance && self.col_dominance(matrix) {
                change = true;
            }
            if self.config.essential_col && self.essential_col(matrix, selected) {
                change = true;
            }
            if !change {
                break;
            }
            changed = true;
        }
        changed
    }

    /// Delete every row whose column set contains the column set of another row.
    ///
    /// Of two rows with equal column sets the one with the larger index goes.
    pub fn row_dominance<C: Cost>(&mut self, matrix: &mut Matrix<C>) -> bool {
        let mut rows: Vec<usize> = matrix.rows().collect();
        rows.sort_by_key(|&r| matrix.row_num(r));

        let mut change = false;
        for row in rows {
            if !matrix.is_row_active(row) {
                continue;
            }
            let num = matrix.row_num(row);
            // Every dominated row shares the sparsest column of `row`.
            let Some(min_col) = matrix.row_cols(row).min_by_key(|&c| matrix.col_num(c)) else {
                continue;
            };
            let dominated: Vec<usize> = matrix
                .col_rows(min_col)
                .filter(|&r| {
                    let n = matrix.row_num(r);
                    (n > num || (n == num && r > row)) && is_subset(matrix.row_cols(row), matrix.row_cols(r))
                })
                .collect();

            for r in dominated {
                debug!("row_dominance: row {} contains row {}", r, row);
                matrix.delete_row(r);
                self.stats.dominated_rows += 1;
                change = true;
            }
        }
        change
    }

    /// Delete every column whose rows are covered at no higher cost by another column.
    ///
    /// Of two columns with equal row sets the more expensive one goes; on equal cost the
    /// one with the larger index.
    pub fn col_dominance<C: Cost>(&mut self, matrix: &mut Matrix<C>) -> bool {
        let mut cols: Vec<usize> = matrix.cols().collect();
        cols.sort_by_key(|&c| matrix.col_num(c));

        let mut change = false;
        for col in cols {
            if !matrix.is_col_active(col) {
                continue;
            }
            // Every dominating column shares the sparsest row of `col`.
            let Some(min_row) = matrix.col_rows(col).min_by_key(|&r| matrix.row_num(r)) else {
                continue;
            };
            let dominator = matrix
                .row_cols(min_row)
                .find(|&other| other != col && col_dominates(&*matrix, other, col));

            if let Some(other) = dominator {
                debug!("col_dominance: column {} dominated by column {}", col, other);
                matrix.delete_col(col);
                self.stats.dominated_cols += 1;
                change = true;
            }
        }
        change
    }

    /// Select the only column of every row that has exactly one.
    pub fn essential_col<C: Cost>(&mut self, matrix: &mut Matrix<C>, selected: &mut Vec<usize>) -> bool {
        let singles: Vec<usize> = matrix.rows().filter(|&r| matrix.row_num(r) == 1).collect();

        let mut change = false;
        for row in singles {
            // An earlier selection may have covered this row already.
            if !matrix.is_row_active(row) {
                continue;
            }
            let Some(col) = matrix.row_cols(row).next() else {
                continue;
            };
            debug!("essential_col: column {} is the only cover of row {}", col, row);
            selected.push(col);
            matrix.select_col(col);
            self.stats.essential_cols += 1;
            change = true;
        }
        change
    }

    /// Lower bound on the cost of covering the active rows of `matrix`.
    pub fn lower_bound<C: Cost>(&self, matrix: &Matrix<C>) -> C {
        let rows: Vec<usize> = matrix.rows().collect();
        if rows.is_empty() {
            return C::zero();
        }

        // Rows sharing a column end up in the same group.
        let mut groups = MfSet::new(matrix.row_size());
        for col in matrix.cols() {
            let mut it = matrix.col_rows(col);
            if let Some(first) = it.next() {
                for r in it {
                    groups.merge(first, r);
                }
            }
        }
        let group: Vec<usize> = rows.iter().map(|&r| groups.find(r)).collect();

        let mut mc = MaxClique::new(rows.len());
        for (i, &row) in rows.iter().enumerate() {
            for j in i + 1..rows.len() {
                if group[i] != group[j] {
                    mc.connect(i, j);
                }
            }
            let Some(min_cost) = matrix.row_cols(row).map(|c| matrix.col_cost(c)).min() else {
                unreachable!("active row {} has no cells", row);
            };
            mc.set_cost(i, min_cost.clone());
        }

        let (bound, clique) = mc.solve();
        debug!("lower_bound: {:?} from {} of {} rows", bound, clique.len(), rows.len());
        bound
    }
}

/// Check whether column `b` dominates column `a`.
fn col_dominates<C: Cost>(matrix: &Matrix<C>, b: usize, a: usize) -> bool {
    let (nb, na) = (matrix.col_num(b), matrix.col_num(a));
    if nb < na {
        return false;
    }
    let (cb, ca) = (matrix.col_cost(b), matrix.col_cost(a));
    let cheaper = if nb > na { cb <= ca } else { cb < ca || (cb == ca && b < a) };
    cheaper && is_subset(matrix.col_rows(a), matrix.col_rows(b))
}

/// Check whether the ascending sequence `sub` is contained in the ascending sequence `sup`.
fn is_subset(sub: impl Iterator<Item = usize>, sup: impl Iterator<Item = usize>) -> bool {
    let mut sup = sup.peekable();
    for x in sub {
        while sup.next_if(|&y| y < x).is_some() {}
        if sup.next_if_eq(&x).is_none() {
            return false;
        }
    }
    true
}
