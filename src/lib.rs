//! # mincov-rs: Exact weighted minimum set cover in Rust
//!
//! **`mincov-rs`** solves the *unate covering* problem exactly: given a 0/1 matrix whose
//! rows are elements to cover and whose columns are weighted candidate sets, find a set
//! of columns of minimum total cost such that every row has a `1` in at least one chosen
//! column. This is the core step of two-level logic minimization (choosing prime
//! implicants), and shows up in test-set compaction and many scheduling problems.
//!
//! ## Key Features
//!
//! - **Reversible Matrix**: [`Matrix`][crate::matrix::Matrix] is a sparse "dancing links"
//!   structure. Rows and columns are deleted in O(cells), and everything since the last
//!   [`backup`][crate::matrix::Matrix::backup] is undone by a single
//!   [`restore`][crate::matrix::Matrix::restore].
//! - **Exact Search**: [`Solver`][crate::solver::Solver] is a branch and bound driven by
//!   row dominance, column dominance and essential columns, pruned by a max-clique
//!   lower bound.
//! - **Vector Costs**: anything implementing [`Cost`][crate::cost::Cost] works as a column
//!   weight; [`Cost1`][crate::cost::Cost1] and [`Cost2`][crate::cost::Cost2] (lexicographic
//!   pair) are provided.
//!
//! ## Basic Usage
//!
//! ```rust
//! use mincov_rs::cost::Cost1;
//! use mincov_rs::matrix::Matrix;
//! use mincov_rs::solver::Solver;
//!
//! // 1. Describe the instance: 3 rows, 3 columns, 1 cost component.
//! let mut m = Matrix::<Cost1>::new(3, 3, 1);
//! m.insert_elem(0, 0);
//! m.insert_elem(1, 0);
//! m.insert_elem(1, 1);
//! m.insert_elem(2, 1);
//! m.insert_elem(0, 2);
//! m.insert_elem(2, 2);
//!
//! // 2. Make column 2 expensive.
//! m.set_col_cost(2, 0, 3.0);
//!
//! // 3. Solve.
//! let solution = Solver::new().solve(&m).unwrap();
//! assert_eq!(solution.columns, vec![0, 1]);
//! assert_eq!(solution.cost, Cost1::new(2.0));
//! ```
//!
//! ## Core Components
//!
//! - **[`matrix`]**: The reversible sparse matrix.
//! - **[`solver`]**: Reductions, lower bound and the branch and bound.
//! - **[`clique`]**: Greedy weighted max-clique used by the lower bound.
//! - **[`debug`]**: Snapshots and consistency checks for tests.

pub mod arena;
pub mod clique;
pub mod cost;
pub mod debug;
pub mod matrix;
pub mod mfset;
pub mod solver;
pub mod types;
