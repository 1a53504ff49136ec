//! Debug utilities for inspecting matrix structure.
//!
//! This module provides helpers for exploring and checking a [`Matrix`].
//! These are primarily useful in tests and during development: a [`Snapshot`] is a
//! dense, comparable image of everything that is currently live in a matrix, and
//! [`Matrix::check_consistency`] verifies the linkage invariants directly.

use std::fmt;

use crate::cost::Cost;
use crate::matrix::Matrix;

/// Dense image of the live part of a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<C> {
    pub row_size: usize,
    pub col_size: usize,
    /// Active rows, ascending.
    pub rows: Vec<usize>,
    /// Active columns, ascending.
    pub cols: Vec<usize>,
    /// Live cells `(row, col)` in row-major order.
    pub cells: Vec<(usize, usize)>,
    /// Cost of every column.
    pub costs: Vec<C>,
}

impl<C> Snapshot<C> {
    /// Check whether the cell `(row, col)` is live.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells.binary_search(&(row, col)).is_ok()
    }
}

impl<C> fmt::Display for Snapshot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.row_size {
            for col in 0..self.col_size {
                let c = if self.contains(row, col) { '1' } else { '.' };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<C: Cost> Matrix<C> {
    /// Take a dense snapshot of the live cells.
    pub fn snapshot(&self) -> Snapshot<C> {
        let rows: Vec<usize> = self.rows().collect();
        let cells = rows
            .iter()
            .flat_map(|&row| self.row_cols(row).map(move |col| (row, col)))
            .collect();
        Snapshot {
            row_size: self.row_size(),
            col_size: self.col_size(),
            rows,
            cols: self.cols().collect(),
            cells,
            costs: (0..self.col_size()).map(|j| self.col_cost(j).clone()).collect(),
        }
    }

    /// Verify the structural invariants of the matrix.
    ///
    /// - active lists are strictly ascending and agree with the per-line flags;
    /// - every active line has a non-empty, strictly ascending ring whose length is
    ///   the stored count;
    /// - a cell is in an active row's ring iff it is in the active column's ring.
    pub fn check_consistency(&self) -> Result<(), String> {
        check_ascending("active rows", self.rows())?;
        check_ascending("active columns", self.cols())?;

        let active_rows: Vec<usize> = self.rows().collect();
        for row in 0..self.row_size() {
            if self.is_row_active(row) != active_rows.binary_search(&row).is_ok() {
                return Err(format!("row {} active flag disagrees with the active list", row));
            }
        }
        let active_cols: Vec<usize> = self.cols().collect();
        for col in 0..self.col_size() {
            if self.is_col_active(col) != active_cols.binary_search(&col).is_ok() {
                return Err(format!("column {} active flag disagrees with the active list", col));
            }
        }

        for &row in &active_rows {
            let cols: Vec<usize> = self.row_cols(row).collect();
            check_ascending(&format!("row {}", row), cols.iter().copied())?;
            if cols.is_empty() {
                return Err(format!("active row {} is empty", row));
            }
            if cols.len() != self.row_num(row) {
                return Err(format!("row {} has {} cells but count {}", row, cols.len(), self.row_num(row)));
            }
            for col in cols {
                if !self.is_col_active(col) {
                    return Err(format!("row {} links to deleted column {}", row, col));
                }
                if !self.col_rows(col).any(|r| r == row) {
                    return Err(format!("cell ({}, {}) missing from its column", row, col));
                }
            }
        }

        for &col in &active_cols {
            let rows: Vec<usize> = self.col_rows(col).collect();
            check_ascending(&format!("column {}", col), rows.iter().copied())?;
            if rows.is_empty() {
                return Err(format!("active column {} is empty", col));
            }
            if rows.len() != self.col_num(col) {
                return Err(format!("column {} has {} cells but count {}", col, rows.len(), self.col_num(col)));
            }
            for row in rows {
                if !self.is_row_active(row) {
                    return Err(format!("column {} links to deleted row {}", col, row));
                }
                if !self.row_cols(row).any(|c| c == col) {
                    return Err(format!("cell ({}, {}) missing from its row", row, col));
                }
            }
        }

        Ok(())
    }
}

fn check_ascending(what: &str, items: impl Iterator<Item = usize>) -> Result<(), String> {
    let mut prev = None;
    for x in items {
        if prev.is_some_and(|p| p >= x) {
            return Err(format!("{} not strictly ascending at {}", what, x));
        }
        prev = Some(x);
    }
    Ok(())
}
