//! Reversible sparse 0/1 matrix.
//!
//! A [`Matrix`] stores the incidence relation of a covering problem: row `i` is an
//! element that has to be covered, column `j` is a candidate set, and a cell `(i, j)`
//! means "column `j` covers row `i`". Every column carries a [`Cost`].
//!
//! # Layout
//!
//! Cells live in an [`Arena`] and are addressed by stable indices. Each cell belongs to
//! two circular doubly-linked rings at once: the ring of its row (`left`/`right` links,
//! ascending column order) and the ring of its column (`up`/`down` links, ascending row
//! order). Every ring is anchored at a header cell: row `i` uses arena slot `i`, column
//! `j` uses slot `row_size + j`, element cells come after them.
//!
//! Lines with at least one cell are also chained into an "active rows" / "active
//! columns" list, again ascending and again circular, anchored at a sentinel entry
//! placed right after the last real line.
//!
//! # Deletion and restoration
//!
//! Deleting a line detaches it from its active list and detaches each of its cells from
//! the orthogonal ring, leaving the line's own ring intact. An orthogonal line that
//! loses its last cell is deleted as well. Every deletion is pushed onto a history
//! stack; [`Matrix::backup`] pushes a marker and [`Matrix::restore`] undoes everything
//! recorded after the most recent marker, in exact reverse order. Because detached
//! nodes keep their own links, undoing is the classic "dancing links" relink and costs
//! O(1) per cell.
//!
//! # Examples
//!
//! ```
//! use mincov_rs::cost::Cost1;
//! use mincov_rs::matrix::Matrix;
//!
//! let mut m = Matrix::<Cost1>::new(2, 2, 1);
//! m.insert_elem(0, 0);
//! m.insert_elem(0, 1);
//! m.insert_elem(1, 1);
//!
//! m.backup();
//! m.select_col(1);
//! assert!(m.is_empty());
//! m.restore();
//!
//! assert_eq!(m.rows().collect::<Vec<_>>(), vec![0, 1]);
//! assert_eq!(m.row_cols(0).collect::<Vec<_>>(), vec![0, 1]);
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

use log::{debug, trace};

use crate::arena::Arena;
use crate::cost::Cost;
use crate::types::Line;

#[derive(Debug, Copy, Clone)]
struct Cell {
    row: usize,
    col: usize,
    left: usize,
    right: usize,
    up: usize,
    down: usize,
}

impl Cell {
    /// A header cell: every link points back at itself.
    fn header(index: usize, row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            left: index,
            right: index,
            up: index,
            down: index,
        }
    }
}

/// Per-line bookkeeping: the live cell count and the active-list links.
#[derive(Debug, Copy, Clone)]
struct LineHead {
    num: usize,
    prev: usize,
    next: usize,
    active: bool,
}

impl LineHead {
    fn new(index: usize) -> Self {
        Self {
            num: 0,
            prev: index,
            next: index,
            active: false,
        }
    }
}

/// Entry of the delete history.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Record {
    Marker,
    Deleted(Line),
}

/// Sparse covering matrix with reversible row/column deletion.
#[derive(Clone)]
pub struct Matrix<C> {
    row_size: usize,
    col_size: usize,
    cost_size: usize,
    cells: Arena<Cell>,
    /// Row heads; index `row_size` is the sentinel of the active-row list.
    rows: Vec<LineHead>,
    /// Column heads; index `col_size` is the sentinel of the active-column list.
    cols: Vec<LineHead>,
    costs: Vec<C>,
    history: Vec<Record>,
}

impl<C: Cost> Matrix<C> {
    /// Create an empty `row_size` x `col_size` matrix.
    ///
    /// Every column initially costs [`Cost::unit`].
    ///
    /// # Panics
    ///
    /// Panics if `cost_size` differs from `C::DIMENSION`.
    pub fn new(row_size: usize, col_size: usize, cost_size: usize) -> Self {
        assert_eq!(
            cost_size,
            C::DIMENSION,
            "Cost dimension mismatch: matrix expects {}, cost type provides {}",
            cost_size,
            C::DIMENSION
        );

        let mut cells = Arena::with_capacity(row_size + col_size);
        for i in 0..row_size {
            let index = cells.alloc(Cell::header(i, i, usize::MAX));
            debug_assert_eq!(index, i);
        }
        for j in 0..col_size {
            let index = cells.alloc(Cell::header(row_size + j, usize::MAX, j));
            debug_assert_eq!(index, row_size + j);
        }

        Self {
            row_size,
            col_size,
            cost_size,
            cells,
            rows: (0..=row_size).map(|_| LineHead::new(row_size)).collect(),
            cols: (0..=col_size).map(|_| LineHead::new(col_size)).collect(),
            costs: vec![C::unit(); col_size],
            history: Vec::with_capacity(row_size + col_size),
        }
    }

    /// Drop every cell, forget the history and reset column costs.
    ///
    /// The shape of the matrix is preserved.
    pub fn clear(&mut self) {
        let (row_size, col_size) = (self.row_size, self.col_size);
        self.cells.free_from(row_size + col_size);
        for i in 0..row_size {
            self.cells[i] = Cell::header(i, i, usize::MAX);
        }
        for j in 0..col_size {
            self.cells[row_size + j] = Cell::header(row_size + j, usize::MAX, j);
        }
        self.rows.fill(LineHead::new(row_size));
        self.cols.fill(LineHead::new(col_size));
        self.costs.fill(C::unit());
        self.history.clear();
    }

    /// Clear the matrix and change its shape.
    pub fn resize(&mut self, row_size: usize, col_size: usize, cost_size: usize) {
        *self = Self::new(row_size, col_size, cost_size);
    }
}

impl<C> Matrix<C> {
    pub fn row_size(&self) -> usize {
        self.row_size
    }
    pub fn col_size(&self) -> usize {
        self.col_size
    }
    pub fn cost_size(&self) -> usize {
        self.cost_size
    }

    fn row_head(&self, row: usize) -> usize {
        assert!(row < self.row_size, "Row index {} out of range 0..{}", row, self.row_size);
        row
    }
    fn col_head(&self, col: usize) -> usize {
        assert!(col < self.col_size, "Column index {} out of range 0..{}", col, self.col_size);
        self.row_size + col
    }

    /// Number of live cells in the given row.
    pub fn row_num(&self, row: usize) -> usize {
        self.rows[self.row_head(row)].num
    }
    /// Number of live cells in the given column.
    pub fn col_num(&self, col: usize) -> usize {
        self.col_head(col);
        self.cols[col].num
    }

    pub fn is_row_active(&self, row: usize) -> bool {
        self.rows[self.row_head(row)].active
    }
    pub fn is_col_active(&self, col: usize) -> bool {
        self.col_head(col);
        self.cols[col].active
    }

    /// The cost of the given column.
    pub fn col_cost(&self, col: usize) -> &C {
        self.col_head(col);
        &self.costs[col]
    }

    /// Active rows in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        active_list(&self.rows, self.row_size)
    }
    /// Active columns in ascending order.
    pub fn cols(&self) -> impl Iterator<Item = usize> + '_ {
        active_list(&self.cols, self.col_size)
    }

    pub fn first_row(&self) -> Option<usize> {
        let next = self.rows[self.row_size].next;
        (next != self.row_size).then_some(next)
    }
    pub fn first_col(&self) -> Option<usize> {
        let next = self.cols[self.col_size].next;
        (next != self.col_size).then_some(next)
    }

    pub fn active_row_count(&self) -> usize {
        self.rows().count()
    }
    pub fn active_col_count(&self) -> usize {
        self.cols().count()
    }

    /// Check whether every row has been covered (or deleted).
    pub fn is_empty(&self) -> bool {
        self.first_row().is_none()
    }

    /// Total number of cells ever inserted (live or detached).
    pub fn num_cells(&self) -> usize {
        self.cells.real_size() - self.row_size - self.col_size
    }

    /// Number of entries (deletions and markers) on the history stack.
    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// Columns of the given row's ring in ascending order.
    ///
    /// For a deleted row this is the content it had when it was deleted.
    pub fn row_cols(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        let head = self.row_head(row);
        self.ring(head, |c| c.right).map(move |i| self.cells[i].col)
    }
    /// Rows of the given column's ring in ascending order.
    ///
    /// For a deleted column this is the content it had when it was deleted.
    pub fn col_rows(&self, col: usize) -> impl Iterator<Item = usize> + '_ {
        let head = self.col_head(col);
        self.ring(head, |c| c.down).map(move |i| self.cells[i].row)
    }

    fn ring(&self, head: usize, step: fn(&Cell) -> usize) -> impl Iterator<Item = usize> + '_ {
        let first = step(&self.cells[head]);
        std::iter::successors(Some(first), move |&i| Some(step(&self.cells[i]))).take_while(move |&i| i != head)
    }
}

fn active_list(heads: &[LineHead], sentinel: usize) -> impl Iterator<Item = usize> + '_ {
    std::iter::successors(Some(heads[sentinel].next), move |&i| Some(heads[i].next))
        .take_while(move |&i| i != sentinel)
}

/// Link `index` into an active list at its ascending position.
fn link_sorted(heads: &mut [LineHead], sentinel: usize, index: usize) {
    let last = heads[sentinel].prev;
    let (prev, next) = if last == sentinel || last < index {
        (last, sentinel)
    } else {
        let mut prev = sentinel;
        loop {
            let next = heads[prev].next;
            assert_ne!(next, index, "Line {} is already active", index);
            if next > index {
                break (prev, next);
            }
            prev = next;
        }
    };
    heads[prev].next = index;
    heads[next].prev = index;
    heads[index].prev = prev;
    heads[index].next = next;
    heads[index].active = true;
}

fn unlink(heads: &mut [LineHead], index: usize) {
    let LineHead { prev, next, .. } = heads[index];
    heads[prev].next = next;
    heads[next].prev = prev;
    heads[index].active = false;
}

fn relink(heads: &mut [LineHead], index: usize) {
    let LineHead { prev, next, .. } = heads[index];
    heads[prev].next = index;
    heads[next].prev = index;
    heads[index].active = true;
}

impl<C: Cost> Matrix<C> {
    /// Insert the cell `(row, col)`.
    ///
    /// Returns `false` (and changes nothing) if the cell already exists.
    ///
    /// # Panics
    ///
    /// Panics on out-of-range indices, or if deletions are pending on the history.
    pub fn insert_elem(&mut self, row: usize, col: usize) -> bool {
        let row_head = self.row_head(row);
        let col_head = self.col_head(col);
        assert!(
            self.history.is_empty(),
            "Cannot insert ({}, {}) while deletions are pending",
            row,
            col
        );

        let Some((left, right)) = self.search_insert_pos(row_head, |c| c.col, |c| c.left, |c| c.right, col) else {
            return false;
        };
        let (up, down) = self
            .search_insert_pos(col_head, |c| c.row, |c| c.up, |c| c.down, row)
            .unwrap_or_else(|| panic!("Cell ({}, {}) is in its column but not in its row", row, col));

        let cell = self.cells.alloc(Cell {
            row,
            col,
            left,
            right,
            up,
            down,
        });
        self.cells[left].right = cell;
        self.cells[right].left = cell;
        self.cells[up].down = cell;
        self.cells[down].up = cell;

        self.rows[row].num += 1;
        if self.rows[row].num == 1 {
            link_sorted(&mut self.rows, self.row_size, row);
        }
        self.cols[col].num += 1;
        if self.cols[col].num == 1 {
            link_sorted(&mut self.cols, self.col_size, col);
        }

        true
    }

    /// Find the neighbours between which a cell with the given key goes into the ring
    /// anchored at `head`. Returns `None` for a duplicate key.
    fn search_insert_pos(
        &self,
        head: usize,
        key: fn(&Cell) -> usize,
        prev: fn(&Cell) -> usize,
        next: fn(&Cell) -> usize,
        pos: usize,
    ) -> Option<(usize, usize)> {
        let last = prev(&self.cells[head]);
        if last == head || key(&self.cells[last]) < pos {
            // Append at the end.
            return Some((last, head));
        }
        let mut p = head;
        loop {
            let n = next(&self.cells[p]);
            debug_assert_ne!(n, head);
            let k = key(&self.cells[n]);
            if k == pos {
                return None;
            }
            if k > pos {
                return Some((p, n));
            }
            p = n;
        }
    }

    /// Set one component of the cost of the given column.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range column or component, or a negative value.
    pub fn set_col_cost(&mut self, col: usize, component: usize, value: f64) {
        self.col_head(col);
        assert!(
            component < self.cost_size,
            "Cost component {} out of range 0..{}",
            component,
            self.cost_size
        );
        assert!(value >= 0.0, "Column cost must be non-negative, got {}", value);
        self.costs[col].set_component(component, value);
    }
}

impl<C> Matrix<C> {
    /// Select the given column: delete every row it covers, then the column itself.
    pub fn select_col(&mut self, col: usize) {
        let head = self.col_head(col);
        assert!(self.cols[col].active, "Cannot select deleted column {}", col);
        debug!("select_col({})", col);

        let mut i = self.cells[head].down;
        while i != head {
            // Deleting the row detaches `i` from this column, but `i` keeps its own links.
            let next = self.cells[i].down;
            let row = self.cells[i].row;
            self.delete_row(row);
            i = next;
        }
        // The column is deleted along with its last row unless it was already empty.
        if self.cols[col].active {
            self.delete_col(col);
        }
    }

    /// Delete the given row.
    pub fn delete_row(&mut self, row: usize) {
        let head = self.row_head(row);
        assert!(self.rows[row].active, "Row {} is already deleted", row);
        trace!("delete_row({})", row);

        // The record goes first: lines emptied below get restored before this row
        // hands its cells back to them.
        self.history.push(Record::Deleted(Line::Row(row)));
        unlink(&mut self.rows, row);

        let mut i = self.cells[head].right;
        while i != head {
            let Cell { col, up, down, .. } = self.cells[i];
            self.cells[up].down = down;
            self.cells[down].up = up;
            self.cols[col].num -= 1;
            if self.cols[col].num == 0 {
                self.delete_col(col);
            }
            i = self.cells[i].right;
        }
    }

    /// Delete the given column.
    pub fn delete_col(&mut self, col: usize) {
        let head = self.col_head(col);
        assert!(self.cols[col].active, "Column {} is already deleted", col);
        trace!("delete_col({})", col);

        self.history.push(Record::Deleted(Line::Col(col)));
        unlink(&mut self.cols, col);

        let mut i = self.cells[head].down;
        while i != head {
            let Cell { row, left, right, .. } = self.cells[i];
            self.cells[left].right = right;
            self.cells[right].left = left;
            self.rows[row].num -= 1;
            if self.rows[row].num == 0 {
                self.delete_row(row);
            }
            i = self.cells[i].down;
        }
    }

    fn restore_row(&mut self, row: usize) {
        trace!("restore_row({})", row);
        relink(&mut self.rows, row);

        let head = row;
        let mut i = self.cells[head].left;
        while i != head {
            let Cell { col, up, down, .. } = self.cells[i];
            self.cells[up].down = i;
            self.cells[down].up = i;
            self.cols[col].num += 1;
            i = self.cells[i].left;
        }
    }

    fn restore_col(&mut self, col: usize) {
        trace!("restore_col({})", col);
        relink(&mut self.cols, col);

        let head = self.row_size + col;
        let mut i = self.cells[head].up;
        while i != head {
            let Cell { row, left, right, .. } = self.cells[i];
            self.cells[left].right = i;
            self.cells[right].left = i;
            self.rows[row].num += 1;
            i = self.cells[i].up;
        }
    }

    /// Push a marker onto the history.
    pub fn backup(&mut self) {
        debug!("backup(depth = {})", self.history.len());
        self.history.push(Record::Marker);
    }

    /// Undo every deletion made since the most recent [`backup`][Matrix::backup].
    ///
    /// # Panics
    ///
    /// Panics if there is no marker on the history.
    pub fn restore(&mut self) {
        debug!("restore(depth = {})", self.history.len());
        loop {
            match self.history.pop() {
                Some(Record::Marker) => break,
                Some(Record::Deleted(Line::Row(row))) => self.restore_row(row),
                Some(Record::Deleted(Line::Col(col))) => self.restore_col(col),
                None => panic!("restore() without a matching backup()"),
            }
        }
    }

    /// Start a scope whose deletions are undone when the returned guard is dropped.
    pub fn checkpoint(&mut self) -> Checkpoint<'_, C> {
        self.backup();
        Checkpoint { matrix: self }
    }
}

/// Scoped [`backup`][Matrix::backup]/[`restore`][Matrix::restore] pair.
///
/// Dereferences to the matrix, so it can be used (and checkpointed again) in place of it.
pub struct Checkpoint<'a, C> {
    matrix: &'a mut Matrix<C>,
}

impl<C> Deref for Checkpoint<'_, C> {
    type Target = Matrix<C>;

    fn deref(&self) -> &Self::Target {
        self.matrix
    }
}

impl<C> DerefMut for Checkpoint<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.matrix
    }
}

impl<C> Drop for Checkpoint<'_, C> {
    fn drop(&mut self) {
        self.matrix.restore();
    }
}

impl<C> fmt::Debug for Matrix<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("row_size", &self.row_size)
            .field("col_size", &self.col_size)
            .field("active_rows", &self.active_row_count())
            .field("active_cols", &self.active_col_count())
            .field("cells", &self.num_cells())
            .field("history", &self.history.len())
            .finish()
    }
}

impl<C> fmt::Display for Matrix<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            write!(f, "{}:", row)?;
            for col in self.row_cols(row) {
                write!(f, " {}", col)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
