//! Matrix line identifiers.
//!
//! Rows (elements to cover) and columns (candidate sets) are plain 0-based `usize`
//! indices in the public API. Where both kinds travel through the same channel, as in
//! the delete history of a [`Matrix`][crate::matrix::Matrix], they are wrapped into a
//! [`Line`] so that a row index can never be mistaken for a column index.

/// One line of the covering matrix: either a row or a column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Line {
    /// A row, i.e. an element that has to be covered.
    Row(usize),
    /// A column, i.e. a candidate set that may be selected.
    Col(usize),
}
