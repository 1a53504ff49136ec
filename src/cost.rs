//! Column costs.
//!
//! The solver never looks inside a cost: it only needs a zero, addition, a total order
//! and (for callers building weighted instances) scaling by a factor. This module
//! provides the [`Cost`] trait capturing that contract together with two stock
//! implementations:
//!
//! - [`Cost1`]: a single `f64` value.
//! - [`Cost2`]: a pair of `f64` values compared lexicographically, e.g. "number of
//!   cubes first, number of literals second" in two-level minimization.
//!
//! Both use [`f64::total_cmp`] so that the order is total, which is what the branch
//! and bound comparisons rely on.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::ops::{Add, AddAssign, Mul};

/// The cost contract used by the [`Matrix`][crate::matrix::Matrix] and the solver.
pub trait Cost: Clone + Debug + Ord + for<'a> AddAssign<&'a Self> {
    /// Number of components of the cost vector.
    const DIMENSION: usize;

    /// The additive identity.
    fn zero() -> Self;

    /// The default cost of a column: first component is `1`, the others are `0`.
    fn unit() -> Self;

    /// Returns the `i`-th component.
    fn component(&self, i: usize) -> f64;

    /// Sets the `i`-th component.
    ///
    /// # Panics
    ///
    /// Panics if `i >= DIMENSION` or `value` is not finite.
    fn set_component(&mut self, i: usize, value: f64);

    /// Multiplies every component by `k`.
    fn scale(&mut self, k: f64);
}

fn check_value(value: f64) {
    assert!(value.is_finite(), "Cost component must be finite, got {}", value);
}

/// One-dimensional cost.
#[derive(Debug, Copy, Clone, Default)]
pub struct Cost1(f64);

impl Cost1 {
    pub fn new(value: f64) -> Self {
        check_value(value);
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Cost for Cost1 {
    const DIMENSION: usize = 1;

    fn zero() -> Self {
        Self(0.0)
    }
    fn unit() -> Self {
        Self(1.0)
    }

    fn component(&self, i: usize) -> f64 {
        assert_eq!(i, 0, "Cost1 has a single component, got index {}", i);
        self.0
    }
    fn set_component(&mut self, i: usize, value: f64) {
        assert_eq!(i, 0, "Cost1 has a single component, got index {}", i);
        check_value(value);
        self.0 = value;
    }

    fn scale(&mut self, k: f64) {
        self.0 *= k;
    }
}

impl PartialEq for Cost1 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost1 {}

impl PartialOrd for Cost1 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost1 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl AddAssign<&Cost1> for Cost1 {
    fn add_assign(&mut self, rhs: &Cost1) {
        self.0 += rhs.0;
    }
}

impl Add for Cost1 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<f64> for Cost1 {
    type Output = Self;

    fn mul(mut self, k: f64) -> Self::Output {
        self.scale(k);
        self
    }
}

impl From<f64> for Cost1 {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Display for Cost1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Two-dimensional cost, ordered lexicographically (primary component first).
#[derive(Debug, Copy, Clone, Default)]
pub struct Cost2([f64; 2]);

impl Cost2 {
    pub fn new(primary: f64, secondary: f64) -> Self {
        check_value(primary);
        check_value(secondary);
        Self([primary, secondary])
    }

    pub fn primary(self) -> f64 {
        self.0[0]
    }
    pub fn secondary(self) -> f64 {
        self.0[1]
    }
}

impl Cost for Cost2 {
    const DIMENSION: usize = 2;

    fn zero() -> Self {
        Self([0.0, 0.0])
    }
    fn unit() -> Self {
        Self([1.0, 0.0])
    }

    fn component(&self, i: usize) -> f64 {
        assert!(i < Self::DIMENSION, "Cost2 component index {} out of range", i);
        self.0[i]
    }
    fn set_component(&mut self, i: usize, value: f64) {
        assert!(i < Self::DIMENSION, "Cost2 component index {} out of range", i);
        check_value(value);
        self.0[i] = value;
    }

    fn scale(&mut self, k: f64) {
        self.0[0] *= k;
        self.0[1] *= k;
    }
}

impl PartialEq for Cost2 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost2 {}

impl PartialOrd for Cost2 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost2 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0[0]
            .total_cmp(&other.0[0])
            .then_with(|| self.0[1].total_cmp(&other.0[1]))
    }
}

impl AddAssign<&Cost2> for Cost2 {
    fn add_assign(&mut self, rhs: &Cost2) {
        self.0[0] += rhs.0[0];
        self.0[1] += rhs.0[1];
    }
}

impl Add for Cost2 {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}

impl Mul<f64> for Cost2 {
    type Output = Self;

    fn mul(mut self, k: f64) -> Self::Output {
        self.scale(k);
        self
    }
}

impl From<(f64, f64)> for Cost2 {
    fn from((primary, secondary): (f64, f64)) -> Self {
        Self::new(primary, secondary)
    }
}

impl Display for Cost2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0[0], self.0[1])
    }
}
