use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Point estimate with lower and upper confidence bounds.
///
/// Only `lower_bound <= upper_bound` is enforced; the point value is not
/// required to lie between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBootstrapResult")]
pub struct BootstrapResult {
    lower_bound: f64,
    value: f64,
    upper_bound: f64,
}

#[derive(Deserialize)]
struct RawBootstrapResult {
    lower_bound: f64,
    value: f64,
    upper_bound: f64,
}

impl TryFrom<RawBootstrapResult> for BootstrapResult {
    type Error = Error;

    fn try_from(raw: RawBootstrapResult) -> Result<Self> {
        Self::new(raw.lower_bound, raw.value, raw.upper_bound)
    }
}

/// Sign classification of a [`BootstrapResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Significance {
    /// Interval excludes zero and the estimate is negative.
    Negative = -1,
    /// Interval straddles zero, or the estimate is zero.
    Insignificant = 0,
    /// Interval excludes zero and the estimate is positive.
    Positive = 1,
}

impl From<Significance> for i8 {
    fn from(s: Significance) -> i8 {
        s as i8
    }
}

impl BootstrapResult {
    /// # Errors
    /// [`Error::InvalidInterval`] when `lower_bound > upper_bound` or either
    /// bound is NaN.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn new(lower_bound: f64, value: f64, upper_bound: f64) -> Result<Self> {
        // Negated so that NaN bounds fail too
        if !(lower_bound <= upper_bound) {
            return Err(Error::InvalidInterval {
                lower: lower_bound,
                upper: upper_bound,
            });
        }
        Ok(Self { lower_bound, value, upper_bound })
    }

    /// Zero-width result at `value`.
    pub const fn point(value: f64) -> Self {
        Self {
            lower_bound: value,
            value,
            upper_bound: value,
        }
    }

    /// Lower confidence bound.
    #[inline]
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Point estimate.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Upper confidence bound.
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Apply `op(component, scalar)` to the lower bound, value and upper
    /// bound independently.
    ///
    /// # Errors
    /// [`Error::InvalidInterval`] when `op` reverses the bounds, e.g. a
    /// negative scale.
    pub fn apply<F>(&self, scalar: f64, op: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        Self::new(
            op(self.lower_bound, scalar),
            op(self.value, scalar),
            op(self.upper_bound, scalar),
        )
    }

    /// Like [`apply`](Self::apply), but swaps the bounds when `op` reverses
    /// them.
    fn lift<F>(&self, op: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let (a, b) = (op(self.lower_bound), op(self.upper_bound));
        Self {
            lower_bound: a.min(b),
            value: op(self.value),
            upper_bound: a.max(b),
        }
    }

    /// `upper_bound - lower_bound`.
    #[inline]
    pub fn error_width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// `error_width() / value`, or `f64::INFINITY` when `value` is zero.
    #[inline]
    pub fn error_fraction(&self) -> f64 {
        if self.value == 0.0 {
            f64::INFINITY
        } else {
            self.error_width() / self.value
        }
    }

    /// `error_width() / value`.
    ///
    /// # Errors
    /// [`Error::DivisionByZero`] when `value` is zero.
    pub fn checked_error_fraction(&self) -> Result<f64> {
        if self.value == 0.0 {
            Err(Error::DivisionByZero)
        } else {
            Ok(self.error_width() / self.value)
        }
    }

    /// True when both bounds share a sign (or one is zero): the interval does
    /// not straddle zero.
    ///
    /// A heuristic, not a formal hypothesis test.
    #[inline]
    pub fn is_significant(&self) -> bool {
        self.lower_bound * self.upper_bound >= 0.0
    }

    /// Three-way sign classification of a significant estimate.
    pub fn classify(&self) -> Significance {
        if !self.is_significant() {
            Significance::Insignificant
        } else if self.value > 0.0 {
            Significance::Positive
        } else if self.value < 0.0 {
            Significance::Negative
        } else {
            Significance::Insignificant
        }
    }

    /// Check if `x` lies within `[lower_bound, upper_bound]` (inclusive).
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lower_bound <= x && x <= self.upper_bound
    }
}

impl fmt::Display for BootstrapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}    ({}, {})", self.value, self.lower_bound, self.upper_bound)
    }
}

impl Add<f64> for BootstrapResult {
    type Output = BootstrapResult;

    fn add(self, rhs: f64) -> Self::Output {
        self.lift(|x| x + rhs)
    }
}

impl Add<BootstrapResult> for f64 {
    type Output = BootstrapResult;

    fn add(self, rhs: BootstrapResult) -> Self::Output {
        rhs.lift(|x| self + x)
    }
}

impl Sub<f64> for BootstrapResult {
    type Output = BootstrapResult;

    fn sub(self, rhs: f64) -> Self::Output {
        self.lift(|x| x - rhs)
    }
}

impl Sub<BootstrapResult> for f64 {
    type Output = BootstrapResult;

    fn sub(self, rhs: BootstrapResult) -> Self::Output {
        rhs.lift(|x| self - x)
    }
}

impl Mul<f64> for BootstrapResult {
    type Output = BootstrapResult;

    fn mul(self, rhs: f64) -> Self::Output {
        self.lift(|x| x * rhs)
    }
}

impl Mul<BootstrapResult> for f64 {
    type Output = BootstrapResult;

    fn mul(self, rhs: BootstrapResult) -> Self::Output {
        rhs.lift(|x| x * self)
    }
}

impl Div<f64> for BootstrapResult {
    type Output = BootstrapResult;

    fn div(self, rhs: f64) -> Self::Output {
        self.lift(|x| x / rhs)
    }
}
