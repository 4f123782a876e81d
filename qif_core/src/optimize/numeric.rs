//! Provides the element type abstraction shared by the solvers
//!
//! Every comparison made by the simplex engine goes through [`Numeric::equal`] and
//! [`Numeric::less_than`], so floating point instantiations get tolerance based comparisons
//! while rational instantiations compare exactly.
use std::fmt::Display;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};

/// Element type of a linear program
///
/// Implemented for `f64`, `f32` and [`BigRational`]. The trait is a totally ordered field with
/// an "infinity" sentinel used for unbounded variables and constraints.
pub trait Numeric:
    nalgebra::Scalar
    + Display
    + PartialOrd
    + Zero
    + One
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    /// Whether arithmetic on this type is exact
    const IS_EXACT: bool;

    /// Value used to represent an unbounded side of a variable or constraint
    fn infinity() -> Self;

    /// Equality, exact for rationals and approximate for floating point types
    fn equal(&self, other: &Self) -> bool;

    /// Convert to a float, used when handing the problem to an external solver
    fn to_f64(&self) -> f64;

    /// Convert back from a float returned by an external solver
    fn from_f64(value: f64) -> Self;

    /// `self <= other`, with `equal` deciding ties
    fn less_than_or_eq(&self, other: &Self) -> bool {
        self < other || self.equal(other)
    }

    /// Strict `self < other`, false whenever the two values are `equal`
    fn less_than(&self, other: &Self) -> bool {
        !other.less_than_or_eq(self)
    }

    /// Check whether the value is the positive infinity sentinel
    fn is_infinite_pos(&self) -> bool {
        *self == Self::infinity()
    }

    /// Check whether the value is the negative infinity sentinel
    fn is_infinite_neg(&self) -> bool {
        *self == -Self::infinity()
    }
}

// Mixed absolute/relative comparison. Absolute difference is used when one side is zero,
// relative difference otherwise. Infinities are only equal to themselves.
macro_rules! float_equal {
    ($x:expr, $y:expr, $md:expr, $mrd:expr) => {{
        let (x, y) = ($x, $y);
        if x == y {
            true
        } else {
            let diff = (x - y).abs();
            let largest = x.abs().max(y.abs());
            if largest.is_infinite() {
                false
            } else if x == 0.0 || y == 0.0 {
                diff <= $md
            } else {
                diff <= $mrd * largest
            }
        }
    }};
}

impl Numeric for f64 {
    const IS_EXACT: bool = false;

    fn infinity() -> Self {
        f64::INFINITY
    }

    fn equal(&self, other: &Self) -> bool {
        float_equal!(*self, *other, 1e-7, 100. * f64::EPSILON)
    }

    fn to_f64(&self) -> f64 {
        *self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

impl Numeric for f32 {
    const IS_EXACT: bool = false;

    fn infinity() -> Self {
        f32::INFINITY
    }

    fn equal(&self, other: &Self) -> bool {
        float_equal!(*self, *other, 1e-7, 10. * f32::EPSILON)
    }

    fn to_f64(&self) -> f64 {
        *self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Numeric for BigRational {
    const IS_EXACT: bool = true;

    /// Rationals have no infinity, a very large value stands in for it
    fn infinity() -> Self {
        BigRational::from_integer(BigInt::from(i64::MAX))
    }

    fn equal(&self, other: &Self) -> bool {
        self == other
    }

    fn to_f64(&self) -> f64 {
        if self.is_infinite_pos() {
            f64::INFINITY
        } else if self.is_infinite_neg() {
            f64::NEG_INFINITY
        } else {
            ToPrimitive::to_f64(self).unwrap_or(f64::NAN)
        }
    }

    fn from_f64(value: f64) -> Self {
        if value == f64::INFINITY {
            Self::infinity()
        } else if value == f64::NEG_INFINITY {
            -Self::infinity()
        } else {
            <BigRational as FromPrimitive>::from_f64(value).unwrap_or_else(BigRational::zero)
        }
    }
}

/// Build a rational from a numerator and denominator, mostly useful in tests and examples
pub fn rat(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}
