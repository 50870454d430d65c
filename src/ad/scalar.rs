//! ad::scalar — the numeric interface every model objective is written against.
//!
//! Purpose
//! -------
//! Define [`Scalar`], the minimal set of operations the likelihood code
//! needs, so that one objective body can be evaluated at plain `f64`
//! values and at dual-number values that carry derivative information.
//!
//! Conventions
//! -----------
//! - Mixed arithmetic with `f64` constants is part of the trait so model
//!   code can write `z * z * 0.5` without wrapping literals.
//! - Transcendental functions follow IEEE semantics for `f64`; domain
//!   problems (e.g. `ln` of a negative number) surface as NaN in the
//!   value, never as an error.
use std::{
    fmt::Debug,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

/// Numeric type a model objective can be evaluated at.
///
/// Implemented for `f64` (plain values), [`Dual`](crate::ad::dual::Dual)
/// (first derivatives) and [`HyperDual`](crate::ad::hyperdual::HyperDual)
/// (second derivatives).
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + AddAssign
    + SubAssign
{
    /// Lift a data value into the scalar type with zero derivative.
    fn constant(value: f64) -> Self;

    /// Primal (plain `f64`) part.
    fn value(&self) -> f64;

    fn exp(self) -> Self;

    fn ln(self) -> Self;

    fn sqrt(self) -> Self;

    #[inline]
    fn square(self) -> Self {
        self * self
    }

    #[inline]
    fn zero() -> Self {
        Self::constant(0.0)
    }
}

impl Scalar for f64 {
    #[inline]
    fn constant(value: f64) -> Self {
        value
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Generic helper exercising the trait surface only.
    fn poly<T: Scalar>(x: T) -> T {
        x.square() * 3.0 + x * 2.0 - 1.0
    }

    #[test]
    // Purpose
    // -------
    // Check that the `f64` implementation is a transparent pass-through.
    //
    // Given
    // -----
    // - A generic polynomial and transcendental calls at x = 2.
    //
    // Expect
    // ------
    // - Results equal the inherent `f64` computations exactly.
    fn f64_scalar_matches_inherent_methods() {
        // Arrange
        let x = 2.0_f64;

        // Act
        let p = poly(x);
        let e = <f64 as Scalar>::exp(x);
        let l = <f64 as Scalar>::ln(x);
        let s = <f64 as Scalar>::sqrt(x);

        // Assert
        assert_eq!(p, 15.0);
        assert_eq!(e, x.exp());
        assert_eq!(l, x.ln());
        assert_eq!(s, x.sqrt());
        assert_eq!(<f64 as Scalar>::zero(), 0.0);
        assert_eq!(Scalar::value(&x), 2.0);
    }
}
