//! ad::hyperdual — hyper-dual numbers for exact second derivatives.
//!
//! A hyper-dual number `re + e1·ε₁ + e2·ε₂ + e12·ε₁ε₂` with
//! `ε₁² = ε₂² = 0` propagates two first-order tangents and their cross
//! term. Seeding `e1` on θ_i and `e2` on θ_j yields `∂²f/∂θ_i∂θ_j` in
//! `e12` with no truncation error.
use crate::ad::scalar::Scalar;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperDual {
    pub re: f64,
    pub e1: f64,
    pub e2: f64,
    pub e12: f64,
}

impl HyperDual {
    #[inline]
    pub fn new(re: f64, e1: f64, e2: f64, e12: f64) -> Self {
        Self { re, e1, e2, e12 }
    }

    /// Seed a coordinate with the given first-order tangents.
    #[inline]
    pub fn seeded(re: f64, e1: f64, e2: f64) -> Self {
        Self::new(re, e1, e2, 0.0)
    }

    /// Second-order chain rule for a unary function with value `f`,
    /// first derivative `df` and second derivative `d2f` at `re`.
    #[inline]
    fn chain(self, f: f64, df: f64, d2f: f64) -> Self {
        Self::new(f, df * self.e1, df * self.e2, df * self.e12 + d2f * self.e1 * self.e2)
    }

    #[inline]
    fn recip(self) -> Self {
        let inv = 1.0 / self.re;
        self.chain(inv, -inv * inv, 2.0 * inv * inv * inv)
    }
}

impl Scalar for HyperDual {
    #[inline]
    fn constant(value: f64) -> Self {
        Self::new(value, 0.0, 0.0, 0.0)
    }

    #[inline]
    fn value(&self) -> f64 {
        self.re
    }

    #[inline]
    fn exp(self) -> Self {
        let e = self.re.exp();
        self.chain(e, e, e)
    }

    #[inline]
    fn ln(self) -> Self {
        let inv = 1.0 / self.re;
        self.chain(self.re.ln(), inv, -inv * inv)
    }

    #[inline]
    fn sqrt(self) -> Self {
        let s = self.re.sqrt();
        self.chain(s, 0.5 / s, -0.25 / (s * s * s))
    }
}

impl Add for HyperDual {
    type Output = HyperDual;
    #[inline]
    fn add(self, rhs: HyperDual) -> HyperDual {
        HyperDual::new(self.re + rhs.re, self.e1 + rhs.e1, self.e2 + rhs.e2, self.e12 + rhs.e12)
    }
}

impl Sub for HyperDual {
    type Output = HyperDual;
    #[inline]
    fn sub(self, rhs: HyperDual) -> HyperDual {
        HyperDual::new(self.re - rhs.re, self.e1 - rhs.e1, self.e2 - rhs.e2, self.e12 - rhs.e12)
    }
}

impl Mul for HyperDual {
    type Output = HyperDual;
    #[inline]
    fn mul(self, rhs: HyperDual) -> HyperDual {
        HyperDual::new(
            self.re * rhs.re,
            self.e1 * rhs.re + self.re * rhs.e1,
            self.e2 * rhs.re + self.re * rhs.e2,
            self.e12 * rhs.re + self.e1 * rhs.e2 + self.e2 * rhs.e1 + self.re * rhs.e12,
        )
    }
}

impl Div for HyperDual {
    type Output = HyperDual;
    #[inline]
    fn div(self, rhs: HyperDual) -> HyperDual {
        self * rhs.recip()
    }
}

impl Neg for HyperDual {
    type Output = HyperDual;
    #[inline]
    fn neg(self) -> HyperDual {
        HyperDual::new(-self.re, -self.e1, -self.e2, -self.e12)
    }
}

impl Add<f64> for HyperDual {
    type Output = HyperDual;
    #[inline]
    fn add(self, rhs: f64) -> HyperDual {
        HyperDual::new(self.re + rhs, self.e1, self.e2, self.e12)
    }
}

impl Sub<f64> for HyperDual {
    type Output = HyperDual;
    #[inline]
    fn sub(self, rhs: f64) -> HyperDual {
        HyperDual::new(self.re - rhs, self.e1, self.e2, self.e12)
    }
}

impl Mul<f64> for HyperDual {
    type Output = HyperDual;
    #[inline]
    fn mul(self, rhs: f64) -> HyperDual {
        HyperDual::new(self.re * rhs, self.e1 * rhs, self.e2 * rhs, self.e12 * rhs)
    }
}

impl Div<f64> for HyperDual {
    type Output = HyperDual;
    #[inline]
    fn div(self, rhs: f64) -> HyperDual {
        HyperDual::new(self.re / rhs, self.e1 / rhs, self.e2 / rhs, self.e12 / rhs)
    }
}

impl AddAssign for HyperDual {
    #[inline]
    fn add_assign(&mut self, rhs: HyperDual) {
        *self = *self + rhs;
    }
}

impl SubAssign for HyperDual {
    #[inline]
    fn sub_assign(&mut self, rhs: HyperDual) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Verify the mixed second derivative of a bivariate product.
    //
    // Given
    // -----
    // - f(x, y) = x²·y at (x, y) = (3, 2), seeded e1 on x and e2 on y.
    //
    // Expect
    // ------
    // - ∂f/∂x = 2xy = 12, ∂f/∂y = x² = 9, ∂²f/∂x∂y = 2x = 6.
    fn hyperdual_mixed_partial_of_product() {
        // Arrange
        let x = HyperDual::seeded(3.0, 1.0, 0.0);
        let y = HyperDual::seeded(2.0, 0.0, 1.0);

        // Act
        let f = x * x * y;

        // Assert
        assert_eq!(f.re, 18.0);
        assert_eq!(f.e1, 12.0);
        assert_eq!(f.e2, 9.0);
        assert_eq!(f.e12, 6.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify diagonal second derivatives of the transcendental functions.
    //
    // Given
    // -----
    // - g(x) = exp(x) + ln(x) + sqrt(x) + 1/x at x = 0.7, seeded e1 = e2 = 1.
    //
    // Expect
    // ------
    // - e12 = exp(x) - 1/x² - 1/(4 x^{3/2}) + 2/x³.
    fn hyperdual_second_derivative_of_transcendentals() {
        // Arrange
        let x0 = 0.7_f64;
        let x = HyperDual::seeded(x0, 1.0, 1.0);
        let one = HyperDual::constant(1.0);

        // Act
        let g = x.exp() + x.ln() + x.sqrt() + one / x;

        // Assert
        let expected =
            x0.exp() - 1.0 / (x0 * x0) - 0.25 / x0.powf(1.5) + 2.0 / (x0 * x0 * x0);
        assert_relative_eq!(g.e12, expected, epsilon = 1e-12);
        assert_eq!(g.e1, g.e2);
    }
}
