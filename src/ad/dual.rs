//! ad::dual — forward-mode dual numbers for first derivatives.
//!
//! A dual number `re + eps·ε` with `ε² = 0` carries a value and one
//! directional derivative through every arithmetic operation. Seeding
//! coordinate `i` of θ with `eps = 1` and all others with `eps = 0` turns
//! one objective evaluation into the partial derivative `∂f/∂θ_i`.
use crate::ad::scalar::Scalar;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Scalar dual number (value, tangent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual {
    /// Primal value `f(x)`.
    pub re: f64,
    /// Tangent `f'(x)·seed`.
    pub eps: f64,
}

impl Dual {
    #[inline]
    pub fn new(re: f64, eps: f64) -> Self {
        Self { re, eps }
    }

    /// Independent variable: tangent seeded with 1.
    #[inline]
    pub fn variable(re: f64) -> Self {
        Self::new(re, 1.0)
    }

    /// Chain rule for a unary function with value `f` and derivative `df`.
    #[inline]
    fn chain(self, f: f64, df: f64) -> Self {
        Self::new(f, df * self.eps)
    }
}

impl Scalar for Dual {
    #[inline]
    fn constant(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    #[inline]
    fn value(&self) -> f64 {
        self.re
    }

    #[inline]
    fn exp(self) -> Self {
        let e = self.re.exp();
        self.chain(e, e)
    }

    #[inline]
    fn ln(self) -> Self {
        self.chain(self.re.ln(), 1.0 / self.re)
    }

    #[inline]
    fn sqrt(self) -> Self {
        let s = self.re.sqrt();
        self.chain(s, 0.5 / s)
    }
}

impl Add for Dual {
    type Output = Dual;
    #[inline]
    fn add(self, rhs: Dual) -> Dual {
        Dual::new(self.re + rhs.re, self.eps + rhs.eps)
    }
}

impl Sub for Dual {
    type Output = Dual;
    #[inline]
    fn sub(self, rhs: Dual) -> Dual {
        Dual::new(self.re - rhs.re, self.eps - rhs.eps)
    }
}

impl Mul for Dual {
    type Output = Dual;
    #[inline]
    fn mul(self, rhs: Dual) -> Dual {
        Dual::new(self.re * rhs.re, self.eps * rhs.re + self.re * rhs.eps)
    }
}

impl Div for Dual {
    type Output = Dual;
    #[inline]
    fn div(self, rhs: Dual) -> Dual {
        let inv = 1.0 / rhs.re;
        let re = self.re * inv;
        Dual::new(re, (self.eps - re * rhs.eps) * inv)
    }
}

impl Neg for Dual {
    type Output = Dual;
    #[inline]
    fn neg(self) -> Dual {
        Dual::new(-self.re, -self.eps)
    }
}

impl Add<f64> for Dual {
    type Output = Dual;
    #[inline]
    fn add(self, rhs: f64) -> Dual {
        Dual::new(self.re + rhs, self.eps)
    }
}

impl Sub<f64> for Dual {
    type Output = Dual;
    #[inline]
    fn sub(self, rhs: f64) -> Dual {
        Dual::new(self.re - rhs, self.eps)
    }
}

impl Mul<f64> for Dual {
    type Output = Dual;
    #[inline]
    fn mul(self, rhs: f64) -> Dual {
        Dual::new(self.re * rhs, self.eps * rhs)
    }
}

impl Div<f64> for Dual {
    type Output = Dual;
    #[inline]
    fn div(self, rhs: f64) -> Dual {
        Dual::new(self.re / rhs, self.eps / rhs)
    }
}

impl AddAssign for Dual {
    #[inline]
    fn add_assign(&mut self, rhs: Dual) {
        *self = *self + rhs;
    }
}

impl SubAssign for Dual {
    #[inline]
    fn sub_assign(&mut self, rhs: Dual) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Derivative rules for arithmetic and the transcendental functions.
    // - Constants carrying a zero tangent.
    //
    // They intentionally DO NOT cover:
    // - Whole-model gradients (see `ad::derivatives`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the product and quotient rules.
    //
    // Given
    // -----
    // - f(x) = x² / (1 + x) at x = 2.
    //
    // Expect
    // ------
    // - f(2) = 4/3 and f'(2) = (x² + 2x)/(1 + x)² = 8/9.
    fn dual_product_and_quotient_rules() {
        // Arrange
        let x = Dual::variable(2.0);

        // Act
        let f = x * x / (x + 1.0);

        // Assert
        assert_relative_eq!(f.re, 4.0 / 3.0, epsilon = 1e-15);
        assert_relative_eq!(f.eps, 8.0 / 9.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Verify exp, ln and sqrt derivatives through a composition.
    //
    // Given
    // -----
    // - f(x) = sqrt(exp(x)) + ln(x) at x = 1.5.
    //
    // Expect
    // ------
    // - f'(x) = 0.5·exp(x/2) + 1/x.
    fn dual_transcendental_chain_rule() {
        // Arrange
        let x0 = 1.5_f64;
        let x = Dual::variable(x0);

        // Act
        let f = x.exp().sqrt() + x.ln();

        // Assert
        assert_relative_eq!(f.re, (x0 / 2.0).exp() + x0.ln(), epsilon = 1e-14);
        assert_relative_eq!(f.eps, 0.5 * (x0 / 2.0).exp() + 1.0 / x0, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Ensure constants do not contribute derivative information.
    //
    // Given
    // -----
    // - A constant c = 3 combined with a variable x = 2 as c·x - c.
    //
    // Expect
    // ------
    // - Tangent equals 3 (only from x); a pure-constant expression has tangent 0.
    fn dual_constants_have_zero_tangent() {
        // Arrange
        let c = Dual::constant(3.0);
        let x = Dual::variable(2.0);

        // Act
        let mixed = c * x - c;
        let pure = c.exp() * c;

        // Assert
        assert_eq!(mixed.re, 3.0);
        assert_eq!(mixed.eps, 3.0);
        assert_eq!(pure.eps, 0.0);
        assert_eq!((-x).eps, -1.0);
    }
}
