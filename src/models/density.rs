//! models::density — Gaussian negative log-densities shared by the models.
//!
//! All helpers are generic over [`Scalar`] and return the *negative*
//! log-density, so model objectives are plain sums of these terms.
use crate::ad::scalar::Scalar;

/// `ln(sqrt(2π))`.
pub const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// `-ln N(x; mean, sd)` = `½·z² + ln(sd) + ln(√(2π))`, `z = (x - mean)/sd`.
///
/// `sd ≤ 0` yields NaN or ±∞ rather than an error.
#[inline]
pub fn normal_nll<T: Scalar>(x: T, mean: T, sd: T) -> T {
    let z = (x - mean) / sd;
    z * z * 0.5 + sd.ln() + LN_SQRT_2PI
}

/// Negative log-density of a zero-mean stationary AR(1) path.
///
/// `r_0 ~ N(0, sd)` and `r_t | r_{t-1} ~ N(phi·r_{t-1}, sd_innov)`, where
/// the caller supplies `sd_innov = sd·sqrt(1 - phi²)`. Taking it as an
/// argument lets callers form `sqrt(1 - phi²)` from the unconstrained
/// parameter (see [`bounded_unit_parts`]) instead of from a `phi` that has
/// rounded to ±1. With `phi == 0` and `sd_innov == sd` the result is
/// bit-identical to summing `normal_nll(r_t, 0, sd)` from zero.
///
/// [`bounded_unit_parts`]: crate::optimization::numerical_stability::bounded_unit_parts
pub fn ar1_nll<T: Scalar>(residuals: &[T], phi: T, sd: T, sd_innov: T) -> T {
    let mut nll = T::zero();
    let Some((&first, _)) = residuals.split_first() else {
        return nll;
    };
    nll += normal_nll(first, T::zero(), sd);
    for pair in residuals.windows(2) {
        nll += normal_nll(pair[1], phi * pair[0], sd_innov);
    }
    nll
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::distribution::{Continuous, Normal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `normal_nll` against statrs' Normal::ln_pdf.
    // - Reduction of `ar1_nll` to independent terms at phi = 0.
    // - The conditional AR(1) factorization against a bivariate normal.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Cross-check the normal negative log-density against statrs.
    //
    // Given
    // -----
    // - A handful of (x, mean, sd) triples.
    //
    // Expect
    // ------
    // - normal_nll(x, mean, sd) == -Normal(mean, sd).ln_pdf(x) to 1e-13.
    fn normal_nll_matches_statrs_oracle() {
        for &(x, mean, sd) in &[(0.0, 0.0, 1.0), (1.3, -0.4, 0.7), (-5.0, 2.0, 3.5), (10.0, 5.0, 5.0)]
        {
            // Arrange
            let oracle = Normal::new(mean, sd).expect("valid normal");

            // Act
            let got = normal_nll(x, mean, sd);

            // Assert
            assert_relative_eq!(got, -oracle.ln_pdf(x), epsilon = 1e-13);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure the AR(1) density collapses exactly to independent normals when
    // phi = 0.
    //
    // Given
    // -----
    // - Residuals [1.0, 0.5, 0.9, 0.2], sd = sd_innov = 1.3, phi = 0.
    //
    // Expect
    // ------
    // - Bit-identical to the sum of independent N(0, sd) terms.
    fn ar1_nll_phi_zero_is_independent_sum() {
        // Arrange
        let r = [1.0_f64, 0.5, 0.9, 0.2];
        let sd = 1.3_f64;

        // Act
        let ar = ar1_nll(&r, 0.0, sd, sd);
        let mut indep = 0.0_f64;
        for &v in &r {
            indep += normal_nll(v, 0.0, sd);
        }

        // Assert
        assert_eq!(ar, indep);
    }

    #[test]
    // Purpose
    // -------
    // Validate the conditional factorization on a two-step path against the
    // closed-form bivariate normal density.
    //
    // Given
    // -----
    // - r = (0.8, -0.3), sd = 1.2, phi = 0.6.
    //
    // Expect
    // ------
    // - ar1_nll equals ln(2π) + ln(sd²·sqrt(1-phi²)) + q/2 with
    //   q = (r0² - 2·phi·r0·r1 + r1²) / (sd²·(1-phi²)).
    fn ar1_nll_matches_bivariate_normal() {
        // Arrange
        let (r0, r1, sd, phi) = (0.8_f64, -0.3_f64, 1.2_f64, 0.6_f64);
        let var = sd * sd;
        let one_m = 1.0 - phi * phi;
        let q = (r0 * r0 - 2.0 * phi * r0 * r1 + r1 * r1) / (var * one_m);
        let expected = 2.0 * LN_SQRT_2PI + (var * one_m.sqrt()).ln() + 0.5 * q;

        // Act
        let got = ar1_nll(&[r0, r1], phi, sd, sd * one_m.sqrt());

        // Assert
        assert_relative_eq!(got, expected, epsilon = 1e-13);
    }

    #[test]
    // Purpose
    // -------
    // An empty residual slice contributes nothing.
    //
    // Given
    // -----
    // - r = [].
    //
    // Expect
    // ------
    // - ar1_nll returns exactly 0.
    fn ar1_nll_empty_is_zero() {
        assert_eq!(ar1_nll::<f64>(&[], 0.3, 1.0, 0.9), 0.0);
    }
}
