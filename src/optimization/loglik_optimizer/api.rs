//! loglik_optimizer::api — [`minimize`], the single optimizer entry point.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, MLEOptions, Objective},
    },
};

/// Minimize a negative log-likelihood with L-BFGS from `theta0`.
///
/// `f.check` runs first; the solver is then built for `opts.line_searcher`.
/// A run that stops without converging still returns `Ok` with
/// `converged == false`, so callers decide whether to accept it.
///
/// # Errors
/// - Anything `f.check(&theta0, data)` rejects.
/// - Solver construction errors from the tolerances.
/// - Objective errors, non-finite costs or gradients raised during the run.
///
/// # Example
/// ```no_run
/// use ndarray::{Array1, array};
/// use rust_nll_models::optimization::{
///     errors::OptResult,
///     loglik_optimizer::{MLEOptions, Objective, minimize},
/// };
///
/// /// Standard normal nll up to a constant.
/// struct StdNormal;
/// impl Objective for StdNormal {
///     type Data = ();
///     fn value(&self, theta: &Array1<f64>, _: &()) -> OptResult<f64> {
///         Ok(0.5 * theta.dot(theta))
///     }
///     fn check(&self, _: &Array1<f64>, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = minimize(&StdNormal, array![0.1, -0.2, 0.3], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}, nll = {}", out.theta_hat, out.nll);
/// # Ok::<(), rust_nll_models::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{errors::OptError, loglik_optimizer::traits::Tolerances};
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Convergence on a weighted quadratic with both line searches, using the
    //   finite-difference gradient fallback.
    // - An iteration cap that stops the run early is not reported as converged.
    // - Rejection of an invalid starting point by `check`.
    // -------------------------------------------------------------------------

    /// nll(θ) = 3 + Σ w_i (θ_i - 1)², minimized at θ = 1 with nll = 3.
    struct Bowl;

    impl Objective for Bowl {
        type Data = Array1<f64>;

        fn value(&self, theta: &Array1<f64>, w: &Array1<f64>) -> OptResult<f64> {
            Ok(3.0 + theta.iter().zip(w).map(|(t, w)| w * (t - 1.0) * (t - 1.0)).sum::<f64>())
        }

        fn check(&self, theta: &Array1<f64>, w: &Array1<f64>) -> OptResult<()> {
            if theta.len() != w.len() {
                return Err(OptError::ThetaLengthMismatch { expected: w.len(), actual: theta.len() });
            }
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // `minimize` reaches the known optimum with either line search.
    //
    // Given
    // -----
    // - A weighted bowl with optimum θ* = (1, 1, 1), θ₀ = (0, 3, -2).
    //
    // Expect
    // ------
    // - θ̂ ≈ θ*, the reported nll ≈ 3 (not its negation) and converged.
    fn minimize_finds_bowl_optimum_with_both_line_searches() {
        let w = array![1.0, 4.0, 0.5];
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let tols = Tolerances::new(Some(1e-7), None, Some(200)).expect("tolerances");
            let opts = MLEOptions::new(tols, ls, false, None).expect("options");

            // Act
            let out = minimize(&Bowl, array![0.0, 3.0, -2.0], &w, &opts).expect("minimize");

            // Assert
            for &t in out.theta_hat.iter() {
                assert_relative_eq!(t, 1.0, epsilon = 1e-4);
            }
            assert!(out.nll >= 3.0 && out.nll < 3.0 + 1e-6, "nll = {}", out.nll);
            assert!(out.converged, "status: {}", out.status);
        }
    }

    #[test]
    // Purpose
    // -------
    // Hitting the iteration cap returns the best point but not convergence.
    //
    // Given
    // -----
    // - The bowl from θ₀ = (0, 3, -2) with max_iter = 1 and no explicit
    //   tolerances.
    //
    // Expect
    // ------
    // - `Ok` with converged = false and a finite nll above the optimum.
    fn minimize_iteration_cap_is_not_convergence() {
        // Arrange
        let w = array![1.0, 4.0, 0.5];
        let tols = Tolerances::new(None, None, Some(1)).expect("tolerances");
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("options");

        // Act
        let out = minimize(&Bowl, array![0.0, 3.0, -2.0], &w, &opts).expect("minimize");

        // Assert
        assert!(!out.converged, "status: {}", out.status);
        assert!(out.nll.is_finite() && out.nll > 3.0);
    }

    #[test]
    // Purpose
    // -------
    // The starting point is checked before any solver work.
    //
    // Given
    // -----
    // - Weights of length 3 and θ₀ of length 2.
    //
    // Expect
    // ------
    // - ThetaLengthMismatch { expected: 3, actual: 2 }.
    fn minimize_rejects_bad_start() {
        let w = array![1.0, 1.0, 1.0];
        let err = minimize(&Bowl, array![0.0, 0.0], &w, &MLEOptions::default()).expect_err("len");
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 3, actual: 2 });
    }
}
