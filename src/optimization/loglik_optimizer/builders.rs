//! loglik_optimizer::builders — L-BFGS solver construction.
//!
//! Purpose
//! -------
//! Build the L-BFGS solvers used by [`minimize`](super::minimize) from an
//! [`MLEOptions`], hiding argmin's generic wiring from the rest of the
//! crate.
//!
//! Key behaviors
//! -------------
//! - One builder per supported line search ([`LineSearcher`] variant),
//!   both routed through [`build_lbfgs`].
//! - History size comes from `opts.lbfgs_mem`, defaulting to
//!   [`DEFAULT_LBFGS_MEM`].
//! - Gradient-norm and cost-change tolerances are applied only when set;
//!   otherwise argmin's defaults stay in effect.
//!
//! Conventions
//! -----------
//! - Builders never set θ₀ or the iteration cap; the runner applies those
//!   to the executor state.
//! - argmin configuration errors surface as [`OptError`] through
//!   `From<argmin::core::Error>`.
//!
//! [`LineSearcher`]: super::traits::LineSearcher
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search, configured from `opts`.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    build_lbfgs(HagerZhangLS::new(), opts)
}

/// L-BFGS with More–Thuente line search, configured from `opts`.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    build_lbfgs(MoreThuenteLS::new(), opts)
}

/// Pair a line search with L-BFGS and apply the configured tolerances.
///
/// # Errors
/// - Any argmin rejection of `tol_grad` / `tol_cost`, converted to `OptError`.
pub fn build_lbfgs<L>(line_search: L, opts: &MLEOptions) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LBFGS::new(line_search, mem), opts)
}

/// Apply optional gradient and cost tolerances to an existing solver.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
