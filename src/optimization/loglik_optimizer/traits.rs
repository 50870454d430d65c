//! loglik_optimizer::traits — objective interface, solver settings and the
//! normalized fit outcome.
//!
//! The optimizer minimizes a negative log-likelihood as is. An
//! [`Objective`] returns `nll(θ)` and optionally `∇nll(θ)`, argmin sees
//! that value as its cost, and [`OptimOutcome::nll`] reports it at θ̂.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// A negative log-likelihood over an unconstrained θ.
///
/// `check` runs once on the starting point. Without `grad` the adapter
/// finite-differences `value`.
pub trait Objective {
    type Data: 'static;

    /// `nll(θ)`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    /// `∇nll(θ)`.
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used inside L-BFGS. Parses case-insensitively from
/// `"MoreThuente"` or `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Settings for one L-BFGS fit.
///
/// `verbose` only has an effect with the `obs_slog` feature. `lbfgs_mem`
/// of `None` means [`DEFAULT_LBFGS_MEM`](super::DEFAULT_LBFGS_MEM).
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// # Errors
    /// [`OptError::InvalidLBFGSMem`] for `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

/// `tol_grad = 1e-6`, `max_iter = 300`, More–Thuente, quiet.
impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules: gradient norm, change in nll between iterations, and an
/// iteration cap. At least one must be set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] when every rule is `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for a
    ///   tolerance that is not finite and positive.
    /// - [`OptError::InvalidMaxIter`] for `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Result of [`minimize`](super::minimize).
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    /// Best θ seen by the solver.
    pub theta_hat: Theta,
    /// Negative log-likelihood at `theta_hat`.
    pub nll: f64,
    /// `true` only when a convergence criterion was met; see
    /// [`is_converged`].
    pub converged: bool,
    /// argmin's description of why the run stopped.
    pub status: String,
    pub iterations: usize,
    /// argmin counters such as `cost_count` and `gradient_count`.
    pub fn_evals: FnEvalMap,
    /// ‖∇nll‖ at the last iterate, when argmin kept a gradient.
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Normalize the final solver state.
    ///
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::InvalidThetaHat`] when
    ///   θ̂ is absent or not finite.
    /// - [`OptError::NonFiniteCost`] when `nll` is not finite.
    pub fn new(
        theta_hat: Option<Theta>, nll: f64, status: &TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat)?;
        validate_value(nll)?;
        Ok(Self {
            theta_hat,
            nll,
            converged: is_converged(status),
            status: status.to_string(),
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }
}

/// Whether a run stopped because it reached an optimum.
///
/// L-BFGS reports its gradient and cost-change tolerances as
/// `SolverConverged`. A line-search failure surfaces as `SolverExit` and,
/// like an iteration cap or an interrupt, is not convergence.
pub fn is_converged(status: &TerminationStatus) -> bool {
    matches!(
        status,
        TerminationStatus::Terminated(
            TerminationReason::SolverConverged | TerminationReason::TargetCostReached
        )
    )
}
