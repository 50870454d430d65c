//! loglik_optimizer::run — drive an argmin L-BFGS solver to completion.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{Grad, MLEOptions, Objective, OptimOutcome, Theta, adapter::ArgMinAdapter},
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run `solver` from `theta0` and summarize the best iterate.
///
/// The best cost argmin tracked is the nll itself, so it goes into
/// [`OptimOutcome::nll`] untouched. `opts.tols.max_iter` caps the run; with
/// `obs_slog` and `opts.verbose`, each iteration is logged through slog.
///
/// # Errors
/// - Model, non-finite cost and line-search errors raised during the run.
/// - An absent or non-finite best point.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: Objective,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let executor = Executor::new(problem, solver).configure(|state| {
        let state = state.param(theta0);
        match opts.tols.max_iter {
            Some(max_iter) => state.max_iters(max_iter as u64),
            None => state,
        }
    });
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor.add_observer(observer, argmin::core::observers::ObserverMode::Always)
    } else {
        executor
    };

    let mut state = executor.run()?.state().clone();
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        state.get_best_cost(),
        state.get_termination_status(),
        state.get_iter(),
        state.get_func_counts().clone(),
        grad,
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F: Objective>(
    theta0: &Theta, problem: &ArgMinAdapter<'_, F>,
) -> OptResult<()> {
    let nll0 = problem.cost(theta0)?;
    let grad = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    match grad {
        Some(norm) => eprintln!("init: nll(theta0) = {nll0:.6}, ||grad|| = {norm:.6}"),
        None => eprintln!("init: nll(theta0) = {nll0:.6}"),
    }
    Ok(())
}
