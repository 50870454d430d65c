//! rust_nll_models — negative log-likelihood models with exact sensitivities
//! and Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the models to Python via the `_rust_nll_models` extension module.
//! When the `python-bindings` feature is enabled, this module defines the
//! Python-facing classes and the `models` submodule.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`ad`, `models`, `optimization`,
//!   `inference`) as the public crate surface.
//! - Wrap each model together with its validated data in a `#[pyclass]` that
//!   evaluates the objective, its gradient and Hessian, the report, a fit
//!   and an sdreport.
//! - Register the `models` submodule under `rust_nll_models` so dotted
//!   imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion and error mapping.
//! - Data passed from Python is validated once, at construction of the
//!   wrapper; every later call reuses the validated bundle.
//!
//! Conventions
//! -----------
//! - θ is always the unconstrained parameter vector in the model's
//!   documented order.
//! - Missing observations arrive as `None` in a sequence or as `NaN` in a
//!   float array.
//! - [`ModelError`](crate::models::ModelError) and
//!   [`OptError`](crate::optimization::errors::OptError) become `ValueError`
//!   at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`models`], [`ad`] and [`inference`]
//!   directly and can ignore the items guarded by `python-bindings`.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_models_pipeline.rs`.

pub mod ad;
pub mod inference;
pub mod models;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    ad::derivatives::{gradient, value},
    inference::{hessian::objective_hessian, sdreport::SdReport},
    models::{
        AR1Data, AR1RegressionModel, FitResult, HierarchicalData, HierarchicalMeanModel,
        MissingDataStateSpaceModel, StateSpaceData, fit::params, fit_model, simulate_ar1,
        simulate_hierarchical, simulate_state_space, traits::NegLogLik,
    },
    optimization::loglik_optimizer::Theta,
    utils::{
        extract_f64_vec, extract_hessian_method, extract_mle_opts, extract_observations,
        extract_theta, matrix_to_rows, report_to_pairs,
    },
};

/// FitOutcome — result of a `fit` call exposed to Python.
///
/// Holds the optimizer diagnostics, the objective at θ̂ and the report
/// evaluated there. Constructed only by the model wrappers.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_nll_models.models")]
pub struct FitOutcome {
    pub inner: FitResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl FitOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat().to_vec()
    }

    /// Negative log-likelihood at `theta_hat`.
    #[getter]
    pub fn nll(&self) -> f64 {
        self.inner.nll()
    }

    /// `False` when the run hit its iteration cap or a line search gave up;
    /// `theta_hat` is then the best point seen, not an optimum.
    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged()
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.outcome.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.outcome.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.outcome.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.outcome.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[getter]
    pub fn report(&self) -> Vec<(String, Vec<f64>)> {
        report_to_pairs(&self.inner.report)
    }
}

/// SdReportResult — parameter and report standard errors exposed to Python.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_nll_models.models")]
pub struct SdReportResult {
    pub inner: SdReport,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SdReportResult {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn param_names(&self) -> Vec<String> {
        self.inner.param_names.clone()
    }

    #[getter]
    pub fn param_std_errors(&self) -> Vec<f64> {
        self.inner.param_std_errors.to_vec()
    }

    #[getter]
    pub fn covariance(&self) -> Vec<Vec<f64>> {
        matrix_to_rows(&self.inner.covariance)
    }

    #[getter]
    pub fn pd_hessian(&self) -> bool {
        self.inner.pd_hessian
    }

    /// `(name, values, std_errors)` for every reported quantity, in report
    /// order.
    #[getter]
    pub fn reported(&self) -> Vec<(String, Vec<f64>, Vec<f64>)> {
        self.inner
            .reported
            .iter()
            .map(|e| (e.name.to_string(), e.values.clone(), e.std_errors.clone()))
            .collect()
    }
}

/// AR1Regression — Python wrapper for the linear regression with AR(1)
/// errors.
///
/// Constructed from Python via `AR1Regression(x, y)` with equal-length,
/// non-empty float arrays. θ = `[b0, b1, phi_raw, log_sd]`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_nll_models.models")]
pub struct AR1Regression {
    pub model: AR1RegressionModel,
    pub data: AR1Data,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl AR1Regression {
    #[new]
    #[pyo3(text_signature = "(x, y, /)")]
    pub fn new<'py>(
        py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
    ) -> PyResult<Self> {
        let data = AR1Data::new(extract_f64_vec(py, x, "x")?, extract_f64_vec(py, y, "y")?)?;
        Ok(Self { model: AR1RegressionModel, data })
    }

    /// Simulate a series from known parameters and wrap it.
    #[staticmethod]
    #[pyo3(
        signature = (x, b0, b1, phi, sd, seed = 0),
        text_signature = "(x, b0, b1, phi, sd, /, seed=0)"
    )]
    pub fn simulate<'py>(
        py: Python<'py>, x: &Bound<'py, PyAny>, b0: f64, b1: f64, phi: f64, sd: f64, seed: u64,
    ) -> PyResult<Self> {
        let x = extract_f64_vec(py, x, "x")?;
        let data = simulate_ar1(&x, b0, b1, phi, sd, seed)?;
        Ok(Self { model: AR1RegressionModel, data })
    }

    #[getter]
    pub fn param_names(&self) -> Vec<String> {
        self.model.param_names(&self.data)
    }

    /// Moment-based starting point for `fit`.
    pub fn initial_theta(&self) -> Vec<f64> {
        self.model.initial_theta(&self.data).to_vec()
    }

    pub fn nll<'py>(&self, py: Python<'py>, theta: &Bound<'py, PyAny>) -> PyResult<f64> {
        eval_nll(&self.model, &extract_theta(py, theta)?, &self.data)
    }

    pub fn gradient<'py>(&self, py: Python<'py>, theta: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        eval_gradient(&self.model, &extract_theta(py, theta)?, &self.data)
    }

    #[pyo3(signature = (theta, method = None), text_signature = "(self, theta, /, method='exact')")]
    pub fn hessian<'py>(
        &self, py: Python<'py>, theta: &Bound<'py, PyAny>, method: Option<&str>,
    ) -> PyResult<Vec<Vec<f64>>> {
        eval_hessian(&self.model, &extract_theta(py, theta)?, &self.data, method)
    }

    pub fn report<'py>(
        &self, py: Python<'py>, theta: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<(String, Vec<f64>)>> {
        eval_report(&self.model, &extract_theta(py, theta)?, &self.data)
    }

    /// Fit by L-BFGS; `theta0` defaults to `initial_theta()`.
    #[pyo3(
        signature = (
            theta0 = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = None,
        ),
        text_signature = "(self, /, theta0=None, tol_grad=None, tol_cost=None, max_iter=None, \
                          line_searcher='MoreThuente', lbfgs_mem=None, verbose=False)"
    )]
    pub fn fit<'py>(
        &self, py: Python<'py>, theta0: Option<&Bound<'py, PyAny>>, tol_grad: Option<f64>,
        tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
        lbfgs_mem: Option<usize>, verbose: Option<bool>,
    ) -> PyResult<FitOutcome> {
        let theta0 = match theta0 {
            Some(raw) => extract_theta(py, raw)?,
            None => self.model.initial_theta(&self.data),
        };
        let opts =
            extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, verbose)?;
        let inner = fit_model(&self.model, theta0, &self.data, &opts)?;
        Ok(FitOutcome { inner })
    }

    #[pyo3(signature = (theta, method = None), text_signature = "(self, theta, /, method='exact')")]
    pub fn sdreport<'py>(
        &self, py: Python<'py>, theta: &Bound<'py, PyAny>, method: Option<&str>,
    ) -> PyResult<SdReportResult> {
        eval_sdreport(&self.model, &extract_theta(py, theta)?, &self.data, method)
    }
}

/// HierarchicalMean — Python wrapper for site means drawn around a global
/// mean.
///
/// Constructed via `HierarchicalMean(site_obs, site_index, n_site,
/// log_sd_site)`. θ = `[site_mean_0, …, site_mean_{n_site-1}, global_mean,
/// log_sd_global]`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_nll_models.models")]
pub struct HierarchicalMean {
    pub model: HierarchicalMeanModel,
    pub data: HierarchicalData,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl HierarchicalMean {
    #[new]
    #[pyo3(text_signature = "(site_obs, site_index, n_site, log_sd_site, /)")]
    pub fn new<'py>(
        py: Python<'py>, site_obs: &Bound<'py, PyAny>, site_index: Vec<usize>, n_site: usize,
        log_sd_site: f64,
    ) -> PyResult<Self> {
        let site_obs = extract_f64_vec(py, site_obs, "site_obs")?;
        let data = HierarchicalData::new(site_obs, site_index, n_site, log_sd_site)?;
        Ok(Self { model: HierarchicalMeanModel, data })
    }

    /// Simulate a data set; returns the wrapper and the true site means.
    #[staticmethod]
    #[pyo3(
        signature = (n_site, obs_per_site, global_mean, sd_global, log_sd_site, seed = 0),
        text_signature = "(n_site, obs_per_site, global_mean, sd_global, log_sd_site, /, seed=0)"
    )]
    pub fn simulate(
        n_site: usize, obs_per_site: usize, global_mean: f64, sd_global: f64, log_sd_site: f64,
        seed: u64,
    ) -> PyResult<(Self, Vec<f64>)> {
        let sim = simulate_hierarchical(
            n_site,
            obs_per_site,
            global_mean,
            sd_global,
            log_sd_site,
            seed,
        )?;
        Ok((Self { model: HierarchicalMeanModel, data: sim.data }, sim.site_mean))
    }

    #[getter]
    pub fn param_names(&self) -> Vec<String> {
        self.model.param_names(&self.data)
    }

    pub fn nll<'py>(&self, py: Python<'py>, theta: &Bound<'py, PyAny>) -> PyResult<f64> {
        eval_nll(&self.model, &extract_theta(py, theta)?, &self.data)
    }

    pub fn gradient<'py>(&self, py: Python<'py>, theta: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        eval_gradient(&self.model, &extract_theta(py, theta)?, &self.data)
    }

    #[pyo3(signature = (theta, method = None), text_signature = "(self, theta, /, method='exact')")]
    pub fn hessian<'py>(
        &self, py: Python<'py>, theta: &Bound<'py, PyAny>, method: Option<&str>,
    ) -> PyResult<Vec<Vec<f64>>> {
        eval_hessian(&self.model, &extract_theta(py, theta)?, &self.data, method)
    }

    pub fn report<'py>(
        &self, py: Python<'py>, theta: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<(String, Vec<f64>)>> {
        eval_report(&self.model, &extract_theta(py, theta)?, &self.data)
    }

    #[pyo3(
        signature = (
            theta0,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = None,
        ),
        text_signature = "(self, theta0, /, tol_grad=None, tol_cost=None, max_iter=None, \
                          line_searcher='MoreThuente', lbfgs_mem=None, verbose=False)"
    )]
    pub fn fit<'py>(
        &self, py: Python<'py>, theta0: &Bound<'py, PyAny>, tol_grad: Option<f64>,
        tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
        lbfgs_mem: Option<usize>, verbose: Option<bool>,
    ) -> PyResult<FitOutcome> {
        let opts =
            extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, verbose)?;
        let inner = fit_model(&self.model, extract_theta(py, theta0)?, &self.data, &opts)?;
        Ok(FitOutcome { inner })
    }

    #[pyo3(signature = (theta, method = None), text_signature = "(self, theta, /, method='exact')")]
    pub fn sdreport<'py>(
        &self, py: Python<'py>, theta: &Bound<'py, PyAny>, method: Option<&str>,
    ) -> PyResult<SdReportResult> {
        eval_sdreport(&self.model, &extract_theta(py, theta)?, &self.data, method)
    }
}

/// MissingDataStateSpace — Python wrapper for the Gaussian random walk
/// observed with noise and gaps.
///
/// Constructed via `MissingDataStateSpace(observations)`, where missing
/// entries are `None` or `NaN`. θ = `[log_sd_process, log_sd_obs,
/// estimate_0, …, estimate_{n-1}]`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_nll_models.models")]
pub struct MissingDataStateSpace {
    pub model: MissingDataStateSpaceModel,
    pub data: StateSpaceData,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MissingDataStateSpace {
    #[new]
    #[pyo3(text_signature = "(observations, /)")]
    pub fn new<'py>(py: Python<'py>, observations: &Bound<'py, PyAny>) -> PyResult<Self> {
        let data = extract_observations(py, observations)?;
        Ok(Self { model: MissingDataStateSpaceModel, data })
    }

    /// Simulate a series; returns the wrapper and the latent states.
    #[staticmethod]
    #[pyo3(
        signature = (n, sd_process, sd_obs, p_missing = 0.0, seed = 0),
        text_signature = "(n, sd_process, sd_obs, /, p_missing=0.0, seed=0)"
    )]
    pub fn simulate(
        n: usize, sd_process: f64, sd_obs: f64, p_missing: f64, seed: u64,
    ) -> PyResult<(Self, Vec<f64>)> {
        let sim = simulate_state_space(n, sd_process, sd_obs, p_missing, seed)?;
        Ok((Self { model: MissingDataStateSpaceModel, data: sim.data }, sim.states))
    }

    #[getter]
    pub fn param_names(&self) -> Vec<String> {
        self.model.param_names(&self.data)
    }

    #[getter]
    pub fn observations(&self) -> Vec<Option<f64>> {
        self.data.observations.clone()
    }

    pub fn nll<'py>(&self, py: Python<'py>, theta: &Bound<'py, PyAny>) -> PyResult<f64> {
        eval_nll(&self.model, &extract_theta(py, theta)?, &self.data)
    }

    pub fn gradient<'py>(&self, py: Python<'py>, theta: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        eval_gradient(&self.model, &extract_theta(py, theta)?, &self.data)
    }

    #[pyo3(signature = (theta, method = None), text_signature = "(self, theta, /, method='exact')")]
    pub fn hessian<'py>(
        &self, py: Python<'py>, theta: &Bound<'py, PyAny>, method: Option<&str>,
    ) -> PyResult<Vec<Vec<f64>>> {
        eval_hessian(&self.model, &extract_theta(py, theta)?, &self.data, method)
    }

    pub fn report<'py>(
        &self, py: Python<'py>, theta: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<(String, Vec<f64>)>> {
        eval_report(&self.model, &extract_theta(py, theta)?, &self.data)
    }

    #[pyo3(
        signature = (
            theta0,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = None,
        ),
        text_signature = "(self, theta0, /, tol_grad=None, tol_cost=None, max_iter=None, \
                          line_searcher='MoreThuente', lbfgs_mem=None, verbose=False)"
    )]
    pub fn fit<'py>(
        &self, py: Python<'py>, theta0: &Bound<'py, PyAny>, tol_grad: Option<f64>,
        tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
        lbfgs_mem: Option<usize>, verbose: Option<bool>,
    ) -> PyResult<FitOutcome> {
        let opts =
            extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, verbose)?;
        let inner = fit_model(&self.model, extract_theta(py, theta0)?, &self.data, &opts)?;
        Ok(FitOutcome { inner })
    }

    #[pyo3(signature = (theta, method = None), text_signature = "(self, theta, /, method='exact')")]
    pub fn sdreport<'py>(
        &self, py: Python<'py>, theta: &Bound<'py, PyAny>, method: Option<&str>,
    ) -> PyResult<SdReportResult> {
        eval_sdreport(&self.model, &extract_theta(py, theta)?, &self.data, method)
    }
}

// ---- Shared dispatch for the wrappers ----------------------------------------

#[cfg(feature = "python-bindings")]
fn eval_nll<M: NegLogLik>(model: &M, theta: &Theta, data: &M::Data) -> PyResult<f64> {
    Ok(value(model, params(theta)?, data)?)
}

#[cfg(feature = "python-bindings")]
fn eval_gradient<M: NegLogLik>(model: &M, theta: &Theta, data: &M::Data) -> PyResult<Vec<f64>> {
    Ok(gradient(model, params(theta)?, data)?.to_vec())
}

#[cfg(feature = "python-bindings")]
fn eval_hessian<M: NegLogLik>(
    model: &M, theta: &Theta, data: &M::Data, method: Option<&str>,
) -> PyResult<Vec<Vec<f64>>> {
    let hess = objective_hessian(model, theta, data, extract_hessian_method(method)?)?;
    Ok(matrix_to_rows(&hess))
}

#[cfg(feature = "python-bindings")]
fn eval_report<M: NegLogLik>(
    model: &M, theta: &Theta, data: &M::Data,
) -> PyResult<Vec<(String, Vec<f64>)>> {
    Ok(report_to_pairs(&model.report(params(theta)?, data)?))
}

#[cfg(feature = "python-bindings")]
fn eval_sdreport<M: NegLogLik>(
    model: &M, theta: &Theta, data: &M::Data, method: Option<&str>,
) -> PyResult<SdReportResult> {
    let inner = crate::inference::sdreport::sdreport(
        model,
        theta,
        data,
        extract_hessian_method(method)?,
    )?;
    Ok(SdReportResult { inner })
}

/// _rust_nll_models — PyO3 module initializer for the Python extension.
///
/// Creates the `models` submodule, attaches it to the parent module and
/// registers it in `sys.modules` as `rust_nll_models.models` so it is
/// importable by dotted path.
///
/// # Errors
/// - `PyErr` if creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_nll_models<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let models_mod = PyModule::new(_py, "models")?;
    register_models(_py, m, &models_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_nll_models.models", models_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn register_models<'py>(
    _py: Python, rust_nll_models: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<AR1Regression>()?;
    m.add_class::<HierarchicalMean>()?;
    m.add_class::<MissingDataStateSpace>()?;
    m.add_class::<FitOutcome>()?;
    m.add_class::<SdReportResult>()?;
    rust_nll_models.add_submodule(m)?;
    Ok(())
}
