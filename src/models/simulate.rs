//! models::simulate — synthetic data from known parameters.
//!
//! Each generator draws from the model's own data-generating process with a
//! seeded `StdRng`, so the same seed always yields the same data. The
//! outputs are validated data bundles ready for `nll`, fitting and
//! `sdreport`, plus the latent values where the model has them.
use rand::{Rng, SeedableRng, distributions::Distribution, rngs::StdRng};
use statrs::distribution::Normal;

use crate::models::{
    ar1_regression::AR1Data,
    errors::{ModelError, ModelResult},
    hierarchical::HierarchicalData,
    state_space::StateSpaceData,
};

/// Simulated hierarchical data with the site means that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchicalSim {
    pub data: HierarchicalData,
    pub site_mean: Vec<f64>,
}

/// Simulated state-space data with the latent path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpaceSim {
    pub data: StateSpaceData,
    pub states: Vec<f64>,
}

/// Draw `y_t = b0 + b1·x_t + e_t` with stationary AR(1) errors.
///
/// `e_0 ~ N(0, sd)` and `e_t = phi·e_{t-1} + u_t` with
/// `u_t ~ N(0, sd·sqrt(1 - phi²))`, so every `e_t` has marginal sd `sd`.
///
/// # Errors
/// - [`ModelError::InvalidSimulationParam`] unless `|phi| < 1` and `sd > 0`
///   (both finite).
/// - [`ModelError::EmptySeries`] if `x` is empty.
pub fn simulate_ar1(
    x: &[f64], b0: f64, b1: f64, phi: f64, sd: f64, seed: u64,
) -> ModelResult<AR1Data> {
    if !(phi.abs() < 1.0) {
        return Err(ModelError::InvalidSimulationParam {
            name: "phi",
            value: phi,
            reason: "must lie strictly inside (-1, 1)",
        });
    }
    check_sd("sd", sd)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let z = Normal::new(0.0, 1.0)?;
    let innov_sd = sd * (1.0 - phi * phi).sqrt();

    let mut y = Vec::with_capacity(x.len());
    let mut e = 0.0;
    for (t, &x_t) in x.iter().enumerate() {
        e = if t == 0 {
            sd * draw(&z, &mut rng)
        } else {
            phi * e + innov_sd * draw(&z, &mut rng)
        };
        y.push(b0 + b1 * x_t + e);
    }
    AR1Data::new(x.to_vec(), y)
}

/// Draw `n_site` site means around `global_mean` and `obs_per_site`
/// observations around each, with observation sd `exp(log_sd_site)`.
///
/// Observations are grouped by site: site 0 first, then site 1, and so on.
///
/// # Errors
/// - [`ModelError::InvalidSimulationParam`] unless `sd_global > 0` and
///   `log_sd_site` is finite.
/// - [`ModelError::InvalidSiteCount`] if `n_site == 0`.
pub fn simulate_hierarchical(
    n_site: usize, obs_per_site: usize, global_mean: f64, sd_global: f64, log_sd_site: f64,
    seed: u64,
) -> ModelResult<HierarchicalSim> {
    check_sd("sd_global", sd_global)?;
    if !log_sd_site.is_finite() {
        return Err(ModelError::InvalidSimulationParam {
            name: "log_sd_site",
            value: log_sd_site,
            reason: "must be finite",
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let z = Normal::new(0.0, 1.0)?;
    let sd_site = log_sd_site.exp();

    let site_mean: Vec<f64> =
        (0..n_site).map(|_| global_mean + sd_global * draw(&z, &mut rng)).collect();
    let mut site_obs = Vec::with_capacity(n_site * obs_per_site);
    let mut site_index = Vec::with_capacity(n_site * obs_per_site);
    for (site, &mean) in site_mean.iter().enumerate() {
        for _ in 0..obs_per_site {
            site_obs.push(mean + sd_site * draw(&z, &mut rng));
            site_index.push(site);
        }
    }
    let data = HierarchicalData::new(site_obs, site_index, n_site, log_sd_site)?;
    Ok(HierarchicalSim { data, site_mean })
}

/// Draw a Gaussian random walk of length `n` starting at 0, observe it with
/// noise `sd_obs`, and drop each observation with probability `p_missing`.
///
/// # Errors
/// - [`ModelError::InvalidSimulationParam`] unless `sd_process > 0`,
///   `sd_obs > 0` and `0 <= p_missing <= 1`.
/// - [`ModelError::EmptySeries`] if `n == 0`.
pub fn simulate_state_space(
    n: usize, sd_process: f64, sd_obs: f64, p_missing: f64, seed: u64,
) -> ModelResult<StateSpaceSim> {
    check_sd("sd_process", sd_process)?;
    check_sd("sd_obs", sd_obs)?;
    if !(0.0..=1.0).contains(&p_missing) {
        return Err(ModelError::InvalidSimulationParam {
            name: "p_missing",
            value: p_missing,
            reason: "must lie in [0, 1]",
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let z = Normal::new(0.0, 1.0)?;

    let mut states = Vec::with_capacity(n);
    let mut observations = Vec::with_capacity(n);
    let mut state = 0.0;
    for t in 0..n {
        if t > 0 {
            state += sd_process * draw(&z, &mut rng);
        }
        let y = state + sd_obs * draw(&z, &mut rng);
        let observed = rng.gen::<f64>() >= p_missing;
        states.push(state);
        observations.push(observed.then_some(y));
    }
    let data = StateSpaceData::new(observations)?;
    Ok(StateSpaceSim { data, states })
}

fn draw(z: &Normal, rng: &mut StdRng) -> f64 {
    z.sample(rng)
}

fn check_sd(name: &'static str, sd: f64) -> ModelResult<()> {
    if !(sd.is_finite() && sd > 0.0) {
        return Err(ModelError::InvalidSimulationParam {
            name,
            value: sd,
            reason: "must be finite and strictly positive",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parameter validation for every generator.
    // - Seed determinism and output shapes.
    // - Loose moment checks on long AR(1) and hierarchical draws.
    // - Missingness extremes for the state-space generator.
    //
    // They intentionally DO NOT cover:
    // - Parameter recovery by fitting (see the fit driver and integration
    //   tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Out-of-range settings are rejected with the offending name.
    //
    // Given
    // -----
    // - phi = 1, sd = 0, sd_global = -1, p_missing = 1.5, sd_obs = NaN.
    //
    // Expect
    // ------
    // - InvalidSimulationParam naming each setting.
    fn generators_reject_invalid_settings() {
        let x = [0.0, 1.0];
        let name_of = |r: ModelResult<()>| match r {
            Err(ModelError::InvalidSimulationParam { name, .. }) => name,
            other => panic!("expected InvalidSimulationParam, got {other:?}"),
        };
        assert_eq!(name_of(simulate_ar1(&x, 0.0, 1.0, 1.0, 1.0, 1).map(|_| ())), "phi");
        assert_eq!(name_of(simulate_ar1(&x, 0.0, 1.0, 0.5, 0.0, 1).map(|_| ())), "sd");
        assert_eq!(
            name_of(simulate_hierarchical(2, 3, 0.0, -1.0, 0.0, 1).map(|_| ())),
            "sd_global"
        );
        assert_eq!(
            name_of(simulate_state_space(5, 1.0, 1.0, 1.5, 1).map(|_| ())),
            "p_missing"
        );
        assert_eq!(
            name_of(simulate_state_space(5, 1.0, f64::NAN, 0.0, 1).map(|_| ())),
            "sd_obs"
        );
    }

    #[test]
    // Purpose
    // -------
    // Structural errors come from the data constructors.
    //
    // Given
    // -----
    // - An empty regressor, zero sites and a zero-length walk.
    //
    // Expect
    // ------
    // - EmptySeries("y"), InvalidSiteCount, EmptySeries("observations").
    fn generators_surface_structural_errors() {
        assert_eq!(
            simulate_ar1(&[], 0.0, 1.0, 0.0, 1.0, 1),
            Err(ModelError::EmptySeries { what: "y" })
        );
        assert_eq!(
            simulate_hierarchical(0, 3, 0.0, 1.0, 0.0, 1),
            Err(ModelError::InvalidSiteCount { n_site: 0 })
        );
        assert_eq!(
            simulate_state_space(0, 1.0, 1.0, 0.0, 1),
            Err(ModelError::EmptySeries { what: "observations" })
        );
    }

    #[test]
    // Purpose
    // -------
    // The same seed reproduces the same data; another seed does not.
    //
    // Given
    // -----
    // - Two draws per generator with seed 42 and one with seed 43.
    //
    // Expect
    // ------
    // - Equal outputs for equal seeds, different AR(1) responses otherwise.
    fn generators_are_seed_deterministic() {
        let x: Vec<f64> = (0..20).map(f64::from).collect();
        let a = simulate_ar1(&x, 1.0, 0.5, 0.3, 0.8, 42).expect("ar1");
        let b = simulate_ar1(&x, 1.0, 0.5, 0.3, 0.8, 42).expect("ar1");
        let c = simulate_ar1(&x, 1.0, 0.5, 0.3, 0.8, 43).expect("ar1");
        assert_eq!(a, b);
        assert_ne!(a.y, c.y);

        let h1 = simulate_hierarchical(3, 4, 2.0, 1.0, -1.0, 42).expect("hier");
        let h2 = simulate_hierarchical(3, 4, 2.0, 1.0, -1.0, 42).expect("hier");
        assert_eq!(h1, h2);

        let s1 = simulate_state_space(30, 0.5, 0.2, 0.3, 42).expect("ss");
        let s2 = simulate_state_space(30, 0.5, 0.2, 0.3, 42).expect("ss");
        assert_eq!(s1, s2);
    }

    #[test]
    // Purpose
    // -------
    // A long AR(1) draw has roughly the requested marginal moments.
    //
    // Given
    // -----
    // - b0 = 2, b1 = 0, phi = 0.6, sd = 1.5, n = 20 000.
    //
    // Expect
    // ------
    // - Residual mean ≈ 0, sd ≈ 1.5 and lag-1 correlation ≈ 0.6 within
    //   loose Monte Carlo tolerances.
    fn ar1_draw_matches_stationary_moments() {
        // Arrange
        let x = vec![0.0; 20_000];

        // Act
        let data = simulate_ar1(&x, 2.0, 0.0, 0.6, 1.5, 7).expect("ar1");

        // Assert
        let e: Vec<f64> = data.y.iter().map(|y| y - 2.0).collect();
        let n = e.len() as f64;
        let mean = e.iter().sum::<f64>() / n;
        let var = e.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let lag = e.windows(2).map(|w| (w[0] - mean) * (w[1] - mean)).sum::<f64>() / n;
        assert!(mean.abs() < 0.1, "mean = {mean}");
        assert!((var.sqrt() - 1.5).abs() < 0.1, "sd = {}", var.sqrt());
        assert!((lag / var - 0.6).abs() < 0.05, "rho = {}", lag / var);
    }

    #[test]
    // Purpose
    // -------
    // Hierarchical output is grouped by site and centred on its site mean.
    //
    // Given
    // -----
    // - 4 sites, 500 observations each, sd_site = e^-2.
    //
    // Expect
    // ------
    // - Site indices run 0,0,…,1,1,…; each site's sample mean is within
    //   0.05 of its simulated site mean.
    fn hierarchical_draw_is_grouped_by_site() {
        // Arrange / Act
        let sim = simulate_hierarchical(4, 500, 10.0, 3.0, -2.0, 11).expect("hier");

        // Assert
        assert_eq!(sim.site_mean.len(), 4);
        assert_eq!(sim.data.site_obs.len(), 2000);
        assert_eq!(sim.data.site_index[499], 0);
        assert_eq!(sim.data.site_index[500], 1);
        for (site, &mean) in sim.site_mean.iter().enumerate() {
            let obs = &sim.data.site_obs[site * 500..(site + 1) * 500];
            let avg = obs.iter().sum::<f64>() / 500.0;
            assert!((avg - mean).abs() < 0.05, "site {site}: {avg} vs {mean}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Missingness probabilities 0 and 1 give fully observed and fully
    // missing series; the latent walk starts at 0.
    //
    // Given
    // -----
    // - n = 50 with p_missing = 0 and p_missing = 1.
    //
    // Expect
    // ------
    // - n_missing = 0 and 50 respectively; states[0] = 0.
    fn state_space_missingness_extremes() {
        let full = simulate_state_space(50, 1.0, 0.5, 0.0, 3).expect("ss");
        let none = simulate_state_space(50, 1.0, 0.5, 1.0, 3).expect("ss");
        assert_eq!(full.data.n_missing(), 0);
        assert_eq!(none.data.n_missing(), 50);
        assert_eq!(full.states.len(), 50);
        assert_eq!(full.states[0], 0.0);
        assert_eq!(full.states, none.states);
    }
}
