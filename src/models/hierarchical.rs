//! models::hierarchical — two-level Gaussian site-mean model.
//!
//! Site means are drawn around a global mean; observations are drawn
//! around the mean of their site. θ layout:
//! `[site_mean_0 .. site_mean_{n_site-1}, global_mean, log_sd_global]`.
//!
//! The observation scale `log_sd_site` is fixed data. Every site index is
//! checked against `n_site` when [`HierarchicalData`] is built, so the
//! objective never indexes out of range.
use crate::{
    ad::scalar::Scalar,
    models::{
        density::normal_nll,
        errors::{ModelError, ModelResult},
        traits::{NegLogLik, Report},
    },
};

/// Observations, their site assignment and the fixed observation scale.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchicalData {
    pub site_obs: Vec<f64>,
    pub site_index: Vec<usize>,
    pub n_site: usize,
    pub log_sd_site: f64,
}

impl HierarchicalData {
    /// Validate and bundle the data.
    ///
    /// # Errors
    /// - [`ModelError::InvalidSiteCount`] if `n_site == 0`.
    /// - [`ModelError::LengthMismatch`] if `site_index.len() != site_obs.len()`.
    /// - [`ModelError::SiteIndexOutOfRange`] for the first index `>= n_site`.
    pub fn new(
        site_obs: Vec<f64>, site_index: Vec<usize>, n_site: usize, log_sd_site: f64,
    ) -> ModelResult<Self> {
        if n_site == 0 {
            return Err(ModelError::InvalidSiteCount { n_site });
        }
        if site_index.len() != site_obs.len() {
            return Err(ModelError::LengthMismatch {
                what: "site_index",
                expected: site_obs.len(),
                actual: site_index.len(),
            });
        }
        if let Some((index, &site)) = site_index.iter().enumerate().find(|(_, s)| **s >= n_site) {
            return Err(ModelError::SiteIndexOutOfRange { index, site, n_site });
        }
        Ok(Self { site_obs, site_index, n_site, log_sd_site })
    }
}

/// Site means around a global mean, observations around their site mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchicalMeanModel;

impl NegLogLik for HierarchicalMeanModel {
    type Data = HierarchicalData;

    fn n_params(&self, data: &HierarchicalData) -> usize {
        data.n_site + 2
    }

    fn param_names(&self, data: &HierarchicalData) -> Vec<String> {
        let mut names: Vec<String> = (0..data.n_site).map(|s| format!("site_mean[{s}]")).collect();
        names.push("global_mean".to_string());
        names.push("log_sd_global".to_string());
        names
    }

    fn nll<T: Scalar>(&self, theta: &[T], data: &HierarchicalData) -> ModelResult<T> {
        self.check_theta(theta.len(), data)?;
        let (site_mean, rest) = theta.split_at(data.n_site);
        let global_mean = rest[0];
        let sd_global = rest[1].exp();
        let sd_site = T::constant(data.log_sd_site.exp());

        let mut nll = T::zero();
        for &mean in site_mean {
            nll += normal_nll(mean, global_mean, sd_global);
        }
        for (&obs, &site) in data.site_obs.iter().zip(&data.site_index) {
            nll += normal_nll(T::constant(obs), site_mean[site], sd_site);
        }
        Ok(nll)
    }

    fn report<T: Scalar>(&self, theta: &[T], data: &HierarchicalData) -> ModelResult<Report<T>> {
        self.check_theta(theta.len(), data)?;
        let n = data.n_site;
        let mut report = Report::new();
        report.push_scalar("global_mean", theta[n]);
        report.push_scalar("sd_global", theta[n + 1].exp());
        report.push_vector("site_mean", theta[..n].to_vec());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad::dual::Dual;
    use approx::assert_relative_eq;
    use statrs::distribution::{Continuous, Normal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Site-index validation at construction.
    // - The symmetric two-site example and the statrs density oracle.
    // - The single-site reduction and pinning as sd_site → 0.
    // - Determinism and the report layout.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Out-of-range site indices are rejected before any evaluation.
    //
    // Given
    // -----
    // - n_site = 2 with an index 2 at position 1; n_site = 0; short index vector.
    //
    // Expect
    // ------
    // - SiteIndexOutOfRange { index: 1, site: 2, n_site: 2 }, InvalidSiteCount,
    //   LengthMismatch.
    fn hierarchical_rejects_bad_site_indices() {
        assert_eq!(
            HierarchicalData::new(vec![1.0, 2.0, 3.0], vec![0, 2, 1], 2, 0.0),
            Err(ModelError::SiteIndexOutOfRange { index: 1, site: 2, n_site: 2 })
        );
        assert_eq!(
            HierarchicalData::new(vec![], vec![], 0, 0.0),
            Err(ModelError::InvalidSiteCount { n_site: 0 })
        );
        assert_eq!(
            HierarchicalData::new(vec![1.0, 2.0], vec![0], 1, 0.0),
            Err(ModelError::LengthMismatch { what: "site_index", expected: 2, actual: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the symmetric two-site example.
    //
    // Given
    // -----
    // - n_site = 2, no observations, site_mean = [0, 10], global_mean = 5,
    //   sd_global = 5.
    //
    // Expect
    // ------
    // - Objective = 2·(-ln N(0; 5, 5)) and the two site terms agree with statrs.
    fn hierarchical_two_site_example_is_symmetric() {
        // Arrange
        let data = HierarchicalData::new(vec![], vec![], 2, 0.0).expect("valid data");
        let theta = [0.0, 10.0, 5.0, 5.0_f64.ln()];
        let oracle = Normal::new(5.0, 5.0).expect("valid normal");

        // Act
        let nll = HierarchicalMeanModel.nll(&theta, &data).expect("nll");

        // Assert
        assert_relative_eq!(oracle.ln_pdf(0.0), oracle.ln_pdf(10.0), epsilon = 1e-15);
        assert_relative_eq!(nll, -2.0 * oracle.ln_pdf(0.0), epsilon = 1e-12);
        let flipped = HierarchicalMeanModel.nll(&[10.0, 0.0, 5.0, 5.0_f64.ln()], &data);
        assert_relative_eq!(flipped.expect("nll"), nll, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Check the observation terms against statrs for a mixed assignment.
    //
    // Given
    // -----
    // - Three sites, five observations, log_sd_site = ln 0.5.
    //
    // Expect
    // ------
    // - Objective equals the explicit sum of statrs negative log-densities.
    fn hierarchical_matches_explicit_sum() {
        // Arrange
        let obs = vec![1.1, 0.9, 4.2, 3.8, -2.0];
        let idx = vec![0, 0, 1, 1, 2];
        let data = HierarchicalData::new(obs.clone(), idx.clone(), 3, 0.5_f64.ln()).expect("data");
        let site_mean = [1.0, 4.0, -1.5];
        let theta = [1.0, 4.0, -1.5, 0.8, 0.2];
        let g = Normal::new(0.8, 0.2_f64.exp()).expect("valid normal");

        // Act
        let nll = HierarchicalMeanModel.nll(&theta, &data).expect("nll");

        // Assert
        let mut expected: f64 = site_mean.iter().map(|&m| -g.ln_pdf(m)).sum();
        for (&y, &s) in obs.iter().zip(&idx) {
            expected -= Normal::new(site_mean[s], 0.5).expect("valid normal").ln_pdf(y);
        }
        assert_relative_eq!(nll, expected, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // With one site the model is a two-level normal whose site-mean mode is
    // the precision-weighted average, pinned to the observation mean as
    // sd_site → 0.
    //
    // Given
    // -----
    // - n_site = 1, observations [2.0, 2.4, 2.2], global_mean = 0,
    //   sd_global = 1, sd_site ∈ {1, 0.1, 1e-3}.
    //
    // Expect
    // ------
    // - ∂nll/∂site_mean vanishes at the closed-form mode, and the mode
    //   approaches the observation mean 2.2.
    fn hierarchical_single_site_pins_to_observations() {
        let obs = vec![2.0, 2.4, 2.2];
        let m = obs.len() as f64;
        let y_bar = obs.iter().sum::<f64>() / m;
        let mut last_gap = f64::INFINITY;
        for &sd_site in &[1.0_f64, 0.1, 1e-3] {
            // Arrange
            let data =
                HierarchicalData::new(obs.clone(), vec![0; 3], 1, sd_site.ln()).expect("data");
            let prec_obs = m / (sd_site * sd_site);
            let mode = prec_obs * y_bar / (prec_obs + 1.0);
            let theta = [Dual::variable(mode), Dual::constant(0.0), Dual::constant(0.0)];

            // Act
            let nll = HierarchicalMeanModel.nll(&theta, &data).expect("nll");

            // Assert
            assert_relative_eq!(nll.eps, 0.0, epsilon = 1e-6);
            let gap = (mode - y_bar).abs();
            assert!(gap < last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Evaluation is deterministic and the report follows the declared layout.
    //
    // Given
    // -----
    // - Two sites with observations and θ = [1, 2, 1.5, ln 2].
    //
    // Expect
    // ------
    // - Bit-identical repeated nll; report global_mean, sd_global = 2,
    //   site_mean = [1, 2].
    fn hierarchical_determinism_and_report() {
        // Arrange
        let data = HierarchicalData::new(vec![0.7, 2.3], vec![0, 1], 2, 0.0).expect("data");
        let theta = [1.0, 2.0, 1.5, 2.0_f64.ln()];

        // Act
        let a = HierarchicalMeanModel.nll(&theta, &data).expect("nll");
        let b = HierarchicalMeanModel.nll(&theta, &data).expect("nll");
        let report = HierarchicalMeanModel.report(&theta, &data).expect("report");

        // Assert
        assert_eq!(a.to_bits(), b.to_bits());
        let names: Vec<&str> = report.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["global_mean", "sd_global", "site_mean"]);
        assert_eq!(report.get("global_mean"), Some(&[1.5][..]));
        assert_relative_eq!(report.get("sd_global").expect("sd")[0], 2.0, epsilon = 1e-15);
        assert_eq!(report.get("site_mean"), Some(&[1.0, 2.0][..]));
        assert_eq!(
            HierarchicalMeanModel.param_names(&data),
            vec!["site_mean[0]", "site_mean[1]", "global_mean", "log_sd_global"]
        );
    }
}
