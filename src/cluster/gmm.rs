//! Gaussian Mixture Model estimation under missing data.
//!
//! # The Probabilistic Model
//!
//! Each row is drawn from one of K isotropic Gaussians:
//!
//! ```text
//! P(x) = Σₖ pₖ × N(x | μₖ, σ²ₖ I)
//! ```
//!
//! Where:
//! - pₖ = mixing weight of component k
//! - μₖ = mean of component k (one value per dimension)
//! - σ²ₖ = a single variance shared by every dimension of component k
//!
//! # Partial Observability
//!
//! A row only constrains the dimensions it actually observes. The Gaussian is
//! isotropic, so marginalizing out the missing dimensions just drops them: the
//! density of a row is evaluated on its observed coordinates with `d` equal to
//! the number of observed coordinates. A row with nothing observed carries no
//! evidence and its posterior is the prior `p`.
//!
//! # The EM Algorithm
//!
//! **E-step** (in log-space):
//! ```text
//! log γₙₖ ∝ log(pₖ + ε) + log N(xₙ,obs | μₖ,obs, σ²ₖ)
//! ```
//! normalized with log-sum-exp. The normalizer of each row is its
//! log-likelihood contribution.
//!
//! **M-step**, using observed entries only:
//! - pₖ = Σₙ γₙₖ / Σₙₖ γₙₖ
//! - μₖⱼ = Σₙ γₙₖ xₙⱼ / Σₙ γₙₖ  over rows observing j (kept when the denominator is ≤ 1)
//! - σ²ₖ = Σₙ γₙₖ ‖xₙ,obs − μₖ,obs‖² / Σₙ γₙₖ |obsₙ|  (floored at the minimum variance)
//!
//! # Stopping Rule
//!
//! With `lL` the E-step log-likelihood of the current iteration and `oldlL` the
//! previous one, iteration stops once `lL − oldlL ≤ tol·|lL|`. The reported
//! log-likelihood and BIC are those of that final E-step, i.e. of the parameters
//! *before* the last M-step, while the returned parameters are *after* it.
//! Model selection across K relies on this convention, so it is kept as is.
//!
//! # Failure Modes
//!
//! - **Local optima**: EM converges to local maxima; initialization matters
//! - **Collapsing components**: a component can lose all support; the weight
//!   guard ε keeps its log-prior finite and the variance floor keeps its density bounded
//! - **Wrong K**: compare [`GmmFit::bic`] across K

use super::init::Init;
use super::traits::{Clustering, SoftClustering};
use crate::distance::{log_gaussian_masked, logsumexp};
use crate::error::{Error, Result};
use crate::mask::{Mask, Missing};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Added to every mixing weight before taking its log.
const WEIGHT_EPS: f64 = 1e-16;

/// Gaussian Mixture Model estimator with missing-data masking.
#[derive(Debug, Clone)]
pub struct Gmm {
    /// Number of components.
    k: usize,
    /// Relative log-likelihood improvement below which iteration stops.
    tol: f64,
    /// Floor applied to every component variance.
    min_variance: f64,
    /// Missing-value convention of the input.
    missing: Missing,
    /// Initial means.
    init: Init,
    /// Initial mixing weights (uniform if unset).
    weights: Option<Array1<f64>>,
    /// Initial variances (derived from the data if unset).
    variances: Option<Array1<f64>>,
    /// Seed for randomized initialization.
    seed: u64,
    /// Optional iteration cap.
    max_iter: Option<usize>,
    /// Emit a progress line every this many iterations; 0 disables.
    report_every: usize,
}

impl Gmm {
    /// Create an estimator with `k` components and default settings.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            tol: 1e-6,
            min_variance: 0.25,
            missing: Missing::Nan,
            init: Init::Grid,
            weights: None,
            variances: None,
            seed: 0,
            max_iter: None,
            report_every: 10,
        }
    }

    /// Set the relative convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the minimum variance floor.
    pub fn with_min_variance(mut self, min_variance: f64) -> Self {
        self.min_variance = min_variance;
        self
    }

    /// Set the missing-value convention.
    pub fn with_missing(mut self, missing: Missing) -> Self {
        self.missing = missing;
        self
    }

    /// Set the strategy for initial means.
    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    /// Set initial mixing weights (length K). They are rescaled to sum to 1.
    pub fn with_weights(mut self, weights: Array1<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Set initial variances (length K).
    pub fn with_variances(mut self, variances: Array1<f64>) -> Self {
        self.variances = Some(variances);
        self
    }

    /// Set the seed used by the `Random` and `Shuffle` strategies.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of iterations. Exceeding the cap is reported as
    /// [`Error::ConvergenceFailure`] rather than returning a partial fit.
    /// A cap of zero is rejected.
    pub fn with_max_iter(mut self, max_iter: Option<usize>) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Report progress every `every` iterations through `tracing`; 0 disables.
    pub fn with_report_every(mut self, every: usize) -> Self {
        self.report_every = every;
        self
    }

    /// Configured missing-value convention.
    pub fn missing(&self) -> Missing {
        self.missing
    }

    /// Fit to `data`, iterating until the stopping rule holds.
    pub fn fit(&self, data: ArrayView2<'_, f64>) -> Result<GmmFit> {
        let mask = Mask::from_data(data, self.missing);
        self.fit_with_mask(data, &mask)
    }

    /// Fit using an already resolved mask.
    pub fn fit_with_mask(&self, data: ArrayView2<'_, f64>, mask: &Mask) -> Result<GmmFit> {
        let mut run = self.start_with_mask(data, mask.clone())?;
        while run.step() == Step::Continue {
            if let Some(cap) = self.max_iter {
                if run.iterations() >= cap {
                    return Err(Error::ConvergenceFailure { iterations: cap });
                }
            }
        }
        run.finish()
    }

    /// Validate parameters and initialize, without iterating.
    ///
    /// Drive the returned [`EmRun`] with [`EmRun::step`] to control iteration
    /// from the outside (deadlines, custom caps, inspection between steps).
    pub fn start<'a>(&self, data: ArrayView2<'a, f64>) -> Result<EmRun<'a>> {
        self.start_with_mask(data, Mask::from_data(data, self.missing))
    }

    fn start_with_mask<'a>(&self, data: ArrayView2<'a, f64>, mask: Mask) -> Result<EmRun<'a>> {
        let (n, d) = data.dim();
        if n == 0 || d == 0 {
            return Err(Error::EmptyInput);
        }
        if mask.dim() != (n, d) {
            let (mn, md) = mask.dim();
            return Err(Error::shape("mask", format!("{n}x{d}"), format!("{mn}x{md}")));
        }
        let k = self.k;
        if k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be > 0",
            });
        }
        if !(self.tol > 0.0) {
            return Err(Error::InvalidParameter {
                name: "tol",
                message: "must be positive",
            });
        }
        if !(self.min_variance > 0.0) {
            return Err(Error::InvalidParameter {
                name: "min_variance",
                message: "must be positive",
            });
        }

        if self.max_iter == Some(0) {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be > 0",
            });
        }
        if Zip::from(data)
            .and(mask.observed())
            .fold(false, |bad, &v, &o| bad || (o && !v.is_finite()))
        {
            return Err(Error::InvalidParameter {
                name: "data",
                message: "observed entries must be finite",
            });
        }

        let weights = match &self.weights {
            Some(w) if w.len() != k => return Err(Error::shape("weights", k, w.len())),
            Some(w) if w.iter().any(|&p| !(p >= 0.0) || !p.is_finite()) => {
                return Err(Error::InvalidParameter {
                    name: "weights",
                    message: "must be finite and non-negative",
                })
            }
            Some(w) if !(w.sum() > 0.0) => {
                return Err(Error::InvalidParameter {
                    name: "weights",
                    message: "must have a positive sum",
                })
            }
            Some(w) => w / w.sum(),
            None => Array1::from_elem(k, 1.0 / k as f64),
        };

        let variances = match &self.variances {
            Some(v) if v.len() != k => return Err(Error::shape("variances", k, v.len())),
            Some(v) if v.iter().any(|&s| !(s > 0.0) || !s.is_finite()) => {
                return Err(Error::InvalidParameter {
                    name: "variances",
                    message: "must be finite and positive",
                })
            }
            Some(v) => v.clone(),
            None => Array1::from_elem(k, self.default_variance(data, &mask)),
        };

        let mut rng = StdRng::seed_from_u64(self.seed);
        let means = self.init.select(data, &mask, k, &mut rng)?;
        if means.iter().any(|m| !m.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "means",
                message: "must be finite",
            });
        }

        let observed_per_row = (0..n).map(|i| mask.observed_in_row(i)).collect();

        debug!(n, d, k, missing = mask.missing_count(), "em initialized");

        Ok(EmRun {
            data,
            mask,
            observed_per_row,
            tol: self.tol,
            min_variance: self.min_variance,
            report_every: self.report_every,
            weights,
            means,
            variances,
            posterior: Array2::zeros((n, k)),
            trace: Vec::new(),
            log_likelihood: f64::NEG_INFINITY,
            iter: 0,
            converged: false,
        })
    }

    /// `mean(per-column observed variance) / K²`, floored.
    fn default_variance(&self, data: ArrayView2<'_, f64>, mask: &Mask) -> f64 {
        let per_column: Vec<f64> = (0..data.ncols())
            .filter_map(|j| mask.column_variance(data, j))
            .collect();
        if per_column.is_empty() {
            return self.min_variance;
        }
        let mean = per_column.iter().sum::<f64>() / per_column.len() as f64;
        (mean / (self.k * self.k) as f64).max(self.min_variance)
    }
}

impl Default for Gmm {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Outcome of a single EM iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The stopping rule does not hold yet.
    Continue,
    /// The stopping rule holds; further steps are no-ops.
    Converged,
}

/// An EM fit in progress.
///
/// Holds the mixture state between iterations. Created by [`Gmm::start`].
#[derive(Debug, Clone)]
pub struct EmRun<'a> {
    data: ArrayView2<'a, f64>,
    mask: Mask,
    observed_per_row: Vec<usize>,
    tol: f64,
    min_variance: f64,
    report_every: usize,
    weights: Array1<f64>,
    means: Array2<f64>,
    variances: Array1<f64>,
    posterior: Array2<f64>,
    trace: Vec<f64>,
    log_likelihood: f64,
    iter: usize,
    converged: bool,
}

impl EmRun<'_> {
    /// Run one E-step, record the posterior change, run one M-step and
    /// evaluate the stopping rule.
    pub fn step(&mut self) -> Step {
        if self.converged {
            return Step::Converged;
        }

        let (posterior, ll) = self.e_step();
        let delta = (&posterior - &self.posterior)
            .mapv(|v| v * v)
            .sum()
            .sqrt();
        self.trace.push(delta);
        self.posterior = posterior;
        self.iter += 1;

        self.m_step();

        let old = std::mem::replace(&mut self.log_likelihood, ll);
        if self.report_every > 0 && self.iter % self.report_every == 0 {
            info!(iter = self.iter, delta, log_likelihood = ll, "em iteration");
        }

        if ll - old <= self.tol * ll.abs() {
            self.converged = true;
            debug!(
                iterations = self.iter,
                log_likelihood = ll,
                bic = self.bic(),
                "em converged"
            );
            Step::Converged
        } else {
            Step::Continue
        }
    }

    /// Number of completed iterations.
    pub fn iterations(&self) -> usize {
        self.iter
    }

    /// Log-likelihood of the most recent E-step (`−∞` before the first step).
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Whether the stopping rule has held.
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Current mixing weights.
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Current means.
    pub fn means(&self) -> ArrayView2<'_, f64> {
        self.means.view()
    }

    /// Current variances.
    pub fn variances(&self) -> ArrayView1<'_, f64> {
        self.variances.view()
    }

    /// Posterior responsibilities of the most recent E-step.
    pub fn responsibilities(&self) -> ArrayView2<'_, f64> {
        self.posterior.view()
    }

    /// Freeze the converged state into a [`GmmFit`].
    ///
    /// Fails with [`Error::ConvergenceFailure`] if the stopping rule has not held.
    pub fn finish(self) -> Result<GmmFit> {
        if !self.converged {
            return Err(Error::ConvergenceFailure {
                iterations: self.iter,
            });
        }
        let bic = self.bic();
        Ok(GmmFit {
            responsibilities: self.posterior,
            weights: self.weights,
            means: self.means,
            variances: self.variances,
            trace: self.trace,
            log_likelihood: self.log_likelihood,
            bic,
        })
    }

    /// `lL − ½·(K·D + K + (K − 1))·ln N` at the current log-likelihood.
    fn bic(&self) -> f64 {
        let (n, d) = self.data.dim();
        let k = self.weights.len();
        let n_params = (k * d + k + (k - 1)) as f64;
        self.log_likelihood - 0.5 * n_params * (n as f64).ln()
    }

    fn e_step(&self) -> (Array2<f64>, f64) {
        let n = self.data.nrows();
        let k = self.weights.len();

        #[cfg(feature = "parallel")]
        let rows: Vec<(Vec<f64>, f64)> = (0..n)
            .into_par_iter()
            .map(|i| self.score_row(i))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<(Vec<f64>, f64)> = (0..n).map(|i| self.score_row(i)).collect();

        let mut posterior = Array2::zeros((n, k));
        let mut ll = 0.0;
        for (i, (row, contribution)) in rows.into_iter().enumerate() {
            posterior.row_mut(i).assign(&ArrayView1::from(&row[..]));
            ll += contribution;
        }
        (posterior, ll)
    }

    /// Posterior row and log-likelihood contribution of row `i`.
    fn score_row(&self, i: usize) -> (Vec<f64>, f64) {
        // No evidence: the prior stands and nothing is added to the likelihood.
        if self.observed_per_row[i] == 0 {
            return (self.weights.to_vec(), 0.0);
        }
        let x = self.data.row(i);
        let observed = self.mask.row(i);
        let log_post: Vec<f64> = (0..self.weights.len())
            .map(|c| {
                (self.weights[c] + WEIGHT_EPS).ln()
                    + log_gaussian_masked(x, self.means.row(c), observed, self.variances[c])
            })
            .collect();
        let total = logsumexp(&log_post);
        (log_post.iter().map(|lp| (lp - total).exp()).collect(), total)
    }

    fn m_step(&mut self) {
        let (n, d) = self.data.dim();
        let k = self.weights.len();
        let post = &self.posterior;

        let support = post.sum_axis(Axis(0));
        let total = support.sum();
        self.weights = support / total;

        for c in 0..k {
            for j in 0..d {
                let (num, den) = (0..n)
                    .filter(|&i| self.mask.is_observed(i, j))
                    .fold((0.0, 0.0), |(num, den), i| {
                        (num + post[[i, c]] * self.data[[i, j]], den + post[[i, c]])
                    });
                if den > 1.0 {
                    self.means[[c, j]] = num / den;
                }
            }

            let mean = self.means.row(c);
            let (ss, weight) = (0..n).fold((0.0, 0.0), |(ss, weight), i| {
                let sq: f64 = (0..d)
                    .filter(|&j| self.mask.is_observed(i, j))
                    .map(|j| {
                        let diff = self.data[[i, j]] - mean[j];
                        diff * diff
                    })
                    .sum();
                (
                    ss + post[[i, c]] * sq,
                    weight + post[[i, c]] * self.observed_per_row[i] as f64,
                )
            });
            self.variances[c] = if weight > 0.0 {
                (ss / weight).max(self.min_variance)
            } else {
                self.min_variance
            };
        }
    }
}

/// Result of a converged EM fit.
#[derive(Debug, Clone, PartialEq)]
pub struct GmmFit {
    /// N×K posterior responsibilities from the final E-step.
    pub responsibilities: Array2<f64>,
    /// Mixing weights (length K).
    pub weights: Array1<f64>,
    /// Component means (K×D).
    pub means: Array2<f64>,
    /// Component variances (length K).
    pub variances: Array1<f64>,
    /// Norm of the posterior change, one entry per iteration.
    pub trace: Vec<f64>,
    /// Log-likelihood of the final E-step.
    pub log_likelihood: f64,
    /// Bayesian Information Criterion (higher is better).
    pub bic: f64,
}

impl GmmFit {
    /// Number of iterations run.
    pub fn n_iter(&self) -> usize {
        self.trace.len()
    }

    /// Most responsible component of each row.
    pub fn labels(&self) -> Vec<usize> {
        self.responsibilities
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl Clustering for Gmm {
    fn fit_predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

impl SoftClustering for Gmm {
    fn fit_predict_proba(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(self.fit(data)?.responsibilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy() -> Array2<f64> {
        array![
            [1.0, 10.5],
            [1.5, 10.8],
            [1.8, 8.0],
            [1.7, 15.0],
            [3.2, 40.0],
            [3.6, 32.0],
            [3.3, 38.0],
            [5.1, -2.3],
            [5.2, -2.4]
        ]
    }

    #[test]
    fn test_gmm_rows_and_weights_are_distributions() {
        let fit = Gmm::new(3).fit(toy().view()).unwrap();
        for row in fit.responsibilities.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
        assert!((fit.weights.sum() - 1.0).abs() < 1e-9);
        assert!(fit.weights.iter().all(|&p| p >= 0.0));
        assert!(fit.variances.iter().all(|&v| v >= 0.25));
    }

    #[test]
    fn test_gmm_separates_toy_clusters() {
        let fit = Gmm::new(3).fit(toy().view()).unwrap();
        let labels = fit.labels();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[2], labels[3]);
        assert_eq!(labels[4], labels[5]);
        assert_eq!(labels[5], labels[6]);
        assert_eq!(labels[7], labels[8]);
        assert_ne!(labels[0], labels[4]);
        assert_ne!(labels[0], labels[7]);
        assert_ne!(labels[4], labels[7]);
    }

    #[test]
    fn test_gmm_single_component_matches_column_stats() {
        let x = array![[1.0, 2.0], [3.0, f64::NAN], [5.0, 6.0], [f64::NAN, 4.0]];
        let fit = Gmm::new(1).fit(x.view()).unwrap();

        assert_eq!(fit.weights, array![1.0]);
        assert!((fit.means[[0, 0]] - 3.0).abs() < 1e-12);
        assert!((fit.means[[0, 1]] - 4.0).abs() < 1e-12);

        // Pooled residuals: (4 + 0 + 4) + (4 + 4 + 0) over 6 observed entries.
        assert!((fit.variances[0] - 16.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_gmm_single_component_variance_floor() {
        let x = array![[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let fit = Gmm::new(1).with_min_variance(0.5).fit(x.view()).unwrap();
        assert_eq!(fit.variances, array![0.5]);
    }

    #[test]
    fn test_gmm_all_missing_row_gets_prior() {
        let x = array![
            [1.0, 2.0],
            [1.2, 2.1],
            [f64::NAN, f64::NAN],
            [9.0, 9.5],
            [9.2, 9.1]
        ];
        let mut run = Gmm::new(2).start(x.view()).unwrap();
        loop {
            let prior = run.weights().to_owned();
            let step = run.step();
            assert_eq!(run.responsibilities().row(2), prior.view());
            assert!(run.responsibilities().iter().all(|p| p.is_finite()));
            if step == Step::Converged {
                break;
            }
        }
        assert!(run.finish().unwrap().log_likelihood.is_finite());
    }

    #[test]
    fn test_gmm_reported_likelihood_is_pre_update() {
        let x = toy();
        let mut run = Gmm::new(3).start(x.view()).unwrap();
        let mut steps = 0;
        loop {
            steps += 1;
            if run.step() == Step::Converged {
                break;
            }
        }
        let fit = run.clone().finish().unwrap();
        assert_eq!(fit.n_iter(), steps);

        // One more E-step at the returned parameters scores at least as well.
        let (_, after) = run.e_step();
        assert!(after >= fit.log_likelihood - 1e-9 * fit.log_likelihood.abs());
    }

    #[test]
    fn test_gmm_bic_penalty() {
        let x = toy();
        let fit = Gmm::new(2).fit(x.view()).unwrap();
        let n_params = (2 * 2 + 2 + 1) as f64;
        let expected = fit.log_likelihood - 0.5 * n_params * 9f64.ln();
        assert!((fit.bic - expected).abs() < 1e-12);
    }

    #[test]
    fn test_gmm_trace_grows_per_iteration() {
        let fit = Gmm::new(3).fit(toy().view()).unwrap();
        assert!(fit.n_iter() >= 2);
        assert!(fit.trace.iter().all(|t| t.is_finite() && *t >= 0.0));
    }

    #[test]
    fn test_gmm_shape_validation() {
        let x = toy();
        let bad_w = Gmm::new(3).with_weights(array![0.5, 0.5]).fit(x.view());
        assert!(matches!(bad_w, Err(Error::ShapeMismatch { name: "weights", .. })));

        let bad_v = Gmm::new(3).with_variances(array![1.0]).fit(x.view());
        assert!(matches!(bad_v, Err(Error::ShapeMismatch { name: "variances", .. })));

        let bad_m = Gmm::new(3)
            .with_init(Init::Given(Array2::zeros((2, 2))))
            .fit(x.view());
        assert!(matches!(bad_m, Err(Error::ShapeMismatch { name: "means", .. })));
    }

    #[test]
    fn test_gmm_rejects_zero_components_and_empty_input() {
        assert!(matches!(
            Gmm::new(0).fit(toy().view()),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
        let empty = Array2::<f64>::zeros((0, 2));
        assert_eq!(Gmm::new(2).fit(empty.view()), Err(Error::EmptyInput));
    }

    #[test]
    fn test_gmm_iteration_cap_is_reported() {
        let res = Gmm::new(3)
            .with_tol(1e-300)
            .with_max_iter(Some(2))
            .fit(toy().view());
        assert_eq!(res, Err(Error::ConvergenceFailure { iterations: 2 }));
    }

    #[test]
    fn test_gmm_given_parameters_are_used() {
        let x = toy();
        let means = array![[1.5, 11.0], [3.3, 37.0], [5.1, -2.3]];
        let fit = Gmm::new(3)
            .with_init(Init::Given(means))
            .with_weights(array![0.4, 0.4, 0.2])
            .with_variances(array![1.0, 1.0, 1.0])
            .fit(x.view())
            .unwrap();
        let labels = fit.labels();
        assert_eq!(labels, vec![0, 0, 0, 0, 1, 1, 1, 2, 2]);
    }

    #[test]
    fn test_gmm_seeded_shuffle_is_reproducible() {
        let x = toy();
        let gmm = Gmm::new(3).with_init(Init::Shuffle).with_seed(5);
        assert_eq!(gmm.fit(x.view()).unwrap(), gmm.fit(x.view()).unwrap());
    }

    #[test]
    fn test_gmm_nan_sentinel_is_treated_as_nan() {
        let x = array![[1.0, f64::NAN], [1.2, 2.0], [8.0, 9.0], [8.1, 9.2]];
        let fit = Gmm::new(2)
            .with_missing(Missing::Sentinel(f64::NAN))
            .with_max_iter(Some(500))
            .fit(x.view())
            .unwrap();
        assert!(fit.log_likelihood.is_finite());
        assert_eq!(fit, Gmm::new(2).with_max_iter(Some(500)).fit(x.view()).unwrap());
    }

    #[test]
    fn test_gmm_rejects_non_finite_inputs() {
        let x = toy();
        let nan_means = Gmm::new(2)
            .with_init(Init::Given(array![[f64::NAN, 0.0], [1.0, 1.0]]))
            .fit(x.view());
        assert!(matches!(nan_means, Err(Error::InvalidParameter { name: "means", .. })));

        let mut y = toy();
        y[[3, 1]] = f64::INFINITY;
        assert!(matches!(
            Gmm::new(2).fit(y.view()),
            Err(Error::InvalidParameter { name: "data", .. })
        ));
        // Under a 0 sentinel a NaN is an observed value.
        y[[3, 1]] = f64::NAN;
        assert!(matches!(
            Gmm::new(2).with_missing(Missing::Sentinel(0.0)).fit(y.view()),
            Err(Error::InvalidParameter { name: "data", .. })
        ));

        let inf_w = Gmm::new(2).with_weights(array![f64::INFINITY, 1.0]).fit(x.view());
        assert!(matches!(inf_w, Err(Error::InvalidParameter { name: "weights", .. })));
        let inf_v = Gmm::new(2).with_variances(array![f64::INFINITY, 1.0]).fit(x.view());
        assert!(matches!(inf_v, Err(Error::InvalidParameter { name: "variances", .. })));
    }

    #[test]
    fn test_gmm_weights_need_positive_sum_and_are_normalized() {
        let empty = array![[f64::NAN, f64::NAN], [f64::NAN, f64::NAN]];
        let zero = Gmm::new(2).with_weights(array![0.0, 0.0]).fit(empty.view());
        assert!(matches!(zero, Err(Error::InvalidParameter { name: "weights", .. })));

        let x = toy();
        let run = Gmm::new(2).with_weights(array![2.0, 6.0]).start(x.view()).unwrap();
        assert_eq!(run.weights(), array![0.25, 0.75].view());
    }

    #[test]
    fn test_gmm_mean_with_thin_support_is_kept() {
        // Column 1 is observed in one row only, so its support never exceeds 1.
        let x = array![[1.0, f64::NAN], [2.0, f64::NAN], [3.0, 5.0], [4.0, f64::NAN]];
        let mut run = Gmm::new(1)
            .with_init(Init::Given(array![[0.0, 9.0]]))
            .start(x.view())
            .unwrap();
        run.step();
        assert!((run.means()[[0, 0]] - 2.5).abs() < 1e-12);
        assert_eq!(run.means()[[0, 1]], 9.0);
    }

    #[test]
    fn test_gmm_zero_iteration_cap_is_rejected() {
        let res = Gmm::new(2).with_max_iter(Some(0)).fit(toy().view());
        assert!(matches!(res, Err(Error::InvalidParameter { name: "max_iter", .. })));
    }
}
