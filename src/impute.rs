//! Model-based imputation (collaborative filtering).
//!
//! A ratings matrix is mostly holes. Fitting a mixture to the observed entries
//! groups users with similar taste; a missing rating is then predicted as the
//! expected value of that dimension under the user's posterior over groups:
//!
//! ```text
//! x̂ₙⱼ = Σₖ γₙₖ μₖⱼ
//! ```
//!
//! Observed entries are copied through untouched.
//!
//! ```rust
//! use mixfill::{Gmm, Imputer, Missing};
//! use ndarray::array;
//!
//! let ratings = array![
//!     [5.0, 4.0, 0.0, 1.0],
//!     [4.0, 0.0, 5.0, 1.0],
//!     [1.0, 1.0, 0.0, 5.0],
//!     [0.0, 2.0, 1.0, 4.0],
//! ];
//! let imputer = Imputer::new(Gmm::new(2).with_missing(Missing::Sentinel(0.0)));
//! let out = imputer.impute(ratings.view()).unwrap();
//! assert_eq!(out.n_filled, 3);
//! assert_eq!(out.filled[[0, 0]], 5.0);
//! ```

use crate::cluster::{Gmm, GmmFit};
use crate::error::{Error, Result};
use crate::mask::Mask;
use ndarray::{Array2, ArrayView2};
use tracing::debug;

/// Fits a [`Gmm`] and fills every missing entry from it.
#[derive(Debug, Clone, Default)]
pub struct Imputer {
    gmm: Gmm,
}

/// Output of [`Imputer::impute`].
#[derive(Debug, Clone, PartialEq)]
pub struct Imputation {
    /// Input with every missing entry replaced.
    pub filled: Array2<f64>,
    /// Number of entries that were missing.
    pub n_filled: usize,
    /// Log-likelihood of the underlying fit.
    pub log_likelihood: f64,
    /// BIC of the underlying fit.
    pub bic: f64,
    /// The underlying fit.
    pub fit: GmmFit,
}

impl Imputer {
    /// Wrap a configured estimator. Its missing-value convention decides what gets filled.
    pub fn new(gmm: Gmm) -> Self {
        Self { gmm }
    }

    /// The wrapped estimator.
    pub fn gmm(&self) -> &Gmm {
        &self.gmm
    }

    /// Fit the mixture to `data` and fill its missing entries.
    ///
    /// Fails with [`Error::EmptyColumn`] if some column is entirely missing:
    /// its fill would be the initializer's placeholder, not an estimate.
    pub fn impute(&self, data: ArrayView2<'_, f64>) -> Result<Imputation> {
        let mask = Mask::from_data(data, self.gmm.missing());
        if let Some(j) = mask.empty_column() {
            return Err(Error::EmptyColumn(j));
        }
        let fit = self.gmm.fit_with_mask(data, &mask)?;
        let filled = fill(data, &mask, &fit)?;
        let n_filled = mask.missing_count();
        debug!(n_filled, bic = fit.bic, "imputation finished");
        Ok(Imputation {
            filled,
            n_filled,
            log_likelihood: fit.log_likelihood,
            bic: fit.bic,
            fit,
        })
    }
}

/// Fill the entries `mask` marks missing with the responsibility-weighted
/// component means of `fit`.
///
/// `fit` must have been produced from a matrix of the same shape.
pub fn fill(data: ArrayView2<'_, f64>, mask: &Mask, fit: &GmmFit) -> Result<Array2<f64>> {
    let (n, d) = data.dim();
    if mask.dim() != (n, d) {
        let (mn, md) = mask.dim();
        return Err(Error::shape("mask", format!("{n}x{d}"), format!("{mn}x{md}")));
    }
    let (rn, k) = fit.responsibilities.dim();
    if rn != n {
        return Err(Error::shape("responsibilities", format!("{n}x{k}"), format!("{rn}x{k}")));
    }
    if fit.means.dim() != (k, d) {
        let (mk, md) = fit.means.dim();
        return Err(Error::shape("means", format!("{k}x{d}"), format!("{mk}x{md}")));
    }

    let mut filled = data.to_owned();
    for ((i, j), value) in filled.indexed_iter_mut() {
        if !mask.is_observed(i, j) {
            *value = fit
                .responsibilities
                .row(i)
                .dot(&fit.means.column(j));
        }
    }
    Ok(filled)
}
