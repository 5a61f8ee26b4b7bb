//! Missing-value conventions and the observation mask.
//!
//! A data matrix marks absent entries either with `NaN` or with a sentinel
//! value (ratings matrices conventionally use `0.0`). The convention is chosen
//! once per call and resolved into a boolean [`Mask`]; nothing downstream ever
//! compares against the sentinel again.
//!
//! ```rust
//! use mixfill::{Mask, Missing};
//! use ndarray::array;
//!
//! let x = array![[5.0, 0.0], [0.0, 3.0]];
//! let mask = Mask::from_data(x.view(), Missing::Sentinel(0.0));
//! assert!(mask.is_observed(0, 0));
//! assert!(!mask.is_observed(0, 1));
//! assert_eq!(mask.missing_count(), 2);
//! ```

use ndarray::{Array2, ArrayView1, ArrayView2, Zip};

/// How a missing entry is represented in the input matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Missing {
    /// Missing entries are `NaN`.
    #[default]
    Nan,
    /// Missing entries equal this value exactly. A `NaN` sentinel behaves like [`Missing::Nan`].
    Sentinel(f64),
}

impl Missing {
    /// Whether `value` denotes a missing entry under this convention.
    #[inline]
    pub fn is_missing(&self, value: f64) -> bool {
        match *self {
            Missing::Nan => value.is_nan(),
            Missing::Sentinel(s) if s.is_nan() => value.is_nan(),
            Missing::Sentinel(s) => value == s,
        }
    }
}

/// N×D boolean matrix, `true` where the entry is observed.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    observed: Array2<bool>,
}

impl Mask {
    /// Resolve `missing` against every entry of `data`.
    pub fn from_data(data: ArrayView2<'_, f64>, missing: Missing) -> Self {
        Self {
            observed: data.mapv(|v| !missing.is_missing(v)),
        }
    }

    /// A mask marking every entry of an `n`×`d` matrix as observed.
    pub fn full(n: usize, d: usize) -> Self {
        Self {
            observed: Array2::from_elem((n, d), true),
        }
    }

    /// `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        self.observed.dim()
    }

    /// Whether entry `(n, d)` is observed.
    #[inline]
    pub fn is_observed(&self, n: usize, d: usize) -> bool {
        self.observed[[n, d]]
    }

    /// The whole mask as a view.
    pub fn observed(&self) -> ArrayView2<'_, bool> {
        self.observed.view()
    }

    /// Row `n` of the mask.
    pub fn row(&self, n: usize) -> ArrayView1<'_, bool> {
        self.observed.row(n)
    }

    /// Number of observed dimensions in row `n`.
    pub fn observed_in_row(&self, n: usize) -> usize {
        self.observed.row(n).iter().filter(|&&o| o).count()
    }

    /// Total number of observed entries.
    pub fn observed_count(&self) -> usize {
        self.observed.iter().filter(|&&o| o).count()
    }

    /// Total number of missing entries.
    pub fn missing_count(&self) -> usize {
        self.observed.len() - self.observed_count()
    }

    /// First column with no observed entry, if any.
    pub fn empty_column(&self) -> Option<usize> {
        self.observed
            .columns()
            .into_iter()
            .position(|col| !col.iter().any(|&o| o))
    }

    /// Observed `(min, max)` of column `d`, or `None` if the column is entirely missing.
    pub fn column_range(&self, data: ArrayView2<'_, f64>, d: usize) -> Option<(f64, f64)> {
        self.fold_observed(data, d, None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Mean of the observed entries of column `d`, or `None` if the column is entirely missing.
    pub fn column_mean(&self, data: ArrayView2<'_, f64>, d: usize) -> Option<f64> {
        let (count, sum) = self.fold_observed(data, d, (0usize, 0.0), |(c, s), v| (c + 1, s + v));
        (count > 0).then(|| sum / count as f64)
    }

    /// Sample variance (`n − 1` denominator) of the observed entries of column `d`.
    ///
    /// `None` if the column is entirely missing, `0` if it has one observed entry.
    pub fn column_variance(&self, data: ArrayView2<'_, f64>, d: usize) -> Option<f64> {
        let mean = self.column_mean(data, d)?;
        let (count, ss) = self.fold_observed(data, d, (0usize, 0.0), |(c, ss), v| {
            (c + 1, ss + (v - mean) * (v - mean))
        });
        Some(if count > 1 { ss / (count - 1) as f64 } else { 0.0 })
    }

    /// Fold `f` over the observed entries of column `d` of `data`.
    fn fold_observed<B>(
        &self,
        data: ArrayView2<'_, f64>,
        d: usize,
        init: B,
        mut f: impl FnMut(B, f64) -> B,
    ) -> B {
        Zip::from(data.column(d))
            .and(self.observed.column(d))
            .fold(init, |acc, &v, &o| if o { f(acc, v) } else { acc })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn nan_convention_marks_only_nan() {
        let x = array![[1.0, f64::NAN], [0.0, 2.0]];
        let mask = Mask::from_data(x.view(), Missing::Nan);
        assert!(mask.is_observed(1, 0)); // zero is a real value here
        assert!(!mask.is_observed(0, 1));
        assert_eq!(mask.observed_count(), 3);
        assert_eq!(mask.observed_in_row(0), 1);
    }

    #[test]
    fn sentinel_convention() {
        let x = array![[0.0, 4.0, 0.0], [1.0, 0.0, 5.0]];
        let mask = Mask::from_data(x.view(), Missing::Sentinel(0.0));
        assert_eq!(mask.missing_count(), 3);
        assert_eq!(mask.observed_in_row(1), 2);
    }

    #[test]
    fn column_stats_skip_missing() {
        let x = array![[1.0, 0.0], [3.0, 0.0], [0.0, 0.0]];
        let mask = Mask::from_data(x.view(), Missing::Sentinel(0.0));
        assert_eq!(mask.column_range(x.view(), 0), Some((1.0, 3.0)));
        assert_eq!(mask.column_mean(x.view(), 0), Some(2.0));
        assert_eq!(mask.column_variance(x.view(), 0), Some(2.0));
        assert_eq!(mask.column_range(x.view(), 1), None);
        assert_eq!(mask.column_mean(x.view(), 1), None);
        assert_eq!(mask.column_variance(x.view(), 1), None);
    }

    #[test]
    fn column_stats_accept_views_of_separate_arrays() {
        let mask = Mask::from_data(array![[1.0], [f64::NAN], [5.0]].view(), Missing::Nan);
        let other = array![[2.0], [100.0], [4.0]];
        let view = other.slice(ndarray::s![.., ..]);
        assert_eq!(mask.column_range(view, 0), Some((2.0, 4.0)));
        assert_eq!(mask.column_mean(view, 0), Some(3.0));
        assert_eq!(mask.column_variance(view, 0), Some(2.0));
    }

    #[test]
    fn single_observation_has_zero_variance() {
        let x = array![[f64::NAN], [7.0]];
        let mask = Mask::from_data(x.view(), Missing::Nan);
        assert_eq!(mask.column_variance(x.view(), 0), Some(0.0));
    }

    #[test]
    fn nan_sentinel_acts_as_nan_convention() {
        let x = array![[1.0, f64::NAN], [f64::NAN, 0.0]];
        let a = Mask::from_data(x.view(), Missing::Sentinel(f64::NAN));
        let b = Mask::from_data(x.view(), Missing::Nan);
        assert_eq!(a, b);
        assert_eq!(a.missing_count(), 2);
    }

    #[test]
    fn empty_column_is_found() {
        let x = array![[1.0, 0.0, 2.0], [3.0, 0.0, 0.0]];
        assert_eq!(Mask::from_data(x.view(), Missing::Sentinel(0.0)).empty_column(), Some(1));
        assert_eq!(Mask::full(2, 3).empty_column(), None);
    }
}
