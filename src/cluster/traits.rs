//! Clustering traits.

use crate::error::Result;
use ndarray::{Array2, ArrayView2};

/// Trait for clustering algorithms.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input row.
    fn fit_predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}

/// Trait for soft clustering algorithms that return probabilities.
pub trait SoftClustering: Clustering {
    /// Fit and return soft cluster assignments (probabilities).
    ///
    /// Returns an N×K matrix where entry \[i, k\] is the probability that
    /// row i belongs to cluster k.
    fn fit_predict_proba(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}
