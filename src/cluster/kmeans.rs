//! K-means clustering.
//!
//! Partitions rows into k clusters by minimizing the **within-cluster sum of
//! squares**:
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Pick k initial centroids with an [`Init`] strategy
//! 2. **Assign**: each row → nearest centroid
//! 3. **Update**: each centroid → mean of its rows
//! 4. Repeat until the centroids stop moving
//!
//! K-means is the hard-assignment limit of the mixture estimator in
//! [`super::Gmm`]: equal weights, a shared variance shrinking to zero. On
//! well-separated data both recover the same partition, which makes it a cheap
//! cross-check for an EM fit. Unlike the mixture estimator it expects a fully
//! observed matrix.

use super::init::Init;
use super::traits::Clustering;
use crate::distance::squared_euclidean;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};
use rand::prelude::*;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Initial centroids.
    init: Init,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance on total squared centroid shift.
    tol: f64,
    /// Random seed.
    seed: u64,
}

/// Result of a K-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansFit {
    /// Final centroids (k×D).
    pub centroids: Array2<f64>,
    /// Cluster of each row.
    pub labels: Vec<usize>,
    /// Within-cluster sum of squares.
    pub inertia: f64,
    /// Iterations run.
    pub n_iter: usize,
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            init: Init::Shuffle,
            max_iter: 100,
            tol: 1e-8,
            seed: 0,
        }
    }

    /// Set the initialization strategy.
    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run Lloyd iterations and return centroids, labels and inertia.
    pub fn fit(&self, data: ArrayView2<'_, f64>) -> Result<KmeansFit> {
        let (n, d) = data.dim();
        if n == 0 || d == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.init.select_dense(data, self.k, &mut rng)?;
        let mut labels = vec![0usize; n];
        let mut n_iter = 0;

        for _iter in 0..self.max_iter {
            n_iter += 1;
            self.assign(data, &centroids, &mut labels);

            // Update step
            let mut new_centroids = Array2::zeros((self.k, d));
            let mut counts = vec![0usize; self.k];

            for (i, &c) in labels.iter().enumerate() {
                let mut row = new_centroids.row_mut(c);
                row += &data.row(i);
                counts[c] += 1;
            }

            for (c, &count) in counts.iter().enumerate() {
                if count > 0 {
                    new_centroids
                        .row_mut(c)
                        .mapv_inplace(|v| v / count as f64);
                } else {
                    // Empty cluster: reseed from a random row
                    let idx = rng.random_range(0..n);
                    new_centroids.row_mut(c).assign(&data.row(idx));
                }
            }

            let shift: f64 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();

            centroids = new_centroids;

            if shift < self.tol {
                break;
            }
        }

        // Labels against the final centroids.
        self.assign(data, &centroids, &mut labels);
        let inertia = labels
            .iter()
            .enumerate()
            .map(|(i, &c)| sq_dist(&data, &centroids, i, c))
            .sum();

        debug!(k = self.k, n_iter, inertia, "kmeans finished");

        Ok(KmeansFit {
            centroids,
            labels,
            inertia,
            n_iter,
        })
    }

    fn assign(&self, data: ArrayView2<'_, f64>, centroids: &Array2<f64>, labels: &mut [usize]) {
        #[cfg(feature = "parallel")]
        labels.par_iter_mut().enumerate().for_each(|(i, label)| {
            *label = nearest(&data, centroids, i);
        });

        #[cfg(not(feature = "parallel"))]
        for (i, label) in labels.iter_mut().enumerate() {
            *label = nearest(&data, centroids, i);
        }
    }
}

fn sq_dist(data: &ArrayView2<'_, f64>, centroids: &Array2<f64>, i: usize, c: usize) -> f64 {
    match (data.row(i).as_slice(), centroids.row(c).as_slice()) {
        (Some(x), Some(y)) => squared_euclidean(x, y),
        _ => data
            .row(i)
            .iter()
            .zip(centroids.row(c).iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum(),
    }
}

fn nearest(data: &ArrayView2<'_, f64>, centroids: &Array2<f64>, i: usize) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::MAX;
    for c in 0..centroids.nrows() {
        let dist = sq_dist(data, centroids, i, c);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = c;
        }
    }
    best_cluster
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
