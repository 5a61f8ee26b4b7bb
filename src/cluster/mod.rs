//! Clustering algorithms for grouping similar rows.
//!
//! ## Hard vs Soft Clustering
//!
//! **Hard clustering** assigns each row to exactly one cluster. Simple, but
//! loses information when a row genuinely sits between groups.
//!
//! **Soft clustering** gives each row a probability distribution over clusters.
//! For imputation this is what matters: a missing rating is filled from every
//! component in proportion to how responsible it is for the row, not from a
//! single winner.
//!
//! ## Algorithms
//!
//! ### Gaussian Mixture Model (GMM)
//!
//! Models data as a mixture of K isotropic Gaussian distributions:
//!
//! ```text
//! P(x) = Σ p_k × N(x | μ_k, σ²_k I)
//! ```
//!
//! fitted with EM directly on partially observed rows. See [`Gmm`].
//!
//! ### K-means
//!
//! The classic algorithm: assign each row to the nearest centroid, then
//! update centroids to the mean of their rows. Repeat. See [`Kmeans`].
//!
//! ### Initialization
//!
//! Both start from K representatives chosen by [`Init`].
//!
//! ## Usage
//!
//! ```rust
//! use mixfill::cluster::{Clustering, Gmm, Init, Kmeans, SoftClustering};
//! use ndarray::array;
//!
//! let data = array![
//!     [0.0, 0.0],
//!     [0.1, 0.1],
//!     [10.0, 10.0],
//!     [10.1, 10.1],
//! ];
//!
//! // Hard clustering with K-means
//! let labels = Kmeans::new(2).with_init(Init::Grid).fit_predict(data.view()).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//!
//! // Soft clustering with GMM
//! let probs = Gmm::new(2).fit_predict_proba(data.view()).unwrap();
//! // probs[[i, k]] = P(row i belongs to component k)
//! assert_eq!(probs.dim(), (4, 2));
//! ```

mod gmm;
mod init;
mod kmeans;
mod traits;

pub use gmm::{EmRun, Gmm, GmmFit, Step};
pub use init::Init;
pub use kmeans::{Kmeans, KmeansFit};
pub use traits::{Clustering, SoftClustering};
