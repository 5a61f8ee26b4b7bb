//! # mixfill
//!
//! Gaussian mixture estimation on partially observed data, and model-based
//! imputation of the missing entries.
//!
//! The pipeline is one-directional and stateless between calls:
//!
//! ```text
//! data ──► Mask ──► Init (means) ──► Gmm / EmRun (EM to convergence) ──► Imputer (fill)
//! ```
//!
//! - [`Mask`] resolves the missing-value convention ([`Missing`]) once.
//! - [`cluster::Init`] picks initial representatives (`random`, `grid`, `shuffle`, `given`).
//! - [`Gmm`] runs EM in log-space with per-component isotropic variances and
//!   reports log-likelihood and BIC; [`cluster::EmRun`] exposes it step by step.
//! - [`Imputer`] fills each missing entry with its responsibility-weighted mean.
//!
//! Progress is reported through [`tracing`]; install a subscriber to see it.
//!
//! The `parallel` feature computes the per-row E-step and the K-means assignment
//! step with rayon.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

pub mod cluster;
pub mod distance;
/// Error types used across `mixfill`.
pub mod error;
pub mod impute;
pub mod mask;
pub mod metrics;

pub use cluster::{Clustering, EmRun, Gmm, GmmFit, Init, Kmeans, KmeansFit, SoftClustering, Step};
pub use error::{Error, Result};
pub use impute::{fill, Imputation, Imputer};
pub use mask::{Mask, Missing};
