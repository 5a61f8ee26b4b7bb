//! Distance and likelihood primitives.
//!
//! Everything the estimator needs to score a point against a component:
//! squared Euclidean distance, the cosine of the angle between two vectors,
//! the log-density of an isotropic Gaussian and a stable log-sum-exp.
//!
//! # Why log-space
//!
//! With a few dozen observed dimensions the density of a point far from a
//! component is well below `f64::MIN_POSITIVE`. Computing `exp` first and
//! normalizing afterwards turns every responsibility in such a row into
//! `0 / 0`. All scoring here therefore stays in log-space, and normalization
//! goes through [`logsumexp`], which shifts by the maximum before exponentiating:
//!
//! ```text
//! log Σᵢ exp(vᵢ) = m + log Σᵢ exp(vᵢ − m),   m = maxᵢ vᵢ
//! ```

use crate::error::{Error, Result};
use std::f64::consts::PI;

/// Squared Euclidean distance `‖x − y‖²`.
#[inline]
pub fn squared_euclidean(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}

/// Cosine `(x·y) / (‖x‖·‖y‖)`.
///
/// Returns [`Error::ZeroNorm`] if either vector has zero norm.
pub fn cosine(x: &[f64], y: &[f64]) -> Result<f64> {
    debug_assert_eq!(x.len(), y.len());
    let dot: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let nx = x.iter().map(|a| a * a).sum::<f64>().sqrt();
    let ny = y.iter().map(|b| b * b).sum::<f64>().sqrt();
    if nx == 0.0 || ny == 0.0 {
        return Err(Error::ZeroNorm);
    }
    Ok(dot / (nx * ny))
}

/// Log-density of `N(mean, variance · I)` at `x`, with `d = x.len()`:
///
/// ```text
/// −(d/2)·log(2π·σ²) − ‖x − μ‖² / (2σ²)
/// ```
#[inline]
pub fn log_gaussian(x: &[f64], mean: &[f64], variance: f64) -> f64 {
    let d = x.len() as f64;
    -0.5 * d * (2.0 * PI * variance).ln() - squared_euclidean(x, mean) / (2.0 * variance)
}

/// Same as [`log_gaussian`], restricted to the dimensions where `observed` is set.
///
/// `d` in the normalizer is the number of observed dimensions.
pub fn log_gaussian_masked<'a, I, M>(x: I, mean: I, observed: M, variance: f64) -> f64
where
    I: IntoIterator<Item = &'a f64>,
    M: IntoIterator<Item = &'a bool>,
{
    let (d, ss) = x
        .into_iter()
        .zip(mean)
        .zip(observed)
        .filter(|(_, o)| **o)
        .fold((0usize, 0.0), |(d, ss), ((a, b), _)| {
            let diff = a - b;
            (d + 1, ss + diff * diff)
        });
    -0.5 * d as f64 * (2.0 * PI * variance).ln() - ss / (2.0 * variance)
}

/// `log Σ exp(vᵢ)` without overflow or underflow.
///
/// Empty input, or input that is entirely `−∞`, gives `−∞`.
pub fn logsumexp(values: &[f64]) -> f64 {
    let max_val = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max_val.is_infinite() {
        return max_val;
    }
    max_val + values.iter().map(|&v| (v - max_val).exp()).sum::<f64>().ln()
}
