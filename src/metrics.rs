//! Evaluation helpers.
//!
//! - [`ari`] compares two hard partitions up to relabeling. Used to check an
//!   EM fit against K-means on the same data.
//! - [`rmse`] scores a filled matrix against held-out ground truth, the usual
//!   collaborative-filtering error measure.
//!
//! ```rust
//! use mixfill::metrics::{ari, rmse};
//! use ndarray::array;
//!
//! // Same partition, different label names.
//! assert!((ari(&[0, 0, 1, 1], &[1, 1, 0, 0]) - 1.0).abs() < 1e-12);
//!
//! let filled = array![[1.0, 2.0], [3.0, 4.0]];
//! let gold = array![[1.0, 2.0], [3.0, 6.0]];
//! assert_eq!(rmse(filled.view(), gold.view()).unwrap(), 1.0);
//! ```

use crate::error::{Error, Result};
use ndarray::ArrayView2;
use std::collections::HashMap;

/// Adjusted Rand Index between two labelings of the same rows.
///
/// 1.0 for identical partitions (regardless of label names), around 0.0 for
/// independent ones. Returns 0.0 for empty or length-mismatched input.
pub fn ari(a: &[usize], b: &[usize]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut joint: HashMap<(usize, usize), usize> = HashMap::new();
    let mut sizes_a: HashMap<usize, usize> = HashMap::new();
    let mut sizes_b: HashMap<usize, usize> = HashMap::new();
    for (&x, &y) in a.iter().zip(b) {
        *joint.entry((x, y)).or_default() += 1;
        *sizes_a.entry(x).or_default() += 1;
        *sizes_b.entry(y).or_default() += 1;
    }

    let pairs = |c: &usize| (c * c.saturating_sub(1) / 2) as f64;
    let index: f64 = joint.values().map(pairs).sum();
    let sum_a: f64 = sizes_a.values().map(pairs).sum();
    let sum_b: f64 = sizes_b.values().map(pairs).sum();
    let total = pairs(&a.len());

    let expected = if total > 0.0 { sum_a * sum_b / total } else { 0.0 };
    let denom = (sum_a + sum_b) / 2.0 - expected;
    if denom.abs() < 1e-10 {
        // Both partitions trivial (all singletons or one block) and therefore equal in structure.
        return if sum_a == sum_b { 1.0 } else { 0.0 };
    }
    (index - expected) / denom
}

/// Root mean squared error between two matrices of the same shape.
pub fn rmse(predicted: ArrayView2<'_, f64>, truth: ArrayView2<'_, f64>) -> Result<f64> {
    if predicted.dim() != truth.dim() {
        let (pn, pd) = predicted.dim();
        let (tn, td) = truth.dim();
        return Err(Error::shape("truth", format!("{pn}x{pd}"), format!("{tn}x{td}")));
    }
    if predicted.is_empty() {
        return Err(Error::EmptyInput);
    }
    let ss: f64 = predicted
        .iter()
        .zip(truth.iter())
        .map(|(p, t)| (p - t) * (p - t))
        .sum();
    Ok((ss / predicted.len() as f64).sqrt())
}
