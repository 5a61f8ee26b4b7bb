//! Representative initialization.
//!
//! Both the EM estimator and K-means start from K representative vectors.
//! [`Init`] selects them with one of four strategies:
//!
//! | Strategy | Randomness | Representatives |
//! |----------|------------|-----------------|
//! | [`Init::Random`] | yes | uniform draws inside each column's observed range |
//! | [`Init::Grid`] | no | K evenly spaced values per column, min to max inclusive |
//! | [`Init::Shuffle`] | yes | K distinct rows of the data (missing cells take the column mean) |
//! | [`Init::Given`] | no | a caller-supplied K×D matrix |
//!
//! Randomness always comes from a caller-owned `Rng`, never from global state.
//!
//! ```rust
//! use mixfill::cluster::Init;
//! use ndarray::array;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let x = array![[0.0, 10.0], [4.0, 30.0]];
//! let mut rng = StdRng::seed_from_u64(7);
//! let reps = Init::Grid.select_dense(x.view(), 3, &mut rng).unwrap();
//! assert_eq!(reps, array![[0.0, 10.0], [2.0, 20.0], [4.0, 30.0]]);
//! ```

use crate::error::{Error, Result};
use crate::mask::Mask;
use ndarray::{Array2, ArrayView2};
use rand::seq::index;
use rand::Rng;
use std::str::FromStr;

/// Strategy for choosing K initial representatives.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Init {
    /// Each cell uniform in `[min, max]` of its column.
    Random,
    /// Evenly spaced per column.
    #[default]
    Grid,
    /// K distinct data rows, without replacement.
    Shuffle,
    /// Exactly this K×D matrix.
    Given(Array2<f64>),
}

impl FromStr for Init {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(Init::Random),
            "grid" => Ok(Init::Grid),
            "shuffle" => Ok(Init::Shuffle),
            "given" => Err(Error::MissingSeedMatrix),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

impl Init {
    /// Select `k` representatives from `data`, ignoring entries the mask marks missing
    /// when computing column ranges.
    ///
    /// A column with no observed entry has range `[0, 0]`.
    pub fn select<R: Rng>(
        &self,
        data: ArrayView2<'_, f64>,
        mask: &Mask,
        k: usize,
        rng: &mut R,
    ) -> Result<Array2<f64>> {
        let (n, d) = data.dim();
        if n == 0 || d == 0 {
            return Err(Error::EmptyInput);
        }
        if k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be > 0",
            });
        }
        if mask.dim() != (n, d) {
            return Err(Error::shape(
                "mask",
                format!("{n}x{d}"),
                format!("{}x{}", mask.dim().0, mask.dim().1),
            ));
        }

        let ranges: Vec<(f64, f64)> = (0..d)
            .map(|j| mask.column_range(data, j).unwrap_or((0.0, 0.0)))
            .collect();

        match self {
            Init::Random => Ok(Array2::from_shape_fn((k, d), |(_, j)| {
                let (lo, hi) = ranges[j];
                rng.random_range(lo..=hi)
            })),
            Init::Grid => Ok(Array2::from_shape_fn((k, d), |(i, j)| {
                let (lo, hi) = ranges[j];
                if k == 1 {
                    lo
                } else {
                    lo + (hi - lo) * i as f64 / (k - 1) as f64
                }
            })),
            Init::Shuffle => {
                if k > n {
                    return Err(Error::InvalidClusterCount {
                        requested: k,
                        n_items: n,
                    });
                }
                let rows = index::sample(rng, n, k);
                let mut reps = Array2::zeros((k, d));
                for (i, r) in rows.iter().enumerate() {
                    for j in 0..d {
                        // A missing cell would poison every density it touches.
                        reps[[i, j]] = if mask.is_observed(r, j) {
                            data[[r, j]]
                        } else {
                            mask.column_mean(data, j).unwrap_or(0.0)
                        };
                    }
                }
                Ok(reps)
            }
            Init::Given(m) => {
                if m.dim() != (k, d) {
                    return Err(Error::shape(
                        "means",
                        format!("{k}x{d}"),
                        format!("{}x{}", m.nrows(), m.ncols()),
                    ));
                }
                Ok(m.clone())
            }
        }
    }

    /// [`Init::select`] on a matrix with no missing entries.
    pub fn select_dense<R: Rng>(
        &self,
        data: ArrayView2<'_, f64>,
        k: usize,
        rng: &mut R,
    ) -> Result<Array2<f64>> {
        let (n, d) = data.dim();
        self.select(data, &Mask::full(n, d), k, rng)
    }
}
