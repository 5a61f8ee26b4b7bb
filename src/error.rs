use thiserror::Error;

/// Result alias for `mixfill`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the estimator, the initializer and the imputer.
///
/// All of these are configuration errors raised before any EM iteration runs,
/// except [`Error::ConvergenceFailure`], which only occurs when an iteration cap
/// was configured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input matrix has no rows or no columns.
    #[error("empty input provided")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Invalid number of clusters requested.
    #[error("cannot draw {requested} representatives from {n_items} rows")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of rows available.
        n_items: usize,
    },

    /// A supplied parameter does not have the shape implied by K and D.
    #[error("shape mismatch for '{name}': expected {expected}, actual {actual}")]
    ShapeMismatch {
        /// Parameter name.
        name: &'static str,
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// Initialization strategy name not recognized.
    #[error("unrecognized initialization strategy '{0}'")]
    UnknownStrategy(String),

    /// The `given` strategy was requested without a seed matrix.
    #[error("strategy 'given' requires a seed matrix")]
    MissingSeedMatrix,

    /// A column to be imputed has no observed entry to learn a fill from.
    #[error("column {0} has no observed entry")]
    EmptyColumn(usize),

    /// Cosine of a vector with zero norm.
    #[error("cosine is undefined for a zero-norm vector")]
    ZeroNorm,

    /// EM did not converge within the configured iteration cap.
    #[error("did not converge after {iterations} iterations")]
    ConvergenceFailure {
        /// Number of iterations attempted.
        iterations: usize,
    },
}

impl Error {
    pub(crate) fn shape(name: &'static str, expected: impl ToString, actual: impl ToString) -> Self {
        Error::ShapeMismatch {
            name,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
