//! Error types for mlconstr

use thiserror::Error;

use crate::output_type::OutputType;

/// Main error type for mlconstr operations
#[derive(Debug, Error)]
pub enum MlConstrError {
    /// The predictor was never fitted
    #[error("This {predictor} instance is not fitted yet")]
    NotFitted { predictor: String },

    /// The host model has no solution to read values from
    #[error("No solution available")]
    NoSolution,

    /// The predictor cannot produce the requested kind of output
    #[error("Output type \"{output_type}\" is not supported by {predictor}")]
    UnsupportedOutputType {
        predictor: String,
        output_type: OutputType,
    },

    /// Two arrays that must line up do not
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Array reshaping failed
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Predictor parameters are inconsistent
    #[error("Invalid predictor parameters: {0}")]
    InvalidParameters(String),

    /// Invalid operation for the current model state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Error reported by the optimization engine
    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl MlConstrError {
    /// Returns the solver error code, if this error came from the solver.
    pub fn solver_code(&self) -> Option<i32> {
        match self {
            MlConstrError::Solver(err) => Some(err.code),
            _ => None,
        }
    }
}

/// An error raised by the optimization engine, identified by a numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Solver error {code}: {message}")]
pub struct SolverError {
    pub code: i32,
    pub message: String,
}

impl SolverError {
    /// An argument passed to a model method is invalid.
    pub const INVALID_ARGUMENT: i32 = 10003;
    /// The model is too large for the current (size-limited) license.
    pub const SIZE_LIMIT: i32 = 10010;
    /// The model holds nonconvex constraints but NonConvex is not set to 2.
    pub const NONCONVEX: i32 = 10020;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns true when the error reflects a license capacity limit.
    pub fn is_size_limited(&self) -> bool {
        self.code == Self::SIZE_LIMIT
    }
}

/// Result type alias for mlconstr operations
pub type Result<T> = std::result::Result<T, MlConstrError>;
