//! Harness failures.

use std::io;

use thiserror::Error;

use mlconstr_config::ConfigError;
use mlconstr_core::MlConstrError;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// The error check succeeded on a model that was never solved.
    #[error("get_error returned a value before the model was solved")]
    ErrorBeforeSolve,

    /// The solved output is too far from the predictor's answer.
    #[error("max absolute error {max_error:e} exceeds tolerance {tol:e}")]
    ToleranceExceeded { max_error: f64, tol: f64 },

    /// The sampled case cannot be built.
    #[error("invalid case: {0}")]
    InvalidCase(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] MlConstrError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
