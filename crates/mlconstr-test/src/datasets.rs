//! Deterministic data and fitted predictors for fixed-formulation tests.

use ndarray::{array, Array2};

use mlconstr_core::Result;
use mlconstr_predictors::{LinearRegression, LogisticRegression};

/// A single example row, `[[0.2, 5.1, -3.0]]`.
pub fn example_row() -> Array2<f64> {
    array![[0.2, 5.1, -3.0]]
}

/// Eight rows of three features; the first row is [`example_row`].
pub fn features() -> Array2<f64> {
    array![
        [0.2, 5.1, -3.0],
        [1.4, 3.2, 0.7],
        [-0.8, 4.4, -1.9],
        [2.1, 2.9, 1.3],
        [0.0, 6.0, -2.5],
        [-1.5, 3.8, 0.2],
        [0.9, 5.5, -0.6],
        [1.1, 4.1, -2.2],
    ]
}

/// Regressor on [`features`] with a single target.
pub fn regressor() -> Result<LinearRegression> {
    LinearRegression::new(array![[1.5, -0.4, 2.0]], array![0.7])
}

/// Regressor on [`features`] with two targets.
pub fn multi_regressor() -> Result<LinearRegression> {
    LinearRegression::new(array![[1.5, -0.4, 2.0], [-0.3, 0.8, 0.1]], array![0.7, -1.2])
}

/// Binary classifier on [`features`]; the classes split the rows.
pub fn classifier() -> Result<LogisticRegression> {
    LogisticRegression::new(array![0.9, -0.2, 0.6], 0.8)
}
