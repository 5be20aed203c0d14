//! Predictor wrapper and solution-dependent error check.
//!
//! [`SkGetter`] is the part of every predictor constraint that does not
//! depend on how the predictor is formulated: it keeps the fitted predictor
//! and its declared output semantics, and compares a solved model against
//! what the predictor itself answers for the solved input.

use ndarray::{Array2, ArrayD, ArrayView2, Ix2};

use crate::error::{MlConstrError, Result};
use crate::output_type::OutputType;
use crate::predictor::{check_is_fitted, Predictor};
use crate::quiet::without_warnings;

/// Read access to a solved host model.
///
/// Implemented by optimization models so the error check can read the values
/// of the input and output variable blocks of an embedded predictor.
pub trait SolutionView {
    /// Handle of a block of variables.
    type Var;

    /// Returns true if the model currently holds a feasible assignment.
    fn has_solution(&self) -> bool;

    /// Values of a variable block in the current solution.
    fn values(&self, var: &Self::Var) -> Result<Array2<f64>>;
}

/// Wraps a fitted predictor together with its declared output type.
#[derive(Debug, Clone)]
pub struct SkGetter<P> {
    predictor: P,
    output_type: OutputType,
    n_outputs: Option<usize>,
}

impl<P: Predictor> SkGetter<P> {
    /// Wraps `predictor`.
    ///
    /// # Errors
    ///
    /// Returns [`MlConstrError::NotFitted`] if the predictor was never fitted.
    pub fn new(predictor: P, output_type: OutputType) -> Result<Self> {
        check_is_fitted(&predictor)?;
        let n_outputs = predictor.n_outputs();
        Ok(Self {
            predictor,
            output_type,
            n_outputs,
        })
    }

    /// The wrapped predictor.
    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    /// Output count declared by the predictor, if it reports one.
    pub fn n_outputs(&self) -> Option<usize> {
        self.n_outputs
    }

    /// Returns `predict(x) - y` for the solved input `x` and output `y`.
    ///
    /// The prediction follows the output type: raw predictions for
    /// `Regular`, the probability matrix for `Probability`, and its second
    /// column for `ProbabilityPositiveClass`. One-dimensional predictions are
    /// compared as a column.
    ///
    /// # Errors
    ///
    /// Returns [`MlConstrError::NoSolution`] if the model has no solution
    /// (not optimized yet, or infeasible).
    pub fn get_error<S: SolutionView>(
        &self,
        model: &S,
        input: &S::Var,
        output: &S::Var,
    ) -> Result<Array2<f64>> {
        if !model.has_solution() {
            return Err(MlConstrError::NoSolution);
        }
        let x = model.values(input)?;
        let predicted = without_warnings(|| self.predict_output(x.view()))?;
        let solved = model.values(output)?;
        if predicted.dim() != solved.dim() {
            return Err(MlConstrError::ShapeMismatch {
                expected: solved.shape().to_vec(),
                actual: predicted.shape().to_vec(),
            });
        }
        Ok(predicted - &solved)
    }

    /// Prediction for `x` in the shape of the embedded output block.
    pub fn predict_output(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let predicted = match self.output_type {
            OutputType::Regular => self.predictor.predict(x)?,
            OutputType::Probability => self.predictor.predict_proba(x)?.into_dyn(),
            OutputType::ProbabilityPositiveClass => {
                let proba = self.predictor.predict_proba(x)?;
                if proba.ncols() < 2 {
                    return Err(MlConstrError::ShapeMismatch {
                        expected: vec![proba.nrows(), 2],
                        actual: proba.shape().to_vec(),
                    });
                }
                proba.column(1).to_owned().into_dyn()
            }
        };
        as_column_matrix(predicted)
    }
}

/// Turns a `(n,)` array into an `(n, 1)` column; 2-D arrays pass through.
pub fn as_column_matrix(values: ArrayD<f64>) -> Result<Array2<f64>> {
    match values.ndim() {
        1 => {
            let n = values.len();
            Ok(values.into_shape((n, 1))?)
        }
        2 => Ok(values.into_dimensionality::<Ix2>()?),
        _ => Err(MlConstrError::ShapeMismatch {
            expected: vec![values.len(), 1],
            actual: values.shape().to_vec(),
        }),
    }
}
