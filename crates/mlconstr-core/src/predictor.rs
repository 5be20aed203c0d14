//! The predictor abstraction.
//!
//! A [`Predictor`] is a fitted statistical model. The wrapper and the
//! embeddings only need a handful of capabilities from it; anything optional
//! is modeled as an `Option` rather than discovered at runtime.

use ndarray::{Array2, ArrayD, ArrayView2};

use crate::error::{MlConstrError, Result};
use crate::output_type::OutputType;

/// A fitted model producing predictions from input features.
///
/// # Example
///
/// ```
/// use mlconstr_core::{Predictor, Result};
/// use ndarray::{ArrayD, ArrayView2, Axis};
///
/// struct RowSum;
///
/// impl Predictor for RowSum {
///     fn name(&self) -> &str {
///         "RowSum"
///     }
///
///     fn is_fitted(&self) -> bool {
///         true
///     }
///
///     fn predict(&self, x: ArrayView2<f64>) -> Result<ArrayD<f64>> {
///         Ok(x.sum_axis(Axis(1)).into_dyn())
///     }
/// }
///
/// let x = ndarray::array![[1.0, 2.0], [3.0, 4.0]];
/// let y = RowSum.predict(x.view()).unwrap();
/// assert_eq!(y.as_slice().unwrap(), &[3.0, 7.0]);
/// ```
pub trait Predictor {
    /// Human readable name of the predictor kind.
    fn name(&self) -> &str;

    /// Returns true once the predictor holds fitted parameters.
    fn is_fitted(&self) -> bool;

    /// Number of outputs the predictor declares, when it reports one.
    fn n_outputs(&self) -> Option<usize> {
        None
    }

    /// Number of input features the predictor was fitted on, if known.
    fn n_features_in(&self) -> Option<usize> {
        None
    }

    /// Raw predictions, shaped `(n_samples,)` or `(n_samples, n_outputs)`.
    fn predict(&self, x: ArrayView2<f64>) -> Result<ArrayD<f64>>;

    /// Class probabilities, shaped `(n_samples, n_classes)`.
    fn predict_proba(&self, _x: ArrayView2<f64>) -> Result<Array2<f64>> {
        Err(MlConstrError::UnsupportedOutputType {
            predictor: self.name().to_string(),
            output_type: OutputType::Probability,
        })
    }
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_fitted(&self) -> bool {
        (**self).is_fitted()
    }

    fn n_outputs(&self) -> Option<usize> {
        (**self).n_outputs()
    }

    fn n_features_in(&self) -> Option<usize> {
        (**self).n_features_in()
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<ArrayD<f64>> {
        (**self).predict(x)
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        (**self).predict_proba(x)
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_fitted(&self) -> bool {
        (**self).is_fitted()
    }

    fn n_outputs(&self) -> Option<usize> {
        (**self).n_outputs()
    }

    fn n_features_in(&self) -> Option<usize> {
        (**self).n_features_in()
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<ArrayD<f64>> {
        (**self).predict(x)
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        (**self).predict_proba(x)
    }
}

/// Fails with [`MlConstrError::NotFitted`] unless the predictor is fitted.
pub fn check_is_fitted<P: Predictor + ?Sized>(predictor: &P) -> Result<()> {
    if predictor.is_fitted() {
        Ok(())
    } else {
        Err(MlConstrError::NotFitted {
            predictor: predictor.name().to_string(),
        })
    }
}
