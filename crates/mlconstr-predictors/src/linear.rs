//! Linear regression.

use ndarray::{Array1, Array2, ArrayD, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use mlconstr_core::{MlConstrError, OutputType, Predictor, Result};
use mlconstr_model::{MVar, Model, Sense, Var};

use crate::embed::{Embed, EmbedOptions};

/// Serialized parameters of a fitted [`LinearRegression`].
///
/// `coef` holds one row of feature weights per target.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LinearParams {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
struct LinearFit {
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

/// Affine regressor `y = coef · x + intercept`.
///
/// The default value is unfitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearRegression {
    fit: Option<LinearFit>,
}

impl LinearRegression {
    /// Builds a fitted regressor from a `(n_targets, n_features)` weight
    /// matrix and one intercept per target.
    pub fn new(coef: Array2<f64>, intercept: Array1<f64>) -> Result<Self> {
        if coef.nrows() != intercept.len() {
            return Err(MlConstrError::InvalidParameters(format!(
                "{} coefficient rows for {} intercepts",
                coef.nrows(),
                intercept.len()
            )));
        }
        if coef.nrows() == 0 || coef.ncols() == 0 {
            return Err(MlConstrError::InvalidParameters(
                "linear regression needs at least one target and one feature".to_string(),
            ));
        }
        if coef.iter().chain(intercept.iter()).any(|v| !v.is_finite()) {
            return Err(MlConstrError::InvalidParameters(
                "linear regression parameters must be finite".to_string(),
            ));
        }
        Ok(Self {
            fit: Some(LinearFit { coef, intercept }),
        })
    }

    pub fn from_params(params: &LinearParams) -> Result<Self> {
        let n_targets = params.coef.len();
        let n_features = params.coef.first().map_or(0, Vec::len);
        if params.coef.iter().any(|row| row.len() != n_features) {
            return Err(MlConstrError::InvalidParameters(
                "coefficient rows differ in length".to_string(),
            ));
        }
        let flat: Vec<f64> = params.coef.iter().flatten().copied().collect();
        let coef = Array2::from_shape_vec((n_targets, n_features), flat)?;
        Self::new(coef, Array1::from(params.intercept.clone()))
    }

    /// Parses [`LinearParams`] from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: LinearParams = serde_json::from_str(json)
            .map_err(|e| MlConstrError::InvalidParameters(e.to_string()))?;
        Self::from_params(&params)
    }

    pub fn params(&self) -> Option<LinearParams> {
        self.fit.as_ref().map(|fit| LinearParams {
            coef: fit.coef.outer_iter().map(|row| row.to_vec()).collect(),
            intercept: fit.intercept.to_vec(),
        })
    }

    fn fitted(&self) -> Result<&LinearFit> {
        self.fit.as_ref().ok_or_else(|| MlConstrError::NotFitted {
            predictor: self.name().to_string(),
        })
    }
}

impl Predictor for LinearRegression {
    fn name(&self) -> &str {
        "LinearRegression"
    }

    fn is_fitted(&self) -> bool {
        self.fit.is_some()
    }

    fn n_outputs(&self) -> Option<usize> {
        self.fit.as_ref().map(|fit| fit.coef.nrows())
    }

    fn n_features_in(&self) -> Option<usize> {
        self.fit.as_ref().map(|fit| fit.coef.ncols())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<ArrayD<f64>> {
        let fit = self.fitted()?;
        if x.ncols() != fit.coef.ncols() {
            return Err(MlConstrError::ShapeMismatch {
                expected: vec![x.nrows(), fit.coef.ncols()],
                actual: x.shape().to_vec(),
            });
        }
        let y = x.dot(&fit.coef.t()) + &fit.intercept;
        if fit.coef.nrows() == 1 {
            Ok(y.index_axis_move(Axis(1), 0).into_dyn())
        } else {
            Ok(y.into_dyn())
        }
    }
}

impl Embed for LinearRegression {
    fn embed(&self, model: &mut Model<'_>, input: &MVar, options: &EmbedOptions) -> Result<MVar> {
        if options.output_type != OutputType::Regular {
            return Err(MlConstrError::UnsupportedOutputType {
                predictor: self.name().to_string(),
                output_type: options.output_type,
            });
        }
        let fit = self.fitted()?;
        let output = model.add_mvar(
            (input.nrows(), fit.coef.nrows()),
            f64::NEG_INFINITY,
            f64::INFINITY,
        );

        for i in 0..input.nrows() {
            for (t, weights) in fit.coef.outer_iter().enumerate() {
                // y - coef . x = intercept
                let mut terms: Vec<(Var, f64)> = vec![(output.at(i, t), 1.0)];
                terms.extend(
                    input
                        .row(i)
                        .zip(weights.iter())
                        .filter(|(_, w)| **w != 0.0)
                        .map(|(var, w)| (var, -w)),
                );
                model.add_linear(&terms, Sense::Equal, fit.intercept[t]);
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_default_is_unfitted() {
        let reg = LinearRegression::default();
        assert!(!reg.is_fitted());
        assert_eq!(reg.n_outputs(), None);
        assert!(matches!(
            reg.predict(array![[1.0]].view()),
            Err(MlConstrError::NotFitted { .. })
        ));
    }

    #[test]
    fn test_single_target_predicts_vector() {
        let reg = LinearRegression::new(array![[2.0, -1.0]], array![3.0]).unwrap();
        let y = reg.predict(array![[0.2, 5.1], [1.0, 1.0]].view()).unwrap();

        assert_eq!(y.ndim(), 1);
        assert!((y[[0]] - (0.4 - 5.1 + 3.0)).abs() < 1e-12);
        assert!((y[[1]] - 4.0).abs() < 1e-12);
        assert_eq!(reg.n_outputs(), Some(1));
        assert_eq!(reg.n_features_in(), Some(2));
    }

    #[test]
    fn test_multi_target_predicts_matrix() {
        let reg =
            LinearRegression::new(array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]], array![0.0, 1.0, 2.0])
                .unwrap();
        let y = reg.predict(array![[3.0, 4.0]].view()).unwrap();

        assert_eq!(y.shape(), &[1, 3]);
        assert_eq!(y[[0, 0]], 3.0);
        assert_eq!(y[[0, 1]], 5.0);
        assert_eq!(y[[0, 2]], 9.0);
    }

    #[test]
    fn test_feature_count_checked() {
        let reg = LinearRegression::new(array![[1.0, 1.0]], array![0.0]).unwrap();
        let err = reg.predict(array![[1.0, 2.0, 3.0]].view()).unwrap_err();
        assert!(matches!(err, MlConstrError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_inconsistent_parameters_rejected() {
        let err = LinearRegression::new(array![[1.0, 1.0]], array![0.0, 1.0]).unwrap_err();
        assert!(matches!(err, MlConstrError::InvalidParameters(_)));

        let params = LinearParams {
            coef: vec![vec![1.0, 2.0], vec![1.0]],
            intercept: vec![0.0, 0.0],
        };
        assert!(LinearRegression::from_params(&params).is_err());
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        let err = LinearRegression::new(array![[f64::NAN]], array![0.0]).unwrap_err();
        assert!(matches!(err, MlConstrError::InvalidParameters(_)));

        let err = LinearRegression::new(array![[1.0]], array![f64::INFINITY]).unwrap_err();
        assert!(matches!(err, MlConstrError::InvalidParameters(_)));
    }

    #[test]
    fn test_from_json() {
        let reg =
            LinearRegression::from_json(r#"{"coef": [[0.5, 1.5, -2.0]], "intercept": [0.25]}"#)
                .unwrap();
        assert_eq!(reg.n_features_in(), Some(3));
        assert_eq!(
            reg.params().unwrap(),
            LinearParams {
                coef: vec![vec![0.5, 1.5, -2.0]],
                intercept: vec![0.25],
            }
        );

        let err = LinearRegression::from_json("{\"coef\": 1}").unwrap_err();
        assert!(matches!(err, MlConstrError::InvalidParameters(_)));
    }
}
