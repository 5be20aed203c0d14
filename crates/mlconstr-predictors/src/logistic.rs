//! Binary logistic regression.

use ndarray::{stack, Array1, Array2, ArrayD, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::warn;

use mlconstr_core::{MlConstrError, OutputType, Predictor, Result};
use mlconstr_model::{MVar, Model, Sense, Var, VarType};

use crate::embed::{Embed, EmbedOptions};

/// Decision values beyond this magnitude overflow the sigmoid to 0 or 1.
const SATURATION: f64 = 35.0;

/// Serialized parameters of a fitted [`LogisticRegression`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogisticParams {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct LogisticFit {
    coef: Array1<f64>,
    intercept: f64,
}

/// Binary classifier with classes `0` and `1`.
///
/// The probability of class 1 is `1 / (1 + exp(-(coef · x + intercept)))`.
/// The predictor does not declare an output count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogisticRegression {
    fit: Option<LogisticFit>,
}

impl LogisticRegression {
    pub fn new(coef: Array1<f64>, intercept: f64) -> Result<Self> {
        if coef.is_empty() {
            return Err(MlConstrError::InvalidParameters(
                "logistic regression needs at least one feature".to_string(),
            ));
        }
        if coef.iter().any(|v| !v.is_finite()) || !intercept.is_finite() {
            return Err(MlConstrError::InvalidParameters(
                "logistic regression parameters must be finite".to_string(),
            ));
        }
        Ok(Self {
            fit: Some(LogisticFit { coef, intercept }),
        })
    }

    pub fn from_params(params: &LogisticParams) -> Result<Self> {
        Self::new(Array1::from(params.coef.clone()), params.intercept)
    }

    /// Parses [`LogisticParams`] from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: LogisticParams = serde_json::from_str(json)
            .map_err(|e| MlConstrError::InvalidParameters(e.to_string()))?;
        Self::from_params(&params)
    }

    pub fn params(&self) -> Option<LogisticParams> {
        self.fit.as_ref().map(|fit| LogisticParams {
            coef: fit.coef.to_vec(),
            intercept: fit.intercept,
        })
    }

    fn fitted(&self) -> Result<&LogisticFit> {
        self.fit.as_ref().ok_or_else(|| MlConstrError::NotFitted {
            predictor: self.name().to_string(),
        })
    }

    /// Decision values `coef · x + intercept`, one per row.
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let fit = self.fitted()?;
        if x.ncols() != fit.coef.len() {
            return Err(MlConstrError::ShapeMismatch {
                expected: vec![x.nrows(), fit.coef.len()],
                actual: x.shape().to_vec(),
            });
        }
        Ok(x.dot(&fit.coef) + fit.intercept)
    }
}

impl Predictor for LogisticRegression {
    fn name(&self) -> &str {
        "LogisticRegression"
    }

    fn is_fitted(&self) -> bool {
        self.fit.is_some()
    }

    fn n_features_in(&self) -> Option<usize> {
        self.fit.as_ref().map(|fit| fit.coef.len())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<ArrayD<f64>> {
        let z = self.decision_function(x)?;
        Ok(z.mapv(|z| if z >= 0.0 { 1.0 } else { 0.0 }).into_dyn())
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let z = self.decision_function(x)?;
        let saturated = z.iter().filter(|z| z.abs() > SATURATION).count();
        if saturated > 0 {
            warn!(
                predictor = self.name(),
                saturated,
                "decision value saturates the logistic function"
            );
        }
        let p = z.mapv(|z| 1.0 / (1.0 + (-z).exp()));
        let q = p.mapv(|p| 1.0 - p);
        Ok(stack(Axis(1), &[q.view(), p.view()])?)
    }
}

impl Embed for LogisticRegression {
    fn embed(&self, model: &mut Model<'_>, input: &MVar, options: &EmbedOptions) -> Result<MVar> {
        let fit = self.fitted()?;
        let n = input.nrows();

        let z = model.add_mvar((n, 1), f64::NEG_INFINITY, f64::INFINITY);
        for i in 0..n {
            let mut terms: Vec<(Var, f64)> = vec![(z.at(i, 0), 1.0)];
            terms.extend(
                input
                    .row(i)
                    .zip(fit.coef.iter())
                    .filter(|(_, w)| **w != 0.0)
                    .map(|(var, w)| (var, -w)),
            );
            model.add_linear(&terms, Sense::Equal, fit.intercept);
        }

        let output = match options.output_type {
            OutputType::Regular => {
                let output = model.add_mvar_typed((n, 1), 0.0, 1.0, VarType::Binary);
                for i in 0..n {
                    model.add_threshold(z.at(i, 0), output.at(i, 0), options.epsilon);
                }
                output
            }
            OutputType::ProbabilityPositiveClass => {
                let output = model.add_mvar((n, 1), 0.0, 1.0);
                for i in 0..n {
                    model.add_logistic(z.at(i, 0), output.at(i, 0));
                }
                output
            }
            OutputType::Probability => {
                let output = model.add_mvar((n, 2), 0.0, 1.0);
                for i in 0..n {
                    model.add_logistic(z.at(i, 0), output.at(i, 1));
                    model.add_linear(
                        &[(output.at(i, 0), 1.0), (output.at(i, 1), 1.0)],
                        Sense::Equal,
                        1.0,
                    );
                }
                output
            }
        };
        Ok(output)
    }
}
