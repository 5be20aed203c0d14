//! Fixed-formulation check.
//!
//! The input block is bounded to a `1e-4` box around the examples, the
//! predictor is embedded and the model solved. The solved output must then
//! match the predictor's own answer within a tolerance proportional to the
//! largest magnitude of the output.

use std::io;

use ndarray::Array2;
use tracing::{debug, error, info_span, warn};

use mlconstr_config::EnvParams;
use mlconstr_core::{MlConstrError, Predictor, SolverError};
use mlconstr_model::{Env, Model};
use mlconstr_predictors::{add_predictor_constr, Embed, EmbedOptions, PredictorConstr};

use crate::error::HarnessError;
use crate::sampler::{CaseSampler, Combine};

/// Half width of the box fixing the input around the examples.
pub const INPUT_HALF_WIDTH: f64 = 1e-4;

/// Base tolerance for formulations with nonlinear function constraints.
pub const NONCONVEX_TOL: f64 = 5e-3;

/// Base tolerance for linear formulations.
pub const CONVEX_TOL: f64 = 1e-5;

/// Solutions violating constraints by more than this are reported.
pub const VIOLATION_WARN: f64 = 1e-5;

/// Solver parameters used by the harness: silent, nonconvex allowed.
pub fn harness_params() -> Result<EnvParams, HarnessError> {
    Ok(EnvParams::from_pairs([("OutputFlag", "0"), ("NonConvex", "2")])?)
}

/// Result of a fixed-formulation check that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum FixedOutcome {
    /// The solved output matched the prediction.
    Passed { max_error: f64, tol: f64 },
    /// The check could not run in this environment.
    Skipped { reason: String },
}

impl FixedOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, FixedOutcome::Passed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FixedOutcome::Skipped { .. })
    }
}

/// Runs fixed-formulation checks in environments built from one parameter
/// set.
#[derive(Debug, Clone)]
pub struct FixedHarness {
    params: EnvParams,
}

impl FixedHarness {
    /// A harness using [`harness_params`].
    pub fn new() -> Result<Self, HarnessError> {
        Ok(Self::with_params(harness_params()?))
    }

    pub fn with_params(params: EnvParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EnvParams {
        &self.params
    }

    /// Checks `predictor` with its input fixed at `examples`.
    pub fn run<P: Embed>(
        &self,
        predictor: P,
        examples: &Array2<f64>,
        nonconvex: bool,
        options: EmbedOptions,
    ) -> Result<FixedOutcome, HarnessError> {
        self.run_with(predictor, examples, nonconvex, options, |_| Ok(()))
    }

    /// Like [`run`](Self::run), calling `check` on the predictor constraint
    /// right after it is added.
    pub fn run_with<P, F>(
        &self,
        predictor: P,
        examples: &Array2<f64>,
        nonconvex: bool,
        options: EmbedOptions,
        check: F,
    ) -> Result<FixedOutcome, HarnessError>
    where
        P: Embed,
        F: FnOnce(&PredictorConstr<P>) -> Result<(), HarnessError>,
    {
        let env = Env::new(self.params.clone());
        let mut model = Model::new(&env, "fixed_formulation");

        let lb = examples.mapv(|v| v - INPUT_HALF_WIDTH);
        let ub = examples.mapv(|v| v + INPUT_HALF_WIDTH);
        let input = model.add_mvar_bounded(&lb, &ub)?;

        let constr = add_predictor_constr(&mut model, predictor, &input, options)?;
        check(&constr)?;

        match constr.get_error(&model) {
            Err(MlConstrError::NoSolution) => {}
            Ok(_) => return Err(HarnessError::ErrorBeforeSolve),
            Err(err) => return Err(err.into()),
        }
        constr.print_stats(&mut io::sink())?;

        if let Err(err) = model.optimize() {
            if err.solver_code() == Some(SolverError::SIZE_LIMIT) {
                warn!(predictor = constr.name(), "Limited license");
                return Ok(FixedOutcome::Skipped {
                    reason: "Model too large for limited license".to_string(),
                });
            }
            return Err(err.into());
        }

        let vio = model.max_vio()?;
        if vio > VIOLATION_WARN {
            warn!(max_vio = vio, predictor = constr.name(), "Big solution violation");
        }

        let y = model.x(constr.output())?;
        let scale = tolerance_scale(&y);
        let base = if nonconvex { NONCONVEX_TOL } else { CONVEX_TOL };
        let tol = base.max(vio) * scale;

        let abserror = constr.get_error(&model)?.mapv(f64::abs);
        let exceeded = abserror.iter().any(|e| e.is_nan() || *e > tol);
        let max_error = abserror.iter().copied().fold(0.0, f64::max);

        if exceeded {
            let predicted = constr.predictor().predict(examples.view())?;
            error!(
                predictor = constr.name(),
                max_error,
                tol,
                "Error: {} != {}",
                y,
                predicted
            );
            return Err(HarnessError::ToleranceExceeded { max_error, tol });
        }

        debug!(predictor = constr.name(), max_error, tol, "fixed formulation matches");
        Ok(FixedOutcome::Passed { max_error, tol })
    }
}

/// Largest magnitude of the solved output; an all-zero output leaves the
/// base tolerance unscaled.
pub fn tolerance_scale(y: &Array2<f64>) -> f64 {
    let max = y.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if max == 0.0 {
        1.0
    } else {
        max
    }
}

/// Checks `predictor` with [`harness_params`].
pub fn fixed_model<P: Embed>(
    predictor: P,
    examples: &Array2<f64>,
    nonconvex: bool,
    options: EmbedOptions,
) -> Result<FixedOutcome, HarnessError> {
    FixedHarness::new()?.run(predictor, examples, nonconvex, options)
}

/// Like [`fixed_model`], with a check on the freshly added constraint.
pub fn fixed_model_with<P, F>(
    predictor: P,
    examples: &Array2<f64>,
    nonconvex: bool,
    options: EmbedOptions,
    check: F,
) -> Result<FixedOutcome, HarnessError>
where
    P: Embed,
    F: FnOnce(&PredictorConstr<P>) -> Result<(), HarnessError>,
{
    FixedHarness::new()?.run_with(predictor, examples, nonconvex, options, check)
}

/// Samples a case from `x` and checks `predictor` on it.
pub fn run_case<P: Embed>(
    sampler: &mut CaseSampler,
    predictor: P,
    x: &Array2<f64>,
    n_sample: usize,
    combine: Combine,
    nonconvex: bool,
    options: EmbedOptions,
) -> Result<FixedOutcome, HarnessError> {
    let case = sampler.sample(x, n_sample, combine)?;
    let span = info_span!(
        "case",
        predictor = predictor.name(),
        n_sample,
        combine = %combine,
    );
    let _guard = span.enter();
    debug!(choice = ?case.choice, "sampled examples");
    fixed_model(predictor, &case.examples, nonconvex, options)
}
