//! Predictor constraints.

use std::io::{self, Write};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mlconstr_core::{MlConstrError, OutputType, Predictor, Result, SkGetter};
use mlconstr_model::{MVar, Model};

/// Options consumed by predictor formulations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EmbedOptions {
    /// What the output block represents.
    pub output_type: OutputType,

    /// Name used in statistics; defaults to the predictor name.
    pub name: Option<String>,

    /// Gap separating the two sides of a class threshold.
    pub epsilon: f64,
}

impl EmbedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// A predictor that can be formulated as model constraints.
pub trait Embed: Predictor {
    /// Adds the constraints tying `input` to a new output block and returns
    /// that block.
    fn embed(&self, model: &mut Model<'_>, input: &MVar, options: &EmbedOptions) -> Result<MVar>;
}

impl<P: Embed + ?Sized> Embed for &P {
    fn embed(&self, model: &mut Model<'_>, input: &MVar, options: &EmbedOptions) -> Result<MVar> {
        (**self).embed(model, input, options)
    }
}

/// Model size added by a formulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelDelta {
    pub vars: usize,
    pub constrs: usize,
    pub gen_constrs: usize,
}

impl ModelDelta {
    fn snapshot(model: &Model<'_>) -> Self {
        Self {
            vars: model.num_vars(),
            constrs: model.num_constrs(),
            gen_constrs: model.num_gen_constrs(),
        }
    }

    fn since(self, before: ModelDelta) -> Self {
        Self {
            vars: self.vars - before.vars,
            constrs: self.constrs - before.constrs,
            gen_constrs: self.gen_constrs - before.gen_constrs,
        }
    }
}

/// A fitted predictor embedded in a model.
#[derive(Debug, Clone)]
pub struct PredictorConstr<P> {
    getter: SkGetter<P>,
    input: MVar,
    output: MVar,
    name: String,
    added: ModelDelta,
}

impl<P: Predictor> PredictorConstr<P> {
    pub fn input(&self) -> &MVar {
        &self.input
    }

    pub fn output(&self) -> &MVar {
        &self.output
    }

    pub fn getter(&self) -> &SkGetter<P> {
        &self.getter
    }

    pub fn predictor(&self) -> &P {
        self.getter.predictor()
    }

    pub fn output_type(&self) -> OutputType {
        self.getter.output_type()
    }

    pub fn n_outputs(&self) -> Option<usize> {
        self.getter.n_outputs()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variables and constraints added by the formulation.
    pub fn added(&self) -> ModelDelta {
        self.added
    }

    /// Difference between the predictor's answer for the solved input and
    /// the solved output.
    ///
    /// # Errors
    ///
    /// Returns [`MlConstrError::NoSolution`] if `model` has no solution.
    pub fn get_error(&self, model: &Model<'_>) -> Result<Array2<f64>> {
        self.getter.get_error(model, &self.input, &self.output)
    }

    /// Writes a summary of the formulation.
    pub fn print_stats<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let (in_rows, in_cols) = self.input.shape();
        let (out_rows, out_cols) = self.output.shape();
        writeln!(out, "Model for {}:", self.name)?;
        writeln!(out, "{} variables", self.added.vars)?;
        writeln!(out, "{} constraints", self.added.constrs)?;
        writeln!(out, "{} general constraints", self.added.gen_constrs)?;
        writeln!(out, "Input has shape ({}, {})", in_rows, in_cols)?;
        writeln!(out, "Output has shape ({}, {})", out_rows, out_cols)?;
        Ok(())
    }
}

/// Embeds `predictor` in `model` with `input` as its input block.
///
/// # Errors
///
/// - [`MlConstrError::NotFitted`] if the predictor was never fitted.
/// - [`MlConstrError::ShapeMismatch`] if `input` does not have one column
///   per feature.
/// - [`MlConstrError::UnsupportedOutputType`] if the predictor cannot be
///   formulated for the requested output type.
pub fn add_predictor_constr<P: Embed>(
    model: &mut Model<'_>,
    predictor: P,
    input: &MVar,
    options: EmbedOptions,
) -> Result<PredictorConstr<P>> {
    let getter = SkGetter::new(predictor, options.output_type)?;

    if let Some(n_features) = getter.predictor().n_features_in() {
        if input.ncols() != n_features {
            return Err(MlConstrError::ShapeMismatch {
                expected: vec![input.nrows(), n_features],
                actual: vec![input.nrows(), input.ncols()],
            });
        }
    }

    let before = ModelDelta::snapshot(model);
    let output = getter.predictor().embed(model, input, &options)?;
    let added = ModelDelta::snapshot(model).since(before);

    let name = options
        .name
        .unwrap_or_else(|| getter.predictor().name().to_string());
    debug!(
        event = "predictor_embedded",
        predictor = %name,
        output_type = %getter.output_type(),
        vars = added.vars,
        constrs = added.constrs,
        gen_constrs = added.gen_constrs,
    );

    Ok(PredictorConstr {
        getter,
        input: *input,
        output,
        name,
        added,
    })
}
