//! mlconstr - Fitted predictors as optimization model constraints
//!
//! Embed a fitted predictor in a [`Model`], solve, and check the solved
//! output against the predictor's own answer.
//!
//! # Example
//!
//! ```rust
//! use mlconstr::prelude::*;
//! use ndarray::array;
//!
//! let env = Env::new(EnvParams::new().with_output_flag(0));
//! let mut model = Model::new(&env, "example");
//! let x = model
//!     .add_mvar_bounded(&array![[0.1999, 5.0999]], &array![[0.2001, 5.1001]])
//!     .unwrap();
//!
//! let reg = LinearRegression::new(array![[2.0, -1.0]], array![3.0]).unwrap();
//! let constr = add_predictor_constr(&mut model, reg, &x, EmbedOptions::new()).unwrap();
//! model.optimize().unwrap();
//!
//! let error = constr.get_error(&model).unwrap();
//! assert!(error[(0, 0)].abs() < 1e-9);
//! ```

pub use mlconstr_config::{ConfigError, EnvParams};
pub use mlconstr_core::{
    as_column_matrix, check_is_fitted, without_warnings, MlConstrError, OutputType, Predictor,
    Result, SkGetter, SolutionView, SolverError,
};
pub use mlconstr_model::{Env, MVar, Model, OptimizeStats, Sense, Status, Var, VarType};
pub use mlconstr_predictors::{
    add_predictor_constr, Embed, EmbedOptions, LinearParams, LinearRegression, LogisticParams,
    LogisticRegression, ModelDelta, PredictorConstr,
};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{add_predictor_constr, Embed, EmbedOptions, PredictorConstr};
    pub use super::{Env, EnvParams, MVar, Model, Status};
    pub use super::{LinearRegression, LogisticRegression};
    pub use super::{MlConstrError, OutputType, Predictor, SkGetter};
}
