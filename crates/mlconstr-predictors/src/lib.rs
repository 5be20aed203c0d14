//! Fitted predictors and their embedding as model constraints.
//!
//! - [`LinearRegression`] - affine regressor, one or more targets
//! - [`LogisticRegression`] - binary classifier with class labels or
//!   probabilities as output
//! - [`add_predictor_constr`] - adds a predictor's input/output relationship
//!   to a [`Model`](mlconstr_model::Model) and returns a [`PredictorConstr`]

pub mod embed;
pub mod linear;
pub mod logistic;

pub use embed::{add_predictor_constr, Embed, EmbedOptions, ModelDelta, PredictorConstr};
pub use linear::{LinearParams, LinearRegression};
pub use logistic::{LogisticParams, LogisticRegression};
