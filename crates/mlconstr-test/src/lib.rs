//! Fixed-formulation test harness for mlconstr.
//!
//! Fixing the input of an embedded predictor leaves the model no freedom, so
//! the solved output must agree with what the predictor itself answers.
//!
//! - [`fixed`] - build, solve and check one fixed formulation
//! - [`sampler`] - seeded selection and combination of example rows
//! - [`datasets`] - small deterministic feature matrices and fitted predictors
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! mlconstr-test = { workspace = true }
//! ```

pub mod datasets;
pub mod error;
pub mod fixed;
pub mod sampler;

pub use error::HarnessError;
pub use fixed::{
    fixed_model, fixed_model_with, harness_params, run_case, tolerance_scale, FixedHarness,
    FixedOutcome,
};
pub use sampler::{Case, CaseSampler, Combine};
