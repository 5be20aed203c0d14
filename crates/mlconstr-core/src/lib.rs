//! mlconstr Core - Core types and traits for predictor constraints
//!
//! This crate provides the fundamental abstractions for mlconstr:
//! - The [`Predictor`] trait implemented by fitted models
//! - [`OutputType`] describing what an embedded output represents
//! - [`SkGetter`], which wraps a fitted predictor and measures how far a
//!   solved model is from the predictor's own answer
//! - The error taxonomy shared by every crate in the workspace

pub mod error;
pub mod getter;
pub mod output_type;
pub mod predictor;
pub mod quiet;


pub use error::{MlConstrError, Result, SolverError};
pub use getter::{as_column_matrix, SkGetter, SolutionView};
pub use output_type::OutputType;
pub use predictor::{check_is_fitted, Predictor};
pub use quiet::without_warnings;
