//! Host optimization model for predictor constraints.
//!
//! An [`Env`] carries solver parameters; a [`Model`] borrows it and holds
//! variable blocks ([`MVar`]), linear rows and general function constraints.
//! [`Model::optimize`] runs a propagation engine meant for fixed
//! formulations: variables pinned by tight bounds are fixed, and every other
//! value follows from equalities and function constraints.
//!
//! Logging levels:
//! - **INFO**: optimize start/end (only when `OutputFlag` is non-zero)
//! - **DEBUG**: propagation passes
//! - **TRACE**: individual variable fixings, model disposal
//!
//! # Example
//!
//! ```
//! use mlconstr_config::EnvParams;
//! use mlconstr_model::{Env, Model, Sense, Status};
//!
//! let env = Env::new(EnvParams::new().with_output_flag(0));
//! let mut model = Model::new(&env, "sum");
//! let x = model.add_mvar((1, 2), 0.999, 1.001);
//! let y = model.add_mvar((1, 1), f64::NEG_INFINITY, f64::INFINITY);
//! model.add_linear(
//!     &[(y.at(0, 0), 1.0), (x.at(0, 0), -1.0), (x.at(0, 1), -1.0)],
//!     Sense::Equal,
//!     0.0,
//! );
//! model.optimize().unwrap();
//!
//! assert_eq!(model.status(), Status::Optimal);
//! assert!((model.x(&y).unwrap()[(0, 0)] - 2.0).abs() < 1e-9);
//! ```

pub mod constr;
pub mod env;
pub mod model;
mod propagate;
pub mod stats;
pub mod status;
pub mod var;


pub use constr::{sigmoid, GenConstr, LinConstr, Sense};
pub use env::Env;
pub use model::Model;
pub use stats::OptimizeStats;
pub use status::Status;
pub use var::{MVar, Var, VarType};
