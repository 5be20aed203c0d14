//! Optimization status.

use std::fmt;

/// Where a model is in its lifecycle.
///
/// A model starts `Loaded`, moves to `Optimal` or `Infeasible` after
/// [`Model::optimize`](crate::Model::optimize), and returns to `Loaded`
/// whenever it is modified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// Built but not solved since the last change.
    #[default]
    Loaded,
    /// Solved; the assignment satisfies every constraint within tolerance.
    Optimal,
    /// Solved; no assignment within tolerance was found.
    Infeasible,
}

impl Status {
    pub fn has_solution(&self) -> bool {
        matches!(self, Status::Optimal)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Loaded => write!(f, "LOADED"),
            Status::Optimal => write!(f, "OPTIMAL"),
            Status::Infeasible => write!(f, "INFEASIBLE"),
        }
    }
}
