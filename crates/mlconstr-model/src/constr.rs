//! Linear and general constraints.

use std::fmt;

use crate::var::Var;

/// Direction of a linear row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    Equal,
    LessEqual,
    GreaterEqual,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Equal => write!(f, "="),
            Sense::LessEqual => write!(f, "<="),
            Sense::GreaterEqual => write!(f, ">="),
        }
    }
}

/// `sum(coef * var) <sense> rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinConstr {
    pub terms: Vec<(Var, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinConstr {
    /// Left-hand side evaluated at `values`.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values[var.index()])
            .sum()
    }

    /// How far `values` are from satisfying the row.
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs(values);
        match self.sense {
            Sense::Equal => (lhs - self.rhs).abs(),
            Sense::LessEqual => (lhs - self.rhs).max(0.0),
            Sense::GreaterEqual => (self.rhs - lhs).max(0.0),
        }
    }
}

/// Function constraints `y = f(x)` between two scalar variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenConstr {
    /// `y = 1 / (1 + exp(-x))`
    Logistic { x: Var, y: Var },

    /// Binary `y` with `y = 1 => x >= 0` and `y = 0 => x <= -epsilon`.
    Threshold { x: Var, y: Var, epsilon: f64 },
}

impl GenConstr {
    pub fn input(&self) -> Var {
        match self {
            GenConstr::Logistic { x, .. } | GenConstr::Threshold { x, .. } => *x,
        }
    }

    pub fn output(&self) -> Var {
        match self {
            GenConstr::Logistic { y, .. } | GenConstr::Threshold { y, .. } => *y,
        }
    }

    /// Both kinds make the feasible region nonconvex.
    pub fn is_nonconvex(&self) -> bool {
        true
    }

    /// The value `y` takes for a given `x`.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            GenConstr::Logistic { .. } => sigmoid(x),
            GenConstr::Threshold { .. } => {
                if x >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// How far `values` are from satisfying the constraint.
    pub fn violation(&self, values: &[f64]) -> f64 {
        let x = values[self.input().index()];
        let y = values[self.output().index()];
        match self {
            GenConstr::Logistic { .. } => (y - sigmoid(x)).abs(),
            GenConstr::Threshold { epsilon, .. } => {
                if y >= 0.5 {
                    (-x).max(0.0)
                } else {
                    (x + epsilon).max(0.0)
                }
            }
        }
    }
}

/// Logistic function, evaluated without overflow for large `|x|`.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
