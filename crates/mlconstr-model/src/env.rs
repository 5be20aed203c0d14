//! Solver environment.

use mlconstr_config::{ConfigError, EnvParams};

/// A solver environment.
///
/// Models borrow their environment, so an environment always outlives the
/// models built in it and both are released when they go out of scope.
#[derive(Debug, Clone, Default)]
pub struct Env {
    params: EnvParams,
}

impl Env {
    pub fn new(params: EnvParams) -> Self {
        Self { params }
    }

    /// Creates an environment from `(name, value)` parameter pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(Self::new(EnvParams::from_pairs(pairs)?))
    }

    pub fn params(&self) -> &EnvParams {
        &self.params
    }
}
