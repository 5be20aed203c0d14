//! Solver environment parameters for mlconstr.
//!
//! Load environment parameters from TOML or YAML to control solver logging,
//! nonconvex handling and license limits without code changes.
//!
//! # Examples
//!
//! Load parameters from a TOML string:
//!
//! ```
//! use mlconstr_config::EnvParams;
//!
//! let params = EnvParams::from_toml_str(r#"
//!     OutputFlag = 0
//!     NonConvex = 2
//! "#).unwrap();
//!
//! assert_eq!(params.output_flag, 0);
//! assert!(params.allows_nonconvex());
//! ```
//!
//! Use defaults when the file is missing:
//!
//! ```
//! use mlconstr_config::EnvParams;
//!
//! let params = EnvParams::load("mlconstr.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```
//!
//! Set parameters by name, the way a parameter mapping is applied:
//!
//! ```
//! use mlconstr_config::EnvParams;
//!
//! let params = EnvParams::from_pairs([("OutputFlag", "0"), ("NonConvex", "2")]).unwrap();
//! assert_eq!(params.non_convex, 2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// NonConvex value that allows nonconvex constraints.
pub const NON_CONVEX_ALLOWED: i32 = 2;

/// Parameters of a solver environment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EnvParams {
    /// Solver logging; 0 suppresses it.
    #[serde(alias = "OutputFlag")]
    pub output_flag: i32,

    /// Nonconvex handling; 2 allows nonconvex constraints.
    #[serde(alias = "NonConvex")]
    pub non_convex: i32,

    /// Largest violation a solution may have and still count as feasible.
    #[serde(alias = "FeasibilityTol")]
    pub feasibility_tol: f64,

    /// Maximum number of variables or constraints the license allows.
    #[serde(alias = "SizeLimit")]
    pub size_limit: Option<usize>,
}

impl Default for EnvParams {
    fn default() -> Self {
        Self {
            output_flag: 1,
            non_convex: -1,
            feasibility_tol: 1e-6,
            size_limit: None,
        }
    }
}

impl EnvParams {
    /// Creates default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads parameters from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses parameters from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let params: Self = toml::from_str(s)?;
        params.validate()
    }

    /// Loads parameters from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses parameters from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_yaml::from_str(s)?;
        params.validate()
    }

    /// Builds parameters from `(name, value)` pairs applied over the defaults.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        for (name, value) in pairs {
            params.set_param(name.as_ref(), value.as_ref())?;
        }
        Ok(params)
    }

    /// Sets a parameter by name.
    ///
    /// Names are matched case-insensitively and ignoring underscores, so
    /// `OutputFlag` and `output_flag` are the same parameter. The value is
    /// read as an integer when it is one, otherwise as a float.
    pub fn set_param(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let key: String = name
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let value = ParamValue::parse(name, value)?;

        match key.as_str() {
            "outputflag" => self.output_flag = value.as_int(name)?,
            "nonconvex" => self.non_convex = value.as_int(name)?,
            "feasibilitytol" => {
                let tol = value.as_float();
                if tol.is_nan() || tol <= 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "{} must be positive, got {}",
                        name, tol
                    )));
                }
                self.feasibility_tol = tol;
            }
            "sizelimit" => {
                let limit = value.as_int(name)?;
                self.size_limit = usize::try_from(limit).ok();
            }
            _ => return Err(ConfigError::UnknownParameter(name.to_string())),
        }
        Ok(())
    }

    /// Sets the logging flag.
    pub fn with_output_flag(mut self, flag: i32) -> Self {
        self.output_flag = flag;
        self
    }

    /// Sets the nonconvex handling mode.
    pub fn with_non_convex(mut self, mode: i32) -> Self {
        self.non_convex = mode;
        self
    }

    /// Sets the feasibility tolerance.
    pub fn with_feasibility_tol(mut self, tol: f64) -> Self {
        self.feasibility_tol = tol;
        self
    }

    /// Limits the model size, emulating a size-limited license.
    pub fn with_size_limit(mut self, limit: usize) -> Self {
        self.size_limit = Some(limit);
        self
    }

    /// Returns true if solver logging is enabled.
    pub fn logging_enabled(&self) -> bool {
        self.output_flag != 0
    }

    /// Returns true if nonconvex constraints may be solved.
    pub fn allows_nonconvex(&self) -> bool {
        self.non_convex == NON_CONVEX_ALLOWED
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.feasibility_tol.is_nan() || self.feasibility_tol <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "feasibility_tol must be positive, got {}",
                self.feasibility_tol
            )));
        }
        Ok(self)
    }
}

/// A parameter value given as text.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamValue {
    Int(i64),
    Float(f64),
}

impl ParamValue {
    fn parse(name: &str, value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        if let Ok(i) = value.parse::<i64>() {
            return Ok(ParamValue::Int(i));
        }
        value.parse::<f64>().map(ParamValue::Float).map_err(|_| {
            ConfigError::Invalid(format!("{}: expected a number, got {:?}", name, value))
        })
    }

    fn as_int(self, name: &str) -> Result<i32, ConfigError> {
        match self {
            ParamValue::Int(i) => i32::try_from(i)
                .map_err(|_| ConfigError::Invalid(format!("{}: {} is out of range", name, i))),
            ParamValue::Float(f) => Err(ConfigError::Invalid(format!(
                "{}: expected an integer, got {}",
                name, f
            ))),
        }
    }

    fn as_float(self) -> f64 {
        match self {
            ParamValue::Int(i) => i as f64,
            ParamValue::Float(f) => f,
        }
    }
}
