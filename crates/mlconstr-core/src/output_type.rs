//! What the output block of an embedded predictor represents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared semantics of a predictor's embedded output.
///
/// Fixed when the predictor is wrapped and never changed afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum OutputType {
    /// Raw prediction (regression value or class label).
    #[default]
    #[serde(rename = "regular")]
    Regular,

    /// Full probability vector, one column per class.
    #[serde(rename = "probability")]
    Probability,

    /// Probability of the positive class of a binary classifier
    /// (second column of the probability vector).
    #[serde(rename = "probability_1")]
    ProbabilityPositiveClass,
}

impl OutputType {
    /// Returns the configuration tag of this output type.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Regular => "regular",
            OutputType::Probability => "probability",
            OutputType::ProbabilityPositiveClass => "probability_1",
        }
    }

    /// Returns true if the output holds probabilities.
    pub fn is_probability(&self) -> bool {
        !matches!(self, OutputType::Regular)
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(OutputType::Regular),
            "probability" => Ok(OutputType::Probability),
            "probability_1" => Ok(OutputType::ProbabilityPositiveClass),
            _ => Err(format!(
                "Unknown output type: {}. Expected one of regular, probability, probability_1",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!("regular".parse::<OutputType>(), Ok(OutputType::Regular));
        assert_eq!(
            "probability".parse::<OutputType>(),
            Ok(OutputType::Probability)
        );
        assert_eq!(
            "probability_1".parse::<OutputType>(),
            Ok(OutputType::ProbabilityPositiveClass)
        );
        assert!("classification".parse::<OutputType>().is_err());
    }

    #[test]
    fn test_display_matches_tag() {
        for ty in [
            OutputType::Regular,
            OutputType::Probability,
            OutputType::ProbabilityPositiveClass,
        ] {
            assert_eq!(ty.to_string().parse::<OutputType>(), Ok(ty));
        }
    }

    #[test]
    fn test_default_is_regular() {
        assert_eq!(OutputType::default(), OutputType::Regular);
        assert!(!OutputType::default().is_probability());
        assert!(OutputType::ProbabilityPositiveClass.is_probability());
    }
}
