//! Seeded case generation.

use std::fmt;

use ndarray::{s, Array2, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::HarnessError;

/// Offset subtracted from combined rows so they differ from every sample.
pub const COMBINE_OFFSET: f64 = 1e-2;

/// How sampled rows are turned into examples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Combine {
    /// Use the sampled rows as they are.
    #[default]
    None,
    /// Average all rows into a single example.
    All,
    /// Average consecutive pairs of rows.
    Pairs,
}

impl Combine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combine::None => "none",
            Combine::All => "all",
            Combine::Pairs => "pairs",
        }
    }
}

impl fmt::Display for Combine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sampled case.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// Rows of the source matrix that were drawn.
    pub choice: Vec<usize>,
    /// Examples the input is fixed at.
    pub examples: Array2<f64>,
}

/// Draws example rows with a seeded generator, so a test run always sees
/// the same cases.
#[derive(Debug, Clone)]
pub struct CaseSampler {
    rng: ChaCha8Rng,
}

impl CaseSampler {
    pub const SEED: u64 = 1;

    pub fn new() -> Self {
        Self::with_seed(Self::SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws `n_sample` rows of `x` with replacement and combines them.
    ///
    /// # Errors
    ///
    /// Fails when nothing can be drawn, or when `Pairs` is asked for an odd
    /// number of rows.
    pub fn sample(
        &mut self,
        x: &Array2<f64>,
        n_sample: usize,
        combine: Combine,
    ) -> Result<Case, HarnessError> {
        if x.nrows() == 0 || n_sample == 0 {
            return Err(HarnessError::InvalidCase(format!(
                "cannot draw {} rows from {} rows",
                n_sample,
                x.nrows()
            )));
        }
        if combine == Combine::Pairs && n_sample % 2 != 0 {
            return Err(HarnessError::InvalidCase(format!(
                "pairs need an even sample size, got {}",
                n_sample
            )));
        }

        let choice: Vec<usize> = (0..n_sample)
            .map(|_| self.rng.random_range(0..x.nrows()))
            .collect();
        let rows = x.select(Axis(0), &choice);

        let examples = match combine {
            Combine::None => rows,
            Combine::All => {
                let mean = rows.sum_axis(Axis(0)) / n_sample as f64;
                mean.insert_axis(Axis(0)) - COMBINE_OFFSET
            }
            Combine::Pairs => {
                let even = rows.slice(s![..;2, ..]);
                let odd = rows.slice(s![1..;2, ..]);
                (&even + &odd) / 2.0 - COMBINE_OFFSET
            }
        };
        Ok(Case { choice, examples })
    }
}

impl Default for CaseSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn x() -> Array2<f64> {
        array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0], [6.0, 7.0]]
    }

    #[test]
    fn test_same_seed_same_cases() {
        let a = CaseSampler::new().sample(&x(), 5, Combine::None).unwrap();
        let b = CaseSampler::new().sample(&x(), 5, Combine::None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.examples.dim(), (5, 2));
        assert!(a.choice.iter().all(|&i| i < 4));
    }

    #[test]
    fn test_rows_follow_choice() {
        let case = CaseSampler::new().sample(&x(), 3, Combine::None).unwrap();
        for (r, &i) in case.choice.iter().enumerate() {
            assert_eq!(case.examples.row(r), x().row(i));
        }
    }

    #[test]
    fn test_combine_all_averages() {
        let x = x();
        let case = CaseSampler::new().sample(&x, 4, Combine::All).unwrap();
        assert_eq!(case.examples.dim(), (1, 2));

        let mean: f64 = case.choice.iter().map(|&i| x[(i, 0)]).sum::<f64>() / 4.0;
        assert!((case.examples[(0, 0)] - (mean - COMBINE_OFFSET)).abs() < 1e-12);
    }

    #[test]
    fn test_combine_pairs() {
        let x = x();
        let case = CaseSampler::new().sample(&x, 6, Combine::Pairs).unwrap();
        assert_eq!(case.examples.dim(), (3, 2));

        let (a, b) = (case.choice[2], case.choice[3]);
        let expected = (x[(a, 1)] + x[(b, 1)]) / 2.0 - COMBINE_OFFSET;
        assert!((case.examples[(1, 1)] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_cases() {
        let mut sampler = CaseSampler::new();
        assert!(sampler.sample(&x(), 3, Combine::Pairs).is_err());
        assert!(sampler.sample(&x(), 0, Combine::None).is_err());
        assert!(sampler
            .sample(&Array2::<f64>::zeros((0, 2)), 2, Combine::None)
            .is_err());
    }
}
