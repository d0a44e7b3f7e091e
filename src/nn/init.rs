//! Random initialization of weights and biases.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::NnError;

/// Gaussian initializer for weights and biases.
///
/// The generator is always passed in by the caller, so a run seeded with the
/// same value draws the same parameters.
#[derive(Debug, Clone, Copy)]
pub struct Init {
    normal: Normal<f64>,
}

impl Init {
    /// Draws from `N(mean, std^2)`.
    pub fn new(mean: f64, std: f64) -> Result<Self, NnError> {
        let normal = Normal::new(mean, std).map_err(|e| NnError::Init(e.to_string()))?;
        Ok(Self { normal })
    }

    /// Draws from `N(0, std^2)`.
    pub fn normal(std: f64) -> Result<Self, NnError> {
        Self::new(0.0, std)
    }

    /// Standard deviation of the underlying distribution.
    #[must_use]
    pub fn std(&self) -> f64 {
        self.normal.std_dev()
    }

    /// Draws one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.normal.sample(rng)
    }
}
