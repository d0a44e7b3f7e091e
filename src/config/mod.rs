//! Configuration for network shape, initialization and the demo run.
//!
//! Load from environment via [`from_env`] and validate with [`Config::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use constants::{
    DEFAULT_INIT_STD, DEFAULT_INPUTS, DEFAULT_INPUT_COUNT, DEFAULT_LAYER_SIZES,
    DEFAULT_PRINT_TOPOLOGY, DEFAULT_SEED, DEFAULT_TARGETS,
};

pub use builder::{env_key, env_list, env_parsed, env_string, from_env};
pub use error::ConfigError;

use crate::nn::Rectifier;

/// Central configuration for a run.
///
/// Use [`from_env`] to build from environment variables and [`Config::validate`] before use.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Seed for the weight initializer RNG.
    pub seed: u64,
    /// Number of network inputs.
    pub input_count: usize,
    /// Neurons per layer; the last entry is the output width.
    pub layer_sizes: Vec<usize>,
    /// Standard deviation of the Gaussian weight/bias init (mean 0).
    pub init_std: f64,
    /// How hidden neurons clamp negative sums.
    pub rectifier: Rectifier,
    /// Input sample fed to the network.
    pub inputs: Vec<f64>,
    /// Target the loss compares the output against.
    pub targets: Vec<f64>,
    /// Print the backward traversal order.
    pub print_topology: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            input_count: DEFAULT_INPUT_COUNT,
            layer_sizes: DEFAULT_LAYER_SIZES.to_vec(),
            init_std: DEFAULT_INIT_STD,
            rectifier: Rectifier::default(),
            inputs: DEFAULT_INPUTS.to_vec(),
            targets: DEFAULT_TARGETS.to_vec(),
            print_topology: DEFAULT_PRINT_TOPOLOGY,
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// Ensures: `input_count > 0`, non-empty `layer_sizes` without zeros, a finite
    /// non-negative `init_std`, and sample lengths matching the network's input and output widths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_count == 0 {
            return Err(ConfigError::Validation(
                "input_count must be greater than 0".to_string(),
            ));
        }
        let Some(&output_count) = self.layer_sizes.last() else {
            return Err(ConfigError::Validation(
                "layer_sizes must not be empty".to_string(),
            ));
        };
        if let Some(i) = self.layer_sizes.iter().position(|&s| s == 0) {
            return Err(ConfigError::Validation(format!(
                "layer_sizes[{i}] must be greater than 0"
            )));
        }
        if !self.init_std.is_finite() || self.init_std < 0.0 {
            return Err(ConfigError::Validation(format!(
                "init_std ({}) must be finite and >= 0",
                self.init_std
            )));
        }
        if self.inputs.len() != self.input_count {
            return Err(ConfigError::Validation(format!(
                "inputs has {} values but input_count is {}",
                self.inputs.len(),
                self.input_count
            )));
        }
        if self.targets.len() != output_count {
            return Err(ConfigError::Validation(format!(
                "targets has {} values but the output layer has {} neurons",
                self.targets.len(),
                output_count
            )));
        }
        Ok(())
    }

    /// Width of the final layer.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.layer_sizes.last().copied().unwrap_or(0)
    }
}
