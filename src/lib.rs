//! # microdnn
//!
//! A minimal reverse-mode automatic differentiation engine over scalars, and a
//! small multi-layer perceptron built only from its primitives.
//!
//! ```
//! use microdnn::autograd::{backward, leaf, multiply, ScalarNode};
//!
//! let a = leaf(3.0);
//! let b = leaf(4.0);
//! let z = multiply(&a, &b);
//! backward(&z);
//! assert_eq!(a.grad(), 4.0);
//! assert_eq!(b.grad(), 3.0);
//! ```

pub mod autograd;
pub mod config;
mod error;
pub mod nn;

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use autograd::{backward, leaf, topological_order, ScalarNode, ValueRef};
use nn::{sum_squared_error, Init, Mlp};

pub use config::{Config, ConfigError};
pub use error::Error;

/// Numbers produced by one [`run`].
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    /// Network outputs for the configured inputs.
    pub outputs: Vec<f64>,
    /// Sum of squared errors against the configured targets.
    pub loss: f64,
    /// Gradient of the loss for every parameter, in [`Mlp::parameters`] order.
    pub parameter_grads: Vec<f64>,
    /// Number of nodes the backward pass visited.
    pub graph_size: usize,
}

/// Builds a seeded network, runs one forward/loss/backward pass and prints the result.
pub fn run(config: &Config) -> Result<Report, Error> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let init = Init::normal(config.init_std)?;
    let mlp = Mlp::new(config.input_count, &config.layer_sizes, &mut rng, &init)?
        .with_rectifier(config.rectifier);
    info!(
        "mlp: {} inputs, layer sizes {:?}, {} parameters, seed {}",
        mlp.input_count(),
        config.layer_sizes,
        mlp.parameters().len(),
        config.seed
    );
    print!("{mlp}");

    let x: Vec<ValueRef> = config.inputs.iter().copied().map(leaf).collect();
    let y: Vec<ValueRef> = config.targets.iter().copied().map(leaf).collect();
    let out = mlp.forward(&x)?;
    let loss = sum_squared_error(&out, &y)?;
    backward(&loss);

    let order = topological_order(&loss);
    debug!("graph: {} nodes reachable from the loss", order.len());
    if config.print_topology {
        println!("TOPO:");
        for node in order.iter().rev() {
            println!("{node}");
        }
    }

    let report = Report {
        outputs: out.iter().map(ValueRef::data).collect(),
        loss: loss.data(),
        parameter_grads: mlp.parameters().iter().map(ValueRef::grad).collect(),
        graph_size: order.len(),
    };
    info!("outputs {:?} | loss {:.6}", report.outputs, report.loss);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn run_default_config() {
        let cfg = Config {
            print_topology: false,
            ..Config::default()
        };
        let report = run(&cfg).unwrap();
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.parameter_grads.len(), 3);
        let residual = report.outputs[0] - 2.0;
        assert_relative_eq!(report.loss, residual * residual, max_relative = 1e-12);
        // Linear output neuron: dL/dw_i = 2 r x_i, dL/db = 2 r.
        assert_relative_eq!(report.parameter_grads[0], 2.0 * residual * 3.0, max_relative = 1e-9);
        assert_relative_eq!(report.parameter_grads[1], 2.0 * residual * 4.0, max_relative = 1e-9);
        assert_relative_eq!(report.parameter_grads[2], 2.0 * residual, max_relative = 1e-9);
    }

    #[test]
    fn run_is_reproducible() {
        let cfg = Config {
            layer_sizes: vec![3, 2],
            targets: vec![1.0, -1.0],
            ..Config::default()
        };
        assert_eq!(run(&cfg).unwrap(), run(&cfg).unwrap());
    }

    #[test]
    fn run_with_gate_rectifier() {
        let cfg = Config {
            layer_sizes: vec![4, 1],
            rectifier: nn::Rectifier::Gate,
            print_topology: false,
            ..Config::default()
        };
        let report = run(&cfg).unwrap();
        assert_eq!(report.parameter_grads.len(), 4 * 3 + 5);
        assert!(report.loss.is_finite());
    }

    #[test]
    fn run_rejects_invalid_config() {
        let cfg = Config {
            targets: vec![1.0, 2.0],
            ..Config::default()
        };
        assert!(matches!(run(&cfg), Err(Error::Config(ConfigError::Validation(_)))));
    }
}
