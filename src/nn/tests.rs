//! Tests for neurons, layers, networks and the loss.

use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, SeedableRng};

use crate::autograd::{backward, leaf, multiply, Operation, ScalarNode, ValueRef};
use crate::nn::{sum_squared_error, Init, Layer, Mlp, Neuron, NnError, Rectifier};

fn leaves(xs: &[f64]) -> Vec<ValueRef> {
    xs.iter().copied().map(leaf).collect()
}

fn fixed_network() -> Mlp {
    let neuron = Neuron::from_parameters(&[2.0, -1.0], 0.5, false);
    let layer = Layer::from_neurons(vec![neuron]).unwrap();
    Mlp::from_layers(vec![layer]).unwrap()
}

#[test]
fn end_to_end_forward_loss_backward() {
    let mlp = fixed_network();
    let x = leaves(&[3.0, 4.0]);
    let y = leaves(&[2.0]);

    let out = mlp.forward(&x).unwrap();
    assert_eq!(out.len(), 1);
    assert_abs_diff_eq!(out[0].data(), 2.5, epsilon = 1e-12);

    let loss = sum_squared_error(&out, &y).unwrap();
    assert_abs_diff_eq!(loss.data(), 0.25, epsilon = 1e-12);

    backward(&loss);
    assert_abs_diff_eq!(out[0].grad(), 1.0, epsilon = 1e-12);
    let neuron = &mlp.layers()[0].neurons()[0];
    assert_abs_diff_eq!(neuron.weights()[0].grad(), 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(neuron.weights()[1].grad(), 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(neuron.bias().grad(), 1.0, epsilon = 1e-12);
    // Inputs are graph nodes too.
    assert_abs_diff_eq!(x[0].grad(), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(x[1].grad(), -1.0, epsilon = 1e-12);
    // d(loss)/d(target) = -2 * (out - target)
    assert_abs_diff_eq!(y[0].grad(), -1.0, epsilon = 1e-12);
}

#[test]
fn zero_grad_clears_parameters() {
    let mlp = fixed_network();
    let out = mlp.forward(&leaves(&[3.0, 4.0])).unwrap();
    let loss = sum_squared_error(&out, &leaves(&[2.0])).unwrap();
    backward(&loss);
    assert!(mlp.parameters().iter().any(|p| p.grad() != 0.0));
    mlp.zero_grad();
    assert!(mlp.parameters().iter().all(|p| p.grad() == 0.0));
}

#[test]
fn clamp_keeps_add_provenance() {
    let neuron = Neuron::from_parameters(&[1.0], 0.0, true);
    let x = leaf(-2.0);
    let out = neuron.forward(std::slice::from_ref(&x)).unwrap();
    assert_eq!(out.data(), 0.0);
    assert_eq!(out.operation(), Operation::Add);

    backward(&out);
    // Differentiated as the unclamped sum bias + x*w.
    assert_eq!(neuron.bias().grad(), 1.0);
    assert_eq!(neuron.weights()[0].grad(), -2.0);
    assert_eq!(x.grad(), 1.0);
}

#[test]
fn clamped_value_is_seen_by_consumers() {
    let neuron = Neuron::from_parameters(&[1.0], 0.0, true);
    let x = leaf(-2.0);
    let out = neuron.forward(std::slice::from_ref(&x)).unwrap();
    let c = leaf(3.0);
    let z = multiply(&out, &c);
    assert_eq!(z.data(), 0.0);
    backward(&z);
    assert_eq!(c.grad(), 0.0);
    assert_eq!(neuron.weights()[0].grad(), -6.0);
}

#[test]
fn positive_sum_is_not_clamped() {
    let neuron = Neuron::from_parameters(&[1.0, 1.0], 0.5, true);
    let out = neuron.forward(&leaves(&[1.0, 2.0])).unwrap();
    assert_eq!(out.data(), 3.5);
}

#[test]
fn gate_blocks_gradient_of_negative_sum() {
    let neuron = Neuron::from_parameters(&[1.0], 0.0, true).with_rectifier(Rectifier::Gate);
    let out = neuron.forward(&leaves(&[-2.0])).unwrap();
    assert_eq!(out.data(), 0.0);
    assert_eq!(out.operation(), Operation::Rectify);
    backward(&out);
    assert_eq!(neuron.bias().grad(), 0.0);
    assert_eq!(neuron.weights()[0].grad(), 0.0);
}

#[test]
fn gate_passes_gradient_of_positive_sum() {
    let neuron = Neuron::from_parameters(&[1.0], 0.0, true).with_rectifier(Rectifier::Gate);
    let out = neuron.forward(&leaves(&[2.0])).unwrap();
    assert_eq!(out.data(), 2.0);
    backward(&out);
    assert_eq!(neuron.weights()[0].grad(), 2.0);
    assert_eq!(neuron.bias().grad(), 1.0);
}

#[test]
fn neuron_rejects_wrong_input_count() {
    let neuron = Neuron::from_parameters(&[1.0, 2.0], 0.0, false);
    let err = neuron.forward(&leaves(&[1.0])).unwrap_err();
    assert_eq!(err, NnError::InputArity { expected: 2, got: 1 });
}

#[test]
fn bias_only_neuron_clamps_a_fresh_node() {
    let neuron = Neuron::from_parameters(&[], -1.0, true);
    let out = neuron.forward(&[]).unwrap();
    assert_eq!(out.data(), 0.0);
    assert_eq!(out.operation(), Operation::Add);
    assert!(!out.ptr_eq(neuron.bias()));
    assert_eq!(neuron.bias().data(), -1.0);
    backward(&out);
    assert_eq!(neuron.bias().grad(), 1.0);
}

#[test]
fn zero_input_network_outputs_its_biases() {
    let init = Init::normal(0.1).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let neuron = Neuron::new(0, &mut rng, &init);
    assert_eq!(neuron.input_count(), 0);
    assert_eq!(neuron.parameters().len(), 1);

    let mlp = Mlp::new(0, &[2, 1], &mut rng, &init).unwrap();
    assert_eq!(mlp.input_count(), 0);
    assert_eq!(mlp.parameters().len(), 2 + 3);
    let biases: Vec<f64> = mlp.parameters().iter().map(ValueRef::data).collect();
    let out = mlp.forward(&[]).unwrap();
    assert_eq!(out.len(), 1);
    // Clamping writes to sum nodes only.
    let after: Vec<f64> = mlp.parameters().iter().map(ValueRef::data).collect();
    assert_eq!(biases, after);
}

#[test]
fn layer_outputs_one_value_per_neuron() {
    let layer = Layer::from_neurons(vec![
        Neuron::from_parameters(&[1.0, 0.0], 0.0, false),
        Neuron::from_parameters(&[0.0, 1.0], 1.0, false),
    ])
    .unwrap();
    let out = layer.forward(&leaves(&[5.0, 7.0])).unwrap();
    let values: Vec<f64> = out.iter().map(ValueRef::data).collect();
    assert_eq!(values, vec![5.0, 8.0]);
}

#[test]
fn layer_rejects_mixed_arity() {
    let err = Layer::from_neurons(vec![
        Neuron::from_parameters(&[1.0, 0.0], 0.0, false),
        Neuron::from_parameters(&[1.0], 0.0, false),
    ])
    .unwrap_err();
    assert_eq!(
        err,
        NnError::ArityMismatch {
            index: 1,
            expected: 2,
            got: 1
        }
    );
    assert_eq!(
        Layer::from_neurons(Vec::new()).unwrap_err(),
        NnError::EmptyLayer
    );
}

#[test]
fn mlp_chains_arity_and_linear_output() {
    let mut rng = StdRng::seed_from_u64(69);
    let init = Init::normal(0.1).unwrap();
    let mlp = Mlp::new(2, &[3, 4, 1], &mut rng, &init).unwrap();
    assert_eq!(mlp.input_count(), 2);
    assert_eq!(mlp.output_count(), 1);
    let layers = mlp.layers();
    assert_eq!(layers[0].input_count(), 2);
    assert_eq!(layers[1].input_count(), 3);
    assert_eq!(layers[2].input_count(), 4);
    assert!(layers[0].neurons().iter().all(Neuron::is_rectifying));
    assert!(layers[1].neurons().iter().all(Neuron::is_rectifying));
    assert!(!layers[2].neurons().iter().any(Neuron::is_rectifying));
    // 3*(2+1) + 4*(3+1) + 1*(4+1)
    assert_eq!(mlp.parameters().len(), 30);

    let out = mlp.forward(&leaves(&[3.0, 4.0])).unwrap();
    assert_eq!(out.len(), 1);
}

#[test]
fn mlp_init_is_reproducible_for_a_seed() {
    let init = Init::normal(0.1).unwrap();
    let a = Mlp::new(2, &[2, 1], &mut StdRng::seed_from_u64(69), &init).unwrap();
    let b = Mlp::new(2, &[2, 1], &mut StdRng::seed_from_u64(69), &init).unwrap();
    let c = Mlp::new(2, &[2, 1], &mut StdRng::seed_from_u64(70), &init).unwrap();
    let values = |m: &Mlp| m.parameters().iter().map(ValueRef::data).collect::<Vec<_>>();
    assert_eq!(values(&a), values(&b));
    assert_ne!(values(&a), values(&c));
}

#[test]
fn zero_std_init_gives_zero_parameters() {
    let init = Init::normal(0.0).unwrap();
    let mlp = Mlp::new(3, &[2], &mut StdRng::seed_from_u64(0), &init).unwrap();
    assert!(mlp.parameters().iter().all(|p| p.data() == 0.0));
}

#[test]
fn mlp_rejects_bad_layer_sizes() {
    let init = Init::normal(0.1).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        Mlp::new(2, &[], &mut rng, &init).unwrap_err(),
        NnError::EmptyLayerSizes
    );
    assert_eq!(
        Mlp::new(2, &[3, 0, 1], &mut rng, &init).unwrap_err(),
        NnError::ZeroWidthLayer { index: 1 }
    );
}

#[test]
fn mlp_rejects_unchained_layers() {
    let first = Layer::from_neurons(vec![
        Neuron::from_parameters(&[1.0], 0.0, true),
        Neuron::from_parameters(&[1.0], 0.0, true),
    ])
    .unwrap();
    let second =
        Layer::from_neurons(vec![Neuron::from_parameters(&[1.0], 0.0, true)]).unwrap();
    assert_eq!(
        Mlp::from_layers(vec![first, second]).unwrap_err(),
        NnError::ArityMismatch {
            index: 1,
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn mlp_forward_rejects_wrong_input_count() {
    let mlp = fixed_network();
    assert_eq!(
        mlp.forward(&leaves(&[1.0, 2.0, 3.0])).unwrap_err(),
        NnError::InputArity { expected: 2, got: 3 }
    );
}

#[test]
fn with_rectifier_reaches_hidden_layers() {
    let init = Init::normal(0.1).unwrap();
    let mlp = Mlp::new(2, &[2, 1], &mut StdRng::seed_from_u64(3), &init)
        .unwrap()
        .with_rectifier(Rectifier::Gate);
    assert!(mlp
        .layers()
        .iter()
        .flat_map(Layer::neurons)
        .all(|n| n.rectifier() == Rectifier::Gate));
}

#[test]
fn invalid_init_std_is_rejected() {
    assert!(matches!(Init::normal(-1.0), Err(NnError::Init(_))));
    assert!(matches!(Init::normal(f64::NAN), Err(NnError::Init(_))));
    assert_abs_diff_eq!(Init::normal(0.25).unwrap().std(), 0.25);
}

#[test]
fn loss_sums_squared_differences() {
    let p = leaves(&[1.0, 2.0, 3.0]);
    let t = leaves(&[0.0, 4.0, 3.0]);
    let loss = sum_squared_error(&p, &t).unwrap();
    assert_abs_diff_eq!(loss.data(), 5.0, epsilon = 1e-12);
    backward(&loss);
    assert_abs_diff_eq!(p[0].grad(), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(p[1].grad(), -4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(p[2].grad(), 0.0, epsilon = 1e-12);
}

#[test]
fn loss_rejects_length_mismatch() {
    let err = sum_squared_error(&leaves(&[1.0, 2.0]), &leaves(&[1.0])).unwrap_err();
    assert_eq!(
        err,
        NnError::LengthMismatch {
            predicted: 2,
            target: 1
        }
    );
    assert!(err.to_string().contains("2 predictions"));
}

#[test]
fn loss_of_empty_slices_is_zero_leaf() {
    let loss = sum_squared_error(&[], &[]).unwrap();
    assert_eq!(loss.data(), 0.0);
    assert_eq!(loss.operation(), Operation::Leaf);
}

#[test]
fn display_lists_layers_and_neurons() {
    let dump = fixed_network().to_string();
    assert!(dump.starts_with("Layer 0\n"));
    assert!(dump.contains("Neuron(linear) bias: Value(data=0.5, grad=0, op=leaf)"));
    assert!(dump.contains("w[1]: Value(data=-1, grad=0, op=leaf)"));
}

#[test]
fn rectifier_parses_from_str() {
    assert_eq!("clamp".parse::<Rectifier>(), Ok(Rectifier::Clamp));
    assert_eq!(" Gate ".parse::<Rectifier>(), Ok(Rectifier::Gate));
    assert!("relu".parse::<Rectifier>().is_err());
    assert_eq!(Rectifier::default(), Rectifier::Clamp);
}

#[test]
fn wide_loss_backward_and_drop() {
    let n = 20_000;
    let predicted = leaves(&vec![1.0; n]);
    let target = leaves(&vec![0.0; n]);
    let loss = sum_squared_error(&predicted, &target).unwrap();
    assert_eq!(loss.data(), n as f64);
    backward(&loss);
    assert_eq!(predicted[0].grad(), 2.0);
    drop(loss);
    assert_eq!(predicted[n - 1].data(), 1.0);
}
