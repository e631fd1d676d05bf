use approx::assert_abs_diff_eq;
use online_nn::{Example, LayerKind, Matrix, Network, NetworkConfig, NnError, Sgd};

const INPUTS: [f64; 10] = [0.5, 1.0, -0.1, 2.5, 0.0, 0.0, -0.2, 0.6, 0.5, 0.3];

fn network() -> Network {
    let mut network = Network::new(NetworkConfig::new(10, 40, 1e-4, 1, 0.01)).unwrap();
    network.add_layer(LayerKind::prelu(), 4).unwrap();
    network.add_output_layer(LayerKind::sigmoid()).unwrap();
    network
}

fn init_by_unit(network: &mut Network) {
    network.initialize_weights(|_, unit, _| 0.1 * (unit + 1) as f64, |_, _| 0.0);
}

fn assert_matrix_eq(actual: &Matrix, expected: &[&[f64]]) {
    assert_eq!(actual.rows, expected.len());
    for (i, row) in expected.iter().enumerate() {
        assert_eq!(actual.cols, row.len());
        for (j, value) in row.iter().enumerate() {
            assert_abs_diff_eq!(actual.at(i, j), *value, epsilon = 1e-12);
        }
    }
}

#[test]
fn layers_are_sized_from_the_previous_layer() {
    let network = network();
    let layers = network.layers();
    assert_eq!(layers.len(), 2);
    assert_eq!((layers[0].weights.rows, layers[0].weights.cols), (4, 10));
    assert_eq!(layers[0].bias.len(), 4);
    assert_eq!((layers[1].weights.rows, layers[1].weights.cols), (1, 4));
    assert_eq!(layers[1].bias.len(), 1);
}

#[test]
fn initialize_weights() {
    let mut network = network();
    network.initialize_weights(|_, unit, _| 0.1 * (unit + 1) as f64, |layer, unit| (layer * 10 + unit) as f64);
    let row = |v: f64| vec![v; 10];
    let (r0, r1, r2, r3) = (row(0.1), row(0.2), row(0.30000000000000004), row(0.4));
    assert_matrix_eq(
        &network.layers()[0].weights,
        &[r0.as_slice(), r1.as_slice(), r2.as_slice(), r3.as_slice()],
    );
    assert_matrix_eq(&network.layers()[1].weights, &[&[0.1, 0.1, 0.1, 0.1]]);
    assert_eq!(network.layers()[0].bias, vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(network.layers()[1].bias, vec![10.0]);
}

#[test]
fn inference_prelu_to_sigmoid() {
    let mut network = network();
    init_by_unit(&mut network);
    let (result, outputs) = network.inference_with_outputs(&INPUTS).unwrap();

    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0], INPUTS.to_vec());
    assert_eq!(outputs[1].len(), 4);
    assert_eq!(outputs[2].len(), 1);
    for (actual, expected) in outputs[1].iter().zip([0.51, 1.02, 1.53, 2.04]) {
        assert_abs_diff_eq!(*actual, expected, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(outputs[2][0], 0.6248064744684293, epsilon = 1e-12);
    assert_abs_diff_eq!(result, 0.6248064744684293, epsilon = 1e-12);
    assert_eq!(network.inference(&INPUTS).unwrap(), result);
    assert_eq!(network.lookup(&INPUTS).unwrap(), 1);
}

const UPDATED_LAYER1: [f64; 4] = [
    0.10044856601646905, 0.10089713203293808, 0.10134569804940713, 0.10179426406587616,
];

const UPDATED_LAYER0: [[f64; 10]; 4] = [
    [0.10004417432658631, 0.10008834865317262, 0.09999116513468274, 0.10022087163293154, 0.1,
     0.1, 0.09998233026936548, 0.10005300919190357, 0.10004417432658631, 0.10002650459595179],
    [0.2000443715927345, 0.20008874318546896, 0.1999911256814531, 0.2002218579636724, 0.2,
     0.2, 0.19998225136290623, 0.20005324591128137, 0.2000443715927345, 0.2000266229556407],
    [0.3000445688588827, 0.30008913771776535, 0.2999910862282235, 0.30022284429441326, 0.3,
     0.3, 0.299982172456447, 0.30005348263065923, 0.3000445688588827, 0.30002674131532964],
    [0.4000447661250308, 0.40008953225006166, 0.39999104677499386, 0.4002238306251541, 0.4,
     0.4, 0.3999820935499877, 0.400053719350037, 0.4000447661250308, 0.4000268596750185],
];

fn assert_single_step_weights(network: &Network) {
    let layer0: Vec<&[f64]> = UPDATED_LAYER0.iter().map(|r| r.as_slice()).collect();
    assert_matrix_eq(&network.layers()[0].weights, &layer0);
    assert_matrix_eq(&network.layers()[1].weights, &[&UPDATED_LAYER1]);
}

#[test]
fn backpropagate_single_example() {
    let mut network = network();
    init_by_unit(&mut network);
    let examples = vec![Example::new(INPUTS.to_vec(), 1.0)];

    let loss = network.backpropagate(&examples, &Sgd::new(0.01)).unwrap();
    assert_abs_diff_eq!(loss, 0.470313318044875, epsilon = 1e-12);
    assert_single_step_weights(&network);

    assert_abs_diff_eq!(network.layers()[1].bias[0], 0.0008795412087628229, epsilon = 1e-15);
    let expected_bias0 = [
        8.834865317261738e-05, 8.874318546895249e-05, 8.91377177652876e-05, 8.953225006162269e-05,
    ];
    for (actual, expected) in network.layers()[0].bias.iter().zip(expected_bias0) {
        assert_abs_diff_eq!(*actual, expected, epsilon = 1e-15);
    }
}

#[test]
fn backpropagate_runs_are_independent_of_config_learning_rate() {
    let mut network = network();
    let examples = vec![Example::new(INPUTS.to_vec(), 1.0)];
    let optimizer = Sgd::new(0.01);

    init_by_unit(&mut network);
    let first = network.backpropagate(&examples, &optimizer).unwrap();

    // Only the optimizer passed in drives the update; re-initialising restores
    // the starting point, so the second run reproduces the first exactly.
    network.config.learning_rate = 0.02;
    init_by_unit(&mut network);
    let second = network.backpropagate(&examples, &optimizer).unwrap();

    assert_eq!(first, second);
    assert_single_step_weights(&network);
}

#[test]
fn hidden_layer_reads_output_weights_after_their_update() {
    let mut network = network();
    init_by_unit(&mut network);
    let examples = vec![Example::new(INPUTS.to_vec(), 1.0)];
    let lr = 0.01;
    network.backpropagate(&examples, &Sgd::new(lr)).unwrap();

    let f: f64 = 0.6248064744684293;
    let output_delta = (f - 1.0) * f * (1.0 - f);
    let hidden = [0.51, 1.02, 1.53, 2.04];
    for unit in 0..4 {
        let updated_w = 0.1 - output_delta * hidden[unit] * lr;
        assert_abs_diff_eq!(network.layers()[1].weights.at(0, unit), updated_w, epsilon = 1e-15);

        // Hidden delta uses the already-updated output weight, not the 0.1 it
        // had during the forward pass.
        let hidden_delta = output_delta * updated_w;
        let stale_delta = output_delta * 0.1;
        let expected = 0.1 * (unit + 1) as f64 - hidden_delta * INPUTS[3] * lr;
        let with_stale = 0.1 * (unit + 1) as f64 - stale_delta * INPUTS[3] * lr;
        assert_abs_diff_eq!(network.layers()[0].weights.at(unit, 3), expected, epsilon = 1e-15);
        assert!((network.layers()[0].weights.at(unit, 3) - with_stale).abs() > 1e-8);
    }
}

#[test]
fn backpropagate_empty_batch_has_zero_loss() {
    let mut network = network();
    init_by_unit(&mut network);
    let loss = network.backpropagate(&[], &Sgd::new(0.01)).unwrap();
    assert_eq!(loss, 0.0);
    assert_matrix_eq(&network.layers()[1].weights, &[&[0.1, 0.1, 0.1, 0.1]]);
}

#[test]
fn backpropagate_averages_loss_over_examples() {
    let mut single = network();
    init_by_unit(&mut single);
    let example = Example::new(INPUTS.to_vec(), 1.0);
    let first = single.backpropagate(&[example.clone()], &Sgd::new(0.01)).unwrap();
    let second = single.backpropagate(&[example.clone()], &Sgd::new(0.01)).unwrap();

    let mut pair = network();
    init_by_unit(&mut pair);
    let mean = pair.backpropagate(&[example.clone(), example], &Sgd::new(0.01)).unwrap();
    assert_abs_diff_eq!(mean, (first + second) / 2.0, epsilon = 1e-15);
}

#[test]
fn saturated_sigmoid_output_keeps_loss_finite() {
    let mut network = Network::new(NetworkConfig::new(1, 20, 1e-4, 1, 0.1)).unwrap();
    network.add_layer(LayerKind::sigmoid(), 1).unwrap();
    network.add_output_layer(LayerKind::sigmoid()).unwrap();
    network.initialize_weights(|_, _, _| 100.0, |_, _| 0.0);
    assert_eq!(network.inference(&[1.0]).unwrap(), 1.0);

    let on_target = network.backpropagate(&[Example::new(vec![1.0], 1.0)], &Sgd::new(0.1)).unwrap();
    assert!(on_target.is_finite() && on_target < 1e-9);
    let off_target = network.backpropagate(&[Example::new(vec![1.0], 0.0)], &Sgd::new(0.1)).unwrap();
    assert_abs_diff_eq!(off_target, -(1e-12f64).ln(), epsilon = 1e-3);

    network.submit((vec![1.0], 0.0)).unwrap();
    let mut report = online_nn::TrainingReport::new();
    network.train(&mut report).unwrap();
    assert!(report.losses.iter().all(|loss| loss.is_finite()));
    assert_eq!(report.iterations(), 3);
    assert!(report.stopped_early);
}

#[test]
fn configuration_errors_fail_fast() {
    let mut network = Network::new(NetworkConfig::new(3, 10, 1e-4, 1, 0.01)).unwrap();
    assert!(matches!(network.add_output_layer(LayerKind::sigmoid()), Err(NnError::NoHiddenLayer)));
    assert!(matches!(network.inference(&[0.0; 3]), Err(NnError::MissingOutputLayer)));

    network.add_layer(LayerKind::prelu(), 2).unwrap();
    assert!(matches!(network.lookup(&[0.0; 3]), Err(NnError::MissingOutputLayer)));
    network.add_output_layer(LayerKind::sigmoid()).unwrap();
    assert!(matches!(network.add_layer(LayerKind::prelu(), 2), Err(NnError::OutputLayerAlreadyAdded)));
    assert!(matches!(network.add_output_layer(LayerKind::prelu()), Err(NnError::OutputLayerAlreadyAdded)));

    assert!(matches!(
        network.inference(&[0.0; 4]),
        Err(NnError::InputWidthMismatch { expected: 3, actual: 4 })
    ));
    assert!(matches!(
        network.submit((vec![1.0, 2.0], 1.0)),
        Err(NnError::InputWidthMismatch { expected: 3, actual: 2 })
    ));
    assert!(matches!(
        network.backpropagate(&[Example::new(vec![1.0], 0.0)], &Sgd::new(0.1)),
        Err(NnError::InputWidthMismatch { expected: 3, actual: 1 })
    ));
    assert!(network.examples().is_empty());
}

#[test]
fn first_layer_needs_declared_width() {
    let mut network = Network::new(NetworkConfig::new(0, 10, 1e-4, 1, 0.01)).unwrap();
    assert!(matches!(network.add_layer(LayerKind::prelu(), 2), Err(NnError::MissingInputWidth)));
    assert!(matches!(network.add_layer(LayerKind::prelu(), 0), Err(NnError::InvalidConfig(_))));
}

#[test]
fn invalid_config_is_rejected() {
    assert!(matches!(
        Network::new(NetworkConfig::new(3, 0, 1e-4, 1, 0.01)),
        Err(NnError::InvalidConfig(_))
    ));
}

#[test]
fn prelu_output_lookup_rounds() {
    let mut network = Network::new(NetworkConfig::new(2, 10, 1e-4, 1, 0.01)).unwrap();
    network.add_layer(LayerKind::prelu(), 1).unwrap();
    network.add_output_layer(LayerKind::prelu()).unwrap();
    network.initialize_weights(|_, _, _| 1.0, |_, _| 0.0);
    assert_abs_diff_eq!(network.inference(&[1.2, 1.4]).unwrap(), 2.6, epsilon = 1e-12);
    assert_eq!(network.lookup(&[1.2, 1.4]).unwrap(), 3);
    assert_eq!(network.lookup(&[1.0, 1.2]).unwrap(), 2);
}

#[test]
fn display_lists_every_layer() {
    let mut network = Network::new(NetworkConfig::new(1, 10, 1e-4, 1, 0.01)).unwrap();
    network.add_layer(LayerKind::prelu(), 1).unwrap();
    network.add_output_layer(LayerKind::sigmoid()).unwrap();
    network.initialize_weights(|_, _, _| 0.5, |_, _| 0.25);
    assert_eq!(
        network.to_string(),
        "layer 0: prelu(slope=0.01) wts: {0.5} bias: {0.25}\n\
         layer 1: sigmoid(threshold=0.5) wts: {0.5} bias: {0.25}\n"
    );
}
