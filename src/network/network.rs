use std::fmt;

use tracing::debug;

use crate::{
    activation::activation::LayerKind,
    error::{NnError, Result},
    layers::{dense::{Layer, NextLayer}, unit_result::UnitResult},
    network::{config::NetworkConfig, example::Example},
    optim::sgd::Sgd,
};

/// A feed-forward network trained online, one example at a time.
///
/// Layers are appended in forward order with `add_layer` and closed off with
/// a single-unit `add_output_layer`. Training examples are buffered with
/// `submit` and consumed by `train`.
#[derive(Debug)]
pub struct Network {
    pub config: NetworkConfig,
    layers: Vec<Layer>,
    examples: Vec<Example>,
    output_added: bool,
}

impl Network {
    pub fn new(config: NetworkConfig) -> Result<Network> {
        config.validate()?;
        Ok(Network {
            config,
            layers: Vec::new(),
            examples: Vec::new(),
            output_added: false,
        })
    }

    /// Appends a hidden layer of `units` neurons fed by the previous layer
    /// (or by the raw input for the first layer).
    pub fn add_layer(&mut self, kind: LayerKind, units: usize) -> Result<()> {
        if self.output_added {
            return Err(NnError::OutputLayerAlreadyAdded);
        }
        if units == 0 {
            return Err(NnError::InvalidConfig("a layer needs at least one unit".into()));
        }
        let num_inputs = self.next_input_width()?;
        debug!(layer = self.layers.len(), %kind, units, num_inputs, "adding layer");
        self.layers.push(Layer::new(num_inputs, units, kind));
        Ok(())
    }

    /// Appends the one-unit output layer. At least one hidden layer must exist.
    pub fn add_output_layer(&mut self, kind: LayerKind) -> Result<()> {
        if self.output_added {
            return Err(NnError::OutputLayerAlreadyAdded);
        }
        if self.layers.is_empty() {
            return Err(NnError::NoHiddenLayer);
        }
        let num_inputs = self.next_input_width()?;
        debug!(layer = self.layers.len(), %kind, num_inputs, "adding output layer");
        self.layers.push(Layer::new(num_inputs, 1, kind));
        self.output_added = true;
        Ok(())
    }

    fn next_input_width(&self) -> Result<usize> {
        match self.layers.last() {
            Some(layer) => Ok(layer.units()),
            None if self.config.num_inputs == 0 => Err(NnError::MissingInputWidth),
            None => Ok(self.config.num_inputs),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn output_layer(&self) -> Result<&Layer> {
        match self.layers.last() {
            Some(layer) if self.output_added => Ok(layer),
            _ => Err(NnError::MissingOutputLayer),
        }
    }

    /// Sets every weight to `weight_init(layer, unit, input)` and every bias to
    /// `bias_init(layer, unit)`. Each unit's weights are visited before its bias.
    pub fn initialize_weights<W, B>(&mut self, mut weight_init: W, mut bias_init: B)
    where
        W: FnMut(usize, usize, usize) -> f64,
        B: FnMut(usize, usize) -> f64,
    {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            for j in 0..layer.weights.rows {
                for (k, w) in layer.weights.row_mut(j).iter_mut().enumerate() {
                    *w = weight_init(i, j, k);
                }
                layer.bias[j] = bias_init(i, j);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Examples
    // -----------------------------------------------------------------------

    /// Buffers one training example after checking its width.
    pub fn submit(&mut self, example: impl Into<Example>) -> Result<()> {
        let example = example.into();
        self.check_width(&example.features)?;
        self.examples.push(example);
        Ok(())
    }

    pub fn submit_all<I>(&mut self, examples: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Example>,
    {
        for example in examples {
            self.submit(example)?;
        }
        Ok(())
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    fn check_width(&self, features: &[f64]) -> Result<()> {
        if features.len() != self.config.num_inputs {
            return Err(NnError::InputWidthMismatch {
                expected: self.config.num_inputs,
                actual: features.len(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Forward pass
    // -----------------------------------------------------------------------

    /// Runs the network and returns the output unit's value.
    pub fn inference(&self, inputs: &[f64]) -> Result<f64> {
        self.inference_with_outputs(inputs).map(|(value, _)| value)
    }

    /// Runs the network and also returns every layer's activations.
    ///
    /// `outputs[0]` is a copy of `inputs`; `outputs[i + 1]` holds layer `i`'s
    /// activations, one per unit.
    pub fn inference_with_outputs(&self, inputs: &[f64]) -> Result<(f64, Vec<Vec<f64>>)> {
        self.output_layer()?;
        self.check_width(inputs)?;
        let mut outputs = output_buffers(self.config.num_inputs, &self.layers);
        let value = forward_into(&self.layers, inputs, &mut outputs);
        Ok((value, outputs))
    }

    /// Runs the network and maps the output through the output layer's rule.
    pub fn lookup(&self, inputs: &[f64]) -> Result<i64> {
        let value = self.inference(inputs)?;
        Ok(self.output_layer()?.interpret_output(value))
    }

    // -----------------------------------------------------------------------
    // Backward pass
    // -----------------------------------------------------------------------

    /// Runs one online pass over `examples`, updating weights after every
    /// layer of every example. Returns the mean output loss, or `0.0` when
    /// `examples` is empty.
    pub fn backpropagate(&mut self, examples: &[Example], optimizer: &Sgd) -> Result<f64> {
        self.output_layer()?;
        for example in examples {
            self.check_width(&example.features)?;
        }
        Ok(backpropagate_layers(&mut self.layers, self.config.num_inputs, examples, optimizer))
    }

    /// One epoch over the buffered examples.
    pub(crate) fn backpropagate_buffered(&mut self, optimizer: &Sgd) -> f64 {
        backpropagate_layers(&mut self.layers, self.config.num_inputs, &self.examples, optimizer)
    }
}

/// Allocates one activation vector per layer plus one for the raw input.
fn output_buffers(num_inputs: usize, layers: &[Layer]) -> Vec<Vec<f64>> {
    std::iter::once(num_inputs)
        .chain(layers.iter().map(Layer::units))
        .map(|width| vec![0.0; width])
        .collect()
}

fn forward_into(layers: &[Layer], inputs: &[f64], outputs: &mut [Vec<f64>]) -> f64 {
    outputs[0].copy_from_slice(inputs);
    for (i, layer) in layers.iter().enumerate() {
        let (done, rest) = outputs.split_at_mut(i + 1);
        let layer_inputs = &done[i];
        for (unit, out) in rest[0].iter_mut().enumerate() {
            *out = layer.activation(unit, layer_inputs);
        }
    }
    outputs[layers.len()][0]
}

/// Online backpropagation with per-layer immediate updates.
///
/// For each example the layers are visited last to first, and each layer is
/// updated before the one below it computes its deltas. Layer `i` therefore
/// reads layer `i + 1`'s weights as already updated for the same example.
/// Numeric results depend on this ordering.
fn backpropagate_layers(
    layers: &mut [Layer],
    num_inputs: usize,
    examples: &[Example],
    optimizer: &Sgd,
) -> f64 {
    let mut results: Vec<Vec<UnitResult>> = layers.iter()
        .map(|layer| vec![UnitResult::new(layer.num_inputs()); layer.units()])
        .collect();
    let mut outputs = output_buffers(num_inputs, layers);
    let mut total_loss = 0.0;

    for example in examples {
        forward_into(layers, &example.features, &mut outputs);

        for i in (0..layers.len()).rev() {
            let (layer_head, layer_tail) = layers.split_at_mut(i + 1);
            let (result_head, result_tail) = results.split_at_mut(i + 1);
            let layer = &mut layer_head[i];
            let unit_results = &mut result_head[i];
            let next = layer_tail.first()
                .zip(result_tail.first())
                .map(|(next_layer, next_results)| NextLayer {
                    results: next_results,
                    weights: &next_layer.weights,
                });

            for (unit, out) in unit_results.iter_mut().enumerate() {
                layer.loss_with_gradients(unit, &outputs[i], next, example.label, out);
            }
            optimizer.step(layer, unit_results);
        }

        if let Some(output) = results.last().and_then(|r| r.first()) {
            total_loss += output.loss;
        }
    }

    if examples.is_empty() {
        0.0
    } else {
        total_loss / examples.len() as f64
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(f, "layer {i}: {layer}")?;
        }
        Ok(())
    }
}
