use std::fmt;

use crate::{activation::activation::LayerKind, layers::unit_result::UnitResult, math::matrix::Matrix};

/// The downstream layer's view needed to backpropagate into a hidden layer.
#[derive(Debug, Clone, Copy)]
pub struct NextLayer<'a> {
    /// Results already computed for every unit of the next layer.
    pub results: &'a [UnitResult],
    /// The next layer's weights, `next_units x this_units`.
    pub weights: &'a Matrix,
}

/// A fully connected layer of `units` neurons over `inputs` incoming values.
///
/// Invariants: `weights.rows == units == bias.len()` and
/// `weights.cols == inputs`.
#[derive(Debug, Clone)]
pub struct Layer {
    pub weights: Matrix,
    pub bias: Vec<f64>,
    pub kind: LayerKind,
}

impl Layer {
    /// Builds a layer with all weights and biases set to zero.
    pub fn new(num_inputs: usize, units: usize, kind: LayerKind) -> Layer {
        Layer {
            weights: Matrix::zeros(units, num_inputs),
            bias: vec![0.0; units],
            kind,
        }
    }

    pub fn units(&self) -> usize {
        self.weights.rows
    }

    pub fn num_inputs(&self) -> usize {
        self.weights.cols
    }

    /// `bias[unit] + Σ_j weights[unit, j] * inputs[j]`
    pub fn pre_activation(&self, unit: usize, inputs: &[f64]) -> f64 {
        let dot: f64 = self.weights.row(unit)
            .iter()
            .zip(inputs)
            .map(|(w, x)| w * x)
            .sum();
        dot + self.bias[unit]
    }

    pub fn activation(&self, unit: usize, inputs: &[f64]) -> f64 {
        self.activation_with_sign(unit, inputs).0
    }

    /// Activation plus whether the pre-activation was non-negative, which
    /// selects the PReLU derivative branch.
    pub fn activation_with_sign(&self, unit: usize, inputs: &[f64]) -> (f64, bool) {
        let z = self.pre_activation(unit, inputs);
        (self.kind.function(z), z >= 0.0)
    }

    /// Fills `out` with the unit's activation, loss and delta.
    ///
    /// With `next == None` the layer is treated as the network output and the
    /// variant's loss against `target` is used. Otherwise the delta is the
    /// next layer's deltas weighted by the connections leaving `unit`, times
    /// this unit's activation derivative; `target` is ignored.
    ///
    /// `out.incoming` always receives a copy of `inputs`.
    pub fn loss_with_gradients(
        &self,
        unit: usize,
        inputs: &[f64],
        next: Option<NextLayer<'_>>,
        target: f64,
        out: &mut UnitResult,
    ) {
        let z = self.pre_activation(unit, inputs);
        let f = self.kind.function(z);
        out.f = f;

        match next {
            None => {
                let (loss, delta) = self.kind.output_loss(z, f, target);
                out.loss = loss;
                out.delta = delta;
            }
            Some(next) => {
                let downstream: f64 = next.results
                    .iter()
                    .enumerate()
                    .map(|(k, r)| r.delta * next.weights.at(k, unit))
                    .sum();
                out.loss = 0.0;
                out.delta = downstream * self.kind.derivative(z, f);
            }
        }

        out.incoming.clear();
        out.incoming.extend_from_slice(inputs);
    }

    pub fn interpret_output(&self, value: f64) -> i64 {
        self.kind.interpret(value)
    }

    /// One gradient-descent step from per-unit results:
    /// `w[i][j] -= delta_i * incoming_i[j] * lr` and `b[i] -= delta_i * lr`.
    pub fn update_weights(&mut self, results: &[UnitResult], learning_rate: f64) {
        debug_assert_eq!(results.len(), self.units());
        for (i, result) in results.iter().enumerate() {
            let step = result.delta * learning_rate;
            for (w, x) in self.weights.row_mut(i).iter_mut().zip(&result.incoming) {
                *w -= step * x;
            }
            self.bias[i] -= step;
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wts: ", self.kind)?;
        for i in 0..self.weights.rows {
            let row: Vec<String> = self.weights.row(i).iter().map(|w| w.to_string()).collect();
            write!(f, "{{{}}}", row.join(", "))?;
        }
        let bias: Vec<String> = self.bias.iter().map(|b| b.to_string()).collect();
        write!(f, " bias: {{{}}}", bias.join(", "))
    }
}
