use crate::layers::{dense::Layer, unit_result::UnitResult};

/// Plain gradient descent with a fixed learning rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to `layer` from the results of its backward pass.
    pub fn step(&self, layer: &mut Layer, results: &[UnitResult]) {
        layer.update_weights(results, self.learning_rate);
    }
}
