/// Per-unit record produced by `Layer::loss_with_gradients` during a
/// backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitResult {
    /// Activated output of the unit.
    pub f: f64,
    /// Output loss for this unit. Only meaningful on the output layer; hidden
    /// units leave it at `0.0`.
    pub loss: f64,
    /// ∂loss/∂(pre-nonlinearity signal) for this unit.
    pub delta: f64,
    /// Copy of the activations that fed this unit on the forward pass.
    ///
    /// The weight gradient for input `j` is `delta * incoming[j]`, so keeping
    /// the inputs here lets `Layer::update_weights` work from the results
    /// alone. These are not derivatives with respect to the inputs.
    pub incoming: Vec<f64>,
}

impl UnitResult {
    pub fn new(num_inputs: usize) -> UnitResult {
        UnitResult {
            f: 0.0,
            loss: 0.0,
            delta: 0.0,
            incoming: vec![0.0; num_inputs],
        }
    }
}

impl std::fmt::Display for UnitResult {
    fn fmt(&self, out: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(out, "f: {} loss: {} delta: {} incoming:", self.f, self.loss, self.delta)?;
        for v in &self.incoming {
            write!(out, " {v}")?;
        }
        Ok(())
    }
}
