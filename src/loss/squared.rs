pub struct SquaredLoss;

impl SquaredLoss {
    /// Squared error of one output: (y - f)²
    pub fn loss(f: f64, y: f64) -> f64 {
        (y - f).powi(2)
    }

    /// ∂loss/∂f: -2(y - f)
    pub fn derivative(f: f64, y: f64) -> f64 {
        -2.0 * (y - f)
    }
}
