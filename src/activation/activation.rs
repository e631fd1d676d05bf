use crate::loss::{bce::BceLoss, squared::SquaredLoss};

/// The closed set of layer variants.
///
/// Each variant fixes three things for every unit of a layer: the
/// nonlinearity applied to `bias + w · x`, the loss used when the layer is
/// the network output, and how a raw output value maps to a class label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerKind {
    /// Logistic units paired with binary cross-entropy. Outputs at or above
    /// `threshold` are interpreted as class `1`.
    Sigmoid { threshold: f64 },
    /// Parametric ReLU paired with squared error. Negative pre-activations
    /// are scaled by `slope`; outputs are rounded to the nearest integer.
    PRelu { slope: f64 },
}

impl LayerKind {
    pub const DEFAULT_THRESHOLD: f64 = 0.5;
    pub const DEFAULT_SLOPE: f64 = 0.01;

    pub fn sigmoid() -> LayerKind {
        LayerKind::Sigmoid { threshold: Self::DEFAULT_THRESHOLD }
    }

    pub fn prelu() -> LayerKind {
        LayerKind::PRelu { slope: Self::DEFAULT_SLOPE }
    }

    /// Applies the nonlinearity to a pre-activation `z`.
    pub fn function(&self, z: f64) -> f64 {
        match self {
            LayerKind::Sigmoid { .. } => 1.0 / (1.0 + (-z).exp()),
            LayerKind::PRelu { slope } => if z >= 0.0 { z } else { slope * z },
        }
    }

    /// Derivative of the nonlinearity, given both the pre-activation `z` and
    /// the activated value `f = function(z)`.
    pub fn derivative(&self, z: f64, f: f64) -> f64 {
        match self {
            LayerKind::Sigmoid { .. } => f * (1.0 - f),
            LayerKind::PRelu { slope } => if z >= 0.0 { 1.0 } else { *slope },
        }
    }

    /// Per-unit output loss and its delta for target `y`.
    ///
    /// Returns `(loss, delta)`, where delta is the value propagated backwards
    /// from the output unit.
    pub fn output_loss(&self, z: f64, f: f64, y: f64) -> (f64, f64) {
        match self {
            LayerKind::Sigmoid { .. } => (
                BceLoss::loss(f, y),
                BceLoss::delta(f, y),
            ),
            LayerKind::PRelu { .. } => (
                SquaredLoss::loss(f, y),
                SquaredLoss::derivative(f, y) * self.derivative(z, f),
            ),
        }
    }

    /// Maps a raw output value to an integer class label.
    pub fn interpret(&self, value: f64) -> i64 {
        match self {
            LayerKind::Sigmoid { threshold } => if value >= *threshold { 1 } else { 0 },
            LayerKind::PRelu { .. } => (value + 0.5).floor() as i64,
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Sigmoid { threshold } => write!(f, "sigmoid(threshold={threshold})"),
            LayerKind::PRelu { slope } => write!(f, "prelu(slope={slope})"),
        }
    }
}
