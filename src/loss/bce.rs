pub struct BceLoss;

const EPS: f64 = 1e-12;

impl BceLoss {
    /// Binary cross-entropy of one sigmoid output: -(y·ln f + (1-y)·ln(1-f)),
    /// with `f` clamped to `[ε, 1-ε]` so a saturated output stays finite.
    pub fn loss(f: f64, y: f64) -> f64 {
        let f = f.clamp(EPS, 1.0 - EPS);
        -(y * f.ln() + (1.0 - y) * (1.0 - f).ln())
    }

    /// Output delta: (f - y) · f(1 - f)
    pub fn delta(f: f64, y: f64) -> f64 {
        (f - y) * f * (1.0 - f)
    }
}
