use std::{cmp::Ordering, collections::BTreeMap};

/// Totally ordered `f64` key so samples can live in a `BTreeMap`.
#[derive(Debug, Clone, Copy)]
struct SampleX(f64);

impl PartialEq for SampleX {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SampleX {}

impl PartialOrd for SampleX {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SampleX {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Checks analytic derivatives against secant slopes of sampled points.
///
/// Samples `(x, y, dy/dx)` are kept ordered by `x`; adding a sample at an
/// existing `x` replaces it. For each pair of neighbouring samples the
/// error is `|(y₂ - y₁) - dy/dx₁ · (x₂ - x₁)|`, a forward difference that
/// only uses the left sample's derivative.
#[derive(Debug, Clone, Default)]
pub struct GradientChecker {
    samples: BTreeMap<SampleX, (f64, f64)>,
}

impl GradientChecker {
    pub fn new() -> GradientChecker {
        GradientChecker::default()
    }

    pub fn add_point(&mut self, x: f64, y: f64, dy_dx: f64) {
        // `-0.0 + 0.0` is `0.0`, so both zeros share one key.
        self.samples.insert(SampleX(x + 0.0), (y, dy_dx));
    }

    pub fn add_points(&mut self, xs: &[f64], ys: &[f64], dy_dxs: &[f64]) {
        for ((&x, &y), &d) in xs.iter().zip(ys).zip(dy_dxs) {
            self.add_point(x, y, d);
        }
    }

    /// Number of distinct `x` samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn pair_error(x1: f64, (y1, dy_dx1): (f64, f64), x2: f64, (y2, _): (f64, f64)) -> f64 {
        assert!(x1 != x2, "gradient samples must have distinct x, got {x1} twice");
        ((y2 - y1) - dy_dx1 * (x2 - x1)).abs()
    }

    fn pair_errors(&self) -> impl Iterator<Item = f64> + '_ {
        assert!(
            self.samples.len() >= 2,
            "gradient check needs at least 2 distinct samples, have {}",
            self.samples.len()
        );
        self.samples.iter()
            .zip(self.samples.iter().skip(1))
            .map(|((x1, s1), (x2, s2))| Self::pair_error(x1.0, *s1, x2.0, *s2))
    }

    /// Sum of all neighbouring-pair errors.
    ///
    /// # Panics
    /// Panics with fewer than two distinct samples.
    pub fn total_error(&self) -> f64 {
        self.pair_errors().sum()
    }

    /// `total_error / sample count < tolerance`
    pub fn gradients_match_on_average(&self, tolerance: f64) -> bool {
        self.total_error() / (self.samples.len() as f64) < tolerance
    }

    /// Every neighbouring-pair error is at most `tolerance`.
    pub fn gradients_match_within(&self, tolerance: f64) -> bool {
        self.pair_errors().all(|error| error <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `n` points `start + i * step` with `start + i * step < end`.
    fn sweep(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
        let n = ((end - start) / step).round() as usize;
        (0..n).map(move |i| start + i as f64 * step)
    }

    #[test]
    fn squared_matches() {
        let mut checker = GradientChecker::new();
        for x in sweep(0.0, 10.0, 0.01) {
            checker.add_point(x, x * x, 2.0 * x);
        }
        assert!(checker.gradients_match_on_average(1e-3));
    }

    #[test]
    fn wrong_derivative_does_not_match() {
        let mut checker = GradientChecker::new();
        for x in sweep(0.0, 10.0, 0.01) {
            checker.add_point(x, x * x, 3.0 * x);
        }
        assert!(!checker.gradients_match_on_average(1e-3));
    }

    #[test]
    fn coarse_sampling_needs_looser_tolerance() {
        let mut checker = GradientChecker::new();
        for x in sweep(0.0, 10.0, 0.1) {
            checker.add_point(x, x * x, 2.0 * x);
        }
        assert!(!checker.gradients_match_on_average(1e-3));
        assert!(checker.gradients_match_on_average(1e-1));
    }

    #[test]
    fn log_matches_with_finer_sampling_near_zero() {
        let mut checker = GradientChecker::new();
        for x in sweep(0.01, 0.5, 0.001).chain(sweep(0.5, 5.0, 0.01)) {
            checker.add_point(x, x.ln(), 1.0 / x);
        }
        assert!(checker.gradients_match_on_average(1e-4));
    }

    #[test]
    fn sine_matches() {
        let mut checker = GradientChecker::new();
        for x in sweep(0.01, 0.5, 0.01) {
            checker.add_point(x, x.sin(), x.cos());
        }
        assert!(checker.gradients_match_on_average(1e-4));
        assert!(checker.gradients_match_within(1e-4));
    }

    #[test]
    fn duplicate_x_overwrites() {
        let mut checker = GradientChecker::new();
        checker.add_points(&[0.0, 1.0, 1.0], &[0.0, 5.0, 1.0], &[1.0, 1.0, 1.0]);
        assert_eq!(checker.len(), 2);
        assert_eq!(checker.total_error(), 0.0);
    }

    #[test]
    fn negative_zero_overwrites_zero() {
        let mut checker = GradientChecker::new();
        checker.add_point(-0.0, 7.0, 0.0);
        checker.add_point(0.0, 0.0, 1.0);
        checker.add_point(1.0, 1.0, 1.0);
        assert_eq!(checker.len(), 2);
        assert_eq!(checker.total_error(), 0.0);
    }

    #[test]
    fn average_is_taken_over_sample_count() {
        let mut checker = GradientChecker::new();
        checker.add_points(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 6.0], &[1.0, 1.0, 1.0, 1.0]);
        // Only the last pair is off, by 3.
        assert_eq!(checker.total_error(), 3.0);
        assert!(checker.gradients_match_on_average(0.76));
        assert!(!checker.gradients_match_on_average(0.75));
        assert!(!checker.gradients_match_within(2.9));
    }

    #[test]
    fn uses_left_derivative_only() {
        let mut checker = GradientChecker::new();
        checker.add_point(0.0, 0.0, 1.0);
        checker.add_point(1.0, 1.0, 100.0);
        assert_eq!(checker.total_error(), 0.0);
        assert!(checker.gradients_match_within(0.0));
    }

    #[test]
    #[should_panic(expected = "at least 2 distinct samples")]
    fn single_sample_panics() {
        let mut checker = GradientChecker::new();
        checker.add_point(1.0, 1.0, 2.0);
        checker.total_error();
    }
}
