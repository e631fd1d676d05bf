use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a `Network::train` run.
///
/// `losses[i]` is the mean loss of epoch `i`. The report is cleared at the
/// start of every run and only appended to while training.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub losses: Vec<f64>,
    /// Wall-clock duration of the whole run in milliseconds.
    pub elapsed_ms: u64,
    /// Whether training ended before reaching `max_iterations`.
    pub stopped_early: bool,
}

impl TrainingReport {
    pub fn new() -> TrainingReport {
        TrainingReport::default()
    }

    pub fn clear(&mut self) {
        self.losses.clear();
        self.elapsed_ms = 0;
        self.stopped_early = false;
    }

    pub fn iterations(&self) -> usize {
        self.losses.len()
    }

    pub fn last_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Training report:")?;
        for (i, loss) in self.losses.iter().enumerate() {
            writeln!(f, " - iteration {i}: loss {loss}")?;
        }
        write!(f, "--- training completed in {} ms", self.elapsed_ms)
    }
}
