use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{
    error::Result,
    network::network::Network,
    optim::sgd::Sgd,
    train::{early_stop::{patience_exhausted, should_stop}, report::TrainingReport},
};

impl Network {
    /// Trains on the buffered examples until the early-stopping predicate
    /// fires or `max_iterations` epochs have run.
    ///
    /// Each epoch is one `backpropagate` pass over the whole buffer; its mean
    /// loss is appended to `report`, which is cleared first.
    pub fn train(&mut self, report: &mut TrainingReport) -> Result<()> {
        self.output_layer()?;
        report.clear();
        if self.examples().is_empty() {
            warn!("training with an empty example buffer; every epoch loss will be 0");
        }

        let optimizer = Sgd::new(self.config.learning_rate);
        let start = Instant::now();

        while !self.training_should_stop(report) {
            let loss = self.backpropagate_buffered(&optimizer);
            debug!(iteration = report.losses.len(), loss, "epoch complete");
            report.losses.push(loss);
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        report.stopped_early = patience_exhausted(&self.config, &report.losses);
        info!(
            iterations = report.losses.len(),
            final_loss = report.last_loss().unwrap_or(0.0),
            elapsed_ms = report.elapsed_ms,
            stopped_early = report.stopped_early,
            "training finished"
        );
        Ok(())
    }

    pub fn training_should_stop(&self, report: &TrainingReport) -> bool {
        should_stop(&self.config, &report.losses)
    }
}
