use crate::network::config::NetworkConfig;

/// Early-stopping predicate over the per-epoch loss history.
///
/// Always stops once `max_iterations` losses exist; otherwise defers to
/// `patience_exhausted`.
pub fn should_stop(config: &NetworkConfig, losses: &[f64]) -> bool {
    losses.len() >= config.max_iterations || patience_exhausted(config, losses)
}

/// True once at least `patience + 2` losses exist and each of the last
/// `patience` epoch-to-epoch decreases `losses[n-1] -> losses[n]` is at most
/// `min_delta_sgd`. A loss increase counts as a decrease below the threshold.
pub fn patience_exhausted(config: &NetworkConfig, losses: &[f64]) -> bool {
    if losses.len() < config.patience.saturating_add(2) {
        return false;
    }
    losses.windows(2)
        .rev()
        .take(config.patience)
        .all(|pair| pair[0] - pair[1] <= config.min_delta_sgd)
}
