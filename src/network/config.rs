use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};

/// Hyperparameters fixed when a `Network` is constructed.
///
/// Every field is required; there are no serde defaults.
///
/// - `num_inputs`: width of every feature vector fed to the network
/// - `max_iterations`: hard cap on training epochs
/// - `min_delta_sgd`: an epoch-to-epoch loss decrease at or below this
///   counts as "no progress" for early stopping
/// - `patience`: consecutive no-progress epochs that stop training
/// - `learning_rate`: gradient-descent step size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub num_inputs: usize,
    pub max_iterations: usize,
    pub min_delta_sgd: f64,
    pub patience: usize,
    pub learning_rate: f64,
}

impl NetworkConfig {
    pub fn new(
        num_inputs: usize,
        max_iterations: usize,
        min_delta_sgd: f64,
        patience: usize,
        learning_rate: f64,
    ) -> NetworkConfig {
        NetworkConfig {
            num_inputs,
            max_iterations,
            min_delta_sgd,
            patience,
            learning_rate,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(NnError::InvalidConfig("max_iterations must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NnError::InvalidConfig(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        if !(self.min_delta_sgd.is_finite() && self.min_delta_sgd >= 0.0) {
            return Err(NnError::InvalidConfig(format!(
                "min_delta_sgd must be a non-negative finite number, got {}",
                self.min_delta_sgd
            )));
        }
        Ok(())
    }

    /// Parses and validates a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<NetworkConfig> {
        let config: NetworkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads and validates a config written by `save_json`.
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: NetworkConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_json() {
        let config = NetworkConfig::from_json_str(
            r#"{"num_inputs": 3, "max_iterations": 200, "min_delta_sgd": 1e-8,
                "patience": 4, "learning_rate": 0.001}"#,
        ).unwrap();
        assert_eq!(config, NetworkConfig::new(3, 200, 1e-8, 4, 0.001));
    }

    #[test]
    fn missing_field_is_rejected() {
        let err = NetworkConfig::from_json_str(
            r#"{"num_inputs": 3, "max_iterations": 200, "patience": 4, "learning_rate": 0.001}"#,
        ).unwrap_err();
        assert!(matches!(err, NnError::Json(_)));
    }

    #[test]
    fn zero_learning_rate_is_rejected() {
        let err = NetworkConfig::new(3, 10, 0.0, 1, 0.0).validate().unwrap_err();
        assert!(matches!(err, NnError::InvalidConfig(_)));
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("online-nn-config-{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        let config = NetworkConfig::new(10, 40, 1e-4, 1, 0.01);
        config.save_json(path).unwrap();
        assert_eq!(NetworkConfig::load_json(path).unwrap(), config);
        std::fs::remove_file(path).unwrap();
    }
}
