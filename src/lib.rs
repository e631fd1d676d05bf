pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod gradient;
pub mod dataset;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::LayerKind;
pub use layers::{dense::{Layer, NextLayer}, unit_result::UnitResult};
pub use network::{config::NetworkConfig, example::Example, network::Network};
pub use optim::sgd::Sgd;
pub use train::report::TrainingReport;
pub use gradient::checker::GradientChecker;
pub use dataset::dataset::Dataset;
pub use error::{NnError, Result};
