pub mod early_stop;
pub mod report;
pub mod trainer;

pub use early_stop::{patience_exhausted, should_stop};
pub use report::TrainingReport;
