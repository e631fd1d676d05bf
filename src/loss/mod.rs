pub mod bce;
pub mod squared;

pub use bce::BceLoss;
pub use squared::SquaredLoss;
