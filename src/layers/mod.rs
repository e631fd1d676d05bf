pub mod dense;
pub mod unit_result;

pub use dense::{Layer, NextLayer};
pub use unit_result::UnitResult;
