pub mod checker;

pub use checker::GradientChecker;
