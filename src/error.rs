use thiserror::Error;

#[derive(Debug, Error)]
pub enum NnError {
    #[error("the first layer needs a declared input width, but num_inputs is 0")]
    MissingInputWidth,
    #[error("an output layer needs at least one hidden layer before it")]
    NoHiddenLayer,
    #[error("the output layer has already been added; no further layers can follow it")]
    OutputLayerAlreadyAdded,
    #[error("the network has no output layer")]
    MissingOutputLayer,
    #[error("input width mismatch: network expects {expected} features, got {actual}")]
    InputWidthMismatch { expected: usize, actual: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("row has {actual} fields, dataset declares {expected}")]
    FieldCountMismatch { expected: usize, actual: usize },
    #[error("label column {index} is out of range for {fields} fields")]
    LabelIndexOutOfRange { index: usize, fields: usize },
    #[error("label value {0:?} is not numeric")]
    NonNumericLabel(String),
    #[error("dataset features have not been processed yet")]
    FeaturesNotProcessed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NnError>;
