use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SgError {
    #[error("Invalid filter configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Insufficient samples: need {needed} samples, have {available}")]
    InsufficientSamples { needed: usize, available: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed sample: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SgError>;
