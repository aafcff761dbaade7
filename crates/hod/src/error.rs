use halo_catalog::CatalogError;
use thiserror::Error;

/// Errors raised by occupation and profile models
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HodError {
    /// Model assembled with inconsistent or out-of-range settings
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A galaxy type that the model does not define was requested
    #[error("unknown galaxy type `{0}`")]
    UnknownGalType(String),

    /// Per-host placement inputs handed to a model disagree in length
    #[error("placement input mismatch: {message}")]
    InputMismatch { message: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, HodError>;

impl HodError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn input_mismatch(message: impl Into<String>) -> Self {
        Self::InputMismatch {
            message: message.into(),
        }
    }
}
