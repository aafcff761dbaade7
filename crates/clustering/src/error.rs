use thiserror::Error;

/// Broad category of a correlation-function failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unsupported settings: estimator, periodicity shape, thread pool
    Configuration,
    /// The inputs disagree with each other or with the settings
    InputConsistency,
}

/// Errors raised by pair counting and correlation estimation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("inconsistent input: {message}")]
    InputConsistency { message: String },

    #[error(
        "unknown estimator `{0}`; expected one of Natural, Davis-Peebles, Hewett, Hamilton, Landy-Szalay"
    )]
    UnknownEstimator(String),
}

pub type Result<T> = std::result::Result<T, ClusteringError>;

impl ClusteringError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::InputConsistency {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } | Self::UnknownEstimator(_) => ErrorKind::Configuration,
            Self::InputConsistency { .. } => ErrorKind::InputConsistency,
        }
    }
}
