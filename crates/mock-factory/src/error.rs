use halo_catalog::CatalogError;
use hod::HodError;
use thiserror::Error;

/// Broad category of a mock-population failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The model or catalog cannot be used together as given
    Configuration,
    /// A population run broke one of its own bookkeeping invariants
    InternalConsistency,
}

/// Errors raised while preprocessing a catalog or populating a mock
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MockError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Fatal: the realized table no longer matches its reserved layout
    #[error("internal consistency error: {message}")]
    InternalConsistency { message: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Hod(#[from] HodError),
}

pub type Result<T> = std::result::Result<T, MockError>;

impl MockError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalConsistency {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InternalConsistency { .. }
            | Self::Catalog(CatalogError::LengthMismatch { .. })
            | Self::Hod(HodError::Catalog(CatalogError::LengthMismatch { .. }))
            | Self::Hod(HodError::InputMismatch { .. }) => {
                ErrorKind::InternalConsistency
            }
            Self::Configuration { .. } | Self::Catalog(_) | Self::Hod(_) => {
                ErrorKind::Configuration
            }
        }
    }
}
