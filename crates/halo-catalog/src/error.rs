use thiserror::Error;

/// Errors raised while building or reading a halo catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A property column the caller relies on is absent
    #[error("halo catalog has no column `{key}`")]
    MissingColumn { key: String },

    /// A column does not have one entry per halo
    #[error("column `{column}` has {found} rows but the catalog has {expected} halos")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// The simulation box must have a positive, finite side length
    #[error("invalid box size {0} Mpc/h")]
    InvalidBoxSize(f64),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub fn missing_column(key: impl Into<String>) -> Self {
        Self::MissingColumn { key: key.into() }
    }
}
