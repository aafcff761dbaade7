use serde::{Deserialize, Serialize};

use crate::error::{ClusteringError, Result};

/// Periodic boundary conditions of the volume the points live in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Periodicity {
    /// Open boundaries; explicit randoms are required
    #[default]
    None,
    /// The same box length along every axis
    Scalar(f64),
    /// One box length per axis
    PerAxis(Vec<f64>),
}

impl Periodicity {
    /// Expands the periodicity to one box length per axis, or `None` for
    /// open boundaries.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a per-axis period does not have
    /// `dim` entries, or any period is infinite, non-positive or NaN.
    pub fn resolve(&self, dim: usize) -> Result<Option<Vec<f64>>> {
        let periods = match self {
            Self::None => return Ok(None),
            Self::Scalar(length) => vec![*length; dim],
            Self::PerAxis(lengths) => {
                if lengths.len() != dim {
                    return Err(ClusteringError::config(format!(
                        "period has {} entries for {dim}-dimensional points",
                        lengths.len()
                    )));
                }
                lengths.clone()
            }
        };

        if periods.iter().any(|p| p.is_infinite()) {
            return Err(ClusteringError::config(
                "periodic boundaries must be finite along every axis",
            ));
        }
        if periods.iter().any(|&p| p.is_nan() || p <= 0.0) {
            return Err(ClusteringError::config("periods must be positive"));
        }
        Ok(Some(periods))
    }
}
