use serde::{Deserialize, Serialize};
use std::ops::{Div, Sub};

/// A halo mass using f64 precision.
///
/// Base unit is Msun/h. Occupation statistics and concentration relations
/// are written in terms of log10(M), so the log accessors are the common
/// way in and out.
///
/// # Examples
///
/// ```rust
/// use units::Mass;
///
/// let mass = Mass::from_log10_solar_masses(12.0);
/// assert!((mass.to_solar_masses() / 1e12 - 1.0).abs() < 1e-12);
/// assert!((mass.log10_solar_masses() - 12.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // Base unit: Msun/h

impl Mass {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_solar_masses(value: f64) -> Self {
        Self(value)
    }

    pub fn from_log10_solar_masses(log_mass: f64) -> Self {
        Self(10.0_f64.powf(log_mass))
    }

    pub fn to_solar_masses(&self) -> f64 {
        self.0
    }

    /// Returns log10 of the mass in Msun/h.
    ///
    /// Non-positive masses map to negative infinity.
    pub fn log10_solar_masses(&self) -> f64 {
        if self.0 > 0.0 {
            self.0.log10()
        } else {
            f64::NEG_INFINITY
        }
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass(self.0 - rhs.0)
    }
}

/// Division of Mass by Mass returns a dimensionless ratio
impl Div for Mass {
    type Output = f64;

    fn div(self, rhs: Self) -> f64 {
        self.0 / rhs.0
    }
}
