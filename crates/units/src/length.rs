use serde::{Deserialize, Serialize};

/// Comoving kpc/h per Mpc/h
pub const KPC_PER_MPC: f64 = 1000.0;

/// A comoving length using f64 precision.
///
/// The `Length` struct represents lengths with Mpc/h as the base unit, the
/// unit halo positions and simulation boxes are expressed in. Halo finders
/// usually report virial radii in kpc/h, so the kpc/h constructors are the
/// single place where that factor of 1000 lives.
///
/// # Examples
///
/// ```rust
/// use units::Length;
///
/// let lbox = Length::from_mpc(250.0);
/// let rvir = Length::from_kpc(350.0);
///
/// assert_eq!(rvir.to_mpc(), 0.35);
/// assert!(rvir < lbox);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Length(f64); // Base unit: Mpc/h

impl Length {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_mpc(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Length` from a value in kpc/h.
    pub fn from_kpc(value: f64) -> Self {
        Self(value / KPC_PER_MPC)
    }

    pub fn to_mpc(&self) -> f64 {
        self.0
    }

    pub fn to_kpc(&self) -> f64 {
        self.0 * KPC_PER_MPC
    }
}
