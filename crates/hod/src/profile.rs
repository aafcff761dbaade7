//! Radial density profiles of dark-matter halos.

use serde::{Deserialize, Serialize};
use units::Mass;

use crate::param_table::{ParamRange, ProfParamTable};

/// Name of the NFW concentration column
pub const CONC_KEY: &str = "conc";

/// A spherically symmetric halo profile described by a handful of
/// per-halo parameters (e.g. concentration).
pub trait HaloProfile: Send + Sync {
    /// Catalog column names of the profile parameters, in a fixed order
    fn param_keys(&self) -> Vec<String>;

    /// Value of parameter `key` for a halo with the given primary property,
    /// or `None` if `key` is not a parameter of this profile
    fn param_value(&self, key: &str, prim_haloprop: f64) -> Option<f64>;

    /// Parameter coverage the profile is configured with
    fn param_table(&self) -> &ProfParamTable;

    /// Fraction of the halo mass enclosed within `x = r / rvir`, for
    /// parameter values given in `param_keys()` order. Must increase
    /// monotonically from 0 at `x = 0` to 1 at `x = 1`.
    fn cumulative_mass_fraction(&self, x: f64, params: &[f64]) -> f64;
}

/// Concentration–mass relation and lookup-table coverage of an NFW profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfwParams {
    /// Concentration at the pivot mass
    pub conc_norm: f64,
    /// Power-law slope, `c ∝ (M / M_pivot)^(−slope)`
    pub conc_slope: f64,
    /// Pivot mass in Msun/h
    pub pivot_mass: f64,
    /// Concentration grid of the inverse-cumulative lookup table
    pub conc_range: ParamRange,
}

impl Default for NfwParams {
    fn default() -> Self {
        Self {
            conc_norm: 9.0,
            conc_slope: 0.13,
            pivot_mass: 1.3e13,
            conc_range: ParamRange::new(1.0, 25.0, 0.5),
        }
    }
}

/// Navarro–Frenk–White profile truncated at the virial radius.
///
/// The enclosed mass fraction is `g(c x) / g(c)` with
/// `g(y) = ln(1 + y) − y / (1 + y)`.
#[derive(Debug, Clone)]
pub struct NfwProfile {
    params: NfwParams,
    table: ProfParamTable,
}

impl NfwProfile {
    pub fn new(params: NfwParams) -> Self {
        let table = ProfParamTable::from([(CONC_KEY.to_string(), params.conc_range)]);
        Self { params, table }
    }

    /// Concentration of a halo of the given mass
    pub fn concentration(&self, mass: Mass) -> f64 {
        let ratio = mass.to_solar_masses() / self.params.pivot_mass;
        self.params.conc_norm * ratio.powf(-self.params.conc_slope)
    }
}

impl Default for NfwProfile {
    fn default() -> Self {
        Self::new(NfwParams::default())
    }
}

fn nfw_g(y: f64) -> f64 {
    (1.0 + y).ln() - y / (1.0 + y)
}

impl HaloProfile for NfwProfile {
    fn param_keys(&self) -> Vec<String> {
        vec![CONC_KEY.to_string()]
    }

    fn param_value(&self, key: &str, prim_haloprop: f64) -> Option<f64> {
        (key == CONC_KEY).then(|| self.concentration(Mass::from_solar_masses(prim_haloprop)))
    }

    fn param_table(&self) -> &ProfParamTable {
        &self.table
    }

    fn cumulative_mass_fraction(&self, x: f64, params: &[f64]) -> f64 {
        let conc = params[0];
        let x = x.clamp(0.0, 1.0);
        nfw_g(conc * x) / nfw_g(conc)
    }
}
