//! Inverse cumulative profile lookup tables.
//!
//! Satellite radii are drawn by inverse transform sampling: a uniform draw
//! `u` is mapped to the scaled radius `x = r / rvir` enclosing a fraction
//! `u` of the halo mass. Inverting the enclosed mass fraction for every halo
//! is expensive, so the inversion is tabulated once on a grid of profile
//! parameters and each halo uses the grid cell nearest to its parameters.
//!
//! Tables are immutable. Extending the parameter coverage produces a new
//! table with a higher version number instead of mutating shared state, so
//! any holder of a table reference knows exactly which coverage it sees.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{HodError, Result};
use crate::param_table::{ParamRange, ProfParamTable};
use crate::profile::HaloProfile;

/// Number of tabulated points of each inverse cumulative profile
pub const NUM_CDF_POINTS: usize = 101;

/// Bisection steps used to invert the enclosed mass fraction
const BISECTION_STEPS: usize = 60;

/// Largest number of parameter-grid cells a table may tabulate
pub const MAX_TABLE_CELLS: usize = 100_000;

/// Tabulated inverse cumulative profiles over a grid of profile parameters
#[derive(Debug, Clone)]
pub struct ProfileLookupTable {
    version: u64,
    param_table: ProfParamTable,
    /// Parameter keys in profile order, with the range used for each
    axes: Vec<(String, ParamRange)>,
    /// Scaled radius at each tabulated quantile, one row per grid cell
    radii: Vec<Vec<f64>>,
}

impl ProfileLookupTable {
    /// Tabulates the inverse cumulative profile of `profile` over every grid
    /// cell of `param_table`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a parameter of the profile has no
    /// range in `param_table`, a range is malformed, or the grid holds more
    /// than [`MAX_TABLE_CELLS`] cells.
    pub fn build(profile: &dyn HaloProfile, param_table: &ProfParamTable) -> Result<Self> {
        Self::build_versioned(profile, param_table, 0)
    }

    /// Builds a new table covering `param_table`, one version above this one
    pub fn rebuilt(&self, profile: &dyn HaloProfile, param_table: &ProfParamTable) -> Result<Self> {
        Self::build_versioned(profile, param_table, self.version + 1)
    }

    fn build_versioned(
        profile: &dyn HaloProfile,
        param_table: &ProfParamTable,
        version: u64,
    ) -> Result<Self> {
        let axes = profile
            .param_keys()
            .into_iter()
            .map(|key| {
                let range = *param_table.get(&key).ok_or_else(|| {
                    HodError::config(format!("no lookup-table range for profile parameter `{key}`"))
                })?;
                range.validate(&key)?;
                Ok((key, range))
            })
            .collect::<Result<Vec<_>>>()?;

        let num_cells = axes
            .iter()
            .try_fold(1usize, |cells, (_, r)| cells.checked_mul(r.num_points()))
            .filter(|&cells| cells <= MAX_TABLE_CELLS)
            .ok_or_else(|| {
                HodError::config(format!(
                    "profile parameter grid exceeds {MAX_TABLE_CELLS} lookup-table cells"
                ))
            })?;
        let radii = (0..num_cells)
            .map(|cell| {
                let params = cell_params(&axes, cell);
                quantile_grid()
                    .map(|u| invert_mass_fraction(profile, &params, u))
                    .collect()
            })
            .collect();

        debug!(version, num_cells, "built inverse cumulative profile table");

        Ok(Self {
            version,
            param_table: param_table.clone(),
            axes,
            radii,
        })
    }

    /// Monotonically increasing build counter, starting at 0
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Coverage this table was built for
    pub fn param_table(&self) -> &ProfParamTable {
        &self.param_table
    }

    /// Number of tabulated parameter-grid cells
    pub fn num_cells(&self) -> usize {
        self.radii.len()
    }

    /// Returns one sampling function per host, using the grid cell nearest
    /// to each host's profile parameters.
    ///
    /// `host_params` maps each profile-parameter key to one value per host.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a key is missing or a column does
    /// not hold exactly `num_hosts` values.
    pub fn inv_cumu_profiles(
        &self,
        host_params: &BTreeMap<String, Vec<f64>>,
        num_hosts: usize,
    ) -> Result<Vec<InvCumuProfile<'_>>> {
        let columns = self
            .axes
            .iter()
            .map(|(key, _)| {
                host_params.get(key).map(Vec::as_slice).ok_or_else(|| {
                    HodError::config(format!("host parameters lack profile parameter `{key}`"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if columns.iter().any(|c| c.len() != num_hosts) {
            return Err(HodError::config(format!(
                "host profile-parameter columns must hold {num_hosts} values"
            )));
        }

        let profiles = (0..num_hosts)
            .map(|host| {
                let cell = self.axes.iter().zip(&columns).fold(0, |cell, ((_, range), col)| {
                    cell * range.num_points() + range.nearest_index(col[host])
                });
                InvCumuProfile {
                    radii: &self.radii[cell],
                }
            })
            .collect();
        Ok(profiles)
    }
}

/// Inverse cumulative profile of one grid cell: maps a uniform draw to a
/// scaled radius `r / rvir` in [0, 1]
#[derive(Debug, Clone, Copy)]
pub struct InvCumuProfile<'a> {
    radii: &'a [f64],
}

impl InvCumuProfile<'_> {
    /// Scaled radius enclosing mass fraction `u`, linearly interpolated
    /// between tabulated quantiles
    pub fn scaled_radius(&self, u: f64) -> f64 {
        let last = NUM_CDF_POINTS - 1;
        let pos = u.clamp(0.0, 1.0) * last as f64;
        let lo = (pos.floor() as usize).min(last - 1);
        let frac = pos - lo as f64;
        self.radii[lo] + frac * (self.radii[lo + 1] - self.radii[lo])
    }
}

fn quantile_grid() -> impl Iterator<Item = f64> {
    let last = (NUM_CDF_POINTS - 1) as f64;
    (0..NUM_CDF_POINTS).map(move |i| i as f64 / last)
}

/// Parameter values of a flattened, row-major grid cell
fn cell_params(axes: &[(String, ParamRange)], cell: usize) -> Vec<f64> {
    let mut rest = cell;
    let mut params: Vec<f64> = axes
        .iter()
        .rev()
        .map(|(_, range)| {
            let n = range.num_points();
            let idx = rest % n;
            rest /= n;
            range.value(idx)
        })
        .collect();
    params.reverse();
    params
}

/// Solves `F(x) = u` for the enclosed mass fraction `F` on x ∈ [0, 1]
fn invert_mass_fraction(profile: &dyn HaloProfile, params: &[f64], u: f64) -> f64 {
    if u <= 0.0 {
        return 0.0;
    }
    if u >= 1.0 {
        return 1.0;
    }
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if profile.cumulative_mass_fraction(mid, params) < u {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
