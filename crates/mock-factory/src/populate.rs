//! Writing galaxies of one type into their reserved table range.
//!
//! Bounded types (at most one galaxy per halo) copy host attributes row for
//! row and let the model place each galaxy, handing it the hosts' profiles
//! from the realization's lookup table. Unbounded types draw several
//! positions per host from the host's inverse cumulative radial profile,
//! filling consecutive sub-ranges in catalog order.
//!
//! Galaxy velocities are the host velocities; velocity bias is not modeled.

use std::collections::BTreeMap;
use std::ops::Range;

use halo_catalog::HaloCatalog;
use hod::{CompositeModel, HostPlacements, InvCumuProfile, ProfileLookupTable};
use rand_chacha::ChaChaRng;
use tracing::debug;
use units::Length;

use crate::allocation::TypeAllocation;
use crate::error::{MockError, Result};
use crate::table::MockGalaxyTable;

/// Read-only inputs shared by every populator call of one realization
pub struct PopulationContext<'a, M: ?Sized> {
    pub model: &'a M,
    pub halos: &'a HaloCatalog,
    pub prim_haloprop: &'a [f64],
    pub sec_haloprop: Option<&'a [f64]>,
    /// Catalog columns holding the profile parameters
    pub profile_keys: &'a [String],
    pub lookup_table: &'a ProfileLookupTable,
}

impl<'a, M: ?Sized> PopulationContext<'a, M> {
    /// Copies the attributes of halo `host` into table row `row`
    fn write_host_row(&self, gal_type: &str, host: usize, row: usize, table: &mut MockGalaxyTable) {
        let halo_velocity = self.halos.velocities()[host];

        table.gal_type[row] = gal_type.to_string();
        table.halo_id[row] = self.halos.ids()[host];
        table.host_position[row] = self.halos.positions()[host];
        table.host_velocity[row] = halo_velocity;
        table.velocity[row] = halo_velocity;
        table.prim_haloprop[row] = self.prim_haloprop[host];
        if let (Some(dst), Some(src)) = (table.sec_haloprop.as_mut(), self.sec_haloprop) {
            dst[row] = src[host];
        }
    }

    /// Inverse cumulative profiles of `hosts`, read from this realization's
    /// lookup table at the hosts' catalog profile parameters
    fn host_profiles(&self, hosts: &[usize]) -> Result<Vec<InvCumuProfile<'a>>> {
        let lookup_table: &'a ProfileLookupTable = self.lookup_table;
        let host_params = self
            .profile_keys
            .iter()
            .map(|key| {
                let column = self.halos.column(key)?;
                Ok((key.clone(), hosts.iter().map(|&h| column[h]).collect()))
            })
            .collect::<Result<BTreeMap<String, Vec<f64>>>>()?;
        Ok(lookup_table.inv_cumu_profiles(&host_params, hosts.len())?)
    }
}

/// Populates a type with at most one galaxy per halo.
///
/// # Errors
///
/// Returns an internal-consistency error if the number of occupied halos
/// differs from the reserved range, or the model places a different number
/// of galaxies.
pub fn populate_bounded<M: CompositeModel + ?Sized>(
    ctx: &PopulationContext<'_, M>,
    allocation: &TypeAllocation,
    table: &mut MockGalaxyTable,
    rng: &mut ChaChaRng,
) -> Result<()> {
    let gal_type = allocation.spec.gal_type.as_str();
    let range = allocation.range.clone();

    let hosts: Vec<usize> = allocation
        .occupations
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n == 1)
        .map(|(i, _)| i)
        .collect();
    if hosts.len() != range.len() {
        return Err(MockError::internal(format!(
            "`{gal_type}` has {} occupied halos for {} reserved rows",
            hosts.len(),
            range.len()
        )));
    }

    for (&host, row) in hosts.iter().zip(range.clone()) {
        ctx.write_host_row(gal_type, host, row, table);
    }

    let centers: Vec<_> = hosts.iter().map(|&h| ctx.halos.positions()[h]).collect();
    let radii: Vec<Length> = hosts.iter().map(|&h| ctx.halos.virial_radii()[h]).collect();
    let prim: Vec<f64> = hosts.iter().map(|&h| ctx.prim_haloprop[h]).collect();
    let profiles = ctx.host_profiles(&hosts)?;
    let placements = HostPlacements {
        centers: &centers,
        radii: &radii,
        prim_haloprop: &prim,
        profiles: &profiles,
    };
    let coords = ctx.model.mc_coords(gal_type, &placements, rng)?;
    if coords.len() != range.len() {
        return Err(MockError::internal(format!(
            "model placed {} `{gal_type}` galaxies into {} rows",
            coords.len(),
            range.len()
        )));
    }
    table.position[range].copy_from_slice(&coords);

    debug!(gal_type, num_galaxies = hosts.len(), "populated bounded type");
    Ok(())
}

/// Populates a type with any number of galaxies per halo.
///
/// # Errors
///
/// Returns an internal-consistency error if the host occupations do not add
/// up to the reserved range, and propagates lookup-table errors.
pub fn populate_unbounded<M: CompositeModel + ?Sized>(
    ctx: &PopulationContext<'_, M>,
    allocation: &TypeAllocation,
    table: &mut MockGalaxyTable,
    rng: &mut ChaChaRng,
) -> Result<()> {
    let gal_type = allocation.spec.gal_type.as_str();
    let range = allocation.range.clone();

    let (hosts, counts): (Vec<usize>, Vec<u32>) = allocation
        .occupations
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .map(|(i, &n)| (i, n))
        .unzip();

    let num_satellites: usize = counts.iter().map(|&n| n as usize).sum();
    if num_satellites != range.len() {
        return Err(MockError::internal(format!(
            "`{gal_type}` hosts hold {num_satellites} galaxies for {} reserved rows",
            range.len()
        )));
    }

    let profiles = ctx.host_profiles(&hosts)?;

    if ctx.model.has_profile_modulation(gal_type) {
        debug!(gal_type, "profile modulation requested; sampling the unmodulated profile");
    }

    let systems = satellite_systems(&counts, range.start);
    let end = systems.last().map_or(range.start, |rows| rows.end);
    if end != range.end {
        return Err(MockError::internal(format!(
            "`{gal_type}` satellite cursor ended at {end}, expected {}",
            range.end
        )));
    }

    for ((&host, rows), profile) in hosts.iter().zip(systems).zip(&profiles) {
        let coords = ctx.model.mc_profile_coords(
            profile,
            ctx.halos.positions()[host],
            ctx.halos.virial_radii()[host],
            rows.len(),
            rng,
        );
        if coords.len() != rows.len() {
            return Err(MockError::internal(format!(
                "model placed {} `{gal_type}` galaxies in a host of {}",
                coords.len(),
                rows.len()
            )));
        }
        for (row, coord) in rows.zip(coords) {
            ctx.write_host_row(gal_type, host, row, table);
            table.position[row] = coord;
        }
    }

    debug!(gal_type, num_hosts = hosts.len(), num_satellites, "populated unbounded type");
    Ok(())
}

/// Consecutive table sub-ranges for hosts holding `counts` galaxies each,
/// starting at row `start`.
///
/// # Examples
///
/// ```
/// use mock_factory::satellite_systems;
///
/// assert_eq!(satellite_systems(&[2, 1, 3], 10), vec![10..12, 12..13, 13..16]);
/// ```
pub fn satellite_systems(counts: &[u32], start: usize) -> Vec<Range<usize>> {
    counts
        .iter()
        .scan(start, |cursor, &n| {
            let rows = *cursor..*cursor + n as usize;
            *cursor = rows.end;
            Some(rows)
        })
        .collect()
}
