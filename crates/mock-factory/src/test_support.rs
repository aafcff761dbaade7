use halo_catalog::{HaloCatalog, HaloId};
use hod::{
    CompositeModel, HaloProfile, HaloPropKeys, HodError, HostPlacements, NfwProfile,
    ProfileLookupTable, Result as HodResult,
};
use nalgebra::{Point3, Vector3};
use rand_chacha::ChaChaRng;
use units::Length;

/// Composite model whose occupations are fixed in advance
pub(crate) struct FixedModel {
    types: Vec<(String, f64, Vec<u32>)>,
    keys: HaloPropKeys,
    profile: NfwProfile,
    table: ProfileLookupTable,
}

impl FixedModel {
    pub(crate) fn new(types: Vec<(&str, f64, Vec<u32>)>) -> Self {
        let profile = NfwProfile::default();
        let table = ProfileLookupTable::build(&profile, profile.param_table()).unwrap();
        Self {
            types: types
                .into_iter()
                .map(|(t, bound, occ)| (t.to_string(), bound, occ))
                .collect(),
            keys: HaloPropKeys::primary("mvir"),
            profile,
            table,
        }
    }

    pub(crate) fn with_keys(mut self, keys: HaloPropKeys) -> Self {
        self.keys = keys;
        self
    }
}

impl CompositeModel for FixedModel {
    fn gal_types(&self) -> Vec<String> {
        self.types.iter().map(|(t, _, _)| t.clone()).collect()
    }

    fn occupation_bound(&self, gal_type: &str) -> Option<f64> {
        self.types
            .iter()
            .find(|(t, _, _)| t == gal_type)
            .map(|(_, bound, _)| *bound)
    }

    fn haloprop_keys(&self) -> &HaloPropKeys {
        &self.keys
    }

    fn halo_profile(&self) -> &dyn HaloProfile {
        &self.profile
    }

    fn lookup_table(&self) -> &ProfileLookupTable {
        &self.table
    }

    fn mc_occupation(
        &self,
        gal_type: &str,
        _halos: &HaloCatalog,
        _rng: &mut ChaChaRng,
    ) -> HodResult<Vec<u32>> {
        self.types
            .iter()
            .find(|(t, _, _)| t == gal_type)
            .map(|(_, _, occ)| occ.clone())
            .ok_or_else(|| HodError::UnknownGalType(gal_type.to_string()))
    }

    fn mc_coords(
        &self,
        _gal_type: &str,
        hosts: &HostPlacements<'_>,
        _rng: &mut ChaChaRng,
    ) -> HodResult<Vec<Point3<f64>>> {
        Ok(hosts.centers.to_vec())
    }
}

/// Three halos in a 250 Mpc/h box with virial radii 0.5, 1 and 2 Mpc/h
pub(crate) fn three_halo_catalog() -> HaloCatalog {
    HaloCatalog::new(
        Length::from_mpc(250.0),
        vec![HaloId(1), HaloId(2), HaloId(3)],
        vec![
            Point3::new(10.0, 20.0, 30.0),
            Point3::new(100.0, 100.0, 100.0),
            Point3::new(249.5, 0.5, 125.0),
        ],
        vec![
            Vector3::new(100.0, 0.0, 0.0),
            Vector3::new(0.0, -50.0, 0.0),
            Vector3::new(0.0, 0.0, 300.0),
        ],
        vec![
            Length::from_kpc(500.0),
            Length::from_kpc(1000.0),
            Length::from_kpc(2000.0),
        ],
    )
    .unwrap()
    .with_column("mvir", vec![1e12, 1e13, 1e14])
    .unwrap()
}

/// Distance between two points under minimum-image periodic boundaries
pub(crate) fn periodic_distance(a: &Point3<f64>, b: &Point3<f64>, box_size: f64) -> f64 {
    (a - b)
        .map(|d| {
            let d = d.abs() % box_size;
            d.min(box_size - d)
        })
        .norm()
}
