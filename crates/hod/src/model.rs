//! Composite HOD models.
//!
//! A composite model bundles, for every galaxy type, an occupation component
//! and a phase-space placement rule, plus the halo profile shared by all
//! profile-sampled populations. The mock factory consumes models only
//! through the [`CompositeModel`] trait.

use halo_catalog::HaloCatalog;
use nalgebra::Point3;
use rand::Rng;
use rand_chacha::ChaChaRng;
use units::Length;

use crate::error::{HodError, Result};
use crate::lookup::{InvCumuProfile, ProfileLookupTable};
use crate::occupation::{OccupationModel, Zheng07Centrals, Zheng07Params, Zheng07Satellites};
use crate::profile::{HaloProfile, NfwParams, NfwProfile};
use crate::sampling::sample_unit_vector;

/// Halo catalog columns a model reads its independent variables from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaloPropKeys {
    PrimaryOnly { primary: String },
    WithSecondary { primary: String, secondary: String },
}

impl HaloPropKeys {
    pub fn primary(primary: impl Into<String>) -> Self {
        Self::PrimaryOnly {
            primary: primary.into(),
        }
    }

    pub fn with_secondary(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self::WithSecondary {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn primary_key(&self) -> &str {
        match self {
            Self::PrimaryOnly { primary } | Self::WithSecondary { primary, .. } => primary,
        }
    }

    pub fn secondary_key(&self) -> Option<&str> {
        match self {
            Self::PrimaryOnly { .. } => None,
            Self::WithSecondary { secondary, .. } => Some(secondary),
        }
    }
}

/// Capability surface of a composite model as used by the mock factory
pub trait CompositeModel {
    /// Galaxy type labels in model order
    fn gal_types(&self) -> Vec<String>;

    /// Maximum occupation of a type (`1.0` or infinity), `None` if unknown
    fn occupation_bound(&self, gal_type: &str) -> Option<f64>;

    fn haloprop_keys(&self) -> &HaloPropKeys;

    fn halo_profile(&self) -> &dyn HaloProfile;

    /// Lookup table built when the model was assembled
    fn lookup_table(&self) -> &ProfileLookupTable;

    /// Draw one occupation count per halo of the catalog
    fn mc_occupation(
        &self,
        gal_type: &str,
        halos: &HaloCatalog,
        rng: &mut ChaChaRng,
    ) -> Result<Vec<u32>>;

    /// Positions of the galaxies of a unit-bounded type, one per host
    fn mc_coords(
        &self,
        gal_type: &str,
        hosts: &HostPlacements<'_>,
        rng: &mut ChaChaRng,
    ) -> Result<Vec<Point3<f64>>>;

    /// Positions of `count` galaxies in one host, drawn from its inverse
    /// cumulative profile
    fn mc_profile_coords(
        &self,
        profile: &InvCumuProfile<'_>,
        host_center: Point3<f64>,
        host_radius: Length,
        count: usize,
        rng: &mut ChaChaRng,
    ) -> Vec<Point3<f64>> {
        (0..count)
            .map(|_| {
                let x = profile.scaled_radius(rng.random());
                host_center + sample_unit_vector(rng) * (x * host_radius.to_mpc())
            })
            .collect()
    }

    /// Whether a type traces a modulated version of the halo profile
    fn has_profile_modulation(&self, _gal_type: &str) -> bool {
        false
    }
}

/// Per-host inputs of a unit-bounded placement, one entry per occupied host
///
/// `profiles` come from the caller's lookup table, which may have been
/// rebuilt to cover the catalog beyond the model's own table.
#[derive(Debug, Clone, Copy)]
pub struct HostPlacements<'a> {
    pub centers: &'a [Point3<f64>],
    pub radii: &'a [Length],
    pub prim_haloprop: &'a [f64],
    pub profiles: &'a [InvCumuProfile<'a>],
}

impl HostPlacements<'_> {
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    fn check_lengths(&self, gal_type: &str) -> Result<()> {
        let n = self.len();
        if self.radii.len() != n || self.prim_haloprop.len() != n || self.profiles.len() != n {
            return Err(HodError::input_mismatch(format!(
                "placement inputs for `{gal_type}` differ in length: {n} centers, {} radii, \
                 {} primary values, {} profiles",
                self.radii.len(),
                self.prim_haloprop.len(),
                self.profiles.len()
            )));
        }
        Ok(())
    }
}

/// Where the galaxies of a type sit inside their host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// At the host centre
    HostCenter,
    /// Drawn from the host's radial profile
    ProfileSampled,
}

/// One galaxy population of a composite model
pub struct GalaxyComponent {
    pub gal_type: String,
    pub occupation: Box<dyn OccupationModel>,
    pub placement: Placement,
}

impl GalaxyComponent {
    pub fn new(
        gal_type: impl Into<String>,
        occupation: Box<dyn OccupationModel>,
        placement: Placement,
    ) -> Self {
        Self {
            gal_type: gal_type.into(),
            occupation,
            placement,
        }
    }
}

/// Halo occupation model assembled from independent galaxy components
pub struct HodModel {
    components: Vec<GalaxyComponent>,
    haloprop_keys: HaloPropKeys,
    profile: Box<dyn HaloProfile>,
    lookup_table: ProfileLookupTable,
}

impl HodModel {
    /// Assembles a model and tabulates its profile over the profile's
    /// configured parameter coverage.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty or duplicated galaxy type
    /// list, or if the profile's parameter table is unusable.
    pub fn new(
        haloprop_keys: HaloPropKeys,
        profile: Box<dyn HaloProfile>,
        components: Vec<GalaxyComponent>,
    ) -> Result<Self> {
        if components.is_empty() {
            return Err(HodError::config("a composite model needs at least one galaxy type"));
        }
        for (i, component) in components.iter().enumerate() {
            if components[..i].iter().any(|c| c.gal_type == component.gal_type) {
                return Err(HodError::config(format!(
                    "galaxy type `{}` is defined twice",
                    component.gal_type
                )));
            }
        }

        let lookup_table = ProfileLookupTable::build(profile.as_ref(), profile.param_table())?;
        Ok(Self {
            components,
            haloprop_keys,
            profile,
            lookup_table,
        })
    }

    /// Zheng et al. (2007) centrals and satellites in NFW halos, keyed on
    /// the `mvir` column.
    ///
    /// # Examples
    ///
    /// ```
    /// use hod::{CompositeModel, HodModel, NfwParams, Zheng07Params};
    ///
    /// let model = HodModel::zheng07(Zheng07Params::default(), NfwParams::default()).unwrap();
    /// assert_eq!(model.gal_types(), vec!["centrals", "satellites"]);
    /// assert_eq!(model.occupation_bound("satellites"), Some(f64::INFINITY));
    /// ```
    pub fn zheng07(params: Zheng07Params, nfw: NfwParams) -> Result<Self> {
        Self::new(
            HaloPropKeys::primary("mvir"),
            Box::new(NfwProfile::new(nfw)),
            vec![
                GalaxyComponent::new(
                    "centrals",
                    Box::new(Zheng07Centrals::new(&params)),
                    Placement::HostCenter,
                ),
                GalaxyComponent::new(
                    "satellites",
                    Box::new(Zheng07Satellites::new(&params)),
                    Placement::ProfileSampled,
                ),
            ],
        )
    }

    fn component(&self, gal_type: &str) -> Result<&GalaxyComponent> {
        self.components
            .iter()
            .find(|c| c.gal_type == gal_type)
            .ok_or_else(|| HodError::UnknownGalType(gal_type.to_string()))
    }
}

impl CompositeModel for HodModel {
    fn gal_types(&self) -> Vec<String> {
        self.components.iter().map(|c| c.gal_type.clone()).collect()
    }

    fn occupation_bound(&self, gal_type: &str) -> Option<f64> {
        self.component(gal_type)
            .ok()
            .map(|c| c.occupation.occupation_bound())
    }

    fn haloprop_keys(&self) -> &HaloPropKeys {
        &self.haloprop_keys
    }

    fn halo_profile(&self) -> &dyn HaloProfile {
        self.profile.as_ref()
    }

    fn lookup_table(&self) -> &ProfileLookupTable {
        &self.lookup_table
    }

    fn mc_occupation(
        &self,
        gal_type: &str,
        halos: &HaloCatalog,
        rng: &mut ChaChaRng,
    ) -> Result<Vec<u32>> {
        let component = self.component(gal_type)?;
        let prim = halos.column(self.haloprop_keys.primary_key())?;
        Ok(component.occupation.mc_occupation(prim, rng))
    }

    fn mc_coords(
        &self,
        gal_type: &str,
        hosts: &HostPlacements<'_>,
        rng: &mut ChaChaRng,
    ) -> Result<Vec<Point3<f64>>> {
        let component = self.component(gal_type)?;
        hosts.check_lengths(gal_type)?;

        match component.placement {
            Placement::HostCenter => Ok(hosts.centers.to_vec()),
            Placement::ProfileSampled => Ok(hosts
                .profiles
                .iter()
                .zip(hosts.centers.iter().zip(hosts.radii))
                .map(|(profile, (&center, &radius))| {
                    let x = profile.scaled_radius(rng.random());
                    center + sample_unit_vector(rng) * (x * radius.to_mpc())
                })
                .collect()),
        }
    }
}
