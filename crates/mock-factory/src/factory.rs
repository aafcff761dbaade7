use halo_catalog::HaloCatalog;
use hod::{CompositeModel, ProfParamTable, ProfileLookupTable};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::allocation::allocate;
use crate::error::Result;
use crate::metadata::RealizationMetadata;
use crate::ordering::{GalTypeSpec, PopulationKind, sorted_gal_types};
use crate::periodicity::enforce_periodicity;
use crate::populate::{PopulationContext, populate_bounded, populate_unbounded};
use crate::preprocess::{Preprocessed, preprocess_catalog};
use crate::table::MockGalaxyTable;

/// A populated galaxy table together with its provenance
#[derive(Debug, Clone)]
pub struct MockCatalog {
    pub galaxies: MockGalaxyTable,
    pub metadata: RealizationMetadata,
}

/// Populates a halo catalog with galaxies drawn from a composite model.
///
/// Construction validates the model's galaxy types, adds the profile
/// parameter columns to the catalog and rebuilds the lookup table. After
/// that the catalog is only read, and any number of independent
/// realizations can be drawn.
pub struct HodMockFactory<'a, M: CompositeModel + ?Sized> {
    halos: &'a HaloCatalog,
    model: &'a M,
    gal_types: Vec<GalTypeSpec>,
    preprocessed: Preprocessed,
}

impl<'a, M: CompositeModel + ?Sized> HodMockFactory<'a, M> {
    /// Prepares `halos` for population with `model`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unsupported set of occupation
    /// bounds or a catalog missing a property the model needs.
    ///
    /// # Examples
    ///
    /// ```
    /// use halo_catalog::{HaloCatalog, HaloId};
    /// use hod::{HodModel, NfwParams, Zheng07Params};
    /// use mock_factory::HodMockFactory;
    /// use nalgebra::{Point3, Vector3};
    /// use units::Length;
    ///
    /// let mut halos = HaloCatalog::new(
    ///     Length::from_mpc(100.0),
    ///     vec![HaloId(1), HaloId(2)],
    ///     vec![Point3::new(10.0, 10.0, 10.0), Point3::new(50.0, 60.0, 70.0)],
    ///     vec![Vector3::zeros(), Vector3::new(100.0, 0.0, 0.0)],
    ///     vec![Length::from_kpc(400.0), Length::from_kpc(900.0)],
    /// )
    /// .unwrap()
    /// .with_column("mvir", vec![1e13, 1e15])
    /// .unwrap();
    ///
    /// let model = HodModel::zheng07(Zheng07Params::default(), NfwParams::default()).unwrap();
    /// let factory = HodMockFactory::new(&mut halos, &model).unwrap();
    /// let mock = factory.populate_seeded(7).unwrap();
    ///
    /// assert_eq!(mock.metadata.seed(), 7);
    /// assert_eq!(mock.galaxies.len(), mock.metadata.num_galaxies);
    /// ```
    #[instrument(skip_all, fields(num_halos = halos.len()))]
    pub fn new(halos: &'a mut HaloCatalog, model: &'a M) -> Result<Self> {
        let gal_types = sorted_gal_types(model)?;
        let preprocessed = preprocess_catalog(halos, model)?;
        let halos: &'a HaloCatalog = halos;

        info!(
            num_types = gal_types.len(),
            table_version = preprocessed.lookup_table.version(),
            "mock factory ready"
        );
        Ok(Self {
            halos,
            model,
            gal_types,
            preprocessed,
        })
    }

    /// Galaxy types in table order
    pub fn gal_types(&self) -> &[GalTypeSpec] {
        &self.gal_types
    }

    pub fn halos(&self) -> &HaloCatalog {
        self.halos
    }

    /// Catalog columns added for the profile parameters
    pub fn profile_keys(&self) -> &[String] {
        &self.preprocessed.profile_keys
    }

    pub fn param_table(&self) -> &ProfParamTable {
        &self.preprocessed.param_table
    }

    /// Lookup table rebuilt over this catalog's parameter range
    pub fn lookup_table(&self) -> &ProfileLookupTable {
        &self.preprocessed.lookup_table
    }

    /// Draws one realization using `rng` for every random draw.
    ///
    /// # Errors
    ///
    /// Propagates model errors and fails on any internal-consistency
    /// violation of the table layout.
    #[instrument(skip_all, fields(num_halos = self.halos.len()))]
    pub fn populate(&self, rng: &mut ChaChaRng) -> Result<MockGalaxyTable> {
        let keys = self.model.haloprop_keys();
        let prim_haloprop = self.halos.column(keys.primary_key())?;
        let sec_haloprop = keys
            .secondary_key()
            .map(|key| self.halos.column(key))
            .transpose()?;

        let (allocations, total) = allocate(self.model, self.halos, &self.gal_types, rng)?;
        let mut table = MockGalaxyTable::zeroed(total, sec_haloprop.is_some());

        let ctx = PopulationContext {
            model: self.model,
            halos: self.halos,
            prim_haloprop,
            sec_haloprop,
            profile_keys: &self.preprocessed.profile_keys,
            lookup_table: &self.preprocessed.lookup_table,
        };
        for allocation in &allocations {
            match allocation.spec.kind {
                PopulationKind::Bounded => populate_bounded(&ctx, allocation, &mut table, rng)?,
                PopulationKind::Unbounded => {
                    populate_unbounded(&ctx, allocation, &mut table, rng)?
                }
            }
        }

        enforce_periodicity(&mut table.position, self.halos.box_size());
        table.set_type_ranges(
            allocations
                .into_iter()
                .map(|a| (a.spec.gal_type, a.range))
                .collect(),
        );

        info!(num_galaxies = total, "populated mock");
        Ok(table)
    }

    /// Draws the realization identified by `id`, seeding the generator from it
    pub fn populate_with_id(&self, id: Uuid) -> Result<MockCatalog> {
        let mut rng = ChaChaRng::seed_from_u64(id.as_u64_pair().0);
        let galaxies = self.populate(&mut rng)?;
        let metadata = RealizationMetadata {
            id,
            lookup_table_version: self.preprocessed.lookup_table.version(),
            num_galaxies: galaxies.len(),
        };
        Ok(MockCatalog { galaxies, metadata })
    }

    /// Draws a reproducible realization from a plain integer seed
    pub fn populate_seeded(&self, seed: u64) -> Result<MockCatalog> {
        self.populate_with_id(RealizationMetadata::id_from_seed(seed))
    }

    /// Draws a realization under a fresh random id
    pub fn populate_random(&self) -> Result<MockCatalog> {
        self.populate_with_id(Uuid::new_v4())
    }
}
