//! Catalog preprocessing.
//!
//! Before any realization the catalog gains one column per profile
//! parameter, computed from each halo's primary property, and the lookup
//! table is rebuilt so its parameter grid covers every halo.

use halo_catalog::HaloCatalog;
use hod::{CompositeModel, ProfParamTable, ProfileLookupTable};
use tracing::debug;

use crate::error::{MockError, Result};

/// Output of preprocessing, owned by the mock factory
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Catalog columns generated for the profile parameters
    pub profile_keys: Vec<String>,
    /// Coverage the lookup table was rebuilt with
    pub param_table: ProfParamTable,
    pub lookup_table: ProfileLookupTable,
}

/// Adds the profile-parameter columns to `halos` and rebuilds the model's
/// lookup table over the catalog's parameter range.
///
/// For each key the rebuilt range is
/// `[min(catalog_min − step, model_min), max(catalog_max + step, model_max)]`
/// with the model's step. An empty catalog keeps the model range.
///
/// # Errors
///
/// Returns a configuration error if the catalog lacks the primary or the
/// declared secondary property column, or if the profile cannot provide a
/// value or a range for one of its parameters.
pub fn preprocess_catalog<M: CompositeModel + ?Sized>(
    halos: &mut HaloCatalog,
    model: &M,
) -> Result<Preprocessed> {
    let keys = model.haloprop_keys();
    for key in std::iter::once(keys.primary_key()).chain(keys.secondary_key()) {
        if !halos.has_column(key) {
            return Err(MockError::config(format!(
                "halo catalog is missing the `{key}` property required by the model"
            )));
        }
    }

    let profile = model.halo_profile();
    let model_table = profile.param_table();
    let profile_keys = profile.param_keys();
    let mut param_table = ProfParamTable::new();

    for key in &profile_keys {
        let values = halos
            .column(keys.primary_key())?
            .iter()
            .map(|&prim| profile.param_value(key, prim))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| {
                MockError::config(format!("halo profile cannot evaluate parameter `{key}`"))
            })?;
        halos.insert_column(key.as_str(), values)?;

        let model_range = model_table.get(key).ok_or_else(|| {
            MockError::config(format!("halo profile has no table range for `{key}`"))
        })?;
        let range = match halos.column_range(key)? {
            Some((lo, hi)) => model_range.covering(lo, hi),
            None => *model_range,
        };
        debug!(
            key = key.as_str(),
            min = range.min,
            max = range.max,
            step = range.step,
            "profile parameter coverage"
        );
        param_table.insert(key.clone(), range);
    }

    let lookup_table = model.lookup_table().rebuilt(profile, &param_table)?;
    debug!(
        version = lookup_table.version(),
        num_cells = lookup_table.num_cells(),
        "rebuilt profile lookup table"
    );

    Ok(Preprocessed {
        profile_keys,
        param_table,
        lookup_table,
    })
}
