use std::ops::Range;

use halo_catalog::HaloCatalog;
use hod::CompositeModel;
use rand_chacha::ChaChaRng;
use tracing::debug;

use crate::error::{MockError, Result};
use crate::ordering::{GalTypeSpec, PopulationKind};

/// Realized occupation of one galaxy type and its slot in the mock table
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAllocation {
    pub spec: GalTypeSpec,
    /// Galaxies of this type in each halo, in catalog order
    pub occupations: Vec<u32>,
    pub range: Range<usize>,
}

impl TypeAllocation {
    /// Realized number of galaxies of this type
    pub fn abundance(&self) -> usize {
        self.range.len()
    }
}

/// Draws the occupation of every type in order and assigns each type the
/// next contiguous index range.
///
/// Returns the allocations and the total number of galaxies; the ranges
/// partition `[0, total)`.
///
/// # Errors
///
/// Returns an internal-consistency error if a sampler returns the wrong
/// number of counts or a bounded type draws more than one galaxy per halo.
pub fn allocate<M: CompositeModel + ?Sized>(
    model: &M,
    halos: &HaloCatalog,
    gal_types: &[GalTypeSpec],
    rng: &mut ChaChaRng,
) -> Result<(Vec<TypeAllocation>, usize)> {
    let mut total = 0;
    let mut allocations = Vec::with_capacity(gal_types.len());

    for spec in gal_types {
        let occupations = model.mc_occupation(&spec.gal_type, halos, rng)?;
        if occupations.len() != halos.len() {
            return Err(MockError::internal(format!(
                "occupation sampler for `{}` returned {} counts for {} halos",
                spec.gal_type,
                occupations.len(),
                halos.len()
            )));
        }
        if spec.kind == PopulationKind::Bounded && occupations.iter().any(|&n| n > 1) {
            return Err(MockError::internal(format!(
                "bounded galaxy type `{}` drew more than one galaxy in a halo",
                spec.gal_type
            )));
        }

        let abundance: usize = occupations.iter().map(|&n| n as usize).sum();
        let range = total..total + abundance;
        total = range.end;
        debug!(gal_type = spec.gal_type.as_str(), abundance, "allocated galaxy type");

        allocations.push(TypeAllocation {
            spec: spec.clone(),
            occupations,
            range,
        });
    }

    Ok((allocations, total))
}
