use hod::CompositeModel;

use crate::error::{MockError, Result};

/// How the galaxies of a type are laid out in the mock table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationKind {
    /// At most one galaxy per halo
    Bounded,
    /// Any number of galaxies per halo
    Unbounded,
}

/// A galaxy type together with its occupation bound
#[derive(Debug, Clone, PartialEq)]
pub struct GalTypeSpec {
    pub gal_type: String,
    pub bound: f64,
    pub kind: PopulationKind,
}

/// Sorts the model's galaxy types ascending by occupation bound.
///
/// The sort is stable, so bounded types keep their model order and precede
/// every unbounded type.
///
/// # Errors
///
/// Returns a configuration error if the model has no galaxy types, a type
/// has no declared bound, or the distinct bounds are not exactly `{1}` or
/// `{1, ∞}`.
pub fn sorted_gal_types<M: CompositeModel + ?Sized>(model: &M) -> Result<Vec<GalTypeSpec>> {
    let mut specs = model
        .gal_types()
        .into_iter()
        .map(|gal_type| {
            let bound = model.occupation_bound(&gal_type).ok_or_else(|| {
                MockError::config(format!("galaxy type `{gal_type}` has no occupation bound"))
            })?;
            let kind = if bound == 1.0 {
                PopulationKind::Bounded
            } else if bound == f64::INFINITY {
                PopulationKind::Unbounded
            } else {
                return Err(MockError::config(format!(
                    "galaxy type `{gal_type}` has occupation bound {bound}; only 1 and infinity are supported"
                )));
            };
            Ok(GalTypeSpec {
                gal_type,
                bound,
                kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if specs.is_empty() {
        return Err(MockError::config("model defines no galaxy types"));
    }
    if !specs.iter().any(|s| s.kind == PopulationKind::Bounded) {
        return Err(MockError::config(
            "occupation bounds must be {1} or {1, infinity}; no unit-bounded type found",
        ));
    }

    specs.sort_by(|a, b| a.bound.total_cmp(&b.bound));
    Ok(specs)
}
