//! Mock galaxy catalogs from halo occupation models
//!
//! The factory preprocesses a halo catalog once, then draws realizations:
//! occupations are sampled per galaxy type, each type receives a contiguous
//! slice of a flat galaxy table, bounded types are placed by the model and
//! unbounded types are sampled from their hosts' radial profiles, and the
//! final positions are wrapped into the periodic box.

pub mod allocation;
pub mod error;
pub mod factory;
pub mod metadata;
pub mod ordering;
pub mod periodicity;
pub mod populate;
pub mod preprocess;
pub mod table;

// Re-export main types at crate root
pub use allocation::{TypeAllocation, allocate};
pub use error::{ErrorKind, MockError, Result};
pub use factory::{HodMockFactory, MockCatalog};
pub use metadata::RealizationMetadata;
pub use ordering::{GalTypeSpec, PopulationKind, sorted_gal_types};
pub use periodicity::{enforce_periodicity, wrap_coordinate};
pub use populate::satellite_systems;
pub use preprocess::{Preprocessed, preprocess_catalog};
pub use table::MockGalaxyTable;

#[cfg(test)]
mod allocation_test;
#[cfg(test)]
mod metadata_test;
#[cfg(test)]
mod test_support;
