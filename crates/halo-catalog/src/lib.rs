//! Columnar dark-matter halo catalogs.
//!
//! A catalog stores the fixed per-halo fields every mock needs (identifier,
//! position, velocity, virial radius) plus an open set of named scalar
//! columns such as the halo mass or a formation-time proxy. Profile
//! parameters derived from those columns are added in place as new columns.

pub mod catalog;
pub mod error;


pub use catalog::{HaloCatalog, HaloId};
pub use error::{CatalogError, Result};
