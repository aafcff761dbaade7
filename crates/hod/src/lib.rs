//! Halo occupation distribution models
//!
//! This crate defines the models a mock factory populates halos with:
//! occupation statistics per galaxy type, radial halo profiles, the
//! inverse-cumulative lookup tables used to place satellites, and the
//! composite model that ties them together.

pub mod error;
pub mod lookup;
pub mod model;
pub mod occupation;
pub mod param_table;
pub mod profile;
pub mod sampling;

// Re-export main types at crate root
pub use error::{HodError, Result};
pub use lookup::{InvCumuProfile, MAX_TABLE_CELLS, NUM_CDF_POINTS, ProfileLookupTable};
pub use model::{
    CompositeModel, GalaxyComponent, HaloPropKeys, HodModel, HostPlacements, Placement,
};
pub use occupation::{OccupationModel, Zheng07Centrals, Zheng07Params, Zheng07Satellites};
pub use param_table::{MAX_GRID_POINTS, ParamRange, ProfParamTable};
pub use profile::{CONC_KEY, HaloProfile, NfwParams, NfwProfile};

#[cfg(test)]
mod occupation_test;
#[cfg(test)]
mod profile_test;
