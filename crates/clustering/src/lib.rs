//! Two-point correlation functions of point samples
//!
//! Pair counts between data and random samples are combined through one of
//! the standard estimators (Natural, Davis-Peebles, Hewett, Hamilton,
//! Landy-Szalay). In a periodic box the random counts can be computed
//! analytically instead of from an explicit random sample.

pub mod error;
pub mod estimators;
pub mod pair_counts;
pub mod period;
pub mod points;
pub mod randoms;
pub mod tpcf;

// Re-export main types at crate root
pub use error::{ClusteringError, ErrorKind, Result};
pub use estimators::{Estimator, EstimatorRequirements, Normalization};
pub use pair_counts::{
    Communicator, DirectPairCounter, KernelOptions, PairCounter, count_shells, shell_counts,
    thread_pool,
};
pub use period::Periodicity;
pub use points::{PointSet, Samples};
pub use randoms::{RandomCounts, Term, nball_volume, random_counts, shell_volumes};
pub use tpcf::{TpcfConfig, TpcfResult, downsample, tpcf, tpcf_with_counter, validate_bins};

#[cfg(test)]
mod tpcf_test;
