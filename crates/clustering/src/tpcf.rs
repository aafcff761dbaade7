//! Two-point correlation function of one or two point samples.

use std::borrow::Cow;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{ClusteringError, Result};
use crate::estimators::{Estimator, Normalization};
use crate::pair_counts::{
    Communicator, DirectPairCounter, KernelOptions, PairCounter, count_shells, thread_pool,
};
use crate::period::Periodicity;
use crate::points::{PointSet, Samples};
use crate::randoms::{RandomCounts, Term, random_counts};

/// Settings of a correlation-function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TpcfConfig {
    /// Larger samples are randomly down-sampled to this many points
    pub max_sample_size: usize,
    pub do_auto: bool,
    pub do_cross: bool,
    pub estimator: Estimator,
    pub num_threads: usize,
}

impl Default for TpcfConfig {
    fn default() -> Self {
        Self {
            max_sample_size: 1_000_000,
            do_auto: true,
            do_cross: true,
            estimator: Estimator::Natural,
            num_threads: 1,
        }
    }
}

/// Correlation function per radial bin, for each requested term
#[derive(Debug, Clone, PartialEq)]
pub enum TpcfResult {
    Auto(Vec<f64>),
    Cross(Vec<f64>),
    AutoCross {
        auto1: Vec<f64>,
        cross: Vec<f64>,
        auto2: Vec<f64>,
    },
}

/// Two-point correlation function with the direct pair counter.
///
/// See [`tpcf_with_counter`].
pub fn tpcf<R: Rng + ?Sized>(
    samples: Samples<'_>,
    rbins: &[f64],
    period: &Periodicity,
    config: &TpcfConfig,
    comm: Option<&dyn Communicator>,
    rng: &mut R,
) -> Result<TpcfResult> {
    tpcf_with_counter(&DirectPairCounter, samples, rbins, period, config, comm, rng)
}

/// Two-point correlation function ξ(r) in the shells between consecutive
/// `rbins` edges.
///
/// Without a second sample the auto-correlation of `sample1` is returned.
/// With one, `config.do_auto` and `config.do_cross` select between the
/// cross-correlation, the auto-correlation of `sample1`, or all three terms.
/// A second sample equal to the first is treated as absent.
///
/// In a periodic box without randoms the random counts are analytic.
/// Samples above `config.max_sample_size` points are down-sampled with
/// `rng`, uniformly without replacement.
///
/// # Errors
///
/// * Input consistency: samples of different dimension, malformed bin
///   edges, an edge above half the smallest period, or open boundaries
///   without randoms.
/// * Configuration: a period of the wrong shape, an infinite period, a
///   second sample with neither term requested, or a worker pool that
///   cannot be started.
#[instrument(skip_all, fields(estimator = %config.estimator))]
pub fn tpcf_with_counter<R: Rng + ?Sized>(
    counter: &dyn PairCounter,
    samples: Samples<'_>,
    rbins: &[f64],
    period: &Periodicity,
    config: &TpcfConfig,
    comm: Option<&dyn Communicator>,
    rng: &mut R,
) -> Result<TpcfResult> {
    let dim = samples.sample1.dim();
    for (label, other) in [("sample2", samples.sample2), ("randoms", samples.randoms)] {
        if let Some(other) = other.filter(|o| o.dim() != dim) {
            return Err(ClusteringError::input(format!(
                "{label} is {}-dimensional but sample1 is {dim}-dimensional",
                other.dim()
            )));
        }
    }

    let period = period.resolve(dim)?;
    validate_bins(rbins)?;
    if let Some(period) = &period {
        let half_box = period.iter().copied().fold(f64::INFINITY, f64::min) / 2.0;
        if rbins.iter().any(|&r| r > half_box) {
            return Err(ClusteringError::input(format!(
                "bin edges must not exceed half the smallest period ({half_box})"
            )));
        }
    }
    if period.is_none() && samples.randoms.is_none() {
        return Err(ClusteringError::input(
            "randoms are required when no periodic boundaries are given",
        ));
    }

    let sample2 = samples.sample2.filter(|s2| *s2 != samples.sample1);
    if sample2.is_some() && !config.do_auto && !config.do_cross {
        return Err(ClusteringError::config(
            "a second sample was given but neither auto nor cross correlation was requested",
        ));
    }

    // Draw order: sample2, then sample1
    let sample2 = sample2.map(|s2| downsample(s2, config.max_sample_size, "sample2", rng));
    let sample1 = downsample(samples.sample1, config.max_sample_size, "sample1", rng);
    let samples = Samples {
        sample1: &sample1,
        sample2: sample2.as_deref(),
        randoms: samples.randoms,
    };

    info!(
        n1 = samples.sample1.len(),
        n2 = samples.sample2.map_or(0, PointSet::len),
        nr = samples.randoms.map_or(0, PointSet::len),
        num_bins = rbins.len() - 1,
        "computing two-point correlation"
    );

    let pool = thread_pool(config.num_threads)?;
    let options = KernelOptions::new(config.num_threads, comm).with_pool(pool.as_ref());
    let period = period.as_deref();
    let randoms = random_counts(
        counter,
        &samples,
        rbins,
        period,
        config.estimator.requirements(),
        &options,
    )?;
    let term = |t: Term| -> Result<Vec<f64>> {
        let (a, b) = match t {
            Term::Auto1 => (samples.sample1, samples.sample1),
            Term::Cross => (samples.sample1, samples.sample2.unwrap_or(samples.sample1)),
            Term::Auto2 => {
                let s2 = samples.sample2.unwrap_or(samples.sample1);
                (s2, s2)
            }
        };
        let dd = count_shells(counter, a, b, rbins, period, &options)?;
        let norm = normalization(&randoms, a, b);
        config
            .estimator
            .evaluate(&dd, randoms.dr(t), randoms.rr(t), &norm)
    };

    let result = match (samples.sample2, config.do_auto, config.do_cross) {
        (None, _, _) | (Some(_), true, false) => TpcfResult::Auto(term(Term::Auto1)?),
        (Some(_), false, _) => TpcfResult::Cross(term(Term::Cross)?),
        (Some(_), true, true) => TpcfResult::AutoCross {
            auto1: term(Term::Auto1)?,
            cross: term(Term::Cross)?,
            auto2: term(Term::Auto2)?,
        },
    };
    Ok(result)
}

/// Checks that bin edges are finite, non-negative and strictly increasing,
/// with at least one bin
pub fn validate_bins(rbins: &[f64]) -> Result<()> {
    if rbins.len() < 2 {
        return Err(ClusteringError::input("at least two bin edges are required"));
    }
    if rbins.iter().any(|r| !r.is_finite() || *r < 0.0) {
        return Err(ClusteringError::input(
            "bin edges must be finite and non-negative",
        ));
    }
    if rbins.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ClusteringError::input("bin edges must be strictly increasing"));
    }
    Ok(())
}

/// Uniform subset of at most `max_size` points, without replacement
pub fn downsample<'a, R: Rng + ?Sized>(
    sample: &'a PointSet,
    max_size: usize,
    label: &str,
    rng: &mut R,
) -> Cow<'a, PointSet> {
    if sample.len() <= max_size {
        return Cow::Borrowed(sample);
    }
    debug!(label, from = sample.len(), to = max_size, "down-sampling");
    Cow::Owned(sample.subsample(max_size, rng))
}

fn normalization(randoms: &RandomCounts, a: &PointSet, b: &PointSet) -> Normalization {
    match randoms {
        RandomCounts::Analytic { .. } => Normalization::UNIT,
        RandomCounts::Explicit { num_randoms, .. } => Normalization {
            nd1: a.len() as f64,
            nd2: b.len() as f64,
            nr1: *num_randoms as f64,
            nr2: *num_randoms as f64,
        },
    }
}
