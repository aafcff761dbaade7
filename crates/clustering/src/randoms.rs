//! Data–random and random–random pair counts.
//!
//! With open boundaries the counts come from an explicit random sample.
//! In a periodic box they can instead be computed analytically: the
//! expected number of ordered pairs in a shell of volume `dV` between sets
//! of `Na` and `Nb` uniformly distributed points is `Na · Nb · dV / V`.

use std::f64::consts::PI;

use tracing::debug;

use crate::error::{ClusteringError, Result};
use crate::estimators::EstimatorRequirements;
use crate::pair_counts::{KernelOptions, PairCounter, count_shells};
use crate::points::{PointSet, Samples};

/// Which correlation a set of pair counts belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    /// sample1 with itself
    Auto1,
    /// sample1 with sample2
    Cross,
    /// sample2 with itself
    Auto2,
}

/// Random pair counts per shell, explicit or analytic
#[derive(Debug, Clone, PartialEq)]
pub enum RandomCounts {
    /// Counted against an explicit random sample of `num_randoms` points
    Explicit {
        num_randoms: usize,
        d1r: Option<Vec<f64>>,
        d2r: Option<Vec<f64>>,
        rr: Option<Vec<f64>>,
    },
    /// Expected counts of a uniform distribution, already normalized to the
    /// data: DR and RR coincide for every term
    Analytic {
        d1r: Vec<f64>,
        d2r: Option<Vec<f64>>,
        cross: Option<Vec<f64>>,
    },
}

impl RandomCounts {
    /// Data–random counts for a correlation term
    pub fn dr(&self, term: Term) -> Option<&[f64]> {
        match (self, term) {
            (Self::Explicit { d1r, .. }, Term::Auto1 | Term::Cross) => d1r.as_deref(),
            (Self::Explicit { d2r, .. }, Term::Auto2) => d2r.as_deref(),
            (Self::Analytic { .. }, _) => self.rr(term),
        }
    }

    /// Random–random counts for a correlation term
    pub fn rr(&self, term: Term) -> Option<&[f64]> {
        match (self, term) {
            (Self::Explicit { rr, .. }, _) => rr.as_deref(),
            (Self::Analytic { d1r, .. }, Term::Auto1) => Some(d1r.as_slice()),
            (Self::Analytic { cross, .. }, Term::Cross) => cross.as_deref(),
            (Self::Analytic { d2r, .. }, Term::Auto2) => d2r.as_deref(),
        }
    }

    pub fn is_analytic(&self) -> bool {
        matches!(self, Self::Analytic { .. })
    }
}

/// Volume of a k-dimensional ball of radius `radius`
///
/// # Examples
///
/// ```
/// use clustering::nball_volume;
///
/// let v = nball_volume(2.0, 3);
/// assert!((v - 4.0 / 3.0 * std::f64::consts::PI * 8.0).abs() < 1e-12);
/// ```
pub fn nball_volume(radius: f64, dim: usize) -> f64 {
    PI.powf(dim as f64 / 2.0) / gamma_half(dim + 2) * radius.powi(dim as i32)
}

/// Γ(n / 2) for a positive integer `n`
fn gamma_half(n: usize) -> f64 {
    let (start, base) = if n % 2 == 0 { (2, 1.0) } else { (1, PI.sqrt()) };
    (start..n)
        .step_by(2)
        .fold(base, |gamma, m| gamma * m as f64 / 2.0)
}

/// Volumes of the shells between consecutive bin edges
pub fn shell_volumes(edges: &[f64], dim: usize) -> Vec<f64> {
    edges
        .windows(2)
        .map(|w| nball_volume(w[1], dim) - nball_volume(w[0], dim))
        .collect()
}

/// Computes the random pair counts a correlation needs.
///
/// * Open boundaries: D1R, D2R (with a second sample) and RR are all
///   counted against `samples.randoms`.
/// * Periodic with randoms: only the counts in `needs` are counted.
/// * Periodic without randoms: analytic counts from the box volume.
///
/// # Errors
///
/// Returns an input-consistency error for open boundaries without randoms
/// and propagates pair-counter errors.
pub fn random_counts(
    counter: &dyn PairCounter,
    samples: &Samples<'_>,
    edges: &[f64],
    period: Option<&[f64]>,
    needs: EstimatorRequirements,
    options: &KernelOptions<'_>,
) -> Result<RandomCounts> {
    let shells =
        |a: &PointSet, b: &PointSet| count_shells(counter, a, b, edges, period, options);
    let sample1 = samples.sample1;

    match (period, samples.randoms) {
        (None, None) => Err(ClusteringError::input(
            "randoms are required when no periodic boundaries are given",
        )),
        (None, Some(randoms)) => Ok(RandomCounts::Explicit {
            num_randoms: randoms.len(),
            d1r: Some(shells(sample1, randoms)?),
            d2r: samples.sample2.map(|s2| shells(s2, randoms)).transpose()?,
            rr: Some(shells(randoms, randoms)?),
        }),
        (Some(_), Some(randoms)) => Ok(RandomCounts::Explicit {
            num_randoms: randoms.len(),
            d1r: needs.dr.then(|| shells(sample1, randoms)).transpose()?,
            d2r: samples
                .sample2
                .filter(|_| needs.dr)
                .map(|s2| shells(s2, randoms))
                .transpose()?,
            rr: needs.rr.then(|| shells(randoms, randoms)).transpose()?,
        }),
        (Some(period), None) => {
            let volume: f64 = period.iter().product();
            let dv = shell_volumes(edges, sample1.dim());
            let expected = |na: usize, nb: usize| -> Vec<f64> {
                let density = (na as f64) * (nb as f64) / volume;
                dv.iter().map(|v| v * density).collect()
            };

            let n1 = sample1.len();
            debug!(volume, n1, "using analytic random counts");
            Ok(RandomCounts::Analytic {
                d1r: expected(n1, n1),
                d2r: samples.sample2.map(|s2| expected(s2.len(), s2.len())),
                cross: samples.sample2.map(|s2| expected(n1, s2.len())),
            })
        }
    }
}
