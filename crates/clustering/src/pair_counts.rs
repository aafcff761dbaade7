//! Pair counting.
//!
//! A pair counter returns, for every bin edge `r_k`, the number of ordered
//! pairs `(i, j)` with `i` from the first set, `j` from the second and
//! separation `d(i, j) ≤ r_k`. Self pairs at zero separation are included;
//! they cancel when cumulative counts are differenced into shell counts.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{ClusteringError, Result};
use crate::points::PointSet;

/// Handle to a group of cooperating processes that split the counting work
pub trait Communicator: Send + Sync {
    /// Index of this process within the group
    fn rank(&self) -> usize;

    /// Number of processes in the group
    fn size(&self) -> usize;

    /// Replaces `counts` by the element-wise sum over all processes
    fn all_reduce_sum(&self, counts: &mut [u64]) -> Result<()>;
}

/// Parallelism settings handed to a pair counter
#[derive(Clone, Copy, Default)]
pub struct KernelOptions<'a> {
    /// Worker threads; 0 and 1 both count on the calling thread
    pub num_threads: usize,
    pub comm: Option<&'a dyn Communicator>,
    /// Pool shared by every count of one call; counters without one start
    /// their own when `num_threads > 1`
    pub pool: Option<&'a ThreadPool>,
}

impl<'a> KernelOptions<'a> {
    pub fn new(num_threads: usize, comm: Option<&'a dyn Communicator>) -> Self {
        Self {
            num_threads,
            comm,
            pool: None,
        }
    }

    pub fn with_pool(mut self, pool: Option<&'a ThreadPool>) -> Self {
        self.pool = pool;
        self
    }
}

/// Worker pool for `num_threads` counting threads, `None` when counting
/// stays on the calling thread
pub fn thread_pool(num_threads: usize) -> Result<Option<ThreadPool>> {
    if num_threads <= 1 {
        return Ok(None);
    }
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map(Some)
        .map_err(|e| ClusteringError::config(format!("cannot start pair-counting threads: {e}")))
}

/// Counts pairs between two point sets within increasing radii
pub trait PairCounter: Send + Sync {
    /// Cumulative pair counts, one per bin edge.
    ///
    /// `period` holds one box length per axis for periodic boundaries, or is
    /// `None` for open ones.
    fn cumulative_counts(
        &self,
        sample1: &PointSet,
        sample2: &PointSet,
        edges: &[f64],
        period: Option<&[f64]>,
        options: &KernelOptions<'_>,
    ) -> Result<Vec<u64>>;
}

/// Brute-force counter comparing every pair under the minimum-image
/// convention
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPairCounter;

impl DirectPairCounter {
    /// Adds the pairs of row `i` to a histogram indexed by the first edge
    /// enclosing each pair; slot `edges_sq.len()` collects pairs beyond the
    /// last edge
    fn accumulate_row(
        mut hist: Vec<u64>,
        i: usize,
        sample1: &PointSet,
        sample2: &PointSet,
        edges_sq: &[f64],
        period: Option<&[f64]>,
    ) -> Vec<u64> {
        let a = sample1.point(i);
        for b in sample2.iter() {
            let d_sq = separation_sq(a, b, period);
            hist[edges_sq.partition_point(|&e| e < d_sq)] += 1;
        }
        hist
    }
}

impl PairCounter for DirectPairCounter {
    fn cumulative_counts(
        &self,
        sample1: &PointSet,
        sample2: &PointSet,
        edges: &[f64],
        period: Option<&[f64]>,
        options: &KernelOptions<'_>,
    ) -> Result<Vec<u64>> {
        // Rows are dealt round-robin across the communicator's processes
        let (rank, size) = options
            .comm
            .map_or((0, 1), |comm| (comm.rank(), comm.size().max(1)));
        let edges_sq: Vec<f64> = edges.iter().map(|r| r * r).collect();
        let slots = edges.len() + 1;
        let row = |hist: Vec<u64>, i: usize| {
            Self::accumulate_row(hist, i, sample1, sample2, &edges_sq, period)
        };

        let owned_pool;
        let pool = match options.pool {
            Some(pool) => Some(pool),
            None => {
                owned_pool = thread_pool(options.num_threads)?;
                owned_pool.as_ref()
            }
        };

        let hist = match pool {
            Some(pool) => pool.install(|| {
                (rank..sample1.len())
                    .into_par_iter()
                    .step_by(size)
                    .fold(|| vec![0u64; slots], row)
                    .reduce(
                        || vec![0u64; slots],
                        |mut acc, hist| {
                            acc.iter_mut().zip(hist).for_each(|(a, h)| *a += h);
                            acc
                        },
                    )
            }),
            None => (rank..sample1.len())
                .step_by(size)
                .fold(vec![0u64; slots], row),
        };

        let mut cumulative: Vec<u64> = hist[..edges.len()]
            .iter()
            .scan(0u64, |total, &n| {
                *total += n;
                Some(*total)
            })
            .collect();

        if let Some(comm) = options.comm {
            comm.all_reduce_sum(&mut cumulative)?;
        }
        debug!(
            n1 = sample1.len(),
            n2 = sample2.len(),
            num_edges = edges.len(),
            "counted pairs"
        );
        Ok(cumulative)
    }
}

/// Squared separation, wrapping each axis to its minimum image when a
/// period is given
fn separation_sq(a: &[f64], b: &[f64], period: Option<&[f64]>) -> f64 {
    match period {
        Some(period) => a
            .iter()
            .zip(b)
            .zip(period)
            .map(|((x, y), &p)| {
                let d = (x - y).abs().rem_euclid(p);
                let d = d.min(p - d);
                d * d
            })
            .sum(),
        None => a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum(),
    }
}

/// Pair counts per shell `(r_k, r_{k+1}]` from cumulative counts
///
/// # Examples
///
/// ```
/// use clustering::shell_counts;
///
/// assert_eq!(shell_counts(&[4, 10, 30]), vec![6.0, 20.0]);
/// ```
pub fn shell_counts(cumulative: &[u64]) -> Vec<f64> {
    cumulative
        .windows(2)
        .map(|w| w[1].saturating_sub(w[0]) as f64)
        .collect()
}

/// Per-shell pair counts between two point sets
pub fn count_shells(
    counter: &dyn PairCounter,
    sample1: &PointSet,
    sample2: &PointSet,
    edges: &[f64],
    period: Option<&[f64]>,
    options: &KernelOptions<'_>,
) -> Result<Vec<f64>> {
    let cumulative = counter.cumulative_counts(sample1, sample2, edges, period, options)?;
    Ok(shell_counts(&cumulative))
}
