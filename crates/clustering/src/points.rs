use nalgebra::Point3;
use rand::Rng;
use rand::seq::index;

use crate::error::{ClusteringError, Result};

/// A set of points in k dimensions, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    dim: usize,
    coords: Vec<f64>,
}

impl PointSet {
    /// Builds a point set from flat row-major coordinates.
    ///
    /// # Errors
    ///
    /// Returns an input-consistency error for a zero dimension or a
    /// coordinate count that is not a multiple of `dim`.
    pub fn from_flat(dim: usize, coords: Vec<f64>) -> Result<Self> {
        if dim == 0 {
            return Err(ClusteringError::input("points need at least one dimension"));
        }
        if coords.len() % dim != 0 {
            return Err(ClusteringError::input(format!(
                "{} coordinates do not form {dim}-dimensional points",
                coords.len()
            )));
        }
        Ok(Self { dim, coords })
    }

    /// Builds a point set from one coordinate row per point.
    ///
    /// # Examples
    ///
    /// ```
    /// use clustering::PointSet;
    ///
    /// let points = PointSet::from_rows(&[vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
    /// assert_eq!(points.len(), 2);
    /// assert_eq!(points.dim(), 2);
    /// assert_eq!(points.point(1), &[2.0, 3.0]);
    /// ```
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let dim = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != dim) {
            return Err(ClusteringError::input("point rows differ in dimension"));
        }
        Self::from_flat(dim, rows.concat())
    }

    pub fn from_points3(points: &[Point3<f64>]) -> Self {
        Self {
            dim: 3,
            coords: points.iter().flat_map(|p| [p.x, p.y, p.z]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinates of point `i`
    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.coords.chunks_exact(self.dim)
    }

    /// Uniform random subset of `size` distinct points, drawn without
    /// replacement. Returns a copy of the whole set if it is not larger
    /// than `size`.
    pub fn subsample<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Self {
        if self.len() <= size {
            return self.clone();
        }
        let coords = index::sample(rng, self.len(), size)
            .into_iter()
            .flat_map(|i| self.point(i).iter().copied())
            .collect();
        Self {
            dim: self.dim,
            coords,
        }
    }
}

/// The point sets of one correlation call
#[derive(Debug, Clone, Copy)]
pub struct Samples<'a> {
    pub sample1: &'a PointSet,
    /// Second sample for cross-correlations
    pub sample2: Option<&'a PointSet>,
    pub randoms: Option<&'a PointSet>,
}

impl<'a> Samples<'a> {
    pub fn new(sample1: &'a PointSet) -> Self {
        Self {
            sample1,
            sample2: None,
            randoms: None,
        }
    }

    pub fn with_sample2(mut self, sample2: &'a PointSet) -> Self {
        self.sample2 = Some(sample2);
        self
    }

    pub fn with_randoms(mut self, randoms: &'a PointSet) -> Self {
        self.randoms = Some(randoms);
        self
    }
}
