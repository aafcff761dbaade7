use std::ops::Range;

use halo_catalog::HaloId;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Flat, columnar table of mock galaxies.
///
/// Every field holds one entry per galaxy. Galaxies of one type occupy a
/// single contiguous index range; ranges are laid out in galaxy-type order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockGalaxyTable {
    pub gal_type: Vec<String>,
    pub halo_id: Vec<HaloId>,
    /// Galaxy positions in Mpc/h
    pub position: Vec<Point3<f64>>,
    /// Galaxy velocities in km/s
    pub velocity: Vec<Vector3<f64>>,
    pub host_position: Vec<Point3<f64>>,
    pub host_velocity: Vec<Vector3<f64>>,
    pub prim_haloprop: Vec<f64>,
    /// Present only for models keyed on a secondary halo property
    pub sec_haloprop: Option<Vec<f64>>,
    pub quiescent: Vec<bool>,
    type_ranges: Vec<(String, Range<usize>)>,
}

impl MockGalaxyTable {
    /// Zero-initialized table of `len` galaxies
    pub fn zeroed(len: usize, with_secondary: bool) -> Self {
        Self {
            gal_type: vec![String::new(); len],
            halo_id: vec![HaloId::default(); len],
            position: vec![Point3::origin(); len],
            velocity: vec![Vector3::zeros(); len],
            host_position: vec![Point3::origin(); len],
            host_velocity: vec![Vector3::zeros(); len],
            prim_haloprop: vec![0.0; len],
            sec_haloprop: with_secondary.then(|| vec![0.0; len]),
            quiescent: vec![false; len],
            type_ranges: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.gal_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gal_type.is_empty()
    }

    /// Index range of a galaxy type, if the type was populated
    pub fn range_of(&self, gal_type: &str) -> Option<Range<usize>> {
        self.type_ranges
            .iter()
            .find(|(t, _)| t == gal_type)
            .map(|(_, r)| r.clone())
    }

    /// Per-type index ranges in table order
    pub fn type_ranges(&self) -> &[(String, Range<usize>)] {
        &self.type_ranges
    }

    pub(crate) fn set_type_ranges(&mut self, ranges: Vec<(String, Range<usize>)>) {
        self.type_ranges = ranges;
    }

    /// Number of galaxies of a type
    pub fn abundance(&self, gal_type: &str) -> usize {
        self.range_of(gal_type).map_or(0, |r| r.len())
    }
}
