use std::collections::BTreeMap;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use units::Length;

use crate::error::{CatalogError, Result};

/// Identifier of a halo as assigned by the halo finder
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct HaloId(pub i64);

/// An ordered, columnar collection of halos inside a periodic box.
///
/// Row `i` of every column describes the same halo. Fixed fields are typed;
/// scalar properties live in named columns so that models can refer to them
/// by key (`"mvir"`, `"zhalf"`, `"conc"`, ...).
#[derive(Debug, Clone)]
pub struct HaloCatalog {
    box_size: Length,
    ids: Vec<HaloId>,
    positions: Vec<Point3<f64>>,
    velocities: Vec<Vector3<f64>>,
    virial_radii: Vec<Length>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl HaloCatalog {
    /// Creates a catalog from its fixed per-halo fields.
    ///
    /// # Arguments
    ///
    /// * `box_size` - Side length of the periodic simulation box
    /// * `ids` - Halo identifiers
    /// * `positions` - Halo centres in Mpc/h
    /// * `velocities` - Halo bulk velocities in km/s
    /// * `virial_radii` - Virial radii
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if the fields disagree on the number of halos
    /// and `InvalidBoxSize` for a non-positive or non-finite box.
    ///
    /// # Examples
    ///
    /// ```
    /// use halo_catalog::{HaloCatalog, HaloId};
    /// use nalgebra::{Point3, Vector3};
    /// use units::Length;
    ///
    /// let catalog = HaloCatalog::new(
    ///     Length::from_mpc(250.0),
    ///     vec![HaloId(1)],
    ///     vec![Point3::new(10.0, 20.0, 30.0)],
    ///     vec![Vector3::zeros()],
    ///     vec![Length::from_kpc(300.0)],
    /// )
    /// .unwrap()
    /// .with_column("mvir", vec![1e12])
    /// .unwrap();
    ///
    /// assert_eq!(catalog.len(), 1);
    /// assert!(catalog.has_column("mvir"));
    /// ```
    pub fn new(
        box_size: Length,
        ids: Vec<HaloId>,
        positions: Vec<Point3<f64>>,
        velocities: Vec<Vector3<f64>>,
        virial_radii: Vec<Length>,
    ) -> Result<Self> {
        let size = box_size.to_mpc();
        if !(size.is_finite() && size > 0.0) {
            return Err(CatalogError::InvalidBoxSize(size));
        }

        let expected = ids.len();
        for (column, found) in [
            ("position", positions.len()),
            ("velocity", velocities.len()),
            ("rvir", virial_radii.len()),
        ] {
            if found != expected {
                return Err(CatalogError::LengthMismatch {
                    column: column.to_string(),
                    expected,
                    found,
                });
            }
        }

        Ok(Self {
            box_size,
            ids,
            positions,
            velocities,
            virial_radii,
            columns: BTreeMap::new(),
        })
    }

    /// Adds a named scalar column and returns the catalog (builder style)
    pub fn with_column(mut self, key: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.insert_column(key, values)?;
        Ok(self)
    }

    /// Adds or replaces a named scalar column.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` unless there is exactly one value per halo.
    pub fn insert_column(&mut self, key: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let key = key.into();
        if values.len() != self.len() {
            return Err(CatalogError::LengthMismatch {
                column: key,
                expected: self.len(),
                found: values.len(),
            });
        }
        self.columns.insert(key, values);
        Ok(())
    }

    /// Returns a named scalar column
    pub fn column(&self, key: &str) -> Result<&[f64]> {
        self.columns
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| CatalogError::missing_column(key))
    }

    pub fn has_column(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    /// Names of all scalar columns, in sorted order
    pub fn column_keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Smallest and largest finite value of a column.
    ///
    /// Returns `Ok(None)` for an empty catalog or a column without finite
    /// values.
    pub fn column_range(&self, key: &str) -> Result<Option<(f64, f64)>> {
        let range = self
            .column(key)?
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range: Option<(f64, f64)>, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        Ok(range)
    }

    pub fn box_size(&self) -> Length {
        self.box_size
    }

    pub fn ids(&self) -> &[HaloId] {
        &self.ids
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vector3<f64>] {
        &self.velocities
    }

    pub fn virial_radii(&self) -> &[Length] {
        &self.virial_radii
    }

    /// Returns the number of halos in the catalog
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
