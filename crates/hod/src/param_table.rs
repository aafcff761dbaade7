use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HodError, Result};

/// Largest number of grid points a single parameter range may span
pub const MAX_GRID_POINTS: usize = 10_000;

/// Coverage of one profile parameter: an evenly spaced grid from `min` to
/// at least `max` in increments of `step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Checks that the range describes a non-empty, finite grid of at most
    /// [`MAX_GRID_POINTS`] points
    pub fn validate(&self, key: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err(HodError::config(format!(
                "profile parameter `{key}` has a non-finite range"
            )));
        }
        if self.step <= 0.0 {
            return Err(HodError::config(format!(
                "profile parameter `{key}` needs a positive step, got {}",
                self.step
            )));
        }
        if self.min > self.max {
            return Err(HodError::config(format!(
                "profile parameter `{key}` has min {} above max {}",
                self.min, self.max
            )));
        }
        let intervals = ((self.max - self.min) / self.step).ceil();
        if intervals >= MAX_GRID_POINTS as f64 {
            return Err(HodError::config(format!(
                "profile parameter `{key}` spans {intervals:e} steps of {} from {} to {}, \
                 more than {MAX_GRID_POINTS} grid points",
                self.step, self.min, self.max
            )));
        }
        Ok(())
    }

    /// Number of grid points; the last point is the first one at or past `max`.
    ///
    /// Only meaningful for a range that passed [`ParamRange::validate`].
    pub fn num_points(&self) -> usize {
        ((self.max - self.min) / self.step).ceil() as usize + 1
    }

    /// Grid value at index `i`
    pub fn value(&self, i: usize) -> f64 {
        self.min + i as f64 * self.step
    }

    /// Index of the grid point closest to `value`, clamped to the grid
    pub fn nearest_index(&self, value: f64) -> usize {
        let last = self.num_points() - 1;
        let raw = ((value - self.min) / self.step).round();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            (raw as usize).min(last)
        }
    }

    /// Widens this range so it covers an observed interval padded by one step
    /// on each side; the step is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use hod::ParamRange;
    ///
    /// let model = ParamRange::new(2.0, 20.0, 0.5);
    /// let needed = model.covering(1.8, 22.0);
    ///
    /// assert_eq!(needed, ParamRange::new(1.3, 22.5, 0.5));
    /// ```
    pub fn covering(&self, observed_min: f64, observed_max: f64) -> Self {
        Self {
            min: (observed_min - self.step).min(self.min),
            max: (observed_max + self.step).max(self.max),
            step: self.step,
        }
    }
}

/// Per-key coverage descriptors of every profile parameter
pub type ProfParamTable = BTreeMap<String, ParamRange>;
