use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClusteringError, Result};

/// Two-point correlation function estimators, named as in the literature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Estimator {
    /// `DD / RR − 1`
    #[default]
    Natural,
    /// `DD / DR − 1`
    #[serde(rename = "Davis-Peebles")]
    DavisPeebles,
    /// `(DD − DR) / RR`
    Hewett,
    /// `DD · RR / DR² − 1`
    Hamilton,
    /// `(DD − 2 DR + RR) / RR`
    #[serde(rename = "Landy-Szalay")]
    LandySzalay,
}

/// Pair counts an estimator consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorRequirements {
    pub dd: bool,
    pub dr: bool,
    pub rr: bool,
}

/// Sizes the raw pair counts are normalized by
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub nd1: f64,
    pub nd2: f64,
    pub nr1: f64,
    pub nr2: f64,
}

impl Normalization {
    /// Counts that are already normalized, as for analytic randoms
    pub const UNIT: Self = Self {
        nd1: 1.0,
        nd2: 1.0,
        nr1: 1.0,
        nr2: 1.0,
    };
}

impl Estimator {
    pub const ALL: [Estimator; 5] = [
        Estimator::Natural,
        Estimator::DavisPeebles,
        Estimator::Hewett,
        Estimator::Hamilton,
        Estimator::LandySzalay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Estimator::Natural => "Natural",
            Estimator::DavisPeebles => "Davis-Peebles",
            Estimator::Hewett => "Hewett",
            Estimator::Hamilton => "Hamilton",
            Estimator::LandySzalay => "Landy-Szalay",
        }
    }

    pub fn requirements(&self) -> EstimatorRequirements {
        let (dr, rr) = match self {
            Estimator::Natural => (false, true),
            Estimator::DavisPeebles => (true, false),
            Estimator::Hewett | Estimator::Hamilton | Estimator::LandySzalay => (true, true),
        };
        EstimatorRequirements { dd: true, dr, rr }
    }

    /// Evaluates the estimator bin by bin.
    ///
    /// # Errors
    ///
    /// Returns an input-consistency error if a required count is missing or
    /// the count arrays differ in length.
    ///
    /// # Examples
    ///
    /// ```
    /// use clustering::{Estimator, Normalization};
    ///
    /// let norm = Normalization { nd1: 100.0, nd2: 100.0, nr1: 200.0, nr2: 200.0 };
    /// let xi = Estimator::Natural.evaluate(&[10.0], None, Some(&[5.0]), &norm).unwrap();
    /// assert_eq!(xi, vec![7.0]);
    /// ```
    pub fn evaluate(
        &self,
        dd: &[f64],
        dr: Option<&[f64]>,
        rr: Option<&[f64]>,
        norm: &Normalization,
    ) -> Result<Vec<f64>> {
        let needs = self.requirements();
        let dr = self.required(dr, needs.dr, "DR", dd.len())?;
        let rr = self.required(rr, needs.rr, "RR", dd.len())?;

        let Normalization { nd1, nd2, nr1, nr2 } = *norm;
        let f_dd = (nr1 * nr2) / (nd1 * nd2);
        let f_dr = (nr1 * nr2) / (nd1 * nr2);

        let xi = (0..dd.len())
            .map(|i| match self {
                Estimator::Natural => f_dd * dd[i] / rr[i] - 1.0,
                Estimator::DavisPeebles => (nd1 * nr2) / (nd1 * nd2) * dd[i] / dr[i] - 1.0,
                Estimator::Hewett => f_dd * dd[i] / rr[i] - f_dr * dr[i] / rr[i],
                Estimator::Hamilton => dd[i] * rr[i] / (dr[i] * dr[i]) - 1.0,
                Estimator::LandySzalay => {
                    f_dd * dd[i] / rr[i] - 2.0 * f_dr * dr[i] / rr[i] + 1.0
                }
            })
            .collect();
        Ok(xi)
    }

    fn required<'a>(
        &self,
        counts: Option<&'a [f64]>,
        needed: bool,
        label: &str,
        len: usize,
    ) -> Result<&'a [f64]> {
        match counts {
            Some(counts) if counts.len() != len => Err(ClusteringError::input(format!(
                "{label} has {} bins but DD has {len}",
                counts.len()
            ))),
            Some(counts) => Ok(counts),
            None if needed => Err(ClusteringError::input(format!(
                "{} estimator needs {label} counts",
                self.name()
            ))),
            None => Ok(&[]),
        }
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Estimator {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self> {
        Estimator::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| ClusteringError::UnknownEstimator(s.to_string()))
    }
}
