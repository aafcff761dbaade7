//! Halo occupation statistics.
//!
//! An occupation component maps a halo's primary property to the mean
//! number of galaxies of one type and draws Monte Carlo realizations of it.
//! Components with an occupation bound of 1 are Bernoulli distributed,
//! unbounded ones are Poisson distributed about their mean.

use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use units::Mass;

use crate::sampling::{erf, sample_bernoulli, sample_poisson};

/// Statistical model for the number of galaxies of one type per halo
pub trait OccupationModel: Send + Sync {
    /// Maximum number of galaxies of this type per halo: `1.0` or infinity
    fn occupation_bound(&self) -> f64;

    /// Expected number of galaxies in a halo with the given primary property
    fn mean_occupation(&self, prim_haloprop: f64) -> f64;

    /// Draw one occupation count per halo.
    ///
    /// The default draws a Bernoulli count for unit-bounded components and a
    /// Poisson count otherwise.
    fn mc_occupation(&self, prim_haloprop: &[f64], rng: &mut ChaChaRng) -> Vec<u32> {
        let bounded = self.occupation_bound() == 1.0;
        prim_haloprop
            .iter()
            .map(|&prop| {
                let mean = self.mean_occupation(prop);
                if bounded {
                    u32::from(sample_bernoulli(rng, mean))
                } else {
                    sample_poisson(rng, mean)
                }
            })
            .collect()
    }
}

/// Parameters of the Zheng et al. (2007) occupation model.
///
/// Masses are log10 in Msun/h. Defaults are the published fit for
/// galaxies brighter than Mr = -20.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zheng07Params {
    /// Mass at which half of all halos host a central
    pub log_m_min: f64,
    /// Width of the central occupation transition
    pub sigma_log_m: f64,
    /// Satellite occupation cutoff mass
    pub log_m0: f64,
    /// Mass hosting one satellite on average (above the cutoff)
    pub log_m1: f64,
    /// Satellite power-law slope
    pub alpha: f64,
    /// Multiply the satellite mean by the central mean
    pub modulate_with_cenocc: bool,
}

impl Default for Zheng07Params {
    fn default() -> Self {
        Self {
            log_m_min: 12.02,
            sigma_log_m: 0.26,
            log_m0: 11.38,
            log_m1: 13.31,
            alpha: 1.06,
            modulate_with_cenocc: false,
        }
    }
}

/// Central galaxies: `<Ncen> = ½ [1 + erf((log M − log Mmin) / σ)]`
#[derive(Debug, Clone)]
pub struct Zheng07Centrals {
    pub log_m_min: f64,
    pub sigma_log_m: f64,
}

impl Zheng07Centrals {
    pub fn new(params: &Zheng07Params) -> Self {
        Self {
            log_m_min: params.log_m_min,
            sigma_log_m: params.sigma_log_m,
        }
    }
}

impl OccupationModel for Zheng07Centrals {
    fn occupation_bound(&self) -> f64 {
        1.0
    }

    fn mean_occupation(&self, prim_haloprop: f64) -> f64 {
        let log_m = Mass::from_solar_masses(prim_haloprop).log10_solar_masses();
        if log_m == f64::NEG_INFINITY {
            return 0.0;
        }
        0.5 * (1.0 + erf((log_m - self.log_m_min) / self.sigma_log_m))
    }
}

/// Satellite galaxies: `<Nsat> = ((M − M0) / M1)^α` above `M0`, zero below
#[derive(Debug, Clone)]
pub struct Zheng07Satellites {
    pub log_m0: f64,
    pub log_m1: f64,
    pub alpha: f64,
    /// Central component used to modulate the mean, if enabled
    pub centrals: Option<Zheng07Centrals>,
}

impl Zheng07Satellites {
    pub fn new(params: &Zheng07Params) -> Self {
        Self {
            log_m0: params.log_m0,
            log_m1: params.log_m1,
            alpha: params.alpha,
            centrals: params
                .modulate_with_cenocc
                .then(|| Zheng07Centrals::new(params)),
        }
    }
}

impl OccupationModel for Zheng07Satellites {
    fn occupation_bound(&self) -> f64 {
        f64::INFINITY
    }

    fn mean_occupation(&self, prim_haloprop: f64) -> f64 {
        let m0 = Mass::from_log10_solar_masses(self.log_m0);
        let m1 = Mass::from_log10_solar_masses(self.log_m1);
        let mass = Mass::from_solar_masses(prim_haloprop);

        let mean = if mass > m0 {
            ((mass - m0) / m1).powf(self.alpha)
        } else {
            0.0
        };

        match &self.centrals {
            Some(centrals) => mean * centrals.mean_occupation(prim_haloprop),
            None => mean,
        }
    }
}
