use std::f64::consts::PI;

use nalgebra::Vector3;
use rand::Rng;
use rand_chacha::ChaChaRng;
use rand_distr::{Distribution, Poisson};

/// Error function, Abramowitz & Stegun 7.1.26 (|error| < 1.5e-7)
pub fn erf(x: f64) -> f64 {
    const P: f64 = 0.327_591_1;
    const A: [f64; 5] = [
        0.254_829_592,
        -0.284_496_736,
        1.421_413_741,
        -1.453_152_027,
        1.061_405_429,
    ];

    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = A.iter().rev().fold(0.0, |acc, &a| acc * t + a) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Draw a 0/1 outcome that is 1 with probability `p`
///
/// Probabilities outside [0, 1] are clamped.
pub fn sample_bernoulli(rng: &mut ChaChaRng, p: f64) -> bool {
    let u: f64 = rng.random();
    u < p.clamp(0.0, 1.0)
}

/// Draw a Poisson-distributed count with the given mean
///
/// Non-positive or non-finite means yield zero.
pub fn sample_poisson(rng: &mut ChaChaRng, mean: f64) -> u32 {
    if !(mean.is_finite() && mean > 0.0) {
        return 0;
    }
    match Poisson::new(mean) {
        Ok(dist) => dist.sample(rng) as u32,
        Err(_) => 0,
    }
}

/// Sample a direction uniformly on the unit sphere
///
/// Uses cos(θ) uniform in [-1, 1] and φ uniform in [0, 2π).
pub fn sample_unit_vector(rng: &mut ChaChaRng) -> Vector3<f64> {
    let cos_t: f64 = 2.0 * rng.random::<f64>() - 1.0;
    let phi: f64 = 2.0 * PI * rng.random::<f64>();
    let sin_t = (1.0 - cos_t * cos_t).max(0.0).sqrt();
    Vector3::new(sin_t * phi.cos(), sin_t * phi.sin(), cos_t)
}
