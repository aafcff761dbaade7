use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::{OccupationModel, Zheng07Centrals, Zheng07Params, Zheng07Satellites};

#[test]
fn test_centrals_half_occupied_at_m_min() {
    let params = Zheng07Params::default();
    let centrals = Zheng07Centrals::new(&params);

    let m_min = 10f64.powf(params.log_m_min);
    assert_relative_eq!(centrals.mean_occupation(m_min), 0.5, epsilon = 1e-6);
    assert!(centrals.mean_occupation(1e10) < 1e-6);
    assert!(centrals.mean_occupation(1e15) > 1.0 - 1e-6);
    assert_eq!(centrals.mean_occupation(0.0), 0.0);
}

#[test]
fn test_satellites_power_law() {
    let params = Zheng07Params {
        log_m0: 11.0,
        log_m1: 13.0,
        alpha: 1.0,
        ..Zheng07Params::default()
    };
    let satellites = Zheng07Satellites::new(&params);

    // Below the cutoff there are no satellites
    assert_eq!(satellites.mean_occupation(1e10), 0.0);

    // ((1e14 - 1e11) / 1e13)^1
    assert_relative_eq!(satellites.mean_occupation(1e14), 9.99, epsilon = 1e-9);
}

#[test]
fn test_satellite_modulation_by_centrals() {
    let plain = Zheng07Satellites::new(&Zheng07Params::default());
    let modulated = Zheng07Satellites::new(&Zheng07Params {
        modulate_with_cenocc: true,
        ..Zheng07Params::default()
    });

    let mass = 10f64.powf(12.02);
    assert_relative_eq!(
        modulated.mean_occupation(mass),
        0.5 * plain.mean_occupation(mass),
        max_relative = 1e-5
    );
}

#[test]
fn test_bounds() {
    let params = Zheng07Params::default();
    assert_eq!(Zheng07Centrals::new(&params).occupation_bound(), 1.0);
    assert_eq!(
        Zheng07Satellites::new(&params).occupation_bound(),
        f64::INFINITY
    );
}

#[test]
fn test_central_draws_are_binary() {
    let centrals = Zheng07Centrals::new(&Zheng07Params::default());
    let mut rng = ChaChaRng::seed_from_u64(42);
    let masses: Vec<f64> = (0..500).map(|i| 10f64.powf(11.0 + i as f64 * 0.008)).collect();

    let counts = centrals.mc_occupation(&masses, &mut rng);
    assert_eq!(counts.len(), masses.len());
    assert!(counts.iter().all(|&n| n <= 1));
    assert_eq!(counts[0], 0);
    assert_eq!(counts[499], 1);
}

#[test]
fn test_satellite_draws_follow_mean() {
    let satellites = Zheng07Satellites::new(&Zheng07Params::default());
    let mut rng = ChaChaRng::seed_from_u64(3);
    let masses = vec![1e14; 5_000];

    let counts = satellites.mc_occupation(&masses, &mut rng);
    let mean = counts.iter().map(|&n| f64::from(n)).sum::<f64>() / counts.len() as f64;
    let expected = satellites.mean_occupation(1e14);
    assert!(
        (mean - expected).abs() < 0.05 * expected,
        "mean {mean} vs expected {expected}"
    );
}

#[test]
fn test_params_deserialize_with_defaults() {
    let params: Zheng07Params = serde_json::from_str(r#"{"alpha": 1.2}"#).unwrap();
    assert_eq!(params.alpha, 1.2);
    assert_eq!(params.log_m_min, 12.02);
    assert!(!params.modulate_with_cenocc);
}
