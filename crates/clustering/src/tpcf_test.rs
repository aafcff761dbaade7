use std::collections::HashSet;
use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use rayon::ThreadPool;

use crate::{
    DirectPairCounter, ErrorKind, Estimator, KernelOptions, PairCounter, Periodicity, PointSet,
    Result, Samples, TpcfConfig, TpcfResult, downsample, tpcf, tpcf_with_counter, validate_bins,
};

/// Fails the test if any pairs are counted
struct NoCounting;

impl PairCounter for NoCounting {
    fn cumulative_counts(
        &self,
        _: &PointSet,
        _: &PointSet,
        _: &[f64],
        _: Option<&[f64]>,
        _: &KernelOptions<'_>,
    ) -> Result<Vec<u64>> {
        panic!("pairs were counted before the inputs were validated");
    }
}

/// Direct counter that remembers the largest first sample it was given
#[derive(Default)]
struct SizeRecorder {
    largest: Mutex<usize>,
}

impl PairCounter for SizeRecorder {
    fn cumulative_counts(
        &self,
        sample1: &PointSet,
        sample2: &PointSet,
        edges: &[f64],
        period: Option<&[f64]>,
        options: &KernelOptions<'_>,
    ) -> Result<Vec<u64>> {
        let mut largest = self.largest.lock().unwrap();
        *largest = (*largest).max(sample1.len());
        DirectPairCounter.cumulative_counts(sample1, sample2, edges, period, options)
    }
}

/// Direct counter that remembers which worker pool each call was handed
#[derive(Default)]
struct PoolRecorder {
    pools: Mutex<Vec<Option<(usize, usize)>>>,
}

impl PairCounter for PoolRecorder {
    fn cumulative_counts(
        &self,
        sample1: &PointSet,
        sample2: &PointSet,
        edges: &[f64],
        period: Option<&[f64]>,
        options: &KernelOptions<'_>,
    ) -> Result<Vec<u64>> {
        let pool = options
            .pool
            .map(|pool| (pool as *const ThreadPool as usize, pool.current_num_threads()));
        self.pools.lock().unwrap().push(pool);
        DirectPairCounter.cumulative_counts(sample1, sample2, edges, period, options)
    }
}

fn uniform(n: usize, dim: usize, size: f64, rng: &mut ChaChaRng) -> PointSet {
    let coords = (0..n * dim).map(|_| rng.random::<f64>() * size).collect();
    PointSet::from_flat(dim, coords).unwrap()
}

fn error_kind(
    counter: &dyn PairCounter,
    samples: Samples<'_>,
    rbins: &[f64],
    period: &Periodicity,
    config: &TpcfConfig,
) -> ErrorKind {
    let mut rng = ChaChaRng::seed_from_u64(0);
    tpcf_with_counter(counter, samples, rbins, period, config, None, &mut rng)
        .unwrap_err()
        .kind()
}

#[test]
fn test_uniform_points_are_uncorrelated_in_periodic_box() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let data = uniform(2000, 3, 100.0, &mut rng);

    let result = tpcf(
        Samples::new(&data),
        &[5.0, 10.0, 20.0],
        &Periodicity::Scalar(100.0),
        &TpcfConfig::default(),
        None,
        &mut rng,
    )
    .unwrap();

    let TpcfResult::Auto(xi) = result else {
        panic!("expected an auto-correlation");
    };
    assert_eq!(xi.len(), 2);
    for value in xi {
        assert!(value.abs() < 0.1, "xi = {value}");
    }
}

#[test]
fn test_uniform_points_against_explicit_randoms() {
    let mut rng = ChaChaRng::seed_from_u64(9);
    let data = uniform(1000, 3, 100.0, &mut rng);
    let randoms = uniform(1000, 3, 100.0, &mut rng);
    let config = TpcfConfig {
        estimator: Estimator::LandySzalay,
        num_threads: 2,
        ..TpcfConfig::default()
    };

    let result = tpcf(
        Samples::new(&data).with_randoms(&randoms),
        &[5.0, 10.0, 20.0],
        &Periodicity::None,
        &config,
        None,
        &mut rng,
    )
    .unwrap();

    let TpcfResult::Auto(xi) = result else {
        panic!("expected an auto-correlation");
    };
    for value in xi {
        assert!(value.abs() < 0.15, "xi = {value}");
    }
}

#[test]
fn test_result_shape_follows_requested_terms() {
    let mut rng = ChaChaRng::seed_from_u64(5);
    let a = uniform(50, 3, 10.0, &mut rng);
    let b = uniform(40, 3, 10.0, &mut rng);
    let rbins = [0.5, 1.0, 2.0];
    let period = Periodicity::Scalar(10.0);
    let run = |do_auto: bool, do_cross: bool, rng: &mut ChaChaRng| {
        let config = TpcfConfig {
            do_auto,
            do_cross,
            ..TpcfConfig::default()
        };
        tpcf(Samples::new(&a).with_sample2(&b), &rbins, &period, &config, None, rng).unwrap()
    };

    assert!(matches!(run(true, true, &mut rng), TpcfResult::AutoCross { .. }));
    assert!(matches!(run(false, true, &mut rng), TpcfResult::Cross(_)));
    assert!(matches!(run(true, false, &mut rng), TpcfResult::Auto(_)));

    let TpcfResult::AutoCross {
        auto1,
        cross,
        auto2,
    } = run(true, true, &mut rng)
    else {
        unreachable!();
    };
    assert_eq!([auto1.len(), cross.len(), auto2.len()], [2, 2, 2]);
}

#[test]
fn test_identical_second_sample_is_ignored() {
    let mut rng = ChaChaRng::seed_from_u64(6);
    let data = uniform(30, 3, 10.0, &mut rng);
    let copy = data.clone();

    let result = tpcf(
        Samples::new(&data).with_sample2(&copy),
        &[0.5, 1.0, 2.0],
        &Periodicity::Scalar(10.0),
        &TpcfConfig::default(),
        None,
        &mut rng,
    )
    .unwrap();
    assert!(matches!(result, TpcfResult::Auto(_)));
}

#[test]
fn test_bins_beyond_half_box_fail_before_counting() {
    let mut rng = ChaChaRng::seed_from_u64(1);
    let data = uniform(10, 3, 100.0, &mut rng);
    let kind = error_kind(
        &NoCounting,
        Samples::new(&data),
        &[1.0, 10.0, 60.0],
        &Periodicity::Scalar(100.0),
        &TpcfConfig::default(),
    );
    assert_eq!(kind, ErrorKind::InputConsistency);

    // The smallest axis sets the limit
    let kind = error_kind(
        &NoCounting,
        Samples::new(&data),
        &[1.0, 30.0],
        &Periodicity::PerAxis(vec![100.0, 50.0, 100.0]),
        &TpcfConfig::default(),
    );
    assert_eq!(kind, ErrorKind::InputConsistency);
}

#[test]
fn test_open_boundaries_without_randoms() {
    let mut rng = ChaChaRng::seed_from_u64(2);
    let data = uniform(10, 3, 100.0, &mut rng);
    let kind = error_kind(
        &NoCounting,
        Samples::new(&data),
        &[1.0, 2.0],
        &Periodicity::None,
        &TpcfConfig::default(),
    );
    assert_eq!(kind, ErrorKind::InputConsistency);
}

#[test]
fn test_infinite_period_is_a_configuration_error() {
    let mut rng = ChaChaRng::seed_from_u64(3);
    let data = uniform(10, 3, 100.0, &mut rng);
    let kind = error_kind(
        &NoCounting,
        Samples::new(&data),
        &[1.0, 2.0],
        &Periodicity::PerAxis(vec![100.0, f64::INFINITY, 100.0]),
        &TpcfConfig::default(),
    );
    assert_eq!(kind, ErrorKind::Configuration);
}

#[test]
fn test_dimension_mismatch() {
    let mut rng = ChaChaRng::seed_from_u64(4);
    let data = uniform(10, 3, 100.0, &mut rng);
    let flat = uniform(10, 2, 100.0, &mut rng);
    let kind = error_kind(
        &NoCounting,
        Samples::new(&data).with_sample2(&flat),
        &[1.0, 2.0],
        &Periodicity::Scalar(100.0),
        &TpcfConfig::default(),
    );
    assert_eq!(kind, ErrorKind::InputConsistency);
}

#[test]
fn test_second_sample_without_any_term() {
    let mut rng = ChaChaRng::seed_from_u64(8);
    let a = uniform(10, 3, 100.0, &mut rng);
    let b = uniform(10, 3, 100.0, &mut rng);
    let config = TpcfConfig {
        do_auto: false,
        do_cross: false,
        ..TpcfConfig::default()
    };
    let kind = error_kind(
        &NoCounting,
        Samples::new(&a).with_sample2(&b),
        &[1.0, 2.0],
        &Periodicity::Scalar(100.0),
        &config,
    );
    assert_eq!(kind, ErrorKind::Configuration);
}

#[test]
fn test_validate_bins() {
    assert!(validate_bins(&[0.0, 1.0]).is_ok());
    for bad in [
        vec![1.0],
        vec![2.0, 1.0],
        vec![1.0, 1.0],
        vec![-1.0, 1.0],
        vec![1.0, f64::NAN],
        vec![1.0, f64::INFINITY],
    ] {
        let err = validate_bins(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputConsistency, "{bad:?}");
    }
}

#[test]
fn test_downsample_to_max_size() {
    let points = PointSet::from_flat(1, (0..2_000_000).map(f64::from).collect()).unwrap();
    let mut rng = ChaChaRng::seed_from_u64(11);
    let reduced = downsample(&points, 1_000_000, "sample1", &mut rng);

    assert_eq!(reduced.len(), 1_000_000);
    let distinct: HashSet<u64> = reduced.iter().map(|p| p[0].to_bits()).collect();
    assert_eq!(distinct.len(), 1_000_000);
}

#[test]
fn test_small_samples_are_borrowed() {
    let points = PointSet::from_rows(&[vec![1.0], vec![2.0]]).unwrap();
    let mut rng = ChaChaRng::seed_from_u64(12);
    assert!(matches!(
        downsample(&points, 2, "sample1", &mut rng),
        std::borrow::Cow::Borrowed(_)
    ));
}

#[test]
fn test_large_samples_are_counted_downsampled() {
    let mut rng = ChaChaRng::seed_from_u64(13);
    let data = uniform(500, 3, 10.0, &mut rng);
    let recorder = SizeRecorder::default();
    let config = TpcfConfig {
        max_sample_size: 100,
        ..TpcfConfig::default()
    };

    tpcf_with_counter(
        &recorder,
        Samples::new(&data),
        &[0.5, 1.0],
        &Periodicity::Scalar(10.0),
        &config,
        None,
        &mut rng,
    )
    .unwrap();
    assert_eq!(*recorder.largest.lock().unwrap(), 100);
}

#[test]
fn test_config_defaults_from_json() {
    let config: TpcfConfig =
        serde_json::from_str(r#"{"estimator": "Landy-Szalay", "num_threads": 4}"#).unwrap();
    assert_eq!(
        config,
        TpcfConfig {
            estimator: Estimator::LandySzalay,
            num_threads: 4,
            ..TpcfConfig::default()
        }
    );
    assert_eq!(config.max_sample_size, 1_000_000);
    assert!(config.do_auto && config.do_cross);
}

#[test]
fn test_one_worker_pool_per_call() {
    let mut rng = ChaChaRng::seed_from_u64(8);
    let data = uniform(200, 3, 50.0, &mut rng);
    let other = uniform(150, 3, 50.0, &mut rng);
    let randoms = uniform(300, 3, 50.0, &mut rng);
    let config = TpcfConfig {
        estimator: Estimator::LandySzalay,
        num_threads: 3,
        ..TpcfConfig::default()
    };
    let counter = PoolRecorder::default();

    let threaded = tpcf_with_counter(
        &counter,
        Samples::new(&data).with_sample2(&other).with_randoms(&randoms),
        &[2.0, 5.0, 10.0],
        &Periodicity::None,
        &config,
        None,
        &mut ChaChaRng::seed_from_u64(1),
    )
    .unwrap();

    let pools = counter.pools.into_inner().unwrap();
    assert!(pools.len() > 2, "only {} counts", pools.len());
    let first = pools[0].expect("counts ran without a shared pool");
    assert_eq!(first.1, 3);
    assert!(pools.iter().all(|&pool| pool == Some(first)));

    let serial = tpcf_with_counter(
        &DirectPairCounter,
        Samples::new(&data).with_sample2(&other).with_randoms(&randoms),
        &[2.0, 5.0, 10.0],
        &Periodicity::None,
        &TpcfConfig {
            num_threads: 1,
            ..config
        },
        None,
        &mut ChaChaRng::seed_from_u64(1),
    )
    .unwrap();
    assert_eq!(threaded, serial);
}
