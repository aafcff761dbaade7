//! Populate a synthetic halo box with a Zheng07 model and measure its
//! clustering
//!
//! Usage: cargo run -p mock-factory --example populate_box

use clustering::{Estimator, Periodicity, PointSet, Samples, TpcfConfig, TpcfResult, tpcf};
use halo_catalog::{HaloCatalog, HaloId};
use hod::{HodModel, NfwParams, Zheng07Params};
use mock_factory::HodMockFactory;
use nalgebra::{Point3, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use units::Length;

const BOX_SIZE: f64 = 250.0;
const NUM_HALOS: usize = 20_000;

fn init_logging() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime()),
        )
        .init();
}

/// Halos uniform in the box with log-uniform masses between 1e11.5 and
/// 1e14.5 Msun/h
fn synthetic_halos(rng: &mut ChaChaRng) -> HaloCatalog {
    let mut positions = Vec::with_capacity(NUM_HALOS);
    let mut velocities = Vec::with_capacity(NUM_HALOS);
    let mut radii = Vec::with_capacity(NUM_HALOS);
    let mut masses = Vec::with_capacity(NUM_HALOS);

    for _ in 0..NUM_HALOS {
        let mass = 10f64.powf(rng.random_range(11.5..14.5));
        positions.push(Point3::new(
            rng.random_range(0.0..BOX_SIZE),
            rng.random_range(0.0..BOX_SIZE),
            rng.random_range(0.0..BOX_SIZE),
        ));
        velocities.push(Vector3::new(
            rng.random_range(-300.0..300.0),
            rng.random_range(-300.0..300.0),
            rng.random_range(-300.0..300.0),
        ));
        radii.push(Length::from_kpc(210.0 * (mass / 1e12).cbrt()));
        masses.push(mass);
    }

    let ids = (1..=NUM_HALOS as i64).map(HaloId).collect();
    HaloCatalog::new(
        Length::from_mpc(BOX_SIZE),
        ids,
        positions,
        velocities,
        radii,
    )
    .and_then(|catalog| catalog.with_column("mvir", masses))
    .unwrap()
}

fn main() {
    init_logging();

    let mut rng = ChaChaRng::seed_from_u64(2007);
    let mut halos = synthetic_halos(&mut rng);
    let model = HodModel::zheng07(Zheng07Params::default(), NfwParams::default()).unwrap();
    let factory = HodMockFactory::new(&mut halos, &model).unwrap();

    let mock = factory.populate_seeded(42).unwrap();
    println!("Realization {} ({})", mock.metadata.label(), mock.metadata.id);
    for spec in factory.gal_types() {
        println!(
            "  {:<12} {:>8} galaxies",
            spec.gal_type,
            mock.galaxies.abundance(&spec.gal_type)
        );
    }

    let galaxies = PointSet::from_points3(&mock.galaxies.position);
    let rbins = [0.1, 0.3, 1.0, 3.0, 10.0, 30.0];
    let config = TpcfConfig {
        estimator: Estimator::Natural,
        num_threads: 4,
        ..TpcfConfig::default()
    };
    let result = tpcf(
        Samples::new(&galaxies),
        &rbins,
        &Periodicity::Scalar(BOX_SIZE),
        &config,
        None,
        &mut rng,
    )
    .unwrap();

    if let TpcfResult::Auto(xi) = result {
        println!("\n  r [Mpc/h]          xi(r)");
        for (edges, value) in rbins.windows(2).zip(xi) {
            println!("  {:>5.1} - {:<5.1} {:>12.3}", edges[0], edges[1], value);
        }
    }
}
