use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::satellite_systems;
use crate::test_support::{FixedModel, three_halo_catalog};
use crate::{allocate, sorted_gal_types};

#[test]
fn test_ranges_follow_type_order() {
    let halos = three_halo_catalog();
    let model = FixedModel::new(vec![
        ("satellites", f64::INFINITY, vec![4, 0, 2]),
        ("centrals", 1.0, vec![1, 0, 1]),
    ]);
    let specs = sorted_gal_types(&model).unwrap();
    let mut rng = ChaChaRng::seed_from_u64(0);

    let (allocations, total) = allocate(&model, &halos, &specs, &mut rng).unwrap();

    assert_eq!(total, 8);
    assert_eq!(allocations[0].spec.gal_type, "centrals");
    assert_eq!(allocations[0].range, 0..2);
    assert_eq!(allocations[1].range, 2..8);
    assert_eq!(allocations[1].abundance(), 6);
    assert_eq!(allocations[1].occupations, vec![4, 0, 2]);
}

#[test]
fn test_satellite_systems_skip_nothing() {
    assert_eq!(satellite_systems(&[], 5), Vec::<std::ops::Range<usize>>::new());
    assert_eq!(satellite_systems(&[3], 0), vec![0..3]);
}

proptest! {
    #[test]
    fn ranges_partition_the_table(
        centrals in prop::collection::vec(0u32..=1, 3),
        satellites in prop::collection::vec(0u32..20, 3),
    ) {
        let halos = three_halo_catalog();
        let model = FixedModel::new(vec![
            ("centrals", 1.0, centrals.clone()),
            ("satellites", f64::INFINITY, satellites.clone()),
        ]);
        let specs = sorted_gal_types(&model).unwrap();
        let mut rng = ChaChaRng::seed_from_u64(0);
        let (allocations, total) = allocate(&model, &halos, &specs, &mut rng).unwrap();

        let expected: u32 = centrals.iter().chain(&satellites).sum();
        prop_assert_eq!(total, expected as usize);

        let mut next = 0;
        for allocation in &allocations {
            prop_assert_eq!(allocation.range.start, next);
            next = allocation.range.end;
        }
        prop_assert_eq!(next, total);
    }

    #[test]
    fn satellite_cursor_ends_at_total(
        counts in prop::collection::vec(0u32..10, 0..50),
        start in 0usize..1000,
    ) {
        let systems = satellite_systems(&counts, start);
        let total: usize = counts.iter().map(|&n| n as usize).sum();

        prop_assert_eq!(systems.len(), counts.len());
        prop_assert_eq!(systems.last().map_or(start, |r| r.end), start + total);
        for (rows, &n) in systems.iter().zip(&counts) {
            prop_assert_eq!(rows.len(), n as usize);
        }
    }
}
