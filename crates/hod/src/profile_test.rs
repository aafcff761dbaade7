use approx::assert_relative_eq;
use units::Mass;

use crate::{CONC_KEY, HaloProfile, NfwParams, NfwProfile};

#[test]
fn test_concentration_at_pivot() {
    let nfw = NfwProfile::default();
    assert_relative_eq!(nfw.concentration(Mass::from_solar_masses(1.3e13)), 9.0);
    // More massive halos are less concentrated
    assert!(nfw.concentration(Mass::from_solar_masses(1e15)) < 9.0);
    assert!(nfw.concentration(Mass::from_solar_masses(1e11)) > 9.0);
}

#[test]
fn test_param_value_only_for_known_keys() {
    let nfw = NfwProfile::default();
    assert_eq!(nfw.param_keys(), vec![CONC_KEY.to_string()]);
    assert!(nfw.param_value(CONC_KEY, 1e12).is_some());
    assert!(nfw.param_value("spin", 1e12).is_none());
}

#[test]
fn test_mass_fraction_endpoints_and_monotonic() {
    let nfw = NfwProfile::default();
    let params = [5.0];

    assert_relative_eq!(nfw.cumulative_mass_fraction(0.0, &params), 0.0);
    assert_relative_eq!(nfw.cumulative_mass_fraction(1.0, &params), 1.0);

    let mut previous = 0.0;
    for i in 1..=100 {
        let f = nfw.cumulative_mass_fraction(i as f64 / 100.0, &params);
        assert!(f > previous);
        previous = f;
    }
}

#[test]
fn test_higher_concentration_is_more_centrally_peaked() {
    let nfw = NfwProfile::default();
    let low = nfw.cumulative_mass_fraction(0.2, &[3.0]);
    let high = nfw.cumulative_mass_fraction(0.2, &[15.0]);
    assert!(high > low);
}

#[test]
fn test_param_table_uses_configured_range() {
    let nfw = NfwProfile::default();
    let table = nfw.param_table();
    assert_eq!(table.len(), 1);
    assert_eq!(table[CONC_KEY], NfwParams::default().conc_range);
}

#[test]
fn test_params_deserialize_with_defaults() {
    let params: NfwParams = serde_json::from_str(r#"{"conc_norm": 7.5}"#).unwrap();
    assert_eq!(params.conc_norm, 7.5);
    assert_eq!(params.pivot_mass, 1.3e13);
}
