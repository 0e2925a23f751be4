//! Tests for configuration validation

use lot_simulator::config::{parse_total, SimulationConfig};
use parking_lot::Mutex;

/// Serialises tests that touch `LOT_*` variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_default_config_is_valid() {
    let cfg = SimulationConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.capacity, 20);
    assert_eq!(cfg.total_cars, Some(100));
    assert_eq!(cfg.poll_interval_ms, 700);
}

#[test]
fn test_zero_capacity_rejected() {
    let cfg = SimulationConfig {
        capacity: 0,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_zero_total_rejected() {
    let cfg = SimulationConfig {
        total_cars: Some(0),
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_bad_arrival_rate_rejected() {
    for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let cfg = SimulationConfig {
            arrival_rate: rate,
            ..SimulationConfig::default()
        };
        assert!(cfg.validate().is_err(), "rate {rate} accepted");
    }
}

#[test]
fn test_dwell_bounds_rejected() {
    let negative = SimulationConfig {
        dwell_min_secs: -0.5,
        ..SimulationConfig::default()
    };
    assert!(negative.validate().is_err());

    let inverted = SimulationConfig {
        dwell_min_secs: 5.0,
        dwell_max_secs: 3.0,
        ..SimulationConfig::default()
    };
    let err = inverted.validate().unwrap_err();
    assert!(err.contains("dwell_max_secs"), "{err}");
}

#[test]
fn test_zero_poll_interval_rejected() {
    let cfg = SimulationConfig {
        poll_interval_ms: 0,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_from_json_partial() {
    let cfg = SimulationConfig::from_json_str(r#"{"capacity": 4, "arrival_rate": 2.5}"#).unwrap();
    assert_eq!(cfg.capacity, 4);
    assert!((cfg.arrival_rate - 2.5).abs() < f64::EPSILON);
    assert_eq!(cfg.total_cars, Some(100));
}

#[test]
fn test_from_json_null_total_is_unbounded() {
    let cfg = SimulationConfig::from_json_str(r#"{"total_cars": null, "seed": 9}"#).unwrap();
    assert_eq!(cfg.total_cars, None);
    assert_eq!(cfg.seed, Some(9));
}

#[test]
fn test_from_json_invalid() {
    assert!(SimulationConfig::from_json_str("{not json").is_err());
    assert!(SimulationConfig::from_json_str(r#"{"capacity": 0}"#).is_err());
}

#[test]
fn test_parse_total() {
    assert_eq!(parse_total("25"), Ok(Some(25)));
    assert_eq!(parse_total(" unbounded "), Ok(None));
    assert_eq!(parse_total("None"), Ok(None));
    assert!(parse_total("-3").is_err());
    assert!(parse_total("lots").is_err());
}

#[test]
fn test_from_env_overrides() {
    let _env = ENV_LOCK.lock();
    std::env::set_var("LOT_CAPACITY", "7");
    std::env::set_var("LOT_TOTAL_CARS", "unbounded");
    std::env::set_var("LOT_SEED", "3");
    let cfg = SimulationConfig::from_env();
    std::env::remove_var("LOT_CAPACITY");
    std::env::remove_var("LOT_TOTAL_CARS");
    std::env::remove_var("LOT_SEED");

    let cfg = cfg.unwrap();
    assert_eq!(cfg.capacity, 7);
    assert_eq!(cfg.total_cars, None);
    assert_eq!(cfg.seed, Some(3));
    assert!((cfg.dwell_min_secs - 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_json_file_keeps_env_fields_it_does_not_set() {
    let _env = ENV_LOCK.lock();
    std::env::set_var("LOT_CAPACITY", "7");
    std::env::set_var("LOT_ARRIVAL_RATE", "2.0");
    let cfg = SimulationConfig::layered(Some(r#"{"total_cars": 1, "arrival_rate": 9.0}"#));
    std::env::remove_var("LOT_CAPACITY");
    std::env::remove_var("LOT_ARRIVAL_RATE");

    let cfg = cfg.unwrap();
    assert_eq!(cfg.capacity, 7);
    assert_eq!(cfg.total_cars, Some(1));
    assert!((cfg.arrival_rate - 9.0).abs() < f64::EPSILON);
    assert_eq!(cfg.poll_interval_ms, 700);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_layered_without_json_is_env() {
    let _env = ENV_LOCK.lock();
    std::env::set_var("LOT_POLL_INTERVAL_MS", "250");
    let cfg = SimulationConfig::layered(None);
    std::env::remove_var("LOT_POLL_INTERVAL_MS");

    assert_eq!(cfg.unwrap().poll_interval_ms, 250);
}

#[test]
fn test_overlay_json_replaces_only_present_fields() {
    let base = SimulationConfig {
        capacity: 3,
        seed: Some(11),
        ..SimulationConfig::default()
    };
    let cfg = base.overlay_json(r#"{"seed": null, "dwell_max_secs": 8.0}"#).unwrap();
    assert_eq!(cfg.capacity, 3);
    assert_eq!(cfg.seed, None);
    assert!((cfg.dwell_max_secs - 8.0).abs() < f64::EPSILON);

    assert!(SimulationConfig::default().overlay_json("[1, 2]").is_err());
}

#[cfg(unix)]
#[test]
fn test_non_unicode_env_value_is_reported() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let _env = ENV_LOCK.lock();
    std::env::set_var("LOT_SEED", OsString::from_vec(vec![b'4', 0xff]));
    let cfg = SimulationConfig::from_env();
    std::env::remove_var("LOT_SEED");

    let err = cfg.unwrap_err();
    assert!(err.contains("LOT_SEED"), "{err}");
}
