//! Tests for lot builders

use lot_simulator::builders::{build_arrivals, build_lot};
use lot_simulator::config::SimulationConfig;
use lot_simulator::core::{ArrivalProcess, DwellPolicy, LotObserver, SimError, UniformDwell};
use lot_simulator::runtime::TokioSpawner;

#[tokio::test]
async fn test_build_lot_from_config() {
    let cfg = SimulationConfig {
        capacity: 6,
        seed: Some(1),
        ..SimulationConfig::default()
    };
    let lot = build_lot(&cfg, TokioSpawner::current().unwrap()).expect("lot");
    assert_eq!(lot.capacity(), 6);
    assert_eq!(lot.stats().available_permits, 6);
    assert_eq!(lot.dwell_max().as_secs(), 5);
}

#[tokio::test]
async fn test_build_lot_rejects_invalid_config() {
    let cfg = SimulationConfig {
        capacity: 0,
        ..SimulationConfig::default()
    };
    let err = build_lot(&cfg, TokioSpawner::current().unwrap()).err();
    assert!(matches!(err, Some(SimError::InvalidConfig(_))));
}

#[test]
fn test_seeded_arrivals_repeat() {
    let cfg = SimulationConfig {
        seed: Some(42),
        ..SimulationConfig::default()
    };
    let mut a = build_arrivals(&cfg).unwrap();
    let mut b = build_arrivals(&cfg).unwrap();
    for _ in 0..20 {
        assert_eq!(a.next_gap(), b.next_gap());
    }
}

#[test]
fn test_arrival_mean_follows_rate() {
    let cfg = SimulationConfig {
        arrival_rate: 4.0,
        seed: Some(7),
        ..SimulationConfig::default()
    };
    let mut arrivals = build_arrivals(&cfg).unwrap();
    let n = 20_000;
    let total: f64 = (0..n)
        .map(|_| arrivals.next_gap().unwrap().as_secs_f64())
        .sum();
    let mean = total / f64::from(n);
    assert!((mean - 0.25).abs() < 0.01, "mean gap {mean}");
}

#[test]
fn test_dwell_samples_stay_in_range() {
    let dwell = UniformDwell::seeded(3.0, 5.0, 5).unwrap();
    for _ in 0..1000 {
        let secs = dwell.sample().as_secs_f64();
        assert!((3.0..=5.0).contains(&secs), "dwell {secs}");
    }
    assert_eq!(dwell.max().as_secs(), 5);
}
