//! Tests for error types

use lot_simulator::core::SimError;

#[test]
fn test_queue_full_error() {
    let err = SimError::QueueFull(7);
    assert_eq!(format!("{}", err), "wait queue full: vehicle 7 dropped");
}

#[test]
fn test_unknown_vehicle_error() {
    let err = SimError::UnknownVehicle(42);
    assert_eq!(format!("{}", err), "vehicle 42 is not parked");
}

#[test]
fn test_no_free_spot_error() {
    assert_eq!(
        format!("{}", SimError::NoFreeSpot),
        "no free spot despite an acquired permit"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = SimError::InvalidConfig("capacity must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: capacity must be greater than 0"
    );
}

#[test]
fn test_error_converts_into_anyhow() {
    let err: anyhow::Error = SimError::Runtime("task panicked".to_string()).into();
    assert_eq!(err.to_string(), "runtime error: task panicked");
}
