//! Error types for lot and simulation operations.

use thiserror::Error;

use crate::core::VehicleId;

/// Errors produced by simulator components.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The wait queue already holds `capacity` vehicles.
    #[error("wait queue full: vehicle {0} dropped")]
    QueueFull(VehicleId),
    /// Exit requested for a vehicle that holds no spot.
    #[error("vehicle {0} is not parked")]
    UnknownVehicle(VehicleId),
    /// A permit was granted but every spot is taken.
    #[error("no free spot despite an acquired permit")]
    NoFreeSpot,
    /// Runtime failure (task panicked, channel closed, ...).
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
