//! Vehicles and their lifecycle states.

use serde::{Deserialize, Serialize};

/// Identifier assigned to vehicles in arrival order, starting at 1.
///
/// `0` is reserved: it marks an empty spot in the holder vector.
pub type VehicleId = u64;

/// A vehicle travelling through the lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
}

impl Vehicle {
    /// Create a vehicle with the given identifier.
    pub const fn new(id: VehicleId) -> Self {
        Self { id }
    }

    /// The vehicle identifier.
    pub const fn id(&self) -> VehicleId {
        self.id
    }
}

/// Lifecycle state of a vehicle.
///
/// ```text
/// Arriving -> Parked | Waiting | Dropped
/// Waiting  -> Parked | Dropped
/// Parked   -> Departed
/// ```
///
/// `Waiting -> Dropped` only happens when an observer consumes the head of
/// the wait queue through [`crate::core::LotObserver::peek_waiting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleState {
    /// Handed to the lot, admission not decided yet.
    Arriving,
    /// Holds a spot.
    Parked,
    /// Queued for a spot.
    Waiting,
    /// Abandoned because the wait queue was full.
    Dropped,
    /// Left the lot after its dwell time.
    Departed,
}

impl VehicleState {
    /// Whether the state is final.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dropped | Self::Departed)
    }

    /// Whether `self -> next` is a legal transition.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Arriving, Self::Parked | Self::Waiting | Self::Dropped)
                | (Self::Waiting, Self::Parked | Self::Dropped)
                | (Self::Parked, Self::Departed)
        )
    }
}
