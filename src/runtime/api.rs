//! Serializable views handed to display layers.

use serde::{Deserialize, Serialize};

use crate::core::{Snapshot, VehicleId};

/// State of one spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotView {
    /// Spot index.
    pub index: usize,
    /// Vehicle parked there, if any.
    pub vehicle: Option<VehicleId>,
}

/// Occupancy panel: counts, per-spot state and the waiting line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyView {
    /// Number of spots.
    pub capacity: usize,
    /// Spots held.
    pub occupied: usize,
    /// Spots free.
    pub free: usize,
    /// Per-spot state, by index.
    pub spots: Vec<SpotView>,
    /// Queued ids, head first.
    pub waiting: Vec<VehicleId>,
}

impl From<&Snapshot> for OccupancyView {
    fn from(snapshot: &Snapshot) -> Self {
        let spots = snapshot
            .occupied
            .iter()
            .zip(&snapshot.holder)
            .enumerate()
            .map(|(index, (occupied, holder))| SpotView {
                index,
                vehicle: occupied.then_some(*holder),
            })
            .collect();
        Self {
            capacity: snapshot.capacity(),
            occupied: snapshot.occupied_count(),
            free: snapshot.free_count(),
            spots,
            waiting: snapshot.waiting.clone(),
        }
    }
}

impl OccupancyView {
    /// One-line text rendering, e.g. `occupied 3/4 free 1 waiting [7, 8] | 1 2 . 5`.
    pub fn summary_line(&self) -> String {
        let spots: Vec<String> = self
            .spots
            .iter()
            .map(|s| s.vehicle.map_or_else(|| ".".to_string(), |id| id.to_string()))
            .collect();
        format!(
            "occupied {}/{} free {} waiting {:?} | {}",
            self.occupied,
            self.capacity,
            self.free,
            self.waiting,
            spots.join(" ")
        )
    }
}
