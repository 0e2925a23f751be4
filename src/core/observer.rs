//! Read-only observer contract consumed by display layers.

use serde::{Deserialize, Serialize};

use crate::core::{Vehicle, VehicleId};

/// Consistent copy of the lot state taken under one reader lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// `occupied[i]` is true when spot `i` is held.
    pub occupied: Vec<bool>,
    /// Id holding spot `i`, or 0 when free.
    pub holder: Vec<VehicleId>,
    /// Starting index of the next spot search.
    pub cursor: usize,
    /// Permits left on the admission semaphore.
    pub available_permits: usize,
    /// Queued ids, head first.
    pub waiting: Vec<VehicleId>,
}

impl Snapshot {
    /// Number of spots.
    pub fn capacity(&self) -> usize {
        self.occupied.len()
    }

    /// Number of held spots.
    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|o| **o).count()
    }

    /// Number of free spots.
    pub fn free_count(&self) -> usize {
        self.capacity() - self.occupied_count()
    }

    /// Check the lot invariants over this snapshot.
    ///
    /// Returns a description of the first violation found.
    pub fn verify(&self) -> Result<(), String> {
        let n = self.capacity();
        if self.holder.len() != n {
            return Err(format!("holder length {} != capacity {n}", self.holder.len()));
        }
        if self.occupied_count() + self.available_permits != n {
            return Err(format!(
                "occupied {} + permits {} != capacity {n}",
                self.occupied_count(),
                self.available_permits
            ));
        }
        if let Some(i) = (0..n).find(|&i| self.occupied[i] != (self.holder[i] != 0)) {
            return Err(format!(
                "spot {i}: occupied={} but holder={}",
                self.occupied[i], self.holder[i]
            ));
        }
        let mut parked: Vec<VehicleId> = self.holder.iter().copied().filter(|h| *h != 0).collect();
        parked.sort_unstable();
        if let Some(w) = parked.windows(2).find(|w| w[0] == w[1]) {
            return Err(format!("vehicle {} holds two spots", w[0]));
        }
        if self.waiting.len() > n {
            return Err(format!("{} waiting exceeds capacity {n}", self.waiting.len()));
        }
        if let Some(id) = self.waiting.iter().find(|id| parked.binary_search(id).is_ok()) {
            return Err(format!("vehicle {id} is both parked and waiting"));
        }
        Ok(())
    }
}

/// Capabilities a visualizer may use to poll the lot.
pub trait LotObserver {
    /// Number of spots.
    fn capacity(&self) -> usize;

    /// Consistent snapshot of spots, permits and the wait queue.
    fn snapshot(&self) -> Snapshot;

    /// Freshly allocated `(occupied, holder)` pair.
    fn occupied_spaces(&self) -> (Vec<bool>, Vec<VehicleId>) {
        let snapshot = self.snapshot();
        (snapshot.occupied, snapshot.holder)
    }

    /// Queued ids, head first. Does not modify the queue.
    fn waiting_ids(&self) -> Vec<VehicleId>;

    /// Remove and return the head of the wait queue.
    ///
    /// Destructive: the returned vehicle never parks. Prefer
    /// [`LotObserver::waiting_ids`].
    fn peek_waiting(&self) -> Option<Vehicle>;
}
