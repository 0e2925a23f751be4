//! Spot occupancy state guarded by the lot's reader/writer lock.

use crate::core::{SimError, VehicleId};

/// Occupancy vector, holder ids and the round-robin cursor.
///
/// Not synchronised on its own; the lot wraps it in a `parking_lot::RwLock`.
#[derive(Debug, Clone)]
pub(crate) struct SpotState {
    occupied: Vec<bool>,
    holder: Vec<VehicleId>,
    cursor: usize,
}

impl SpotState {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            occupied: vec![false; capacity],
            holder: vec![0; capacity],
            cursor: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.occupied.len()
    }

    pub(crate) fn occupied(&self) -> &[bool] {
        &self.occupied
    }

    pub(crate) fn holder(&self) -> &[VehicleId] {
        &self.holder
    }

    pub(crate) const fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|o| **o).count()
    }

    /// Index of the spot held by `id`, if any. Id 0 marks a free spot and
    /// never matches.
    pub(crate) fn position(&self, id: VehicleId) -> Option<usize> {
        if id == 0 {
            return None;
        }
        self.holder.iter().position(|h| *h == id)
    }

    /// First free spot scanning `cursor, cursor+1, ...` modulo capacity.
    pub(crate) fn find_next_spot(&self) -> Option<usize> {
        let n = self.capacity();
        (0..n)
            .map(|offset| (self.cursor + offset) % n)
            .find(|&i| !self.occupied[i])
    }

    /// Assign the next free spot to `id` and advance the cursor past it.
    pub(crate) fn claim(&mut self, id: VehicleId) -> Result<usize, SimError> {
        let spot = self.find_next_spot().ok_or(SimError::NoFreeSpot)?;
        self.occupied[spot] = true;
        self.holder[spot] = id;
        self.cursor = (spot + 1) % self.capacity();
        Ok(spot)
    }

    /// Free the spot held by `id`. The cursor is left untouched.
    pub(crate) fn release(&mut self, id: VehicleId) -> Result<usize, SimError> {
        let spot = self.position(id).ok_or(SimError::UnknownVehicle(id))?;
        self.occupied[spot] = false;
        self.holder[spot] = 0;
        Ok(spot)
    }
}
