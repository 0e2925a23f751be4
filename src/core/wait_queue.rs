//! Bounded FIFO of vehicles waiting for a spot.

use std::collections::VecDeque;

use crate::core::{SimError, Vehicle, VehicleId};

/// In-memory FIFO bounded to a maximum depth.
///
/// Push and pop are O(1). The queue never blocks: a push beyond
/// `max_depth` fails and hands the decision back to the caller.
#[derive(Debug)]
pub struct WaitQueue {
    max_depth: usize,
    vehicles: VecDeque<Vehicle>,
}

impl WaitQueue {
    /// Create an empty queue holding at most `max_depth` vehicles.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            vehicles: VecDeque::with_capacity(max_depth.min(1024)),
        }
    }

    /// Append a vehicle at the tail if there is room.
    pub fn try_push(&mut self, vehicle: Vehicle) -> Result<(), SimError> {
        if self.len() >= self.max_depth {
            return Err(SimError::QueueFull(vehicle.id()));
        }
        self.vehicles.push_back(vehicle);
        Ok(())
    }

    /// Remove and return the head of the queue.
    pub fn pop_front(&mut self) -> Option<Vehicle> {
        self.vehicles.pop_front()
    }

    /// The head of the queue, without removing it.
    pub fn front(&self) -> Option<&Vehicle> {
        self.vehicles.front()
    }

    /// Whether a vehicle with `id` is queued.
    pub fn contains(&self, id: VehicleId) -> bool {
        self.vehicles.iter().any(|v| v.id() == id)
    }

    /// Ids in queue order, head first.
    pub fn ids(&self) -> Vec<VehicleId> {
        self.vehicles.iter().map(Vehicle::id).collect()
    }

    /// Maximum depth allowed for this queue.
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Current depth.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether no vehicle is waiting.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
