//! Lifetime counters and occupancy statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Statistics about lot occupancy and vehicle outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotStats {
    /// Number of spots.
    pub capacity: usize,
    /// Spots currently held.
    pub occupied: usize,
    /// Permits currently available.
    pub available_permits: usize,
    /// Vehicles currently queued.
    pub waiting: usize,
    /// Vehicles handed to `enter` (rejected ones excluded).
    pub arrived: u64,
    /// Total `Parked` transitions.
    pub parked: u64,
    /// Total `Waiting` transitions.
    pub queued: u64,
    /// Vehicles dropped on a full wait queue.
    pub dropped: u64,
    /// Total `Departed` transitions.
    pub departed: u64,
    /// Queued vehicles consumed by an observer poll.
    pub taken_by_observer: u64,
    /// `exit` calls for vehicles that held no spot.
    pub unknown_exits: u64,
}

/// Internal counters (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct LotCounters {
    pub arrived: AtomicU64,
    pub parked: AtomicU64,
    pub queued: AtomicU64,
    pub dropped: AtomicU64,
    pub departed: AtomicU64,
    pub taken_by_observer: AtomicU64,
    pub unknown_exits: AtomicU64,
}

impl LotCounters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Combine lifetime counters with a point-in-time occupancy reading.
    pub(crate) fn snapshot(
        &self,
        capacity: usize,
        occupied: usize,
        available_permits: usize,
        waiting: usize,
    ) -> LotStats {
        LotStats {
            capacity,
            occupied,
            available_permits,
            waiting,
            arrived: self.arrived.load(Ordering::Relaxed),
            parked: self.parked.load(Ordering::Relaxed),
            queued: self.queued.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            departed: self.departed.load(Ordering::Relaxed),
            taken_by_observer: self.taken_by_observer.load(Ordering::Relaxed),
            unknown_exits: self.unknown_exits.load(Ordering::Relaxed),
        }
    }
}

impl LotStats {
    /// Vehicles that reached a terminal state.
    pub const fn finished(&self) -> u64 {
        self.departed + self.dropped + self.taken_by_observer
    }
}
