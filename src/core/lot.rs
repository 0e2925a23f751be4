//! Bounded parking lot with semaphore admission and a FIFO wait queue.
//!
//! Synchronisation:
//! - `state` (`occupied`, `holder`, `cursor`) sits behind a `parking_lot::RwLock`.
//! - `permits` is a `tokio::sync::Semaphore` with `capacity` permits. It is
//!   only touched with non-blocking calls, and only while the state write lock
//!   is held, so any reader sees `occupied + permits == capacity`.
//! - `waiting` is a bounded FIFO behind its own mutex.
//!
//! Lock order is always `state -> waiting -> audit`. No lock is held across
//! an `.await`.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::{Notify, Semaphore};
use tracing::{debug, error, info, warn};

use crate::core::audit::build_audit_event;
use crate::core::spots::SpotState;
use crate::core::stats::LotCounters;
use crate::core::{
    AuditSink, DwellPolicy, LotObserver, LotStats, SimError, Snapshot, Vehicle, VehicleId,
    VehicleState, WaitQueue,
};

/// Abstraction for spawning lot tasks (dwell timers, wake-ups) on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Outcome of [`Lot::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    /// A spot was assigned and a dwell timer started.
    Parked {
        /// Spot index.
        spot: usize,
    },
    /// No permit; the vehicle was queued.
    Waiting {
        /// 1-based position in the wait queue.
        position: usize,
    },
    /// No permit and the wait queue was full.
    Dropped,
    /// Id 0, or an id already parked or waiting.
    Rejected,
}

struct Shared<D> {
    capacity: usize,
    state: RwLock<SpotState>,
    permits: Semaphore,
    waiting: Mutex<WaitQueue>,
    dwell: D,
    counters: LotCounters,
    /// Dwell and wake tasks spawned but not finished.
    in_flight: AtomicUsize,
    idle: Notify,
    audit: Mutex<Option<Box<dyn AuditSink>>>,
}

/// Handle to a parking lot. Clones share the same lot.
pub struct Lot<S, D> {
    shared: Arc<Shared<D>>,
    spawner: S,
}

impl<S: Clone, D> Clone for Lot<S, D> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            spawner: self.spawner.clone(),
        }
    }
}

impl<S, D> Lot<S, D>
where
    D: DwellPolicy,
{
    /// Create a lot with `capacity` spots and a wait queue of the same depth.
    pub fn new(capacity: usize, dwell: D, spawner: S) -> Result<Self, SimError> {
        if capacity == 0 {
            return Err(SimError::InvalidConfig(
                "capacity must be greater than 0".into(),
            ));
        }
        if capacity > Semaphore::MAX_PERMITS {
            return Err(SimError::InvalidConfig(format!(
                "capacity {capacity} exceeds {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(Self {
            shared: Arc::new(Shared {
                capacity,
                state: RwLock::new(SpotState::new(capacity)),
                permits: Semaphore::new(capacity),
                waiting: Mutex::new(WaitQueue::new(capacity)),
                dwell,
                counters: LotCounters::default(),
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
                audit: Mutex::new(None),
            }),
            spawner,
        })
    }

    /// Attach an audit sink receiving every vehicle state transition.
    #[must_use]
    pub fn with_audit(self, audit: Box<dyn AuditSink>) -> Self {
        *self.shared.audit.lock() = Some(audit);
        self
    }

    /// Longest dwell time the lot can hand out.
    pub fn dwell_max(&self) -> Duration {
        self.shared.dwell.max()
    }

    /// Occupancy reading plus lifetime counters.
    pub fn stats(&self) -> LotStats {
        let state = self.shared.state.read();
        let waiting = self.shared.waiting.lock().len();
        self.shared.counters.snapshot(
            self.shared.capacity,
            state.occupied_count(),
            self.shared.permits.available_permits(),
            waiting,
        )
    }

    /// Dwell and wake tasks still running.
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Resolve once no dwell or wake task is in flight.
    ///
    /// With no arrivals pending this means every admitted vehicle departed.
    pub async fn drained(&self) {
        loop {
            let notified = self.shared.idle.notified();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn record(&self, vehicle: VehicleId, state: VehicleState, spot: Option<usize>) {
        if let Some(sink) = self.shared.audit.lock().as_mut() {
            sink.record(build_audit_event(vehicle, state, spot));
        }
    }

    fn task_started(&self) {
        self.shared.in_flight.fetch_add(1, Ordering::AcqRel);
    }

    fn task_finished(&self) {
        if self.shared.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.idle.notify_waiters();
        }
    }
}

impl<S, D> Lot<S, D>
where
    S: Spawn + Clone + Send + Sync + 'static,
    D: DwellPolicy,
{
    /// Admit an arriving vehicle.
    ///
    /// Takes a permit without blocking and parks the vehicle in the next free
    /// spot from the cursor, starting its dwell timer. Without a permit the
    /// vehicle is queued, or dropped when the queue already holds `capacity`
    /// vehicles. Never blocks on the queue and never fails.
    pub fn enter(&self, vehicle: Vehicle) -> Admission {
        let id = vehicle.id();
        if id == 0 {
            warn!("ignoring arrival without a vehicle id");
            return Admission::Rejected;
        }

        let mut state = self.shared.state.write();
        if state.position(id).is_some() || self.shared.waiting.lock().contains(id) {
            warn!("vehicle {id} is already in the lot; arrival ignored");
            return Admission::Rejected;
        }
        LotCounters::bump(&self.shared.counters.arrived);
        self.record(id, VehicleState::Arriving, None);

        if let Ok(permit) = self.shared.permits.try_acquire() {
            match state.claim(id) {
                Ok(spot) => {
                    permit.forget();
                    LotCounters::bump(&self.shared.counters.parked);
                    self.record(id, VehicleState::Parked, Some(spot));
                    drop(state);
                    info!("vehicle {id} parked in spot {spot}");
                    self.schedule_dwell(vehicle, spot);
                    return Admission::Parked { spot };
                }
                // The permit goes back on drop.
                Err(e) => error!("vehicle {id} held a permit but could not park: {e}"),
            }
        }

        let mut waiting = self.shared.waiting.lock();
        match waiting.try_push(vehicle) {
            Ok(()) => {
                let position = waiting.len();
                LotCounters::bump(&self.shared.counters.queued);
                self.record(id, VehicleState::Waiting, None);
                info!("vehicle {id} waiting for a spot (position {position})");
                Admission::Waiting { position }
            }
            Err(e) => {
                LotCounters::bump(&self.shared.counters.dropped);
                self.record(id, VehicleState::Dropped, None);
                warn!(depth = waiting.len(), "{e}");
                Admission::Dropped
            }
        }
    }

    /// Release the spot held by `vehicle` and wake the head of the queue.
    ///
    /// Returns the freed spot. An exit for a vehicle that holds no spot is
    /// logged and changes nothing.
    pub fn exit(&self, vehicle: &Vehicle) -> Option<usize> {
        let id = vehicle.id();
        let released = {
            let mut state = self.shared.state.write();
            let released = state.release(id);
            if let Ok(spot) = released {
                self.shared.permits.add_permits(1);
                LotCounters::bump(&self.shared.counters.departed);
                self.record(id, VehicleState::Departed, Some(spot));
            }
            released
        };

        match released {
            Ok(spot) => {
                info!("vehicle {id} left spot {spot}");
                self.schedule_wake();
                Some(spot)
            }
            Err(e) => {
                LotCounters::bump(&self.shared.counters.unknown_exits);
                warn!("exit ignored: {e}");
                None
            }
        }
    }

    /// Park the head of the wait queue if a permit is free.
    ///
    /// The head is only removed once it has a spot, so a waiter that loses
    /// the permit to a concurrent arrival keeps its place.
    fn admit_waiting(&self) -> Option<usize> {
        let mut state = self.shared.state.write();
        let mut waiting = self.shared.waiting.lock();
        let id = waiting.front().map(Vehicle::id)?;

        let Ok(permit) = self.shared.permits.try_acquire() else {
            debug!("no permit for queued vehicle {id}; it keeps its place");
            return None;
        };
        let spot = match state.claim(id) {
            Ok(spot) => spot,
            Err(e) => {
                error!("queued vehicle {id} held a permit but could not park: {e}");
                return None;
            }
        };
        permit.forget();
        let vehicle = waiting.pop_front().unwrap_or_else(|| Vehicle::new(id));
        drop(waiting);
        LotCounters::bump(&self.shared.counters.parked);
        self.record(id, VehicleState::Parked, Some(spot));
        drop(state);

        info!("vehicle {id} left the queue and parked in spot {spot}");
        self.schedule_dwell(vehicle, spot);
        Some(spot)
    }

    fn schedule_dwell(&self, vehicle: Vehicle, spot: usize) {
        let dwell = self.shared.dwell.sample();
        debug!("vehicle {} dwells {dwell:?} in spot {spot}", vehicle.id());
        self.task_started();
        let lot = self.clone();
        self.spawner.spawn(async move {
            tokio::time::sleep(dwell).await;
            lot.exit(&vehicle);
            lot.task_finished();
        });
    }

    /// Re-admission runs on its own task rather than inline in `exit`.
    fn schedule_wake(&self) {
        if self.shared.waiting.lock().is_empty() {
            return;
        }
        self.task_started();
        let lot = self.clone();
        self.spawner.spawn(async move {
            lot.admit_waiting();
            lot.task_finished();
        });
    }
}

impl<S, D> LotObserver for Lot<S, D>
where
    D: DwellPolicy,
{
    fn capacity(&self) -> usize {
        self.shared.capacity
    }

    fn snapshot(&self) -> Snapshot {
        let state = self.shared.state.read();
        let waiting = self.shared.waiting.lock().ids();
        Snapshot {
            occupied: state.occupied().to_vec(),
            holder: state.holder().to_vec(),
            cursor: state.cursor(),
            available_permits: self.shared.permits.available_permits(),
            waiting,
        }
    }

    fn waiting_ids(&self) -> Vec<VehicleId> {
        self.shared.waiting.lock().ids()
    }

    fn peek_waiting(&self) -> Option<Vehicle> {
        let _state = self.shared.state.write();
        let vehicle = self.shared.waiting.lock().pop_front()?;
        LotCounters::bump(&self.shared.counters.taken_by_observer);
        self.record(vehicle.id(), VehicleState::Dropped, None);
        warn!("vehicle {} taken off the wait queue by an observer", vehicle.id());
        Some(vehicle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedDwell;

    /// Spawner that discards tasks, leaving every vehicle parked.
    #[derive(Clone)]
    struct NoopSpawner;

    impl Spawn for NoopSpawner {
        fn spawn<F>(&self, _fut: F)
        where
            F: Future<Output = ()> + Send + 'static,
        {
        }
    }

    fn lot(capacity: usize) -> Lot<NoopSpawner, FixedDwell> {
        Lot::new(capacity, FixedDwell(Duration::from_secs(1)), NoopSpawner).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = Lot::new(0, FixedDwell(Duration::ZERO), NoopSpawner);
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_enter_parks_then_queues_then_drops() {
        let lot = lot(1);
        assert_eq!(lot.enter(Vehicle::new(1)), Admission::Parked { spot: 0 });
        assert_eq!(lot.enter(Vehicle::new(2)), Admission::Waiting { position: 1 });
        assert_eq!(lot.enter(Vehicle::new(3)), Admission::Dropped);

        let snapshot = lot.snapshot();
        assert_eq!(snapshot.holder, vec![1]);
        assert_eq!(snapshot.waiting, vec![2]);
        assert_eq!(snapshot.available_permits, 0);
        snapshot.verify().unwrap();
    }

    #[test]
    fn test_nil_and_duplicate_vehicles_rejected() {
        let lot = lot(2);
        assert_eq!(lot.enter(Vehicle::new(0)), Admission::Rejected);
        assert_eq!(lot.enter(Vehicle::new(5)), Admission::Parked { spot: 0 });
        assert_eq!(lot.enter(Vehicle::new(5)), Admission::Rejected);
        assert_eq!(lot.stats().arrived, 1);
        assert_eq!(lot.snapshot().holder, vec![5, 0]);
    }

    #[test]
    fn test_unknown_exit_is_idempotent() {
        let lot = lot(2);
        lot.enter(Vehicle::new(1));
        let before = lot.snapshot();

        assert_eq!(lot.exit(&Vehicle::new(42)), None);
        assert_eq!(lot.exit(&Vehicle::new(42)), None);

        assert_eq!(lot.snapshot(), before);
        assert_eq!(lot.stats().unknown_exits, 2);
        assert_eq!(lot.stats().available_permits, 1);
    }

    #[test]
    fn test_exit_returns_permit() {
        let lot = lot(2);
        lot.enter(Vehicle::new(1));
        lot.enter(Vehicle::new(2));
        assert_eq!(lot.exit(&Vehicle::new(1)), Some(0));

        let snapshot = lot.snapshot();
        assert_eq!(snapshot.occupied, vec![false, true]);
        assert_eq!(snapshot.available_permits, 1);
        snapshot.verify().unwrap();
    }

    #[test]
    fn test_admit_waiting_keeps_fifo_head() {
        let lot = lot(1);
        lot.enter(Vehicle::new(1));
        lot.enter(Vehicle::new(2));

        // No permit yet: head stays queued.
        assert_eq!(lot.admit_waiting(), None);
        assert_eq!(lot.waiting_ids(), vec![2]);

        lot.exit(&Vehicle::new(1));
        assert_eq!(lot.admit_waiting(), Some(0));
        assert!(lot.waiting_ids().is_empty());
        assert_eq!(lot.snapshot().holder, vec![2]);
    }

    #[test]
    fn test_occupied_spaces_are_fresh_copies() {
        let lot = lot(3);
        lot.enter(Vehicle::new(1));
        lot.enter(Vehicle::new(2));

        let (mut occupied, mut holder) = lot.occupied_spaces();
        assert_eq!(occupied, vec![true, true, false]);
        assert_eq!(holder, vec![1, 2, 0]);

        occupied[0] = false;
        holder[0] = 0;
        let snapshot = lot.snapshot();
        assert_eq!(snapshot.occupied, vec![true, true, false]);
        assert_eq!(snapshot.holder, vec![1, 2, 0]);
    }

    #[test]
    fn test_peek_waiting_consumes_head() {
        let lot = lot(1);
        lot.enter(Vehicle::new(1));
        lot.enter(Vehicle::new(2));

        assert_eq!(lot.peek_waiting().map(|v| v.id()), Some(2));
        assert!(lot.peek_waiting().is_none());
        assert_eq!(lot.stats().taken_by_observer, 1);
    }
}
