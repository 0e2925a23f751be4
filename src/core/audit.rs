//! Audit sinks recording vehicle state transitions.
//!
//! The lot records each transition while still holding its state lock, so a
//! sink sees events in the order they took effect.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{VehicleId, VehicleState};
use crate::util::clock::now_ms;

/// One vehicle state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Vehicle the event is about.
    pub vehicle: VehicleId,
    /// State entered.
    pub state: VehicleState,
    /// Spot index for `Parked` and `Departed`.
    pub spot: Option<usize>,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
///
/// Clones share the same buffer, so a caller can keep one handle and pass
/// another to the lot.
#[derive(Debug, Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(4096)))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Ids that entered `state`, in recording order.
    pub fn vehicles_in(&self, state: VehicleState) -> Vec<VehicleId> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.state == state)
            .map(|e| e.vehicle)
            .collect()
    }

    /// Spot index each vehicle parked in, in parking order.
    pub fn parked_spots(&self) -> Vec<(VehicleId, usize)> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.state == VehicleState::Parked)
            .filter_map(|e| e.spot.map(|spot| (e.vehicle, spot)))
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event stamped with the current time.
pub fn build_audit_event(vehicle: VehicleId, state: VehicleState, spot: Option<usize>) -> AuditEvent {
    AuditEvent {
        vehicle,
        state,
        spot,
        created_at_ms: now_ms(),
    }
}
